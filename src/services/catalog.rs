use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::brand::{Brand, BrandFilter, BrandListQuery, BrandOrderBy};
use crate::domain::category::{Category, CategoryFilter, CategoryListQuery, CategoryOrderBy};
use crate::domain::product::{
    Product, ProductAggregate, ProductDetails, ProductFilter, ProductGroup, ProductGroupBy,
    ProductListQuery, ProductOrderBy,
};
use crate::pagination::{Paginated, SortDirection};
use crate::repository::{BrandReader, CategoryReader, ProductReader};
use crate::services::{PageQuery, ServiceError, ServiceResult};

/// Query parameters accepted by the brand and category listings.
#[derive(Debug, Default, Deserialize)]
pub struct NamedListQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    /// Sort by name instead of id.
    #[serde(default)]
    pub by_name: bool,
    pub direction: Option<SortDirection>,
}

impl NamedListQuery {
    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Lists brands one page at a time.
pub fn list_brands<R>(repo: &R, query: NamedListQuery) -> ServiceResult<Paginated<Brand>>
where
    R: BrandReader + ?Sized,
{
    let pagination = query.page_query().pagination();

    let mut filter = BrandFilter::new();
    if let Some(search) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        filter = filter.search(search);
    }

    let order_by = if query.by_name {
        BrandOrderBy::Name
    } else {
        BrandOrderBy::Id
    };

    let list_query = BrandListQuery::new()
        .filter(filter)
        .order_by(order_by, query.direction.unwrap_or_default())
        .paginate(pagination.page, pagination.per_page);

    let (total, items) = repo.list_brands(list_query)?;
    Ok(Paginated::new(items, pagination.page, total, pagination.per_page))
}

/// Lists categories one page at a time.
pub fn list_categories<R>(repo: &R, query: NamedListQuery) -> ServiceResult<Paginated<Category>>
where
    R: CategoryReader + ?Sized,
{
    let pagination = query.page_query().pagination();

    let mut filter = CategoryFilter::new();
    if let Some(search) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        filter = filter.search(search);
    }

    let order_by = if query.by_name {
        CategoryOrderBy::Name
    } else {
        CategoryOrderBy::Id
    };

    let list_query = CategoryListQuery::new()
        .filter(filter)
        .order_by(order_by, query.direction.unwrap_or_default())
        .paginate(pagination.page, pagination.per_page);

    let (total, items) = repo.list_categories(list_query)?;
    Ok(Paginated::new(items, pagination.page, total, pagination.per_page))
}

/// Query parameters accepted by the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub search: Option<String>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub model_year: Option<i16>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort: Option<ProductOrderBy>,
    pub direction: Option<SortDirection>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl ProductsQuery {
    fn filter(&self) -> ProductFilter {
        let mut filter = ProductFilter::new().price_between(self.min_price, self.max_price);

        if let Some(search) = self.search.as_deref().filter(|term| !term.trim().is_empty()) {
            filter = filter.search(search);
        }
        if let Some(brand_id) = self.brand_id {
            filter = filter.brand_id(brand_id);
        }
        if let Some(category_id) = self.category_id {
            filter = filter.category_id(category_id);
        }
        if let Some(model_year) = self.model_year {
            filter = filter.model_year(model_year);
        }

        filter
    }
}

/// Lists products matching the query one page at a time.
pub fn list_products<R>(repo: &R, query: ProductsQuery) -> ServiceResult<Paginated<Product>>
where
    R: ProductReader + ?Sized,
{
    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
        if min > max {
            return Err(ServiceError::Form(format!(
                "min_price {min} is greater than max_price {max}"
            )));
        }
    }

    let pagination = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .pagination();

    let list_query = ProductListQuery::new()
        .filter(query.filter())
        .order_by(
            query.sort.unwrap_or_default(),
            query.direction.unwrap_or_default(),
        )
        .paginate(pagination.page, pagination.per_page);

    let (total, items) = repo.list_products(list_query)?;
    Ok(Paginated::new(items, pagination.page, total, pagination.per_page))
}

/// Loads one product with its brand, category and stock.
pub fn product_details<R>(repo: &R, product_id: i32) -> ServiceResult<ProductDetails>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_details(product_id)?
        .ok_or(ServiceError::NotFound)
}

/// Query parameters accepted by the product statistics endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ProductStatsQuery {
    pub group_by: Option<ProductGroupBy>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub model_year: Option<i16>,
}

/// Price and model year statistics, overall and per group.
#[derive(Debug, Serialize)]
pub struct ProductStats {
    pub overall: ProductAggregate,
    pub groups: Vec<ProductGroup>,
}

pub fn product_stats<R>(repo: &R, query: ProductStatsQuery) -> ServiceResult<ProductStats>
where
    R: ProductReader + ?Sized,
{
    let mut filter = ProductFilter::new();
    if let Some(brand_id) = query.brand_id {
        filter = filter.brand_id(brand_id);
    }
    if let Some(category_id) = query.category_id {
        filter = filter.category_id(category_id);
    }
    if let Some(model_year) = query.model_year {
        filter = filter.model_year(model_year);
    }

    let overall = repo.aggregate_products(&filter)?;
    let groups = match query.group_by {
        Some(by) => repo.group_products(&filter, by)?,
        None => Vec::new(),
    };

    Ok(ProductStats { overall, groups })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
    use crate::repository::RepositoryError;
    use crate::repository::mock::{MockBrandReader, MockCategoryReader, MockProductReader};

    fn sample_product(product_id: i32, list_price: Decimal) -> Product {
        Product {
            product_id,
            product_name: format!("Trek 820 - {product_id}"),
            brand_id: 9,
            category_id: 6,
            model_year: 2016,
            list_price,
        }
    }

    #[test]
    fn list_brands_uses_defaults() {
        let mut repo = MockBrandReader::new();
        repo.expect_list_brands()
            .times(1)
            .withf(|query| {
                assert!(query.filter.search.is_none());
                assert_eq!(query.order_by, BrandOrderBy::Id);
                match &query.pagination {
                    Some(pagination) => {
                        assert_eq!(pagination.page, 1);
                        assert_eq!(pagination.per_page, DEFAULT_ITEMS_PER_PAGE);
                    }
                    None => panic!("expected pagination to be set"),
                }
                true
            })
            .returning(|_| {
                Ok((
                    1,
                    vec![Brand {
                        brand_id: 1,
                        brand_name: "Electra".to_string(),
                    }],
                ))
            });

        let page = list_brands(&repo, NamedListQuery::default()).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn list_brands_past_the_last_page_is_empty() {
        let mut repo = MockBrandReader::new();
        repo.expect_list_brands()
            .times(1)
            .withf(|query| {
                query
                    .pagination
                    .is_some_and(|pagination| pagination.offset() == i64::MAX)
            })
            .returning(|_| Ok((3, Vec::new())));

        let query = NamedListQuery {
            page: Some(usize::MAX),
            per_page: Some(20),
            ..NamedListQuery::default()
        };

        let page = list_brands(&repo, query).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn list_categories_searches_by_name() {
        let mut repo = MockCategoryReader::new();
        repo.expect_list_categories()
            .times(1)
            .withf(|query| {
                query.filter.search.as_deref() == Some("bikes")
                    && query.order_by == CategoryOrderBy::Name
                    && query.direction == SortDirection::Desc
            })
            .returning(|_| {
                Ok((
                    2,
                    vec![
                        Category {
                            category_id: 7,
                            category_name: "Road Bikes".to_string(),
                        },
                        Category {
                            category_id: 6,
                            category_name: "Mountain Bikes".to_string(),
                        },
                    ],
                ))
            });

        let query = NamedListQuery {
            search: Some("bikes".to_string()),
            by_name: true,
            direction: Some(SortDirection::Desc),
            ..NamedListQuery::default()
        };

        let page = list_categories(&repo, query).unwrap();
        assert_eq!(page.items[0].category_name, "Road Bikes");
        assert_eq!(page.total_items, 2);
    }

    #[test]
    fn blank_category_search_is_ignored() {
        let mut repo = MockCategoryReader::new();
        repo.expect_list_categories()
            .times(1)
            .withf(|query| query.filter.search.is_none() && query.order_by == CategoryOrderBy::Id)
            .returning(|_| Ok((0, Vec::new())));

        let query = NamedListQuery {
            search: Some("   ".to_string()),
            ..NamedListQuery::default()
        };

        assert!(list_categories(&repo, query).unwrap().items.is_empty());
    }

    #[test]
    fn list_products_passes_filters() {
        let mut repo = MockProductReader::new();
        repo.expect_list_products()
            .times(1)
            .withf(|query| {
                assert_eq!(query.filter.brand_id, Some(9));
                assert_eq!(query.filter.min_price, Some(dec!(100)));
                assert_eq!(query.filter.search.as_deref(), Some("Trek"));
                assert_eq!(query.order_by, ProductOrderBy::ListPrice);
                assert_eq!(query.direction, SortDirection::Desc);
                true
            })
            .returning(|_| Ok((45, vec![sample_product(1, dec!(379.99))])));

        let query = ProductsQuery {
            search: Some("Trek".to_string()),
            brand_id: Some(9),
            min_price: Some(dec!(100)),
            sort: Some(ProductOrderBy::ListPrice),
            direction: Some(SortDirection::Desc),
            page: Some(2),
            ..ProductsQuery::default()
        };

        let page = list_products(&repo, query).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn list_products_rejects_inverted_price_range() {
        let repo = MockProductReader::new();
        let query = ProductsQuery {
            min_price: Some(dec!(500)),
            max_price: Some(dec!(100)),
            ..ProductsQuery::default()
        };

        let result = list_products(&repo, query);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn missing_product_details_is_not_found() {
        let mut repo = MockProductReader::new();
        repo.expect_get_product_details()
            .times(1)
            .returning(|_| Ok(None));

        let result = product_details(&repo, 999);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn product_stats_skip_grouping_when_not_requested() {
        let mut repo = MockProductReader::new();
        repo.expect_aggregate_products()
            .times(1)
            .returning(|_| Ok(ProductAggregate::default()));
        repo.expect_group_products().never();

        let stats = product_stats(&repo, ProductStatsQuery::default()).unwrap();
        assert!(stats.groups.is_empty());
    }

    #[test]
    fn repository_failures_are_internal() {
        let mut repo = MockProductReader::new();
        repo.expect_aggregate_products().returning(|_| {
            Err(RepositoryError::Database(
                diesel::result::Error::BrokenTransactionManager,
            ))
        });

        let result = product_stats(&repo, ProductStatsQuery::default());
        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }
}
