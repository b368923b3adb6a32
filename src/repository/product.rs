use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use rust_decimal::Decimal;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductAggregate, ProductDetails,
    ProductFilter, ProductGroup, ProductGroupBy, ProductListQuery, ProductOrderBy,
    UpdateProduct as DomainUpdateProduct,
};
use crate::domain::stats::{DecimalStats, IntStats};
use crate::models::brand::Brand as DbBrand;
use crate::models::category::Category as DbCategory;
use crate::models::decimal::{LIST_PRICE, SqlDecimal};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
};
use crate::models::stock::Stock as DbStock;
use crate::pagination::SortDirection;
use crate::repository::{
    DieselRepository, ID_CHUNK_SIZE, ProductReader, ProductWriter, RepositoryError,
    RepositoryResult, check_decimal, contains_pattern,
};
use crate::schema::{brands, categories, products, stocks};

fn filtered(filter: &ProductFilter) -> products::BoxedQuery<'static, Sqlite> {
    let mut query = products::table.into_boxed();

    if let Some(term) = filter.search.as_deref() {
        query = query.filter(products::product_name.like(contains_pattern(term)));
    }

    if let Some(brand_id) = filter.brand_id {
        query = query.filter(products::brand_id.eq(brand_id));
    }

    if let Some(category_id) = filter.category_id {
        query = query.filter(products::category_id.eq(category_id));
    }

    if let Some(model_year) = filter.model_year {
        query = query.filter(products::model_year.eq(model_year));
    }

    // NUMERIC affinity on the column makes SQLite compare the bound text as a number.
    if let Some(min_price) = filter.min_price {
        query = query.filter(products::list_price.ge(SqlDecimal(min_price)));
    }

    if let Some(max_price) = filter.max_price {
        query = query.filter(products::list_price.le(SqlDecimal(max_price)));
    }

    query
}

fn listed(query: &ProductListQuery) -> products::BoxedQuery<'static, Sqlite> {
    let mut items = filtered(&query.filter);

    items = match (query.order_by, query.direction) {
        (ProductOrderBy::Id, SortDirection::Asc) => items.order(products::product_id.asc()),
        (ProductOrderBy::Id, SortDirection::Desc) => items.order(products::product_id.desc()),
        (ProductOrderBy::Name, SortDirection::Asc) => items.order(products::product_name.asc()),
        (ProductOrderBy::Name, SortDirection::Desc) => {
            items.order(products::product_name.desc())
        }
        (ProductOrderBy::ModelYear, SortDirection::Asc) => {
            items.order(products::model_year.asc())
        }
        (ProductOrderBy::ModelYear, SortDirection::Desc) => {
            items.order(products::model_year.desc())
        }
        (ProductOrderBy::ListPrice, SortDirection::Asc) => {
            items.order(products::list_price.asc())
        }
        (ProductOrderBy::ListPrice, SortDirection::Desc) => {
            items.order(products::list_price.desc())
        }
    };
    items = items.then_order_by(products::product_id.asc());

    if let Some(pagination) = &query.pagination {
        items = items.offset(pagination.offset()).limit(pagination.limit());
    }

    items
}

fn matching_ids(
    conn: &mut SqliteConnection,
    filter: &ProductFilter,
) -> RepositoryResult<Vec<i32>> {
    Ok(filtered(filter)
        .select(products::product_id)
        .load::<i32>(conn)?)
}

fn aggregate(rows: &[(i16, Decimal)]) -> ProductAggregate {
    ProductAggregate {
        count: rows.len(),
        list_price: DecimalStats::from_values(rows.iter().map(|(_, price)| Some(*price))),
        model_year: IntStats::from_values(rows.iter().map(|(year, _)| Some(*year))),
    }
}

fn check_new_product(product: &DomainNewProduct) -> RepositoryResult<()> {
    check_decimal(LIST_PRICE, product.list_price)
}

fn check_product_update(updates: &DomainUpdateProduct) -> RepositoryResult<()> {
    match updates.list_price {
        Some(list_price) => check_decimal(LIST_PRICE, list_price),
        None => Ok(()),
    }
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, product_id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .find(product_id)
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn get_product_details(&self, product_id: i32) -> RepositoryResult<Option<ProductDetails>> {
        let mut conn = self.conn()?;

        let Some(product) = products::table
            .find(product_id)
            .first::<DbProduct>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let brand = brands::table
            .find(product.brand_id)
            .first::<DbBrand>(&mut conn)?;
        let category = categories::table
            .find(product.category_id)
            .first::<DbCategory>(&mut conn)?;
        let stock_rows = stocks::table
            .filter(stocks::product_id.eq(product_id))
            .order(stocks::store_id.asc())
            .load::<DbStock>(&mut conn)?;

        Ok(Some(ProductDetails {
            product: product.into(),
            brand: brand.into(),
            category: category.into(),
            stocks: stock_rows.into_iter().map(Into::into).collect(),
        }))
    }

    fn find_first_product(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = listed(&query).first::<DbProduct>(&mut conn).optional()?;

        Ok(product.map(Into::into))
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query.filter)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let items = listed(&query).load::<DbProduct>(&mut conn)?;

        Ok((total, items.into_iter().map(Into::into).collect()))
    }

    fn count_products(&self, filter: &ProductFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }

    fn aggregate_products(&self, filter: &ProductFilter) -> RepositoryResult<ProductAggregate> {
        let mut conn = self.conn()?;

        let rows: Vec<(i16, Decimal)> = filtered(filter)
            .select((products::model_year, products::list_price))
            .load::<(i16, SqlDecimal)>(&mut conn)?
            .into_iter()
            .map(|(year, price)| (year, price.into()))
            .collect();

        Ok(aggregate(&rows))
    }

    fn group_products(
        &self,
        filter: &ProductFilter,
        by: ProductGroupBy,
    ) -> RepositoryResult<Vec<ProductGroup>> {
        let mut conn = self.conn()?;

        let rows = filtered(filter)
            .select((
                products::brand_id,
                products::category_id,
                products::model_year,
                products::list_price,
            ))
            .load::<(i32, i32, i16, SqlDecimal)>(&mut conn)?;

        let mut groups: BTreeMap<i32, Vec<(i16, Decimal)>> = BTreeMap::new();
        for (brand_id, category_id, model_year, list_price) in rows {
            let key = match by {
                ProductGroupBy::Brand => brand_id,
                ProductGroupBy::Category => category_id,
                ProductGroupBy::ModelYear => i32::from(model_year),
            };
            groups
                .entry(key)
                .or_default()
                .push((model_year, list_price.into()));
        }

        Ok(groups
            .into_iter()
            .map(|(key, rows)| ProductGroup {
                key,
                aggregate: aggregate(&rows),
            })
            .collect())
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        check_new_product(new_product)?;
        let mut conn = self.conn()?;

        let created = diesel::insert_into(products::table)
            .values(&DbNewProduct::from(new_product))
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into())
    }

    fn create_products(&self, new_products: &[DomainNewProduct]) -> RepositoryResult<usize> {
        for new in new_products {
            check_new_product(new)?;
        }
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut count_inserted: usize = 0;

            for new in new_products {
                diesel::insert_into(products::table)
                    .values(&DbNewProduct::from(new))
                    .execute(conn)?;
                count_inserted += 1;
            }

            Ok(count_inserted)
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        check_product_update(updates)?;
        let mut conn = self.conn()?;

        if updates.is_empty() {
            let current = products::table
                .find(product_id)
                .first::<DbProduct>(&mut conn)?;
            return Ok(current.into());
        }

        let updated = diesel::update(products::table.find(product_id))
            .set(&DbUpdateProduct::from(updates))
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn update_products(
        &self,
        filter: &ProductFilter,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<usize> {
        check_product_update(updates)?;
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() || updates.is_empty() {
                return Ok(ids.len());
            }

            let changes = DbUpdateProduct::from(updates);
            let mut updated = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = products::table.filter(products::product_id.eq_any(chunk));
                updated += diesel::update(target).set(&changes).execute(conn)?;
            }

            Ok(updated)
        })
    }

    fn upsert_product(
        &self,
        product_id: i32,
        create: &DomainNewProduct,
        update: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        check_new_product(create)?;
        check_product_update(update)?;
        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            let existing = products::table
                .find(product_id)
                .first::<DbProduct>(conn)
                .optional()?;

            let row = match existing {
                Some(row) if update.is_empty() => row,
                Some(_) => diesel::update(products::table.find(product_id))
                    .set(&DbUpdateProduct::from(update))
                    .get_result::<DbProduct>(conn)?,
                None => {
                    let mut db_new = DbNewProduct::from(create);
                    db_new.product_id = Some(product_id);
                    diesel::insert_into(products::table)
                        .values(&db_new)
                        .get_result::<DbProduct>(conn)?
                }
            };

            Ok(row.into())
        })
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(products::table.find(product_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn delete_products(&self, filter: &ProductFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() {
                return Ok(0);
            }

            let mut deleted = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = products::table.filter(products::product_id.eq_any(chunk));
                deleted += diesel::delete(target).execute(conn)?;
            }
            Ok(deleted)
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn aggregate_of_no_rows_is_empty() {
        let result = aggregate(&[]);
        assert_eq!(result, ProductAggregate::default());
    }

    #[test]
    fn aggregate_sums_prices_exactly() {
        let result = aggregate(&[(2016, dec!(379.99)), (2018, dec!(749.99))]);
        assert_eq!(result.count, 2);
        assert_eq!(result.list_price.sum, Some(dec!(1129.98)));
        assert_eq!(result.list_price.avg, Some(dec!(564.99)));
        assert_eq!(result.model_year.min, Some(2016));
        assert_eq!(result.model_year.max, Some(2018));
    }
}
