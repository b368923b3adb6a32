use serde::Deserialize;

use crate::domain::stock::{
    Stock, StockFilter, StockGroup, StockGroupBy, StockListQuery, StockOrderBy,
};
use crate::forms::stocks::AdjustStockForm;
use crate::pagination::{Paginated, SortDirection};
use crate::repository::{StockReader, StockWriter};
use crate::services::{PageQuery, ServiceError, ServiceResult};

/// Query parameters accepted by the stock listing.
#[derive(Debug, Default, Deserialize)]
pub struct StocksQuery {
    pub store_id: Option<i32>,
    pub product_id: Option<i32>,
    pub min_quantity: Option<i32>,
    /// Only rows with no units left.
    #[serde(default)]
    pub out_of_stock: bool,
    pub sort: Option<StockOrderBy>,
    pub direction: Option<SortDirection>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

fn stock_filter(store_id: Option<i32>, product_id: Option<i32>) -> StockFilter {
    let mut filter = StockFilter::new();
    if let Some(store_id) = store_id {
        filter = filter.store_id(store_id);
    }
    if let Some(product_id) = product_id {
        filter = filter.product_id(product_id);
    }
    filter
}

pub fn list_stocks<R>(repo: &R, query: StocksQuery) -> ServiceResult<Paginated<Stock>>
where
    R: StockReader + ?Sized,
{
    let pagination = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .pagination();

    let mut filter = stock_filter(query.store_id, query.product_id);
    if let Some(min_quantity) = query.min_quantity {
        filter = filter.min_quantity(min_quantity);
    }
    if query.out_of_stock {
        filter = filter.out_of_stock();
    }

    let list_query = StockListQuery::new()
        .filter(filter)
        .order_by(
            query.sort.unwrap_or_default(),
            query.direction.unwrap_or_default(),
        )
        .paginate(pagination.page, pagination.per_page);

    let (total, items) = repo.list_stocks(list_query)?;
    Ok(Paginated::new(items, pagination.page, total, pagination.per_page))
}

/// Applies a validated quantity change to one stock row.
pub fn adjust_stock<R>(repo: &R, form: AdjustStockForm) -> ServiceResult<Stock>
where
    R: StockWriter + ?Sized,
{
    let adjustment = form
        .into_adjustment()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let stock = repo.adjust_stock(adjustment.store_id, adjustment.product_id, adjustment.delta)?;
    log::info!(
        "Adjusted stock of product {} in store {} by {}",
        stock.product_id,
        stock.store_id,
        adjustment.delta
    );
    Ok(stock)
}

/// Query parameters accepted by the stock totals endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StockTotalsQuery {
    /// Defaults to grouping by store.
    pub group_by: Option<StockGroupBy>,
    pub store_id: Option<i32>,
    pub product_id: Option<i32>,
}

/// Units on hand summed per store or per product.
pub fn stock_totals<R>(repo: &R, query: StockTotalsQuery) -> ServiceResult<Vec<StockGroup>>
where
    R: StockReader + ?Sized,
{
    let filter = stock_filter(query.store_id, query.product_id);
    let by = query.group_by.unwrap_or(StockGroupBy::Store);

    Ok(repo.group_stocks(&filter, by)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stock::StockAggregate;
    use crate::repository::RepositoryError;
    use crate::repository::mock::{MockStockReader, MockStockWriter};

    #[test]
    fn adjust_stock_forwards_delta() {
        let mut repo = MockStockWriter::new();
        repo.expect_adjust_stock()
            .times(1)
            .withf(|store_id, product_id, delta| {
                *store_id == 1 && *product_id == 7 && *delta == -2
            })
            .returning(|store_id, product_id, _| {
                Ok(Stock {
                    store_id,
                    product_id,
                    quantity: Some(3),
                })
            });

        let form = AdjustStockForm {
            store_id: 1,
            product_id: 7,
            delta: -2,
        };

        let stock = adjust_stock(&repo, form).unwrap();
        assert_eq!(stock.quantity, Some(3));
    }

    #[test]
    fn adjust_stock_rejects_zero_delta() {
        let repo = MockStockWriter::new();
        let form = AdjustStockForm {
            store_id: 1,
            product_id: 7,
            delta: 0,
        };

        assert!(matches!(adjust_stock(&repo, form), Err(ServiceError::Form(_))));
    }

    #[test]
    fn negative_result_is_a_conflict() {
        let mut repo = MockStockWriter::new();
        repo.expect_adjust_stock()
            .returning(|_, _, _| Err(RepositoryError::Validation("below zero".into())));

        let form = AdjustStockForm {
            store_id: 1,
            product_id: 7,
            delta: -50,
        };

        assert!(matches!(
            adjust_stock(&repo, form),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn stock_totals_group_by_store_by_default() {
        let mut repo = MockStockReader::new();
        repo.expect_group_stocks()
            .times(1)
            .withf(|filter, by| filter.store_id.is_none() && *by == StockGroupBy::Store)
            .returning(|_, _| {
                Ok(vec![StockGroup {
                    key: 1,
                    aggregate: StockAggregate::default(),
                }])
            });

        let groups = stock_totals(&repo, StockTotalsQuery::default()).unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn list_stocks_applies_out_of_stock_filter() {
        let mut repo = MockStockReader::new();
        repo.expect_list_stocks()
            .times(1)
            .withf(|query| query.filter.out_of_stock && query.filter.store_id == Some(2))
            .returning(|_| Ok((0, Vec::new())));

        let query = StocksQuery {
            store_id: Some(2),
            out_of_stock: true,
            ..StocksQuery::default()
        };

        let page = list_stocks(&repo, query).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
