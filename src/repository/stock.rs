use std::collections::BTreeMap;

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::stats::IntStats;
use crate::domain::stock::{
    NewStock as DomainNewStock, Stock as DomainStock, StockAggregate, StockFilter, StockGroup,
    StockGroupBy, StockListQuery, StockOrderBy, UpdateStock as DomainUpdateStock,
};
use crate::models::stock::{NewStock as DbNewStock, Stock as DbStock};
use crate::pagination::SortDirection;
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, StockReader, StockWriter,
};
use crate::schema::stocks;

fn filtered(filter: &StockFilter) -> stocks::BoxedQuery<'static, Sqlite> {
    let mut query = stocks::table.into_boxed();

    if let Some(store_id) = filter.store_id {
        query = query.filter(stocks::store_id.eq(store_id));
    }

    if let Some(product_id) = filter.product_id {
        query = query.filter(stocks::product_id.eq(product_id));
    }

    if let Some(min_quantity) = filter.min_quantity {
        query = query.filter(stocks::quantity.ge(min_quantity));
    }

    if filter.out_of_stock {
        query = query.filter(stocks::quantity.is_null().or(stocks::quantity.eq(0)));
    }

    query
}

fn listed(query: &StockListQuery) -> stocks::BoxedQuery<'static, Sqlite> {
    let mut items = filtered(&query.filter);

    items = match (query.order_by, query.direction) {
        (StockOrderBy::Key, SortDirection::Asc) => {
            items.order((stocks::store_id.asc(), stocks::product_id.asc()))
        }
        (StockOrderBy::Key, SortDirection::Desc) => {
            items.order((stocks::store_id.desc(), stocks::product_id.desc()))
        }
        (StockOrderBy::Quantity, SortDirection::Asc) => items
            .order(stocks::quantity.asc())
            .then_order_by((stocks::store_id.asc(), stocks::product_id.asc())),
        (StockOrderBy::Quantity, SortDirection::Desc) => items
            .order(stocks::quantity.desc())
            .then_order_by((stocks::store_id.asc(), stocks::product_id.asc())),
    };

    if let Some(pagination) = &query.pagination {
        items = items.offset(pagination.offset()).limit(pagination.limit());
    }

    items
}

fn matching_keys(
    conn: &mut SqliteConnection,
    filter: &StockFilter,
) -> RepositoryResult<Vec<(i32, i32)>> {
    Ok(filtered(filter)
        .select((stocks::store_id, stocks::product_id))
        .load::<(i32, i32)>(conn)?)
}

fn aggregate(quantities: &[Option<i32>]) -> StockAggregate {
    StockAggregate {
        count: quantities.len(),
        quantity: IntStats::from_values(quantities.iter().copied()),
    }
}

fn write_quantity(
    conn: &mut SqliteConnection,
    store_id: i32,
    product_id: i32,
    quantity: Option<i32>,
) -> RepositoryResult<DbStock> {
    let existing = stocks::table
        .find((store_id, product_id))
        .first::<DbStock>(conn)
        .optional()?;

    let row = match existing {
        Some(_) => diesel::update(stocks::table.find((store_id, product_id)))
            .set(stocks::quantity.eq(quantity))
            .get_result::<DbStock>(conn)?,
        None => diesel::insert_into(stocks::table)
            .values(&DbNewStock {
                store_id,
                product_id,
                quantity,
            })
            .get_result::<DbStock>(conn)?,
    };

    Ok(row)
}

impl StockReader for DieselRepository {
    fn get_stock(&self, store_id: i32, product_id: i32) -> RepositoryResult<Option<DomainStock>> {
        let mut conn = self.conn()?;
        let stock = stocks::table
            .find((store_id, product_id))
            .first::<DbStock>(&mut conn)
            .optional()?;

        Ok(stock.map(Into::into))
    }

    fn find_first_stock(&self, query: StockListQuery) -> RepositoryResult<Option<DomainStock>> {
        let mut conn = self.conn()?;
        let stock = listed(&query).first::<DbStock>(&mut conn).optional()?;

        Ok(stock.map(Into::into))
    }

    fn list_stocks(&self, query: StockListQuery) -> RepositoryResult<(usize, Vec<DomainStock>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query.filter)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let items = listed(&query).load::<DbStock>(&mut conn)?;

        Ok((total, items.into_iter().map(Into::into).collect()))
    }

    fn count_stocks(&self, filter: &StockFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }

    fn aggregate_stocks(&self, filter: &StockFilter) -> RepositoryResult<StockAggregate> {
        let mut conn = self.conn()?;

        let quantities = filtered(filter)
            .select(stocks::quantity)
            .load::<Option<i32>>(&mut conn)?;

        Ok(aggregate(&quantities))
    }

    fn group_stocks(
        &self,
        filter: &StockFilter,
        by: StockGroupBy,
    ) -> RepositoryResult<Vec<StockGroup>> {
        let mut conn = self.conn()?;

        let rows = filtered(filter)
            .select((stocks::store_id, stocks::product_id, stocks::quantity))
            .load::<(i32, i32, Option<i32>)>(&mut conn)?;

        let mut groups: BTreeMap<i32, Vec<Option<i32>>> = BTreeMap::new();
        for (store_id, product_id, quantity) in rows {
            let key = match by {
                StockGroupBy::Store => store_id,
                StockGroupBy::Product => product_id,
            };
            groups.entry(key).or_default().push(quantity);
        }

        Ok(groups
            .into_iter()
            .map(|(key, quantities)| StockGroup {
                key,
                aggregate: aggregate(&quantities),
            })
            .collect())
    }
}

impl StockWriter for DieselRepository {
    fn create_stock(&self, new_stock: &DomainNewStock) -> RepositoryResult<DomainStock> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(stocks::table)
            .values(&DbNewStock::from(new_stock))
            .get_result::<DbStock>(&mut conn)?;

        Ok(created.into())
    }

    fn create_stocks(&self, new_stocks: &[DomainNewStock]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut count_inserted: usize = 0;

            for new in new_stocks {
                diesel::insert_into(stocks::table)
                    .values(&DbNewStock::from(new))
                    .execute(conn)?;
                count_inserted += 1;
            }

            Ok(count_inserted)
        })
    }

    fn update_stock(
        &self,
        store_id: i32,
        product_id: i32,
        updates: &DomainUpdateStock,
    ) -> RepositoryResult<DomainStock> {
        let mut conn = self.conn()?;
        let target = stocks::table.find((store_id, product_id));

        let row = match updates.quantity {
            None => target.first::<DbStock>(&mut conn)?,
            Some(quantity) => diesel::update(target)
                .set(stocks::quantity.eq(quantity))
                .get_result::<DbStock>(&mut conn)?,
        };

        Ok(row.into())
    }

    fn update_stocks(
        &self,
        filter: &StockFilter,
        updates: &DomainUpdateStock,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let keys = matching_keys(conn, filter)?;
            let Some(quantity) = updates.quantity else {
                return Ok(keys.len());
            };

            let mut updated = 0;
            for key in &keys {
                updated += diesel::update(stocks::table.find(*key))
                    .set(stocks::quantity.eq(quantity))
                    .execute(conn)?;
            }

            Ok(updated)
        })
    }

    fn upsert_stock(&self, stock: &DomainNewStock) -> RepositoryResult<DomainStock> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainStock, RepositoryError, _>(|conn| {
            let row = write_quantity(conn, stock.store_id, stock.product_id, stock.quantity)?;
            Ok(row.into())
        })
    }

    fn adjust_stock(
        &self,
        store_id: i32,
        product_id: i32,
        delta: i32,
    ) -> RepositoryResult<DomainStock> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainStock, RepositoryError, _>(|conn| {
            let on_hand = stocks::table
                .find((store_id, product_id))
                .select(stocks::quantity)
                .first::<Option<i32>>(conn)
                .optional()?
                .flatten()
                .unwrap_or(0);

            let quantity = on_hand
                .checked_add(delta)
                .filter(|quantity| *quantity >= 0)
                .ok_or_else(|| {
                    RepositoryError::Validation(format!(
                        "store {store_id} holds {on_hand} of product {product_id}, \
                         cannot apply {delta}"
                    ))
                })?;

            let row = write_quantity(conn, store_id, product_id, Some(quantity))?;
            log::debug!("Stock of product {product_id} in store {store_id} is now {quantity}");
            Ok(row.into())
        })
    }

    fn delete_stock(&self, store_id: i32, product_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted =
            diesel::delete(stocks::table.find((store_id, product_id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn delete_stocks(&self, filter: &StockFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let keys = matching_keys(conn, filter)?;

            let mut deleted = 0;
            for key in &keys {
                deleted += diesel::delete(stocks::table.find(*key)).execute(conn)?;
            }

            Ok(deleted)
        })
    }
}
