use std::collections::BTreeMap;

use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use rust_decimal::Decimal;

use crate::domain::order::{
    NewOrderItem as DomainNewOrderItem, OrderItem as DomainOrderItem, OrderItemAggregate,
    OrderItemFilter, OrderItemGroup, OrderItemGroupBy, OrderItemListQuery,
    UpdateOrderItem as DomainUpdateOrderItem, line_amount, sum_amounts,
};
use crate::domain::stats::{DecimalStats, IntStats};
use crate::models::decimal::{DISCOUNT, LIST_PRICE, SqlDecimal};
use crate::models::order::{
    NewOrderItem as DbNewOrderItem, OrderItem as DbOrderItem,
    UpdateOrderItem as DbUpdateOrderItem,
};
use crate::repository::{
    DieselRepository, OrderItemReader, OrderItemWriter, RepositoryError, RepositoryResult,
    check_decimal,
};
use crate::schema::order_items;

type LineValues = (i32, Decimal, Decimal);

fn filtered(filter: &OrderItemFilter) -> order_items::BoxedQuery<'static, Sqlite> {
    let mut query = order_items::table.into_boxed();

    if let Some(order_id) = filter.order_id {
        query = query.filter(order_items::order_id.eq(order_id));
    }

    if let Some(product_id) = filter.product_id {
        query = query.filter(order_items::product_id.eq(product_id));
    }

    query
}

fn listed(query: &OrderItemListQuery) -> order_items::BoxedQuery<'static, Sqlite> {
    let mut items = filtered(&query.filter)
        .order((order_items::order_id.asc(), order_items::item_id.asc()));

    if let Some(pagination) = &query.pagination {
        items = items.offset(pagination.offset()).limit(pagination.limit());
    }

    items
}

fn matching_keys(
    conn: &mut SqliteConnection,
    filter: &OrderItemFilter,
) -> RepositoryResult<Vec<(i32, i32)>> {
    Ok(filtered(filter)
        .select((order_items::order_id, order_items::item_id))
        .load::<(i32, i32)>(conn)?)
}

fn next_item_id(conn: &mut SqliteConnection, order_id: i32) -> RepositoryResult<i32> {
    let last = order_items::table
        .filter(order_items::order_id.eq(order_id))
        .select(max(order_items::item_id))
        .first::<Option<i32>>(conn)?;

    match last {
        Some(last) => last
            .checked_add(1)
            .ok_or_else(|| item_ids_exhausted(order_id)),
        None => Ok(1),
    }
}

pub(crate) fn item_ids_exhausted(order_id: i32) -> RepositoryError {
    RepositoryError::Validation(format!(
        "order {order_id} has no item_id left after {}",
        i32::MAX
    ))
}

pub(crate) fn check_new_item(item: &DomainNewOrderItem) -> RepositoryResult<()> {
    check_decimal(LIST_PRICE, item.list_price)?;
    check_decimal(DISCOUNT, item.discount)
}

fn check_item_update(updates: &DomainUpdateOrderItem) -> RepositoryResult<()> {
    if let Some(list_price) = updates.list_price {
        check_decimal(LIST_PRICE, list_price)?;
    }
    if let Some(discount) = updates.discount {
        check_decimal(DISCOUNT, discount)?;
    }
    Ok(())
}

fn insert_item(
    conn: &mut SqliteConnection,
    order_id: i32,
    item: &DomainNewOrderItem,
) -> RepositoryResult<DbOrderItem> {
    check_new_item(item)?;

    let item_id = match item.item_id {
        Some(item_id) => item_id,
        None => next_item_id(conn, order_id)?,
    };

    Ok(diesel::insert_into(order_items::table)
        .values(&DbNewOrderItem::from_domain(order_id, item_id, item))
        .get_result::<DbOrderItem>(conn)?)
}

fn aggregate(lines: &[LineValues]) -> OrderItemAggregate {
    OrderItemAggregate {
        count: lines.len(),
        quantity: IntStats::from_values(lines.iter().map(|(quantity, _, _)| Some(*quantity))),
        list_price: DecimalStats::from_values(lines.iter().map(|(_, price, _)| Some(*price))),
        discount: DecimalStats::from_values(lines.iter().map(|(_, _, discount)| Some(*discount))),
        net_revenue: sum_amounts(
            lines
                .iter()
                .map(|(quantity, price, discount)| line_amount(*quantity, *price, *discount)),
        ),
    }
}

impl OrderItemReader for DieselRepository {
    fn get_order_item(
        &self,
        order_id: i32,
        item_id: i32,
    ) -> RepositoryResult<Option<DomainOrderItem>> {
        let mut conn = self.conn()?;
        let item = order_items::table
            .find((order_id, item_id))
            .first::<DbOrderItem>(&mut conn)
            .optional()?;

        Ok(item.map(Into::into))
    }

    fn find_first_order_item(
        &self,
        query: OrderItemListQuery,
    ) -> RepositoryResult<Option<DomainOrderItem>> {
        let mut conn = self.conn()?;
        let item = listed(&query).first::<DbOrderItem>(&mut conn).optional()?;

        Ok(item.map(Into::into))
    }

    fn list_order_items(
        &self,
        query: OrderItemListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainOrderItem>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query.filter)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let items = listed(&query).load::<DbOrderItem>(&mut conn)?;

        Ok((total, items.into_iter().map(Into::into).collect()))
    }

    fn count_order_items(&self, filter: &OrderItemFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }

    fn aggregate_order_items(
        &self,
        filter: &OrderItemFilter,
    ) -> RepositoryResult<OrderItemAggregate> {
        let mut conn = self.conn()?;

        let lines: Vec<LineValues> = filtered(filter)
            .select((
                order_items::quantity,
                order_items::list_price,
                order_items::discount,
            ))
            .load::<(i32, SqlDecimal, SqlDecimal)>(&mut conn)?
            .into_iter()
            .map(|(quantity, price, discount)| (quantity, price.into(), discount.into()))
            .collect();

        Ok(aggregate(&lines))
    }

    fn group_order_items(
        &self,
        filter: &OrderItemFilter,
        by: OrderItemGroupBy,
    ) -> RepositoryResult<Vec<OrderItemGroup>> {
        let mut conn = self.conn()?;

        let rows = filtered(filter)
            .select((
                order_items::order_id,
                order_items::product_id,
                order_items::quantity,
                order_items::list_price,
                order_items::discount,
            ))
            .load::<(i32, i32, i32, SqlDecimal, SqlDecimal)>(&mut conn)?;

        let mut groups: BTreeMap<i32, Vec<LineValues>> = BTreeMap::new();
        for (order_id, product_id, quantity, price, discount) in rows {
            let key = match by {
                OrderItemGroupBy::Order => order_id,
                OrderItemGroupBy::Product => product_id,
            };
            groups
                .entry(key)
                .or_default()
                .push((quantity, price.into(), discount.into()));
        }

        Ok(groups
            .into_iter()
            .map(|(key, lines)| OrderItemGroup {
                key,
                aggregate: aggregate(&lines),
            })
            .collect())
    }
}

impl OrderItemWriter for DieselRepository {
    fn create_order_item(
        &self,
        order_id: i32,
        item: &DomainNewOrderItem,
    ) -> RepositoryResult<DomainOrderItem> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainOrderItem, RepositoryError, _>(|conn| {
            Ok(insert_item(conn, order_id, item)?.into())
        })
    }

    fn create_order_items(
        &self,
        order_id: i32,
        items: &[DomainNewOrderItem],
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            for item in items {
                insert_item(conn, order_id, item)?;
            }

            Ok(items.len())
        })
    }

    fn update_order_item(
        &self,
        order_id: i32,
        item_id: i32,
        updates: &DomainUpdateOrderItem,
    ) -> RepositoryResult<DomainOrderItem> {
        check_item_update(updates)?;
        let mut conn = self.conn()?;
        let target = order_items::table.find((order_id, item_id));

        let row = if updates.is_empty() {
            target.first::<DbOrderItem>(&mut conn)?
        } else {
            diesel::update(target)
                .set(&DbUpdateOrderItem::from(updates))
                .get_result::<DbOrderItem>(&mut conn)?
        };

        Ok(row.into())
    }

    fn update_order_items(
        &self,
        filter: &OrderItemFilter,
        updates: &DomainUpdateOrderItem,
    ) -> RepositoryResult<usize> {
        check_item_update(updates)?;
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let keys = matching_keys(conn, filter)?;
            if keys.is_empty() || updates.is_empty() {
                return Ok(keys.len());
            }

            let changes = DbUpdateOrderItem::from(updates);
            let mut updated = 0;
            for key in &keys {
                updated += diesel::update(order_items::table.find(*key))
                    .set(&changes)
                    .execute(conn)?;
            }

            Ok(updated)
        })
    }

    fn delete_order_item(&self, order_id: i32, item_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted =
            diesel::delete(order_items::table.find((order_id, item_id))).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn delete_order_items(&self, filter: &OrderItemFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let keys = matching_keys(conn, filter)?;

            let mut deleted = 0;
            for key in &keys {
                deleted += diesel::delete(order_items::table.find(*key)).execute(conn)?;
            }

            Ok(deleted)
        })
    }
}
