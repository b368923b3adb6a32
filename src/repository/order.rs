use std::collections::{BTreeMap, HashMap};

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::order::{
    NewOrder as DomainNewOrder, Order as DomainOrder, OrderFilter, OrderGroup, OrderGroupBy,
    OrderListQuery, OrderOrderBy, UpdateOrder as DomainUpdateOrder,
};
use crate::models::order::{
    NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
    OrderItem as DbOrderItem, UpdateOrder as DbUpdateOrder,
};
use crate::pagination::SortDirection;
use crate::repository::order_item::{check_new_item, item_ids_exhausted};
use crate::repository::{
    DieselRepository, ID_CHUNK_SIZE, OrderReader, OrderWriter, RepositoryError, RepositoryResult,
};
use crate::schema::{order_items, orders};

fn filtered(filter: &OrderFilter) -> orders::BoxedQuery<'static, Sqlite> {
    let mut query = orders::table.into_boxed();

    if let Some(customer_id) = filter.customer_id {
        query = query.filter(orders::customer_id.eq(customer_id));
    }

    if let Some(store_id) = filter.store_id {
        query = query.filter(orders::store_id.eq(store_id));
    }

    if let Some(staff_id) = filter.staff_id {
        query = query.filter(orders::staff_id.eq(staff_id));
    }

    if let Some(status) = filter.status {
        query = query.filter(orders::order_status.eq(status.code()));
    }

    if let Some(from) = filter.placed_from {
        query = query.filter(orders::order_date.ge(from));
    }

    if let Some(to) = filter.placed_to {
        query = query.filter(orders::order_date.le(to));
    }

    match filter.shipped {
        Some(true) => query = query.filter(orders::shipped_date.is_not_null()),
        Some(false) => query = query.filter(orders::shipped_date.is_null()),
        None => {}
    }

    query
}

fn listed(query: &OrderListQuery) -> orders::BoxedQuery<'static, Sqlite> {
    let mut items = filtered(&query.filter);

    items = match (query.order_by, query.direction) {
        (OrderOrderBy::Id, SortDirection::Asc) => items.order(orders::order_id.asc()),
        (OrderOrderBy::Id, SortDirection::Desc) => items.order(orders::order_id.desc()),
        (OrderOrderBy::OrderDate, SortDirection::Asc) => items.order(orders::order_date.asc()),
        (OrderOrderBy::OrderDate, SortDirection::Desc) => items.order(orders::order_date.desc()),
        (OrderOrderBy::RequiredDate, SortDirection::Asc) => {
            items.order(orders::required_date.asc())
        }
        (OrderOrderBy::RequiredDate, SortDirection::Desc) => {
            items.order(orders::required_date.desc())
        }
    };
    items = items.then_order_by(orders::order_id.asc());

    if let Some(pagination) = &query.pagination {
        items = items.offset(pagination.offset()).limit(pagination.limit());
    }

    items
}

fn matching_ids(conn: &mut SqliteConnection, filter: &OrderFilter) -> RepositoryResult<Vec<i32>> {
    Ok(filtered(filter).select(orders::order_id).load::<i32>(conn)?)
}

fn items_of(conn: &mut SqliteConnection, order_id: i32) -> RepositoryResult<Vec<DbOrderItem>> {
    Ok(order_items::table
        .filter(order_items::order_id.eq(order_id))
        .order(order_items::item_id.asc())
        .load::<DbOrderItem>(conn)?)
}

/// Attach the lines of every order in `db_orders`, keeping the order of `db_orders`.
fn with_items(
    conn: &mut SqliteConnection,
    db_orders: Vec<DbOrder>,
) -> RepositoryResult<Vec<DomainOrder>> {
    if db_orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i32> = db_orders.iter().map(|order| order.order_id).collect();

    let mut items_by_order: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();
    for chunk in order_ids.chunks(ID_CHUNK_SIZE) {
        let rows = order_items::table
            .filter(order_items::order_id.eq_any(chunk))
            .order((order_items::order_id.asc(), order_items::item_id.asc()))
            .load::<DbOrderItem>(conn)?;

        for item in rows {
            items_by_order.entry(item.order_id).or_default().push(item);
        }
    }

    Ok(db_orders
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.order_id).unwrap_or_default();
            DomainOrder::from((order, items))
        })
        .collect())
}

/// Insert the order row and its lines. Lines without an explicit `item_id`
/// are numbered after the highest id used so far, starting at 1.
fn insert_order(
    conn: &mut SqliteConnection,
    new_order: &DomainNewOrder,
) -> RepositoryResult<DbOrder> {
    let created = diesel::insert_into(orders::table)
        .values(&DbNewOrder::from(new_order))
        .get_result::<DbOrder>(conn)?;

    let order_id = created.order_id;
    let mut next_item_id = Some(1);
    let mut payload = Vec::with_capacity(new_order.items.len());

    for item in &new_order.items {
        check_new_item(item)?;
        let item_id = match item.item_id {
            Some(item_id) => item_id,
            None => next_item_id.ok_or_else(|| item_ids_exhausted(order_id))?,
        };
        // `None` once i32::MAX is taken.
        next_item_id = match (item_id.checked_add(1), next_item_id) {
            (Some(after), Some(next)) => Some(after.max(next)),
            _ => None,
        };
        payload.push(DbNewOrderItem::from_domain(order_id, item_id, item));
    }

    if !payload.is_empty() {
        diesel::insert_into(order_items::table)
            .values(&payload)
            .execute(conn)?;
    }

    Ok(created)
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, order_id: i32) -> RepositoryResult<Option<DomainOrder>> {
        let mut conn = self.conn()?;

        let Some(order) = orders::table
            .find(order_id)
            .first::<DbOrder>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let items = items_of(&mut conn, order_id)?;
        Ok(Some(DomainOrder::from((order, items))))
    }

    fn find_first_order(&self, query: OrderListQuery) -> RepositoryResult<Option<DomainOrder>> {
        let mut conn = self.conn()?;

        let Some(order) = listed(&query).first::<DbOrder>(&mut conn).optional()? else {
            return Ok(None);
        };

        let items = items_of(&mut conn, order.order_id)?;
        Ok(Some(DomainOrder::from((order, items))))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query.filter)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let db_orders = listed(&query).load::<DbOrder>(&mut conn)?;
        let orders = with_items(&mut conn, db_orders)?;

        Ok((total, orders))
    }

    fn count_orders(&self, filter: &OrderFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }

    fn group_orders(
        &self,
        filter: &OrderFilter,
        by: OrderGroupBy,
    ) -> RepositoryResult<Vec<OrderGroup>> {
        let mut conn = self.conn()?;

        let rows = filtered(filter)
            .select((
                orders::order_status,
                orders::store_id,
                orders::staff_id,
                orders::customer_id,
            ))
            .load::<(i32, i32, i32, Option<i32>)>(&mut conn)?;

        let mut groups: BTreeMap<Option<i32>, usize> = BTreeMap::new();
        for (status, store_id, staff_id, customer_id) in rows {
            let key = match by {
                OrderGroupBy::Status => Some(status),
                OrderGroupBy::Store => Some(store_id),
                OrderGroupBy::Staff => Some(staff_id),
                OrderGroupBy::Customer => customer_id,
            };
            *groups.entry(key).or_default() += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(key, count)| OrderGroup { key, count })
            .collect())
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let created = insert_order(conn, new_order)?;
            let items = items_of(conn, created.order_id)?;

            log::info!(
                "Created order {} with {} items",
                created.order_id,
                items.len()
            );

            Ok(DomainOrder::from((created, items)))
        })
    }

    fn create_orders(&self, new_orders: &[DomainNewOrder]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            for new_order in new_orders {
                insert_order(conn, new_order)?;
            }

            Ok(new_orders.len())
        })
    }

    fn update_order(
        &self,
        order_id: i32,
        updates: &DomainUpdateOrder,
    ) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainOrder, RepositoryError, _>(|conn| {
            let order = if updates.is_empty() {
                orders::table.find(order_id).first::<DbOrder>(conn)?
            } else {
                diesel::update(orders::table.find(order_id))
                    .set(&DbUpdateOrder::from(updates))
                    .get_result::<DbOrder>(conn)?
            };

            let items = items_of(conn, order_id)?;
            Ok(DomainOrder::from((order, items)))
        })
    }

    fn update_orders(
        &self,
        filter: &OrderFilter,
        updates: &DomainUpdateOrder,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() || updates.is_empty() {
                return Ok(ids.len());
            }

            let changes = DbUpdateOrder::from(updates);
            let mut updated = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = orders::table.filter(orders::order_id.eq_any(chunk));
                updated += diesel::update(target).set(&changes).execute(conn)?;
            }

            Ok(updated)
        })
    }

    fn delete_order(&self, order_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(orders::table.find(order_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn delete_orders(&self, filter: &OrderFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() {
                return Ok(0);
            }

            let mut deleted = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = orders::table.filter(orders::order_id.eq_any(chunk));
                deleted += diesel::delete(target).execute(conn)?;
            }
            Ok(deleted)
        })
    }
}
