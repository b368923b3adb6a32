use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::customer::{
    Customer as DomainCustomer, CustomerFilter, CustomerListQuery, CustomerOrderBy,
    NewCustomer as DomainNewCustomer, UpdateCustomer as DomainUpdateCustomer,
};
use crate::models::customer::{
    Customer as DbCustomer, NewCustomer as DbNewCustomer, UpdateCustomer as DbUpdateCustomer,
};
use crate::pagination::SortDirection;
use crate::repository::{
    CustomerReader, CustomerWriter, DieselRepository, ID_CHUNK_SIZE, RepositoryError,
    RepositoryResult, contains_pattern,
};
use crate::schema::customers;

fn filtered(filter: &CustomerFilter) -> customers::BoxedQuery<'static, Sqlite> {
    let mut query = customers::table.into_boxed();

    if let Some(term) = filter.search.as_deref() {
        let pattern = contains_pattern(term);
        query = query.filter(
            customers::first_name
                .like(pattern.clone())
                .or(customers::last_name.like(pattern.clone()))
                .or(customers::email.like(pattern)),
        );
    }

    if let Some(city) = filter.city.clone() {
        query = query.filter(customers::city.eq(city));
    }

    if let Some(state) = filter.state.clone() {
        query = query.filter(customers::state.eq(state));
    }

    query
}

fn listed(query: &CustomerListQuery) -> customers::BoxedQuery<'static, Sqlite> {
    let mut items = filtered(&query.filter);

    items = match (query.order_by, query.direction) {
        (CustomerOrderBy::Id, SortDirection::Asc) => items.order(customers::customer_id.asc()),
        (CustomerOrderBy::Id, SortDirection::Desc) => items.order(customers::customer_id.desc()),
        (CustomerOrderBy::LastName, SortDirection::Asc) => {
            items.order((customers::last_name.asc(), customers::first_name.asc()))
        }
        (CustomerOrderBy::LastName, SortDirection::Desc) => {
            items.order((customers::last_name.desc(), customers::first_name.desc()))
        }
        (CustomerOrderBy::Email, SortDirection::Asc) => items.order(customers::email.asc()),
        (CustomerOrderBy::Email, SortDirection::Desc) => items.order(customers::email.desc()),
    };
    items = items.then_order_by(customers::customer_id.asc());

    if let Some(pagination) = &query.pagination {
        items = items.offset(pagination.offset()).limit(pagination.limit());
    }

    items
}

fn matching_ids(
    conn: &mut SqliteConnection,
    filter: &CustomerFilter,
) -> RepositoryResult<Vec<i32>> {
    Ok(filtered(filter)
        .select(customers::customer_id)
        .load::<i32>(conn)?)
}

impl CustomerReader for DieselRepository {
    fn get_customer_by_id(&self, customer_id: i32) -> RepositoryResult<Option<DomainCustomer>> {
        let mut conn = self.conn()?;
        let customer = customers::table
            .find(customer_id)
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn find_first_customer(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<Option<DomainCustomer>> {
        let mut conn = self.conn()?;
        let customer = listed(&query).first::<DbCustomer>(&mut conn).optional()?;

        Ok(customer.map(Into::into))
    }

    fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCustomer>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query.filter)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let items = listed(&query).load::<DbCustomer>(&mut conn)?;

        Ok((total, items.into_iter().map(Into::into).collect()))
    }

    fn count_customers(&self, filter: &CustomerFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(
        &self,
        new_customer: &DomainNewCustomer,
    ) -> RepositoryResult<DomainCustomer> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(customers::table)
            .values(&DbNewCustomer::from(new_customer))
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(created.into())
    }

    fn create_customers(&self, new_customers: &[DomainNewCustomer]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut count_inserted: usize = 0;

            for new in new_customers {
                diesel::insert_into(customers::table)
                    .values(&DbNewCustomer::from(new))
                    .execute(conn)?;
                count_inserted += 1;
            }

            Ok(count_inserted)
        })
    }

    fn update_customer(
        &self,
        customer_id: i32,
        updates: &DomainUpdateCustomer,
    ) -> RepositoryResult<DomainCustomer> {
        let mut conn = self.conn()?;

        if updates.is_empty() {
            let current = customers::table
                .find(customer_id)
                .first::<DbCustomer>(&mut conn)?;
            return Ok(current.into());
        }

        let updated = diesel::update(customers::table.find(customer_id))
            .set(&DbUpdateCustomer::from(updates))
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(updated.into())
    }

    fn update_customers(
        &self,
        filter: &CustomerFilter,
        updates: &DomainUpdateCustomer,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() || updates.is_empty() {
                return Ok(ids.len());
            }

            let changes = DbUpdateCustomer::from(updates);
            let mut updated = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = customers::table.filter(customers::customer_id.eq_any(chunk));
                updated += diesel::update(target).set(&changes).execute(conn)?;
            }

            Ok(updated)
        })
    }

    fn upsert_customer(
        &self,
        customer_id: i32,
        create: &DomainNewCustomer,
        update: &DomainUpdateCustomer,
    ) -> RepositoryResult<DomainCustomer> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainCustomer, RepositoryError, _>(|conn| {
            let existing = customers::table
                .find(customer_id)
                .first::<DbCustomer>(conn)
                .optional()?;

            let row = match existing {
                Some(row) if update.is_empty() => row,
                Some(_) => diesel::update(customers::table.find(customer_id))
                    .set(&DbUpdateCustomer::from(update))
                    .get_result::<DbCustomer>(conn)?,
                None => {
                    let mut db_new = DbNewCustomer::from(create);
                    db_new.customer_id = Some(customer_id);
                    diesel::insert_into(customers::table)
                        .values(&db_new)
                        .get_result::<DbCustomer>(conn)?
                }
            };

            Ok(row.into())
        })
    }

    fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(customers::table.find(customer_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn delete_customers(&self, filter: &CustomerFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() {
                return Ok(0);
            }

            let mut deleted = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = customers::table.filter(customers::customer_id.eq_any(chunk));
                deleted += diesel::delete(target).execute(conn)?;
            }
            Ok(deleted)
        })
    }
}
