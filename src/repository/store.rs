use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::store::{
    NewStore as DomainNewStore, Store as DomainStore, StoreFilter, StoreListQuery, StoreOrderBy,
    UpdateStore as DomainUpdateStore,
};
use crate::models::store::{NewStore as DbNewStore, Store as DbStore, UpdateStore as DbUpdateStore};
use crate::pagination::SortDirection;
use crate::repository::{
    DieselRepository, ID_CHUNK_SIZE, RepositoryError, RepositoryResult, StoreReader, StoreWriter,
    contains_pattern,
};
use crate::schema::stores;

fn filtered(filter: &StoreFilter) -> stores::BoxedQuery<'static, Sqlite> {
    let mut query = stores::table.into_boxed();

    if let Some(term) = filter.search.as_deref() {
        let pattern = contains_pattern(term);
        query = query.filter(
            stores::store_name
                .like(pattern.clone())
                .or(stores::city.like(pattern)),
        );
    }

    if let Some(state) = filter.state.clone() {
        query = query.filter(stores::state.eq(state));
    }

    query
}

fn listed(query: &StoreListQuery) -> stores::BoxedQuery<'static, Sqlite> {
    let mut items = filtered(&query.filter);

    items = match (query.order_by, query.direction) {
        (StoreOrderBy::Id, SortDirection::Asc) => items.order(stores::store_id.asc()),
        (StoreOrderBy::Id, SortDirection::Desc) => items.order(stores::store_id.desc()),
        (StoreOrderBy::Name, SortDirection::Asc) => items.order(stores::store_name.asc()),
        (StoreOrderBy::Name, SortDirection::Desc) => items.order(stores::store_name.desc()),
    };
    items = items.then_order_by(stores::store_id.asc());

    if let Some(pagination) = &query.pagination {
        items = items.offset(pagination.offset()).limit(pagination.limit());
    }

    items
}

fn matching_ids(conn: &mut SqliteConnection, filter: &StoreFilter) -> RepositoryResult<Vec<i32>> {
    Ok(filtered(filter).select(stores::store_id).load::<i32>(conn)?)
}

impl StoreReader for DieselRepository {
    fn get_store_by_id(&self, store_id: i32) -> RepositoryResult<Option<DomainStore>> {
        let mut conn = self.conn()?;
        let store = stores::table
            .find(store_id)
            .first::<DbStore>(&mut conn)
            .optional()?;

        Ok(store.map(Into::into))
    }

    fn find_first_store(&self, query: StoreListQuery) -> RepositoryResult<Option<DomainStore>> {
        let mut conn = self.conn()?;
        let store = listed(&query).first::<DbStore>(&mut conn).optional()?;

        Ok(store.map(Into::into))
    }

    fn list_stores(&self, query: StoreListQuery) -> RepositoryResult<(usize, Vec<DomainStore>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query.filter)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let items = listed(&query).load::<DbStore>(&mut conn)?;

        Ok((total, items.into_iter().map(Into::into).collect()))
    }

    fn count_stores(&self, filter: &StoreFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl StoreWriter for DieselRepository {
    fn create_store(&self, new_store: &DomainNewStore) -> RepositoryResult<DomainStore> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(stores::table)
            .values(&DbNewStore::from(new_store))
            .get_result::<DbStore>(&mut conn)?;

        Ok(created.into())
    }

    fn create_stores(&self, new_stores: &[DomainNewStore]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut count_inserted: usize = 0;

            for new in new_stores {
                diesel::insert_into(stores::table)
                    .values(&DbNewStore::from(new))
                    .execute(conn)?;
                count_inserted += 1;
            }

            Ok(count_inserted)
        })
    }

    fn update_store(
        &self,
        store_id: i32,
        updates: &DomainUpdateStore,
    ) -> RepositoryResult<DomainStore> {
        let mut conn = self.conn()?;

        if updates.is_empty() {
            return Ok(stores::table.find(store_id).first::<DbStore>(&mut conn)?.into());
        }

        let updated = diesel::update(stores::table.find(store_id))
            .set(&DbUpdateStore::from(updates))
            .get_result::<DbStore>(&mut conn)?;

        Ok(updated.into())
    }

    fn update_stores(
        &self,
        filter: &StoreFilter,
        updates: &DomainUpdateStore,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() || updates.is_empty() {
                return Ok(ids.len());
            }

            let changes = DbUpdateStore::from(updates);
            let mut updated = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = stores::table.filter(stores::store_id.eq_any(chunk));
                updated += diesel::update(target).set(&changes).execute(conn)?;
            }

            Ok(updated)
        })
    }

    fn upsert_store(
        &self,
        store_id: i32,
        create: &DomainNewStore,
        update: &DomainUpdateStore,
    ) -> RepositoryResult<DomainStore> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainStore, RepositoryError, _>(|conn| {
            let existing = stores::table
                .find(store_id)
                .first::<DbStore>(conn)
                .optional()?;

            let row = match existing {
                Some(row) if update.is_empty() => row,
                Some(_) => diesel::update(stores::table.find(store_id))
                    .set(&DbUpdateStore::from(update))
                    .get_result::<DbStore>(conn)?,
                None => {
                    let mut db_new = DbNewStore::from(create);
                    db_new.store_id = Some(store_id);
                    diesel::insert_into(stores::table)
                        .values(&db_new)
                        .get_result::<DbStore>(conn)?
                }
            };

            Ok(row.into())
        })
    }

    fn delete_store(&self, store_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(stores::table.find(store_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn delete_stores(&self, filter: &StoreFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() {
                return Ok(0);
            }

            let mut deleted = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = stores::table.filter(stores::store_id.eq_any(chunk));
                deleted += diesel::delete(target).execute(conn)?;
            }
            Ok(deleted)
        })
    }
}
