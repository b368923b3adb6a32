use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::category::{
    Category as DomainCategory, CategoryFilter, CategoryListQuery, CategoryOrderBy,
    NewCategory as DomainNewCategory, UpdateCategory as DomainUpdateCategory,
};
use crate::models::category::{
    Category as DbCategory, NewCategory as DbNewCategory, UpdateCategory as DbUpdateCategory,
};
use crate::pagination::SortDirection;
use crate::repository::{
    CategoryReader, CategoryWriter, DieselRepository, ID_CHUNK_SIZE, RepositoryError,
    RepositoryResult, contains_pattern,
};
use crate::schema::categories;

fn filtered(filter: &CategoryFilter) -> categories::BoxedQuery<'static, Sqlite> {
    let mut query = categories::table.into_boxed();

    if let Some(term) = filter.search.as_deref() {
        query = query.filter(categories::category_name.like(contains_pattern(term)));
    }

    query
}

fn listed(query: &CategoryListQuery) -> categories::BoxedQuery<'static, Sqlite> {
    let mut items = filtered(&query.filter);

    items = match (query.order_by, query.direction) {
        (CategoryOrderBy::Id, SortDirection::Asc) => items.order(categories::category_id.asc()),
        (CategoryOrderBy::Id, SortDirection::Desc) => items.order(categories::category_id.desc()),
        (CategoryOrderBy::Name, SortDirection::Asc) => items.order(categories::category_name.asc()),
        (CategoryOrderBy::Name, SortDirection::Desc) => {
            items.order(categories::category_name.desc())
        }
    };
    items = items.then_order_by(categories::category_id.asc());

    if let Some(pagination) = &query.pagination {
        items = items.offset(pagination.offset()).limit(pagination.limit());
    }

    items
}

fn matching_ids(
    conn: &mut SqliteConnection,
    filter: &CategoryFilter,
) -> RepositoryResult<Vec<i32>> {
    Ok(filtered(filter).select(categories::category_id).load::<i32>(conn)?)
}

impl CategoryReader for DieselRepository {
    fn get_category_by_id(
        &self,
        category_id: i32,
    ) -> RepositoryResult<Option<DomainCategory>> {
        let mut conn = self.conn()?;
        let category = categories::table
            .find(category_id)
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(Into::into))
    }

    fn find_first_category(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<Option<DomainCategory>> {
        let mut conn = self.conn()?;
        let category = listed(&query).first::<DbCategory>(&mut conn).optional()?;

        Ok(category.map(Into::into))
    }

    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCategory>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query.filter)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let items = listed(&query).load::<DbCategory>(&mut conn)?;

        Ok((total, items.into_iter().map(Into::into).collect()))
    }

    fn count_categories(&self, filter: &CategoryFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(
        &self,
        new_category: &DomainNewCategory,
    ) -> RepositoryResult<DomainCategory> {
        let mut conn = self.conn()?;
        let db_new = DbNewCategory::from(new_category);

        let created = diesel::insert_into(categories::table)
            .values(&db_new)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.into())
    }

    fn create_categories(
        &self,
        new_categories: &[DomainNewCategory],
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut count_inserted: usize = 0;

            for new in new_categories {
                let db_new = DbNewCategory::from(new);
                diesel::insert_into(categories::table)
                    .values(&db_new)
                    .execute(conn)?;
                count_inserted += 1;
            }

            Ok(count_inserted)
        })
    }

    fn update_category(
        &self,
        category_id: i32,
        updates: &DomainUpdateCategory,
    ) -> RepositoryResult<DomainCategory> {
        let mut conn = self.conn()?;

        if updates.is_empty() {
            return Ok(categories::table.find(category_id).first::<DbCategory>(&mut conn)?.into());
        }

        let updated = diesel::update(categories::table.find(category_id))
            .set(&DbUpdateCategory::from(updates))
            .get_result::<DbCategory>(&mut conn)?;

        Ok(updated.into())
    }

    fn update_categories(
        &self,
        filter: &CategoryFilter,
        updates: &DomainUpdateCategory,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() || updates.is_empty() {
                return Ok(ids.len());
            }

            let changes = DbUpdateCategory::from(updates);
            let mut updated = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = categories::table.filter(categories::category_id.eq_any(chunk));
                updated += diesel::update(target).set(&changes).execute(conn)?;
            }

            Ok(updated)
        })
    }

    fn upsert_category(
        &self,
        category_id: i32,
        create: &DomainNewCategory,
        update: &DomainUpdateCategory,
    ) -> RepositoryResult<DomainCategory> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainCategory, RepositoryError, _>(|conn| {
            let existing = categories::table
                .find(category_id)
                .first::<DbCategory>(conn)
                .optional()?;

            let row = match existing {
                Some(row) if update.is_empty() => row,
                Some(_) => diesel::update(categories::table.find(category_id))
                    .set(&DbUpdateCategory::from(update))
                    .get_result::<DbCategory>(conn)?,
                None => {
                    let mut db_new = DbNewCategory::from(create);
                    db_new.category_id = Some(category_id);
                    diesel::insert_into(categories::table)
                        .values(&db_new)
                        .get_result::<DbCategory>(conn)?
                }
            };

            Ok(row.into())
        })
    }

    fn delete_category(&self, category_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(categories::table.find(category_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn delete_categories(&self, filter: &CategoryFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() {
                return Ok(0);
            }

            let mut deleted = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = categories::table.filter(categories::category_id.eq_any(chunk));
                deleted += diesel::delete(target).execute(conn)?;
            }
            Ok(deleted)
        })
    }
}
