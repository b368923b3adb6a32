use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::brand::{
    Brand as DomainBrand, BrandFilter, BrandListQuery, BrandOrderBy, NewBrand as DomainNewBrand,
    UpdateBrand as DomainUpdateBrand,
};
use crate::models::brand::{Brand as DbBrand, NewBrand as DbNewBrand, UpdateBrand as DbUpdateBrand};
use crate::pagination::SortDirection;
use crate::repository::{
    BrandReader, BrandWriter, DieselRepository, ID_CHUNK_SIZE, RepositoryError, RepositoryResult,
    contains_pattern,
};
use crate::schema::brands;

fn filtered(filter: &BrandFilter) -> brands::BoxedQuery<'static, Sqlite> {
    let mut query = brands::table.into_boxed();

    if let Some(term) = filter.search.as_deref() {
        query = query.filter(brands::brand_name.like(contains_pattern(term)));
    }

    query
}

fn listed(query: &BrandListQuery) -> brands::BoxedQuery<'static, Sqlite> {
    let mut items = filtered(&query.filter);

    items = match (query.order_by, query.direction) {
        (BrandOrderBy::Id, SortDirection::Asc) => items.order(brands::brand_id.asc()),
        (BrandOrderBy::Id, SortDirection::Desc) => items.order(brands::brand_id.desc()),
        (BrandOrderBy::Name, SortDirection::Asc) => items.order(brands::brand_name.asc()),
        (BrandOrderBy::Name, SortDirection::Desc) => items.order(brands::brand_name.desc()),
    };
    items = items.then_order_by(brands::brand_id.asc());

    if let Some(pagination) = &query.pagination {
        items = items.offset(pagination.offset()).limit(pagination.limit());
    }

    items
}

fn matching_ids(conn: &mut SqliteConnection, filter: &BrandFilter) -> RepositoryResult<Vec<i32>> {
    Ok(filtered(filter).select(brands::brand_id).load::<i32>(conn)?)
}

impl BrandReader for DieselRepository {
    fn get_brand_by_id(&self, brand_id: i32) -> RepositoryResult<Option<DomainBrand>> {
        let mut conn = self.conn()?;
        let brand = brands::table
            .find(brand_id)
            .first::<DbBrand>(&mut conn)
            .optional()?;

        Ok(brand.map(Into::into))
    }

    fn find_first_brand(&self, query: BrandListQuery) -> RepositoryResult<Option<DomainBrand>> {
        let mut conn = self.conn()?;
        let brand = listed(&query).first::<DbBrand>(&mut conn).optional()?;

        Ok(brand.map(Into::into))
    }

    fn list_brands(&self, query: BrandListQuery) -> RepositoryResult<(usize, Vec<DomainBrand>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query.filter)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let items = listed(&query).load::<DbBrand>(&mut conn)?;

        Ok((total, items.into_iter().map(Into::into).collect()))
    }

    fn count_brands(&self, filter: &BrandFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }
}

impl BrandWriter for DieselRepository {
    fn create_brand(&self, new_brand: &DomainNewBrand) -> RepositoryResult<DomainBrand> {
        let mut conn = self.conn()?;
        let db_new = DbNewBrand::from(new_brand);

        let created = diesel::insert_into(brands::table)
            .values(&db_new)
            .get_result::<DbBrand>(&mut conn)?;

        Ok(created.into())
    }

    fn create_brands(&self, new_brands: &[DomainNewBrand]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let mut count_inserted: usize = 0;

            for new in new_brands {
                let db_new = DbNewBrand::from(new);
                diesel::insert_into(brands::table)
                    .values(&db_new)
                    .execute(conn)?;
                count_inserted += 1;
            }

            Ok(count_inserted)
        })
    }

    fn update_brand(
        &self,
        brand_id: i32,
        updates: &DomainUpdateBrand,
    ) -> RepositoryResult<DomainBrand> {
        let mut conn = self.conn()?;

        if updates.is_empty() {
            return Ok(brands::table.find(brand_id).first::<DbBrand>(&mut conn)?.into());
        }

        let updated = diesel::update(brands::table.find(brand_id))
            .set(&DbUpdateBrand::from(updates))
            .get_result::<DbBrand>(&mut conn)?;

        Ok(updated.into())
    }

    fn update_brands(
        &self,
        filter: &BrandFilter,
        updates: &DomainUpdateBrand,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() || updates.is_empty() {
                return Ok(ids.len());
            }

            let changes = DbUpdateBrand::from(updates);
            let mut updated = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = brands::table.filter(brands::brand_id.eq_any(chunk));
                updated += diesel::update(target).set(&changes).execute(conn)?;
            }

            Ok(updated)
        })
    }

    fn upsert_brand(
        &self,
        brand_id: i32,
        create: &DomainNewBrand,
        update: &DomainUpdateBrand,
    ) -> RepositoryResult<DomainBrand> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainBrand, RepositoryError, _>(|conn| {
            let existing = brands::table
                .find(brand_id)
                .first::<DbBrand>(conn)
                .optional()?;

            let row = match existing {
                Some(row) if update.is_empty() => row,
                Some(_) => diesel::update(brands::table.find(brand_id))
                    .set(&DbUpdateBrand::from(update))
                    .get_result::<DbBrand>(conn)?,
                None => {
                    let mut db_new = DbNewBrand::from(create);
                    db_new.brand_id = Some(brand_id);
                    diesel::insert_into(brands::table)
                        .values(&db_new)
                        .get_result::<DbBrand>(conn)?
                }
            };

            Ok(row.into())
        })
    }

    fn delete_brand(&self, brand_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(brands::table.find(brand_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn delete_brands(&self, filter: &BrandFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() {
                return Ok(0);
            }

            let mut deleted = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = brands::table.filter(brands::brand_id.eq_any(chunk));
                deleted += diesel::delete(target).execute(conn)?;
            }
            Ok(deleted)
        })
    }
}
