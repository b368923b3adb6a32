use std::collections::HashSet;

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::staff::{
    NewStaff as DomainNewStaff, Staff as DomainStaff, StaffFilter, StaffListQuery, StaffOrderBy,
    UpdateStaff as DomainUpdateStaff,
};
use crate::models::staff::{NewStaff as DbNewStaff, Staff as DbStaff, UpdateStaff as DbUpdateStaff};
use crate::pagination::SortDirection;
use crate::repository::{
    DieselRepository, ID_CHUNK_SIZE, RepositoryError, RepositoryResult, StaffReader, StaffWriter,
    contains_pattern,
};
use crate::schema::staffs;

fn filtered(filter: &StaffFilter) -> staffs::BoxedQuery<'static, Sqlite> {
    let mut query = staffs::table.into_boxed();

    if let Some(term) = filter.search.as_deref() {
        let pattern = contains_pattern(term);
        query = query.filter(
            staffs::first_name
                .like(pattern.clone())
                .or(staffs::last_name.like(pattern.clone()))
                .or(staffs::email.like(pattern)),
        );
    }

    if let Some(store_id) = filter.store_id {
        query = query.filter(staffs::store_id.eq(store_id));
    }

    if let Some(active) = filter.active {
        query = query.filter(staffs::active.eq(active));
    }

    if let Some(manager_id) = filter.manager_id {
        query = query.filter(staffs::manager_id.eq(manager_id));
    }

    if filter.top_level {
        query = query.filter(staffs::manager_id.is_null());
    }

    query
}

fn listed(query: &StaffListQuery) -> staffs::BoxedQuery<'static, Sqlite> {
    let mut items = filtered(&query.filter);

    items = match (query.order_by, query.direction) {
        (StaffOrderBy::Id, SortDirection::Asc) => items.order(staffs::staff_id.asc()),
        (StaffOrderBy::Id, SortDirection::Desc) => items.order(staffs::staff_id.desc()),
        (StaffOrderBy::LastName, SortDirection::Asc) => {
            items.order((staffs::last_name.asc(), staffs::first_name.asc()))
        }
        (StaffOrderBy::LastName, SortDirection::Desc) => {
            items.order((staffs::last_name.desc(), staffs::first_name.desc()))
        }
        (StaffOrderBy::Email, SortDirection::Asc) => items.order(staffs::email.asc()),
        (StaffOrderBy::Email, SortDirection::Desc) => items.order(staffs::email.desc()),
    };
    items = items.then_order_by(staffs::staff_id.asc());

    if let Some(pagination) = &query.pagination {
        items = items.offset(pagination.offset()).limit(pagination.limit());
    }

    items
}

fn matching_ids(conn: &mut SqliteConnection, filter: &StaffFilter) -> RepositoryResult<Vec<i32>> {
    Ok(filtered(filter).select(staffs::staff_id).load::<i32>(conn)?)
}

fn manager_of(conn: &mut SqliteConnection, staff_id: i32) -> RepositoryResult<Option<i32>> {
    Ok(staffs::table
        .find(staff_id)
        .select(staffs::manager_id)
        .first::<Option<i32>>(conn)
        .optional()?
        .flatten())
}

/// Reject making `manager_id` the manager of `staff_id` when `staff_id` already
/// sits above `manager_id` in the reporting line.
fn ensure_no_cycle(
    conn: &mut SqliteConnection,
    staff_id: i32,
    manager_id: i32,
) -> RepositoryResult<()> {
    let mut visited = HashSet::new();
    let mut current = Some(manager_id);

    while let Some(id) = current {
        if id == staff_id {
            return Err(RepositoryError::Validation(format!(
                "staff {manager_id} cannot manage staff {staff_id}: reporting line would loop"
            )));
        }
        if !visited.insert(id) {
            break;
        }
        current = manager_of(conn, id)?;
    }

    Ok(())
}

fn apply_update(
    conn: &mut SqliteConnection,
    staff_id: i32,
    updates: &DomainUpdateStaff,
) -> RepositoryResult<DbStaff> {
    if updates.is_empty() {
        return Ok(staffs::table.find(staff_id).first::<DbStaff>(conn)?);
    }

    if let Some(Some(manager_id)) = updates.manager_id {
        ensure_no_cycle(conn, staff_id, manager_id)?;
    }

    Ok(diesel::update(staffs::table.find(staff_id))
        .set(&DbUpdateStaff::from(updates))
        .get_result::<DbStaff>(conn)?)
}

fn insert(conn: &mut SqliteConnection, new_staff: &DomainNewStaff) -> RepositoryResult<DbStaff> {
    if new_staff.staff_id.is_some() && new_staff.staff_id == new_staff.manager_id {
        return Err(RepositoryError::Validation(
            "a staff member cannot be their own manager".to_string(),
        ));
    }

    Ok(diesel::insert_into(staffs::table)
        .values(&DbNewStaff::from(new_staff))
        .get_result::<DbStaff>(conn)?)
}

impl StaffReader for DieselRepository {
    fn get_staff_by_id(&self, staff_id: i32) -> RepositoryResult<Option<DomainStaff>> {
        let mut conn = self.conn()?;
        let staff = staffs::table
            .find(staff_id)
            .first::<DbStaff>(&mut conn)
            .optional()?;

        Ok(staff.map(Into::into))
    }

    fn get_staff_by_email(&self, email: &str) -> RepositoryResult<Option<DomainStaff>> {
        let mut conn = self.conn()?;
        let staff = staffs::table
            .filter(staffs::email.eq(email))
            .first::<DbStaff>(&mut conn)
            .optional()?;

        Ok(staff.map(Into::into))
    }

    fn find_first_staff(&self, query: StaffListQuery) -> RepositoryResult<Option<DomainStaff>> {
        let mut conn = self.conn()?;
        let staff = listed(&query).first::<DbStaff>(&mut conn).optional()?;

        Ok(staff.map(Into::into))
    }

    fn list_staffs(&self, query: StaffListQuery) -> RepositoryResult<(usize, Vec<DomainStaff>)> {
        let mut conn = self.conn()?;

        let total = filtered(&query.filter)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let items = listed(&query).load::<DbStaff>(&mut conn)?;

        Ok((total, items.into_iter().map(Into::into).collect()))
    }

    fn count_staffs(&self, filter: &StaffFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = filtered(filter).count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }

    fn list_reports(&self, manager_id: i32) -> RepositoryResult<Vec<DomainStaff>> {
        let mut conn = self.conn()?;

        let reports = staffs::table
            .filter(staffs::manager_id.eq(manager_id))
            .order(staffs::staff_id.asc())
            .load::<DbStaff>(&mut conn)?;

        Ok(reports.into_iter().map(Into::into).collect())
    }

    fn manager_chain(&self, staff_id: i32) -> RepositoryResult<Vec<DomainStaff>> {
        let mut conn = self.conn()?;

        let staff = staffs::table
            .find(staff_id)
            .first::<DbStaff>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        let mut visited = HashSet::from([staff.staff_id]);
        let mut chain = Vec::new();
        let mut next = staff.manager_id;

        while let Some(manager_id) = next {
            if !visited.insert(manager_id) {
                return Err(RepositoryError::Validation(format!(
                    "reporting line of staff {staff_id} loops back to staff {manager_id}"
                )));
            }

            let manager = staffs::table
                .find(manager_id)
                .first::<DbStaff>(&mut conn)?;
            next = manager.manager_id;
            chain.push(manager.into());
        }

        Ok(chain)
    }
}

impl StaffWriter for DieselRepository {
    fn create_staff(&self, new_staff: &DomainNewStaff) -> RepositoryResult<DomainStaff> {
        let mut conn = self.conn()?;
        Ok(insert(&mut conn, new_staff)?.into())
    }

    fn create_staffs(&self, new_staffs: &[DomainNewStaff]) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            for new in new_staffs {
                insert(conn, new)?;
            }

            Ok(new_staffs.len())
        })
    }

    fn update_staff(
        &self,
        staff_id: i32,
        updates: &DomainUpdateStaff,
    ) -> RepositoryResult<DomainStaff> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainStaff, RepositoryError, _>(|conn| {
            Ok(apply_update(conn, staff_id, updates)?.into())
        })
    }

    fn update_staffs(
        &self,
        filter: &StaffFilter,
        updates: &DomainUpdateStaff,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() || updates.is_empty() {
                return Ok(ids.len());
            }

            if let Some(Some(manager_id)) = updates.manager_id {
                for staff_id in &ids {
                    ensure_no_cycle(conn, *staff_id, manager_id)?;
                }
            }

            let changes = DbUpdateStaff::from(updates);
            let mut updated = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = staffs::table.filter(staffs::staff_id.eq_any(chunk));
                updated += diesel::update(target).set(&changes).execute(conn)?;
            }

            Ok(updated)
        })
    }

    fn upsert_staff(
        &self,
        create: &DomainNewStaff,
        update: &DomainUpdateStaff,
    ) -> RepositoryResult<DomainStaff> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainStaff, RepositoryError, _>(|conn| {
            let existing = staffs::table
                .filter(staffs::email.eq(&create.email))
                .select(staffs::staff_id)
                .first::<i32>(conn)
                .optional()?;

            let row = match existing {
                Some(staff_id) => apply_update(conn, staff_id, update)?,
                None => insert(conn, create)?,
            };

            Ok(row.into())
        })
    }

    fn delete_staff(&self, staff_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(staffs::table.find(staff_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn delete_staffs(&self, filter: &StaffFilter) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let ids = matching_ids(conn, filter)?;
            if ids.is_empty() {
                return Ok(0);
            }

            let mut deleted = 0;
            for chunk in ids.chunks(ID_CHUNK_SIZE) {
                let target = staffs::table.filter(staffs::staff_id.eq_any(chunk));
                deleted += diesel::delete(target).execute(conn)?;
            }
            Ok(deleted)
        })
    }
}
