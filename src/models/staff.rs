use diesel::prelude::*;

use crate::domain::staff::{
    NewStaff as DomainNewStaff, Staff as DomainStaff, UpdateStaff as DomainUpdateStaff,
};
use crate::models::customer::nested_str;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::staffs)]
pub struct Staff {
    pub staff_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub active: bool,
    pub store_id: i32,
    pub manager_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::staffs)]
pub struct NewStaff<'a> {
    pub staff_id: Option<i32>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub active: bool,
    pub store_id: i32,
    pub manager_id: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::staffs)]
pub struct UpdateStaff<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<Option<&'a str>>,
    pub active: Option<bool>,
    pub store_id: Option<i32>,
    pub manager_id: Option<Option<i32>>,
}

impl From<Staff> for DomainStaff {
    fn from(value: Staff) -> Self {
        Self {
            staff_id: value.staff_id,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            active: value.active,
            store_id: value.store_id,
            manager_id: value.manager_id,
        }
    }
}

impl<'a> From<&'a DomainNewStaff> for NewStaff<'a> {
    fn from(value: &'a DomainNewStaff) -> Self {
        Self {
            staff_id: value.staff_id,
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            email: value.email.as_str(),
            phone: value.phone.as_deref(),
            active: value.active,
            store_id: value.store_id,
            manager_id: value.manager_id,
        }
    }
}

impl<'a> From<&'a DomainUpdateStaff> for UpdateStaff<'a> {
    fn from(value: &'a DomainUpdateStaff) -> Self {
        Self {
            first_name: value.first_name.as_deref(),
            last_name: value.last_name.as_deref(),
            email: value.email.as_deref(),
            phone: nested_str(&value.phone),
            active: value.active,
            store_id: value.store_id,
            manager_id: value.manager_id,
        }
    }
}
