use diesel::prelude::*;

use crate::domain::store::{
    NewStore as DomainNewStore, Store as DomainStore, UpdateStore as DomainUpdateStore,
};
use crate::models::customer::nested_str;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::stores)]
pub struct Store {
    pub store_id: i32,
    pub store_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::stores)]
pub struct NewStore<'a> {
    pub store_id: Option<i32>,
    pub store_name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub street: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip_code: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::stores)]
pub struct UpdateStore<'a> {
    pub store_name: Option<&'a str>,
    pub phone: Option<Option<&'a str>>,
    pub email: Option<Option<&'a str>>,
    pub street: Option<Option<&'a str>>,
    pub city: Option<Option<&'a str>>,
    pub state: Option<Option<&'a str>>,
    pub zip_code: Option<Option<&'a str>>,
}

impl From<Store> for DomainStore {
    fn from(value: Store) -> Self {
        Self {
            store_id: value.store_id,
            store_name: value.store_name,
            phone: value.phone,
            email: value.email,
            street: value.street,
            city: value.city,
            state: value.state,
            zip_code: value.zip_code,
        }
    }
}

impl<'a> From<&'a DomainNewStore> for NewStore<'a> {
    fn from(value: &'a DomainNewStore) -> Self {
        Self {
            store_id: value.store_id,
            store_name: value.store_name.as_str(),
            phone: value.phone.as_deref(),
            email: value.email.as_deref(),
            street: value.street.as_deref(),
            city: value.city.as_deref(),
            state: value.state.as_deref(),
            zip_code: value.zip_code.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateStore> for UpdateStore<'a> {
    fn from(value: &'a DomainUpdateStore) -> Self {
        Self {
            store_name: value.store_name.as_deref(),
            phone: nested_str(&value.phone),
            email: nested_str(&value.email),
            street: nested_str(&value.street),
            city: nested_str(&value.city),
            state: nested_str(&value.state),
            zip_code: nested_str(&value.zip_code),
        }
    }
}
