use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, NewCustomer as DomainNewCustomer,
    UpdateCustomer as DomainUpdateCustomer,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
pub struct Customer {
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
pub struct NewCustomer<'a> {
    pub customer_id: Option<i32>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: Option<&'a str>,
    pub email: &'a str,
    pub street: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip_code: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::customers)]
pub struct UpdateCustomer<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone: Option<Option<&'a str>>,
    pub email: Option<&'a str>,
    pub street: Option<Option<&'a str>>,
    pub city: Option<Option<&'a str>>,
    pub state: Option<Option<&'a str>>,
    pub zip_code: Option<Option<&'a str>>,
}

impl From<Customer> for DomainCustomer {
    fn from(value: Customer) -> Self {
        Self {
            customer_id: value.customer_id,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            email: value.email,
            street: value.street,
            city: value.city,
            state: value.state,
            zip_code: value.zip_code,
        }
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(value: &'a DomainNewCustomer) -> Self {
        Self {
            customer_id: value.customer_id,
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            phone: value.phone.as_deref(),
            email: value.email.as_str(),
            street: value.street.as_deref(),
            city: value.city.as_deref(),
            state: value.state.as_deref(),
            zip_code: value.zip_code.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateCustomer> for UpdateCustomer<'a> {
    fn from(value: &'a DomainUpdateCustomer) -> Self {
        Self {
            first_name: value.first_name.as_deref(),
            last_name: value.last_name.as_deref(),
            phone: nested_str(&value.phone),
            email: value.email.as_deref(),
            street: nested_str(&value.street),
            city: nested_str(&value.city),
            state: nested_str(&value.state),
            zip_code: nested_str(&value.zip_code),
        }
    }
}

/// Borrow a "set or clear" patch value.
pub(crate) fn nested_str(value: &Option<Option<String>>) -> Option<Option<&str>> {
    value.as_ref().map(|inner| inner.as_deref())
}
