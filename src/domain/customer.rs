use serde::{Deserialize, Serialize};

use crate::pagination::{Pagination, SortDirection};

/// Person placing orders.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
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

/// Payload required to insert a new customer.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    /// Explicit primary key, used when importing existing data.
    pub customer_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl NewCustomer {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Attach a postal address. Blank parts are stored as missing.
    pub fn with_address(
        mut self,
        street: Option<String>,
        city: Option<String>,
        state: Option<String>,
        zip_code: Option<String>,
    ) -> Self {
        self.street = street;
        self.city = city;
        self.state = state;
        self.zip_code = zip_code;
        self
    }
}

/// Patch data applied when updating customers. Nested options clear a column
/// when set to `Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<String>,
    pub street: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub zip_code: Option<Option<String>>,
}

impl UpdateCustomer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.street.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip_code.is_none()
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn phone(mut self, phone: Option<impl Into<String>>) -> Self {
        self.phone = Some(phone.map(Into::into));
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn city(mut self, city: Option<impl Into<String>>) -> Self {
        self.city = Some(city.map(Into::into));
        self
    }

    pub fn state(mut self, state: Option<impl Into<String>>) -> Self {
        self.state = Some(state.map(Into::into));
        self
    }

    pub fn zip_code(mut self, zip_code: Option<impl Into<String>>) -> Self {
        self.zip_code = Some(zip_code.map(Into::into));
        self
    }
}

/// Conditions selecting a set of customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Substring matched against first name, last name and email.
    pub search: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl CustomerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerOrderBy {
    #[default]
    Id,
    LastName,
    Email,
}

#[derive(Debug, Clone, Default)]
pub struct CustomerListQuery {
    pub filter: CustomerFilter,
    pub order_by: CustomerOrderBy,
    pub direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl CustomerListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: CustomerFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: CustomerOrderBy, direction: SortDirection) -> Self {
        self.order_by = order_by;
        self.direction = direction;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
