use serde::{Deserialize, Serialize};

use crate::pagination::{Pagination, SortDirection};

/// Physical shop holding stock and taking orders.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
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

#[derive(Debug, Clone, Default)]
pub struct NewStore {
    pub store_id: Option<i32>,
    pub store_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl NewStore {
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, store_id: i32) -> Self {
        self.store_id = Some(store_id);
        self
    }

    pub fn with_contact(mut self, phone: Option<String>, email: Option<String>) -> Self {
        self.phone = phone;
        self.email = email;
        self
    }

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

#[derive(Debug, Clone, Default)]
pub struct UpdateStore {
    pub store_name: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub street: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub state: Option<Option<String>>,
    pub zip_code: Option<Option<String>>,
}

impl UpdateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.store_name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.street.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip_code.is_none()
    }

    pub fn store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = Some(store_name.into());
        self
    }

    pub fn phone(mut self, phone: Option<impl Into<String>>) -> Self {
        self.phone = Some(phone.map(Into::into));
        self
    }

    pub fn email(mut self, email: Option<impl Into<String>>) -> Self {
        self.email = Some(email.map(Into::into));
        self
    }

    pub fn zip_code(mut self, zip_code: Option<impl Into<String>>) -> Self {
        self.zip_code = Some(zip_code.map(Into::into));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoreFilter {
    pub search: Option<String>,
    pub state: Option<String>,
}

impl StoreFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreOrderBy {
    #[default]
    Id,
    Name,
}

#[derive(Debug, Clone, Default)]
pub struct StoreListQuery {
    pub filter: StoreFilter,
    pub order_by: StoreOrderBy,
    pub direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl StoreListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: StoreFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: StoreOrderBy, direction: SortDirection) -> Self {
        self.order_by = order_by;
        self.direction = direction;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
