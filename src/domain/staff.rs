use serde::{Deserialize, Serialize};

use crate::pagination::{Pagination, SortDirection};

/// Employee working at a store. `manager_id` links staff into a reporting
/// hierarchy whose roots have no manager.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Staff {
    pub staff_id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all staff.
    pub email: String,
    pub phone: Option<String>,
    pub active: bool,
    pub store_id: i32,
    pub manager_id: Option<i32>,
}

impl Staff {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone)]
pub struct NewStaff {
    pub staff_id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub active: bool,
    pub store_id: i32,
    pub manager_id: Option<i32>,
}

impl NewStaff {
    /// Build an active staff member without a manager.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        store_id: i32,
    ) -> Self {
        Self {
            staff_id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            active: true,
            store_id,
            manager_id: None,
        }
    }

    pub fn with_id(mut self, staff_id: i32) -> Self {
        self.staff_id = Some(staff_id);
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_manager(mut self, manager_id: i32) -> Self {
        self.manager_id = Some(manager_id);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Patch data applied when updating staff members.
#[derive(Debug, Clone, Default)]
pub struct UpdateStaff {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub active: Option<bool>,
    pub store_id: Option<i32>,
    /// `Some(None)` promotes the staff member to the top of the hierarchy.
    pub manager_id: Option<Option<i32>>,
}

impl UpdateStaff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.active.is_none()
            && self.store_id.is_none()
            && self.manager_id.is_none()
    }

    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: Option<impl Into<String>>) -> Self {
        self.phone = Some(phone.map(Into::into));
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn store_id(mut self, store_id: i32) -> Self {
        self.store_id = Some(store_id);
        self
    }

    pub fn manager_id(mut self, manager_id: Option<i32>) -> Self {
        self.manager_id = Some(manager_id);
        self
    }
}

/// Conditions selecting a set of staff members.
#[derive(Debug, Clone, Default)]
pub struct StaffFilter {
    /// Substring matched against names and email.
    pub search: Option<String>,
    pub store_id: Option<i32>,
    pub active: Option<bool>,
    pub manager_id: Option<i32>,
    /// Keep only staff without a manager.
    pub top_level: bool,
}

impl StaffFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn store_id(mut self, store_id: i32) -> Self {
        self.store_id = Some(store_id);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn manager_id(mut self, manager_id: i32) -> Self {
        self.manager_id = Some(manager_id);
        self
    }

    pub fn top_level(mut self) -> Self {
        self.top_level = true;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffOrderBy {
    #[default]
    Id,
    LastName,
    Email,
}

#[derive(Debug, Clone, Default)]
pub struct StaffListQuery {
    pub filter: StaffFilter,
    pub order_by: StaffOrderBy,
    pub direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl StaffListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: StaffFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: StaffOrderBy, direction: SortDirection) -> Self {
        self.order_by = order_by;
        self.direction = direction;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
