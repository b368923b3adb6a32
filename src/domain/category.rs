use serde::{Deserialize, Serialize};

use crate::pagination::{Pagination, SortDirection};

/// Product classification such as "Mountain Bikes".
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Category {
    pub category_id: i32,
    pub category_name: String,
}

/// Payload required to insert a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Explicit primary key, used when importing existing data.
    pub category_id: Option<i32>,
    pub category_name: String,
}

impl NewCategory {
    pub fn new(category_name: impl Into<String>) -> Self {
        Self {
            category_id: None,
            category_name: category_name.into(),
        }
    }

    /// Insert the category under a fixed identifier.
    pub fn with_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Patch data applied when updating categories.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategory {
    pub category_name: Option<String>,
}

impl UpdateCategory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.category_name.is_none()
    }

    pub fn category_name(mut self, category_name: impl Into<String>) -> Self {
        self.category_name = Some(category_name.into());
        self
    }
}

/// Conditions selecting a set of categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    /// Substring matched against the category name.
    pub search: Option<String>,
}

impl CategoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

/// Columns categories can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryOrderBy {
    #[default]
    Id,
    Name,
}

/// Filter, ordering and pagination for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryListQuery {
    pub filter: CategoryFilter,
    pub order_by: CategoryOrderBy,
    pub direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl CategoryListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: CategoryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: CategoryOrderBy, direction: SortDirection) -> Self {
        self.order_by = order_by;
        self.direction = direction;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
