use serde::{Deserialize, Serialize};

use crate::pagination::{Pagination, SortDirection};

/// Manufacturer a product is sold under.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Brand {
    pub brand_id: i32,
    pub brand_name: String,
}

/// Payload required to insert a new brand.
#[derive(Debug, Clone)]
pub struct NewBrand {
    /// Explicit primary key, used when importing existing data.
    pub brand_id: Option<i32>,
    pub brand_name: String,
}

impl NewBrand {
    pub fn new(brand_name: impl Into<String>) -> Self {
        Self {
            brand_id: None,
            brand_name: brand_name.into(),
        }
    }

    /// Insert the brand under a fixed identifier.
    pub fn with_id(mut self, brand_id: i32) -> Self {
        self.brand_id = Some(brand_id);
        self
    }
}

/// Patch data applied when updating brands.
#[derive(Debug, Clone, Default)]
pub struct UpdateBrand {
    pub brand_name: Option<String>,
}

impl UpdateBrand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.brand_name.is_none()
    }

    pub fn brand_name(mut self, brand_name: impl Into<String>) -> Self {
        self.brand_name = Some(brand_name.into());
        self
    }
}

/// Conditions selecting a set of brands.
#[derive(Debug, Clone, Default)]
pub struct BrandFilter {
    /// Substring matched against the brand name.
    pub search: Option<String>,
}

impl BrandFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

/// Columns brands can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrandOrderBy {
    #[default]
    Id,
    Name,
}

/// Filter, ordering and pagination for listing brands.
#[derive(Debug, Clone, Default)]
pub struct BrandListQuery {
    pub filter: BrandFilter,
    pub order_by: BrandOrderBy,
    pub direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl BrandListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: BrandFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: BrandOrderBy, direction: SortDirection) -> Self {
        self.order_by = order_by;
        self.direction = direction;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
