use serde::{Deserialize, Serialize};

use crate::domain::stats::IntStats;
use crate::pagination::{Pagination, SortDirection};

/// Quantity of one product held by one store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Stock {
    pub store_id: i32,
    pub product_id: i32,
    /// `None` when the quantity was never recorded.
    pub quantity: Option<i32>,
}

impl Stock {
    /// Quantity on hand, counting an unrecorded quantity as zero.
    pub fn on_hand(&self) -> i32 {
        self.quantity.unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct NewStock {
    pub store_id: i32,
    pub product_id: i32,
    pub quantity: Option<i32>,
}

impl NewStock {
    pub fn new(store_id: i32, product_id: i32, quantity: Option<i32>) -> Self {
        Self {
            store_id,
            product_id,
            quantity,
        }
    }
}

/// Patch data applied when updating stock rows.
#[derive(Debug, Clone, Default)]
pub struct UpdateStock {
    /// `Some(None)` clears the recorded quantity.
    pub quantity: Option<Option<i32>>,
}

impl UpdateStock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.quantity.is_none()
    }

    pub fn quantity(mut self, quantity: Option<i32>) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

/// Conditions selecting a set of stock rows.
#[derive(Debug, Clone, Default)]
pub struct StockFilter {
    pub store_id: Option<i32>,
    pub product_id: Option<i32>,
    /// Keep rows holding at least this many units.
    pub min_quantity: Option<i32>,
    /// Keep only rows whose quantity is missing or zero.
    pub out_of_stock: bool,
}

impl StockFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_id(mut self, store_id: i32) -> Self {
        self.store_id = Some(store_id);
        self
    }

    pub fn product_id(mut self, product_id: i32) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn min_quantity(mut self, min_quantity: i32) -> Self {
        self.min_quantity = Some(min_quantity);
        self
    }

    pub fn out_of_stock(mut self) -> Self {
        self.out_of_stock = true;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockOrderBy {
    #[default]
    Key,
    Quantity,
}

/// Query definition used to list stock rows.
#[derive(Debug, Clone, Default)]
pub struct StockListQuery {
    pub filter: StockFilter,
    pub order_by: StockOrderBy,
    pub direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl StockListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: StockFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: StockOrderBy, direction: SortDirection) -> Self {
        self.order_by = order_by;
        self.direction = direction;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockGroupBy {
    Store,
    Product,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct StockAggregate {
    /// Number of stock rows, including rows without a quantity.
    pub count: usize,
    pub quantity: IntStats,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StockGroup {
    /// Store id or product id, depending on the grouping.
    pub key: i32,
    pub aggregate: StockAggregate,
}
