use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::brand::Brand;
use crate::domain::category::Category;
use crate::domain::stats::{DecimalStats, IntStats};
use crate::domain::stock::Stock;
use crate::pagination::{Pagination, SortDirection};

/// Domain representation of a product in the catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub product_id: i32,
    /// Human-readable name, usually including the model year.
    pub product_name: String,
    /// Brand the product is sold under.
    pub brand_id: i32,
    /// Category the product belongs to.
    pub category_id: i32,
    /// Model year of the product.
    pub model_year: i16,
    /// Catalog price.
    pub list_price: Decimal,
}

/// Product together with the rows it references and the stock held for it.
#[derive(Debug, Serialize, Clone)]
pub struct ProductDetails {
    pub product: Product,
    pub brand: Brand,
    pub category: Category,
    pub stocks: Vec<Stock>,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Explicit primary key, used when importing existing data.
    pub product_id: Option<i32>,
    pub product_name: String,
    pub brand_id: i32,
    pub category_id: i32,
    pub model_year: i16,
    pub list_price: Decimal,
}

impl NewProduct {
    /// Build a new product payload with the supplied details.
    pub fn new(
        product_name: impl Into<String>,
        brand_id: i32,
        category_id: i32,
        model_year: i16,
        list_price: Decimal,
    ) -> Self {
        Self {
            product_id: None,
            product_name: product_name.into(),
            brand_id,
            category_id,
            model_year,
            list_price,
        }
    }

    /// Insert the product under a fixed identifier.
    pub fn with_id(mut self, product_id: i32) -> Self {
        self.product_id = Some(product_id);
        self
    }
}

/// Patch data applied when updating products.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub product_name: Option<String>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub model_year: Option<i16>,
    pub list_price: Option<Decimal>,
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = Some(product_name.into());
        self
    }

    pub fn brand_id(mut self, brand_id: i32) -> Self {
        self.brand_id = Some(brand_id);
        self
    }

    pub fn category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn model_year(mut self, model_year: i16) -> Self {
        self.model_year = Some(model_year);
        self
    }

    pub fn list_price(mut self, list_price: Decimal) -> Self {
        self.list_price = Some(list_price);
        self
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.brand_id.is_none()
            && self.category_id.is_none()
            && self.model_year.is_none()
            && self.list_price.is_none()
    }
}

/// Conditions selecting a set of products.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Substring matched against the product name.
    pub search: Option<String>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub model_year: Option<i16>,
    /// Inclusive lower bound on the list price.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on the list price.
    pub max_price: Option<Decimal>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn brand_id(mut self, brand_id: i32) -> Self {
        self.brand_id = Some(brand_id);
        self
    }

    pub fn category_id(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn model_year(mut self, model_year: i16) -> Self {
        self.model_year = Some(model_year);
        self
    }

    pub fn price_between(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }
}

/// Columns products can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductOrderBy {
    #[default]
    Id,
    Name,
    ModelYear,
    ListPrice,
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    pub filter: ProductFilter,
    pub order_by: ProductOrderBy,
    pub direction: SortDirection,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: ProductFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: ProductOrderBy, direction: SortDirection) -> Self {
        self.order_by = order_by;
        self.direction = direction;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Key products are grouped by in [`ProductGroup`] results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductGroupBy {
    Brand,
    Category,
    ModelYear,
}

/// Aggregates over the numeric product columns.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ProductAggregate {
    pub count: usize,
    pub list_price: DecimalStats,
    pub model_year: IntStats,
}

/// Aggregates for the products sharing one grouping key.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductGroup {
    /// Value of the grouped column (brand id, category id or model year).
    pub key: i32,
    pub aggregate: ProductAggregate,
}
