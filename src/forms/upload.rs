//! Rows of the CSV files imported by the seed binary.
//!
//! Headers are the column names. Empty cells and the literal `NULL` are read
//! as missing values.

use std::fmt::Display;
use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::Trim;
use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::domain::brand::NewBrand;
use crate::domain::category::NewCategory;
use crate::domain::customer::NewCustomer;
use crate::domain::order::{NewOrder, NewOrderItem, OrderStatus};
use crate::domain::product::NewProduct;
use crate::domain::staff::NewStaff;
use crate::domain::stock::NewStock;
use crate::domain::store::NewStore;
use crate::forms::optional_text;

pub type UploadResult<T> = Result<T, UploadError>;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown order status {code}")]
    UnknownStatus { row: usize, code: i32 },
}

/// Read every row of a headed CSV document.
pub fn read_rows<T, R>(reader: R) -> UploadResult<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

fn is_null(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("NULL")
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = String::deserialize(deserializer)?;
    if is_null(&raw) {
        return Ok(None);
    }
    raw.trim().parse().map(Some).map_err(D::Error::custom)
}

/// Parses the cell through `FromStr` instead of letting the CSV reader guess
/// its type, so prices keep their exact decimal digits.
fn parsed<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(D::Error::custom)
}

fn nullable_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if is_null(&raw) {
        return Ok(None);
    }
    Ok(optional_text(Some(&raw)))
}

/// Accepts `1`/`0` as well as `true`/`false`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(D::Error::custom(format!("invalid flag `{other}`"))),
    }
}

#[derive(Debug, Deserialize)]
pub struct BrandRow {
    pub brand_id: i32,
    pub brand_name: String,
}

impl From<BrandRow> for NewBrand {
    fn from(row: BrandRow) -> Self {
        NewBrand::new(row.brand_name).with_id(row.brand_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryRow {
    pub category_id: i32,
    pub category_name: String,
}

impl From<CategoryRow> for NewCategory {
    fn from(row: CategoryRow) -> Self {
        NewCategory::new(row.category_name).with_id(row.category_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct StoreRow {
    pub store_id: i32,
    pub store_name: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub zip_code: Option<String>,
}

impl From<StoreRow> for NewStore {
    fn from(row: StoreRow) -> Self {
        NewStore::new(row.store_name)
            .with_id(row.store_id)
            .with_contact(row.phone, row.email)
            .with_address(row.street, row.city, row.state, row.zip_code)
    }
}

#[derive(Debug, Deserialize)]
pub struct StaffRow {
    pub staff_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub active: bool,
    pub store_id: i32,
    #[serde(default, deserialize_with = "nullable")]
    pub manager_id: Option<i32>,
}

impl StaffRow {
    /// The staff member without a manager. Managers may appear later in the
    /// file, so they are linked in a second pass.
    pub fn to_new_staff(&self) -> NewStaff {
        let mut staff = NewStaff::new(
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.store_id,
        )
        .with_id(self.staff_id);
        if let Some(phone) = &self.phone {
            staff = staff.with_phone(phone.as_str());
        }
        if !self.active {
            staff = staff.inactive();
        }
        staff
    }
}

#[derive(Debug, Deserialize)]
pub struct CustomerRow {
    pub customer_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub phone: Option<String>,
    pub email: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub street: Option<String>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub zip_code: Option<String>,
}

impl From<CustomerRow> for NewCustomer {
    fn from(row: CustomerRow) -> Self {
        let mut customer = NewCustomer::new(row.first_name, row.last_name, row.email)
            .with_id(row.customer_id)
            .with_address(row.street, row.city, row.state, row.zip_code);
        if let Some(phone) = row.phone {
            customer = customer.with_phone(phone);
        }
        customer
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductRow {
    pub product_id: i32,
    pub product_name: String,
    pub brand_id: i32,
    pub category_id: i32,
    pub model_year: i16,
    #[serde(deserialize_with = "parsed")]
    pub list_price: Decimal,
}

impl From<ProductRow> for NewProduct {
    fn from(row: ProductRow) -> Self {
        NewProduct::new(
            row.product_name,
            row.brand_id,
            row.category_id,
            row.model_year,
            row.list_price,
        )
        .with_id(row.product_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct StockRow {
    pub store_id: i32,
    pub product_id: i32,
    #[serde(default, deserialize_with = "nullable")]
    pub quantity: Option<i32>,
}

impl From<StockRow> for NewStock {
    fn from(row: StockRow) -> Self {
        NewStock::new(row.store_id, row.product_id, row.quantity)
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderRow {
    pub order_id: i32,
    #[serde(default, deserialize_with = "nullable")]
    pub customer_id: Option<i32>,
    pub order_status: i32,
    pub order_date: NaiveDate,
    pub required_date: NaiveDate,
    #[serde(default, deserialize_with = "nullable")]
    pub shipped_date: Option<NaiveDate>,
    pub store_id: i32,
    pub staff_id: i32,
}

impl OrderRow {
    /// The order without its lines, which come from a separate file.
    /// `row` is the 1-based data row used in error messages.
    pub fn into_new_order(self, row: usize) -> UploadResult<NewOrder> {
        let status = OrderStatus::from_code(self.order_status).ok_or(
            UploadError::UnknownStatus {
                row,
                code: self.order_status,
            },
        )?;

        let mut order = NewOrder::new(
            self.store_id,
            self.staff_id,
            self.order_date,
            self.required_date,
        )
        .with_id(self.order_id)
        .with_status(status);
        if let Some(customer_id) = self.customer_id {
            order = order.with_customer_id(customer_id);
        }
        if let Some(shipped_date) = self.shipped_date {
            order = order.with_shipped_date(shipped_date);
        }
        Ok(order)
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRow {
    pub order_id: i32,
    pub item_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[serde(deserialize_with = "parsed")]
    pub list_price: Decimal,
    #[serde(default, deserialize_with = "nullable")]
    pub discount: Option<Decimal>,
}

impl From<&OrderItemRow> for NewOrderItem {
    fn from(row: &OrderItemRow) -> Self {
        NewOrderItem::new(row.product_id, row.quantity, row.list_price)
            .with_item_id(row.item_id)
            .with_discount(row.discount.unwrap_or(Decimal::ZERO))
    }
}
