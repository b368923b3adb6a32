use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};
use crate::models::decimal::SqlDecimal;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub product_id: i32,
    pub product_name: String,
    pub brand_id: i32,
    pub category_id: i32,
    pub model_year: i16,
    pub list_price: SqlDecimal,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub product_id: Option<i32>,
    pub product_name: &'a str,
    pub brand_id: i32,
    pub category_id: i32,
    pub model_year: i16,
    pub list_price: SqlDecimal,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub product_name: Option<&'a str>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub model_year: Option<i16>,
    pub list_price: Option<SqlDecimal>,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            product_id: value.product_id,
            product_name: value.product_name,
            brand_id: value.brand_id,
            category_id: value.category_id,
            model_year: value.model_year,
            list_price: value.list_price.into(),
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            product_id: value.product_id,
            product_name: value.product_name.as_str(),
            brand_id: value.brand_id,
            category_id: value.category_id,
            model_year: value.model_year,
            list_price: value.list_price.into(),
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            product_name: value.product_name.as_deref(),
            brand_id: value.brand_id,
            category_id: value.category_id,
            model_year: value.model_year,
            list_price: value.list_price.map(SqlDecimal::from),
        }
    }
}
