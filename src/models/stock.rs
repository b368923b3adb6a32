use diesel::prelude::*;

use crate::domain::stock::{NewStock as DomainNewStock, Stock as DomainStock};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::stocks)]
pub struct Stock {
    pub store_id: i32,
    pub product_id: i32,
    pub quantity: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::stocks)]
pub struct NewStock {
    pub store_id: i32,
    pub product_id: i32,
    pub quantity: Option<i32>,
}

impl From<Stock> for DomainStock {
    fn from(value: Stock) -> Self {
        Self {
            store_id: value.store_id,
            product_id: value.product_id,
            quantity: value.quantity,
        }
    }
}

impl From<&DomainNewStock> for NewStock {
    fn from(value: &DomainNewStock) -> Self {
        Self {
            store_id: value.store_id,
            product_id: value.product_id,
            quantity: value.quantity,
        }
    }
}
