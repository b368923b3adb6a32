use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, NewOrderItem as DomainNewOrderItem, Order as DomainOrder,
    OrderItem as DomainOrderItem, OrderStatus, UpdateOrder as DomainUpdateOrder,
    UpdateOrderItem as DomainUpdateOrderItem,
};
use crate::models::decimal::SqlDecimal;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub order_id: i32,
    pub customer_id: Option<i32>,
    pub order_status: i32,
    pub order_date: NaiveDate,
    pub required_date: NaiveDate,
    pub shipped_date: Option<NaiveDate>,
    pub store_id: i32,
    pub staff_id: i32,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct OrderItem {
    pub order_id: i32,
    pub item_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub list_price: SqlDecimal,
    pub discount: SqlDecimal,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder {
    pub order_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub order_status: i32,
    pub order_date: NaiveDate,
    pub required_date: NaiveDate,
    pub shipped_date: Option<NaiveDate>,
    pub store_id: i32,
    pub staff_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub item_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub list_price: SqlDecimal,
    pub discount: SqlDecimal,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::orders)]
pub struct UpdateOrder {
    pub customer_id: Option<Option<i32>>,
    pub order_status: Option<i32>,
    pub required_date: Option<NaiveDate>,
    pub shipped_date: Option<Option<NaiveDate>>,
    pub store_id: Option<i32>,
    pub staff_id: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::order_items)]
pub struct UpdateOrderItem {
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
    pub list_price: Option<SqlDecimal>,
    pub discount: Option<SqlDecimal>,
}

impl Order {
    pub fn into_domain(self, items: Vec<OrderItem>) -> DomainOrder {
        let order_status = OrderStatus::from_code(self.order_status).unwrap_or_else(|| {
            log::warn!(
                "Order {} has unknown status code {}",
                self.order_id,
                self.order_status
            );
            OrderStatus::default()
        });

        DomainOrder {
            order_id: self.order_id,
            customer_id: self.customer_id,
            order_status,
            order_date: self.order_date,
            required_date: self.required_date,
            shipped_date: self.shipped_date,
            store_id: self.store_id,
            staff_id: self.staff_id,
            items: items.into_iter().map(DomainOrderItem::from).collect(),
        }
    }
}

impl From<(Order, Vec<OrderItem>)> for DomainOrder {
    fn from(value: (Order, Vec<OrderItem>)) -> Self {
        value.0.into_domain(value.1)
    }
}

impl From<OrderItem> for DomainOrderItem {
    fn from(value: OrderItem) -> Self {
        Self {
            order_id: value.order_id,
            item_id: value.item_id,
            product_id: value.product_id,
            quantity: value.quantity,
            list_price: value.list_price.into(),
            discount: value.discount.into(),
        }
    }
}

impl From<&DomainNewOrder> for NewOrder {
    fn from(value: &DomainNewOrder) -> Self {
        Self {
            order_id: value.order_id,
            customer_id: value.customer_id,
            order_status: value.order_status.code(),
            order_date: value.order_date,
            required_date: value.required_date,
            shipped_date: value.shipped_date,
            store_id: value.store_id,
            staff_id: value.staff_id,
        }
    }
}

impl NewOrderItem {
    pub fn from_domain(order_id: i32, item_id: i32, value: &DomainNewOrderItem) -> Self {
        Self {
            order_id,
            item_id,
            product_id: value.product_id,
            quantity: value.quantity,
            list_price: value.list_price.into(),
            discount: value.discount.into(),
        }
    }
}

impl From<&DomainUpdateOrder> for UpdateOrder {
    fn from(value: &DomainUpdateOrder) -> Self {
        Self {
            customer_id: value.customer_id,
            order_status: value.order_status.map(OrderStatus::code),
            required_date: value.required_date,
            shipped_date: value.shipped_date,
            store_id: value.store_id,
            staff_id: value.staff_id,
        }
    }
}

impl From<&DomainUpdateOrderItem> for UpdateOrderItem {
    fn from(value: &DomainUpdateOrderItem) -> Self {
        Self {
            product_id: value.product_id,
            quantity: value.quantity,
            list_price: value.list_price.map(SqlDecimal::from),
            discount: value.discount.map(SqlDecimal::from),
        }
    }
}
