use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::{NewOrder, NewOrderItem, OrderStatus};
use crate::models::decimal::{DISCOUNT, LIST_PRICE};

/// Upper bound on the number of lines accepted in one order.
const MAX_ITEMS: u64 = 100;

/// Upper bound on the units ordered on one line.
const MAX_QUANTITY: i32 = 10_000;

pub type OrderFormResult<T> = Result<T, OrderFormError>;

/// Errors that can occur while turning order forms into domain payloads.
#[derive(Debug, Error)]
pub enum OrderFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("required date {required} is before order date {ordered}")]
    RequiredBeforeOrdered {
        ordered: NaiveDate,
        required: NaiveDate,
    },
    #[error("line {line} has discount {discount}, expected a fraction in [0, 1)")]
    InvalidDiscount { line: usize, discount: Decimal },
    #[error("line {line} has negative price {price}")]
    NegativePrice { line: usize, price: Decimal },
    #[error("line {line}: {message}")]
    OutOfRange { line: usize, message: String },
    #[error("line {line} refers to unknown product {product_id}")]
    UnknownProduct { line: usize, product_id: i32 },
    #[error("shipped date {shipped} is before order date {ordered}")]
    ShippedBeforeOrdered {
        ordered: NaiveDate,
        shipped: NaiveDate,
    },
}

/// One line of a [`PlaceOrderForm`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaceOrderItemForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[validate(range(min = 1, max = MAX_QUANTITY))]
    pub quantity: i32,
    /// Defaults to the product's current list price.
    pub list_price: Option<Decimal>,
    /// Defaults to no discount.
    pub discount: Option<Decimal>,
}

/// Payload of `POST /v1/orders`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlaceOrderForm {
    pub customer_id: Option<i32>,
    #[validate(range(min = 1))]
    pub store_id: i32,
    #[validate(range(min = 1))]
    pub staff_id: i32,
    /// Defaults to the day the order is placed.
    pub order_date: Option<NaiveDate>,
    pub required_date: NaiveDate,
    #[validate(length(min = 1, max = MAX_ITEMS), nested)]
    pub items: Vec<PlaceOrderItemForm>,
}

impl PlaceOrderForm {
    /// Products whose price has to be looked up before the order can be built.
    pub fn products_without_price(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .items
            .iter()
            .filter(|item| item.list_price.is_none())
            .map(|item| item.product_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Validate the form and build the order. `prices` holds the current list
    /// price of every product returned by [`Self::products_without_price`].
    pub fn into_new_order(
        self,
        prices: &HashMap<i32, Decimal>,
        today: NaiveDate,
    ) -> OrderFormResult<NewOrder> {
        self.validate()?;

        let order_date = self.order_date.unwrap_or(today);
        if self.required_date < order_date {
            return Err(OrderFormError::RequiredBeforeOrdered {
                ordered: order_date,
                required: self.required_date,
            });
        }

        let mut new_order =
            NewOrder::new(self.store_id, self.staff_id, order_date, self.required_date);
        if let Some(customer_id) = self.customer_id {
            new_order = new_order.with_customer_id(customer_id);
        }

        for (index, item) in self.items.into_iter().enumerate() {
            let line = index + 1;

            let list_price = match item.list_price {
                Some(price) => price,
                None => *prices
                    .get(&item.product_id)
                    .ok_or(OrderFormError::UnknownProduct {
                        line,
                        product_id: item.product_id,
                    })?,
            };
            if list_price.is_sign_negative() {
                return Err(OrderFormError::NegativePrice {
                    line,
                    price: list_price,
                });
            }
            LIST_PRICE
                .check(list_price)
                .map_err(|message| OrderFormError::OutOfRange { line, message })?;

            let discount = item.discount.unwrap_or(Decimal::ZERO);
            if discount.is_sign_negative() || discount >= Decimal::ONE {
                return Err(OrderFormError::InvalidDiscount { line, discount });
            }
            DISCOUNT
                .check(discount)
                .map_err(|message| OrderFormError::OutOfRange { line, message })?;

            new_order = new_order.with_item(
                NewOrderItem::new(item.product_id, item.quantity, list_price)
                    .with_discount(discount),
            );
        }

        Ok(new_order)
    }
}

/// Payload of `POST /v1/orders/{id}/status`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChangeStatusForm {
    pub status: OrderStatus,
}

/// Payload of `POST /v1/orders/{id}/ship`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ShipOrderForm {
    /// Defaults to the day the request is handled.
    pub shipped_date: Option<NaiveDate>,
}

impl ShipOrderForm {
    /// Resolve the shipping date, which may not precede the order date.
    pub fn shipped_date(self, ordered: NaiveDate, today: NaiveDate) -> OrderFormResult<NaiveDate> {
        let shipped = self.shipped_date.unwrap_or(today);
        if shipped < ordered {
            return Err(OrderFormError::ShippedBeforeOrdered { ordered, shipped });
        }
        Ok(shipped)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn form(items: Vec<PlaceOrderItemForm>) -> PlaceOrderForm {
        PlaceOrderForm {
            customer_id: Some(259),
            store_id: 1,
            staff_id: 2,
            order_date: Some(date(2016, 1, 1)),
            required_date: date(2016, 1, 3),
            items,
        }
    }

    fn item(product_id: i32, list_price: Option<Decimal>) -> PlaceOrderItemForm {
        PlaceOrderItemForm {
            product_id,
            quantity: 1,
            list_price,
            discount: Some(dec!(0.2)),
        }
    }

    #[test]
    fn missing_prices_come_from_the_catalog() {
        let form = form(vec![item(20, None), item(8, Some(dec!(1799.99))), item(20, None)]);
        assert_eq!(form.products_without_price(), vec![20]);

        let prices = HashMap::from([(20, dec!(599.99))]);
        let order = form.into_new_order(&prices, date(2020, 1, 1)).unwrap();

        assert_eq!(order.customer_id, Some(259));
        assert_eq!(order.items.len(), 3);
        assert_eq!(order.items[0].list_price, dec!(599.99));
        assert_eq!(order.items[1].list_price, dec!(1799.99));
        assert_eq!(order.items[0].discount, dec!(0.2));
        assert!(order.items.iter().all(|item| item.item_id.is_none()));
    }

    #[test]
    fn unknown_product_is_reported_with_its_line() {
        let form = form(vec![item(8, Some(dec!(10))), item(999, None)]);
        let err = form
            .into_new_order(&HashMap::new(), date(2020, 1, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            OrderFormError::UnknownProduct {
                line: 2,
                product_id: 999
            }
        ));
    }

    #[test]
    fn empty_orders_are_rejected() {
        let err = form(Vec::new())
            .into_new_order(&HashMap::new(), date(2020, 1, 1))
            .unwrap_err();
        assert!(matches!(err, OrderFormError::Validation(_)));
    }

    #[test]
    fn full_discount_is_rejected() {
        let mut line = item(8, Some(dec!(10)));
        line.discount = Some(dec!(1));
        let err = form(vec![line])
            .into_new_order(&HashMap::new(), date(2020, 1, 1))
            .unwrap_err();
        assert!(matches!(err, OrderFormError::InvalidDiscount { line: 1, .. }));
    }

    #[test]
    fn prices_and_discounts_must_fit_their_columns() {
        let err = form(vec![item(8, Some(dec!(19.999)))])
            .into_new_order(&HashMap::new(), date(2020, 1, 1))
            .unwrap_err();
        assert!(matches!(err, OrderFormError::OutOfRange { line: 1, .. }));

        let err = form(vec![item(8, Some(dec!(10))), item(8, Some(dec!(100000000)))])
            .into_new_order(&HashMap::new(), date(2020, 1, 1))
            .unwrap_err();
        assert!(matches!(err, OrderFormError::OutOfRange { line: 2, .. }));

        let mut line = item(8, Some(dec!(10)));
        line.discount = Some(dec!(0.125));
        let err = form(vec![line])
            .into_new_order(&HashMap::new(), date(2020, 1, 1))
            .unwrap_err();
        assert!(matches!(err, OrderFormError::OutOfRange { line: 1, .. }));
    }

    #[test]
    fn oversized_quantity_is_rejected() {
        let mut line = item(8, Some(dec!(10)));
        line.quantity = 1000 * MAX_QUANTITY;
        let err = form(vec![line])
            .into_new_order(&HashMap::new(), date(2020, 1, 1))
            .unwrap_err();
        assert!(matches!(err, OrderFormError::Validation(_)));
    }

    #[test]
    fn required_date_must_follow_order_date() {
        let mut form = form(vec![item(8, Some(dec!(10)))]);
        form.required_date = date(2015, 12, 31);
        let err = form
            .into_new_order(&HashMap::new(), date(2020, 1, 1))
            .unwrap_err();
        assert!(matches!(err, OrderFormError::RequiredBeforeOrdered { .. }));
    }

    #[test]
    fn shipping_defaults_to_today() {
        let shipped = ShipOrderForm::default()
            .shipped_date(date(2016, 1, 1), date(2016, 1, 4))
            .unwrap();
        assert_eq!(shipped, date(2016, 1, 4));

        let early = ShipOrderForm {
            shipped_date: Some(date(2015, 1, 1)),
        };
        assert!(early.shipped_date(date(2016, 1, 1), date(2016, 1, 4)).is_err());
    }
}
