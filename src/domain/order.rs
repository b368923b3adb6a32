use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::stats::{DecimalStats, IntStats};
use crate::pagination::{Pagination, SortDirection};

/// Lifecycle state of an order, stored as its numeric code.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed and awaits processing.
    #[default]
    Pending,
    /// Order is being prepared.
    Processing,
    /// Order was refused and will not ship.
    Rejected,
    /// Order has shipped.
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Rejected,
        OrderStatus::Completed,
    ];

    pub fn code(self) -> i32 {
        match self {
            OrderStatus::Pending => 1,
            OrderStatus::Processing => 2,
            OrderStatus::Rejected => 3,
            OrderStatus::Completed => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(OrderStatus::Pending),
            2 => Some(OrderStatus::Processing),
            3 => Some(OrderStatus::Rejected),
            4 => Some(OrderStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Completed => "completed",
        }
    }

    /// Whether the order can no longer change state.
    pub fn is_final(self) -> bool {
        matches!(self, OrderStatus::Rejected | OrderStatus::Completed)
    }
}

impl From<OrderStatus> for i32 {
    fn from(value: OrderStatus) -> Self {
        value.code()
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Ok(code) = trimmed.parse::<i32>() {
            return OrderStatus::from_code(code).ok_or_else(|| format!("unknown status {code}"));
        }
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown status `{trimmed}`"))
    }
}

/// Line of an order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderItem {
    pub order_id: i32,
    /// Position of the line within its order, starting at 1.
    pub item_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    /// Unit price at the time of ordering.
    pub list_price: Decimal,
    /// Fractional discount, `0.20` meaning twenty percent.
    pub discount: Decimal,
}

impl OrderItem {
    /// Amount charged for the line after the discount.
    pub fn net_amount(&self) -> Decimal {
        line_amount(self.quantity, self.list_price, self.discount)
    }
}

/// Saturates at `Decimal::MAX` instead of overflowing.
pub(crate) fn line_amount(quantity: i32, list_price: Decimal, discount: Decimal) -> Decimal {
    Decimal::from(quantity)
        .saturating_mul(list_price)
        .saturating_mul(Decimal::ONE.saturating_sub(discount))
        .round_dp(2)
}

/// Saturating sum of line amounts.
pub(crate) fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |total, amount| total.saturating_add(amount))
}

/// Domain representation of an order with its lines.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    pub order_id: i32,
    /// Missing for walk-in sales.
    pub customer_id: Option<i32>,
    pub order_status: OrderStatus,
    pub order_date: NaiveDate,
    pub required_date: NaiveDate,
    pub shipped_date: Option<NaiveDate>,
    pub store_id: i32,
    pub staff_id: i32,
    /// Lines sorted by `item_id`.
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of the net amounts of all lines.
    pub fn total(&self) -> Decimal {
        sum_amounts(self.items.iter().map(OrderItem::net_amount))
    }
}

/// Line supplied when creating an order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    /// Explicit line number. Assigned sequentially when missing.
    pub item_id: Option<i32>,
    pub product_id: i32,
    pub quantity: i32,
    pub list_price: Decimal,
    pub discount: Decimal,
}

impl NewOrderItem {
    pub fn new(product_id: i32, quantity: i32, list_price: Decimal) -> Self {
        Self {
            item_id: None,
            product_id,
            quantity,
            list_price,
            discount: Decimal::ZERO,
        }
    }

    pub fn with_item_id(mut self, item_id: i32) -> Self {
        self.item_id = Some(item_id);
        self
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }
}

/// Payload required to insert a new order together with its lines.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Explicit primary key, used when importing existing data.
    pub order_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub order_status: OrderStatus,
    pub order_date: NaiveDate,
    pub required_date: NaiveDate,
    pub shipped_date: Option<NaiveDate>,
    pub store_id: i32,
    pub staff_id: i32,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Build a pending order without lines.
    pub fn new(
        store_id: i32,
        staff_id: i32,
        order_date: NaiveDate,
        required_date: NaiveDate,
    ) -> Self {
        Self {
            order_id: None,
            customer_id: None,
            order_status: OrderStatus::default(),
            order_date,
            required_date,
            shipped_date: None,
            store_id,
            staff_id,
            items: Vec::new(),
        }
    }

    pub fn with_id(mut self, order_id: i32) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_customer_id(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.order_status = status;
        self
    }

    pub fn with_shipped_date(mut self, shipped_date: NaiveDate) -> Self {
        self.shipped_date = Some(shipped_date);
        self
    }

    pub fn with_item(mut self, item: NewOrderItem) -> Self {
        self.items.push(item);
        self
    }
}

/// Patch data applied when updating orders.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrder {
    pub customer_id: Option<Option<i32>>,
    pub order_status: Option<OrderStatus>,
    pub required_date: Option<NaiveDate>,
    pub shipped_date: Option<Option<NaiveDate>>,
    pub store_id: Option<i32>,
    pub staff_id: Option<i32>,
}

impl UpdateOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none()
            && self.order_status.is_none()
            && self.required_date.is_none()
            && self.shipped_date.is_none()
            && self.store_id.is_none()
            && self.staff_id.is_none()
    }

    pub fn customer_id(mut self, customer_id: Option<i32>) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.order_status = Some(status);
        self
    }

    pub fn required_date(mut self, required_date: NaiveDate) -> Self {
        self.required_date = Some(required_date);
        self
    }

    pub fn shipped_date(mut self, shipped_date: Option<NaiveDate>) -> Self {
        self.shipped_date = Some(shipped_date);
        self
    }

    pub fn staff_id(mut self, staff_id: i32) -> Self {
        self.staff_id = Some(staff_id);
        self
    }
}

/// Conditions selecting a set of orders.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub customer_id: Option<i32>,
    pub store_id: Option<i32>,
    pub staff_id: Option<i32>,
    pub status: Option<OrderStatus>,
    /// Inclusive lower bound on `order_date`.
    pub placed_from: Option<NaiveDate>,
    /// Inclusive upper bound on `order_date`.
    pub placed_to: Option<NaiveDate>,
    /// `Some(true)` keeps shipped orders, `Some(false)` unshipped ones.
    pub shipped: Option<bool>,
}

impl OrderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn customer_id(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn store_id(mut self, store_id: i32) -> Self {
        self.store_id = Some(store_id);
        self
    }

    pub fn staff_id(mut self, staff_id: i32) -> Self {
        self.staff_id = Some(staff_id);
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn placed_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.placed_from = from;
        self.placed_to = to;
        self
    }

    pub fn shipped(mut self, shipped: bool) -> Self {
        self.shipped = Some(shipped);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderOrderBy {
    #[default]
    Id,
    OrderDate,
    RequiredDate,
}

/// Query definition used to list orders.
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    pub filter: OrderFilter,
    pub order_by: OrderOrderBy,
    pub direction: SortDirection,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: OrderFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order_by: OrderOrderBy, direction: SortDirection) -> Self {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderGroupBy {
    Status,
    Store,
    Staff,
    Customer,
}

/// Number of orders sharing one grouping key.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrderGroup {
    /// Raw column value. Status groups carry the status code and customer
    /// groups use `None` for orders without a customer.
    pub key: Option<i32>,
    pub count: usize,
}

/// Patch data applied when updating order lines.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrderItem {
    pub product_id: Option<i32>,
    pub quantity: Option<i32>,
    pub list_price: Option<Decimal>,
    pub discount: Option<Decimal>,
}

impl UpdateOrderItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.product_id.is_none()
            && self.quantity.is_none()
            && self.list_price.is_none()
            && self.discount.is_none()
    }

    pub fn quantity(mut self, quantity: i32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn list_price(mut self, list_price: Decimal) -> Self {
        self.list_price = Some(list_price);
        self
    }

    pub fn discount(mut self, discount: Decimal) -> Self {
        self.discount = Some(discount);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderItemFilter {
    pub order_id: Option<i32>,
    pub product_id: Option<i32>,
}

impl OrderItemFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_id(mut self, order_id: i32) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn product_id(mut self, product_id: i32) -> Self {
        self.product_id = Some(product_id);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderItemListQuery {
    pub filter: OrderItemFilter,
    pub pagination: Option<Pagination>,
}

impl OrderItemListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: OrderItemFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderItemGroupBy {
    Order,
    Product,
}

/// Aggregates over order lines.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct OrderItemAggregate {
    pub count: usize,
    pub quantity: IntStats,
    pub list_price: DecimalStats,
    pub discount: DecimalStats,
    /// Sum of the discounted line amounts.
    pub net_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderItemGroup {
    /// Order id or product id, depending on the grouping.
    pub key: i32,
    pub aggregate: OrderItemAggregate,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(OrderStatus::from_code(0), None);
        assert_eq!(OrderStatus::from_code(5), None);
    }

    #[test]
    fn status_parses_names_and_codes() {
        assert_eq!("3".parse::<OrderStatus>(), Ok(OrderStatus::Rejected));
        assert_eq!(" Completed ".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn order_total_applies_discounts() {
        let date = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        let order = Order {
            order_id: 1,
            customer_id: Some(259),
            order_status: OrderStatus::Completed,
            order_date: date,
            required_date: date,
            shipped_date: Some(date),
            store_id: 1,
            staff_id: 2,
            items: vec![
                OrderItem {
                    order_id: 1,
                    item_id: 1,
                    product_id: 20,
                    quantity: 1,
                    list_price: dec!(599.99),
                    discount: dec!(0.20),
                },
                OrderItem {
                    order_id: 1,
                    item_id: 2,
                    product_id: 8,
                    quantity: 2,
                    list_price: dec!(1799.99),
                    discount: dec!(0.07),
                },
            ],
        };

        assert_eq!(order.items[0].net_amount(), dec!(479.99));
        assert_eq!(order.items[1].net_amount(), dec!(3347.98));
        assert_eq!(order.total(), dec!(3827.97));
    }

    #[test]
    fn oversized_lines_saturate() {
        assert_eq!(line_amount(i32::MAX, Decimal::MAX, Decimal::ZERO), Decimal::MAX);
        assert_eq!(line_amount(1000, Decimal::MAX, dec!(0.5)), Decimal::MAX);
        assert_eq!(sum_amounts([Decimal::MAX, dec!(0.01)]), Decimal::MAX);
    }
}
