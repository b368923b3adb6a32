use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::order::{
    Order, OrderFilter, OrderItemAggregate, OrderItemFilter, OrderItemGroup, OrderItemGroupBy,
    OrderListQuery, OrderOrderBy, OrderStatus, UpdateOrder,
};
use crate::forms::orders::{ChangeStatusForm, PlaceOrderForm, ShipOrderForm};
use crate::pagination::{Paginated, SortDirection};
use crate::repository::{OrderItemReader, OrderReader, OrderWriter, ProductReader};
use crate::services::{PageQuery, ServiceError, ServiceResult};

/// Query parameters accepted by the order listing.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub customer_id: Option<i32>,
    pub store_id: Option<i32>,
    pub staff_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub placed_from: Option<NaiveDate>,
    pub placed_to: Option<NaiveDate>,
    pub shipped: Option<bool>,
    pub sort: Option<OrderOrderBy>,
    pub direction: Option<SortDirection>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl OrdersQuery {
    fn filter(&self) -> OrderFilter {
        let mut filter = OrderFilter::new().placed_between(self.placed_from, self.placed_to);
        if let Some(customer_id) = self.customer_id {
            filter = filter.customer_id(customer_id);
        }
        if let Some(store_id) = self.store_id {
            filter = filter.store_id(store_id);
        }
        if let Some(staff_id) = self.staff_id {
            filter = filter.staff_id(staff_id);
        }
        if let Some(status) = self.status {
            filter = filter.status(status);
        }
        if let Some(shipped) = self.shipped {
            filter = filter.shipped(shipped);
        }
        filter
    }
}

/// Lists orders with their items one page at a time.
pub fn list_orders<R>(repo: &R, query: OrdersQuery) -> ServiceResult<Paginated<Order>>
where
    R: OrderReader + ?Sized,
{
    if let (Some(from), Some(to)) = (query.placed_from, query.placed_to) {
        if from > to {
            return Err(ServiceError::Form(format!(
                "placed_from {from} is after placed_to {to}"
            )));
        }
    }

    let pagination = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .pagination();

    let list_query = OrderListQuery::new()
        .filter(query.filter())
        .order_by(
            query.sort.unwrap_or_default(),
            query.direction.unwrap_or_default(),
        )
        .paginate(pagination.page, pagination.per_page);

    let (total, items) = repo.list_orders(list_query)?;
    Ok(Paginated::new(items, pagination.page, total, pagination.per_page))
}

pub fn order_details<R>(repo: &R, order_id: i32) -> ServiceResult<Order>
where
    R: OrderReader + ?Sized,
{
    repo.get_order_by_id(order_id)?.ok_or(ServiceError::NotFound)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Places a new pending order. Lines without a price are charged the
/// product's current list price.
pub fn place_order<R>(repo: &R, form: PlaceOrderForm) -> ServiceResult<Order>
where
    R: OrderWriter + ProductReader + ?Sized,
{
    place_order_on(repo, form, today())
}

fn place_order_on<R>(repo: &R, form: PlaceOrderForm, today: NaiveDate) -> ServiceResult<Order>
where
    R: OrderWriter + ProductReader + ?Sized,
{
    let mut prices = HashMap::new();
    for product_id in form.products_without_price() {
        if let Some(product) = repo.get_product_by_id(product_id)? {
            prices.insert(product_id, product.list_price);
        }
    }

    let new_order = form
        .into_new_order(&prices, today)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let order = repo.create_order(&new_order)?;
    log::info!(
        "Placed order {} for store {} with {} items totalling {}",
        order.order_id,
        order.store_id,
        order.items.len(),
        order.total()
    );
    Ok(order)
}

/// Moves an order to another status. Rejected and completed orders keep their
/// status, and completion goes through [`ship_order`].
pub fn change_order_status<R>(
    repo: &R,
    order_id: i32,
    form: ChangeStatusForm,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    let order = repo
        .get_order_by_id(order_id)?
        .ok_or(ServiceError::NotFound)?;

    if order.order_status == form.status {
        return Ok(order);
    }
    if order.order_status.is_final() {
        return Err(ServiceError::Conflict(format!(
            "order {order_id} is already {}",
            order.order_status.as_str()
        )));
    }
    if form.status == OrderStatus::Completed {
        return Err(ServiceError::Form(
            "orders are completed by shipping them".to_string(),
        ));
    }

    let updated = repo.update_order(order_id, &UpdateOrder::new().status(form.status))?;
    log::info!(
        "Order {order_id} moved from {} to {}",
        order.order_status.as_str(),
        updated.order_status.as_str()
    );
    Ok(updated)
}

/// Marks an order as shipped, completing it.
pub fn ship_order<R>(repo: &R, order_id: i32, form: ShipOrderForm) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    ship_order_on(repo, order_id, form, today())
}

fn ship_order_on<R>(
    repo: &R,
    order_id: i32,
    form: ShipOrderForm,
    today: NaiveDate,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    let order = repo
        .get_order_by_id(order_id)?
        .ok_or(ServiceError::NotFound)?;

    if order.order_status.is_final() {
        return Err(ServiceError::Conflict(format!(
            "order {order_id} is already {}",
            order.order_status.as_str()
        )));
    }

    let shipped_date = form
        .shipped_date(order.order_date, today)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let updates = UpdateOrder::new()
        .status(OrderStatus::Completed)
        .shipped_date(Some(shipped_date));
    let shipped = repo.update_order(order_id, &updates)?;
    log::info!("Order {order_id} shipped on {shipped_date}");
    Ok(shipped)
}

/// Query parameters accepted by the revenue endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RevenueQuery {
    pub group_by: Option<OrderItemGroupBy>,
    pub order_id: Option<i32>,
    pub product_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct OrderRevenue {
    pub overall: OrderItemAggregate,
    pub groups: Vec<OrderItemGroup>,
}

/// Quantities, prices and net revenue of the matching order lines.
pub fn order_revenue<R>(repo: &R, query: RevenueQuery) -> ServiceResult<OrderRevenue>
where
    R: OrderItemReader + ?Sized,
{
    let mut filter = OrderItemFilter::new();
    if let Some(order_id) = query.order_id {
        filter = filter.order_id(order_id);
    }
    if let Some(product_id) = query.product_id {
        filter = filter.product_id(product_id);
    }

    let overall = repo.aggregate_order_items(&filter)?;
    let groups = match query.group_by {
        Some(by) => repo.group_order_items(&filter, by)?,
        None => Vec::new(),
    };

    Ok(OrderRevenue { overall, groups })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::order::{NewOrder, OrderGroup, OrderGroupBy, OrderItem};
    use crate::domain::product::{
        Product, ProductAggregate, ProductDetails, ProductFilter, ProductGroup,
        ProductGroupBy, ProductListQuery,
    };
    use crate::forms::orders::PlaceOrderItemForm;
    use crate::repository::RepositoryResult;
    use crate::repository::mock::{
        MockOrderItemReader, MockOrderReader, MockOrderWriter, MockProductReader,
    };

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn stored_order(new_order: &NewOrder) -> Order {
        Order {
            order_id: 1616,
            customer_id: new_order.customer_id,
            order_status: new_order.order_status,
            order_date: new_order.order_date,
            required_date: new_order.required_date,
            shipped_date: new_order.shipped_date,
            store_id: new_order.store_id,
            staff_id: new_order.staff_id,
            items: new_order
                .items
                .iter()
                .enumerate()
                .map(|(index, item)| OrderItem {
                    order_id: 1616,
                    item_id: index as i32 + 1,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    list_price: item.list_price,
                    discount: item.discount,
                })
                .collect(),
        }
    }

    fn pending_order(order_id: i32, status: OrderStatus) -> Order {
        Order {
            order_id,
            customer_id: Some(1),
            order_status: status,
            order_date: date(2018, 4, 1),
            required_date: date(2018, 4, 3),
            shipped_date: None,
            store_id: 1,
            staff_id: 2,
            items: Vec::new(),
        }
    }

    struct FakeRepo {
        order_reader: MockOrderReader,
        order_writer: MockOrderWriter,
        product_reader: MockProductReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                order_reader: MockOrderReader::new(),
                order_writer: MockOrderWriter::new(),
                product_reader: MockProductReader::new(),
            }
        }
    }

    impl OrderReader for FakeRepo {
        fn get_order_by_id(&self, order_id: i32) -> RepositoryResult<Option<Order>> {
            self.order_reader.get_order_by_id(order_id)
        }

        fn find_first_order(&self, query: OrderListQuery) -> RepositoryResult<Option<Order>> {
            self.order_reader.find_first_order(query)
        }

        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)> {
            self.order_reader.list_orders(query)
        }

        fn count_orders(&self, filter: &OrderFilter) -> RepositoryResult<usize> {
            self.order_reader.count_orders(filter)
        }

        fn group_orders(
            &self,
            filter: &OrderFilter,
            by: OrderGroupBy,
        ) -> RepositoryResult<Vec<OrderGroup>> {
            self.order_reader.group_orders(filter, by)
        }
    }

    impl OrderWriter for FakeRepo {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order> {
            self.order_writer.create_order(new_order)
        }

        fn create_orders(&self, new_orders: &[NewOrder]) -> RepositoryResult<usize> {
            self.order_writer.create_orders(new_orders)
        }

        fn update_order(&self, order_id: i32, updates: &UpdateOrder) -> RepositoryResult<Order> {
            self.order_writer.update_order(order_id, updates)
        }

        fn update_orders(
            &self,
            filter: &OrderFilter,
            updates: &UpdateOrder,
        ) -> RepositoryResult<usize> {
            self.order_writer.update_orders(filter, updates)
        }

        fn delete_order(&self, order_id: i32) -> RepositoryResult<()> {
            self.order_writer.delete_order(order_id)
        }

        fn delete_orders(&self, filter: &OrderFilter) -> RepositoryResult<usize> {
            self.order_writer.delete_orders(filter)
        }
    }

    impl ProductReader for FakeRepo {
        fn get_product_by_id(&self, product_id: i32) -> RepositoryResult<Option<Product>> {
            self.product_reader.get_product_by_id(product_id)
        }

        fn get_product_details(
            &self,
            product_id: i32,
        ) -> RepositoryResult<Option<ProductDetails>> {
            self.product_reader.get_product_details(product_id)
        }

        fn find_first_product(
            &self,
            query: ProductListQuery,
        ) -> RepositoryResult<Option<Product>> {
            self.product_reader.find_first_product(query)
        }

        fn list_products(
            &self,
            query: ProductListQuery,
        ) -> RepositoryResult<(usize, Vec<Product>)> {
            self.product_reader.list_products(query)
        }

        fn count_products(&self, filter: &ProductFilter) -> RepositoryResult<usize> {
            self.product_reader.count_products(filter)
        }

        fn aggregate_products(&self, filter: &ProductFilter) -> RepositoryResult<ProductAggregate> {
            self.product_reader.aggregate_products(filter)
        }

        fn group_products(
            &self,
            filter: &ProductFilter,
            by: ProductGroupBy,
        ) -> RepositoryResult<Vec<ProductGroup>> {
            self.product_reader.group_products(filter, by)
        }
    }

    fn place_form(items: Vec<PlaceOrderItemForm>) -> PlaceOrderForm {
        PlaceOrderForm {
            customer_id: Some(259),
            store_id: 1,
            staff_id: 2,
            order_date: None,
            required_date: date(2018, 4, 5),
            items,
        }
    }

    #[test]
    fn place_order_prices_lines_from_catalog() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .times(1)
            .withf(|product_id| *product_id == 20)
            .returning(|product_id| {
                Ok(Some(Product {
                    product_id,
                    product_name: "Electra Townie Original 7D - 2015/2016".to_string(),
                    brand_id: 1,
                    category_id: 3,
                    model_year: 2016,
                    list_price: dec!(599.99),
                }))
            });
        repo.order_writer
            .expect_create_order()
            .times(1)
            .withf(|new_order| {
                new_order.order_date == date(2018, 4, 1)
                    && new_order.order_status == OrderStatus::Pending
                    && new_order.items[0].list_price == dec!(599.99)
                    && new_order.items[1].list_price == dec!(1799.99)
            })
            .returning(|new_order| Ok(stored_order(new_order)));

        let form = place_form(vec![
            PlaceOrderItemForm {
                product_id: 20,
                quantity: 1,
                list_price: None,
                discount: Some(dec!(0.20)),
            },
            PlaceOrderItemForm {
                product_id: 8,
                quantity: 2,
                list_price: Some(dec!(1799.99)),
                discount: None,
            },
        ]);

        let order = place_order_on(&repo, form, date(2018, 4, 1)).unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total(), dec!(4079.97));
    }

    #[test]
    fn place_order_with_unknown_product_is_a_form_error() {
        let mut repo = FakeRepo::new();
        repo.product_reader
            .expect_get_product_by_id()
            .returning(|_| Ok(None));
        repo.order_writer.expect_create_order().never();

        let form = place_form(vec![PlaceOrderItemForm {
            product_id: 999,
            quantity: 1,
            list_price: None,
            discount: None,
        }]);

        let result = place_order_on(&repo, form, date(2018, 4, 1));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn place_order_rejects_prices_beyond_the_column() {
        let mut repo = FakeRepo::new();
        repo.order_writer.expect_create_order().never();

        let form = place_form(vec![PlaceOrderItemForm {
            product_id: 8,
            quantity: 1000,
            list_price: Some(Decimal::from_i128_with_scale(10_i128.pow(26), 0)),
            discount: None,
        }]);

        let result = place_order_on(&repo, form, date(2018, 4, 1));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn final_status_cannot_change() {
        let mut repo = FakeRepo::new();
        repo.order_reader
            .expect_get_order_by_id()
            .returning(|order_id| Ok(Some(pending_order(order_id, OrderStatus::Rejected))));
        repo.order_writer.expect_update_order().never();

        let form = ChangeStatusForm {
            status: OrderStatus::Processing,
        };
        let result = change_order_status(&repo, 3, form);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn status_change_updates_order() {
        let mut repo = FakeRepo::new();
        repo.order_reader
            .expect_get_order_by_id()
            .returning(|order_id| Ok(Some(pending_order(order_id, OrderStatus::Pending))));
        repo.order_writer
            .expect_update_order()
            .times(1)
            .withf(|order_id, updates| {
                *order_id == 3 && updates.order_status == Some(OrderStatus::Processing)
            })
            .returning(|order_id, _| Ok(pending_order(order_id, OrderStatus::Processing)));

        let form = ChangeStatusForm {
            status: OrderStatus::Processing,
        };
        let order = change_order_status(&repo, 3, form).unwrap();
        assert_eq!(order.order_status, OrderStatus::Processing);
    }

    #[test]
    fn shipping_completes_the_order() {
        let mut repo = FakeRepo::new();
        repo.order_reader
            .expect_get_order_by_id()
            .returning(|order_id| Ok(Some(pending_order(order_id, OrderStatus::Processing))));
        repo.order_writer
            .expect_update_order()
            .times(1)
            .withf(|_, updates| {
                updates.order_status == Some(OrderStatus::Completed)
                    && updates.shipped_date == Some(Some(date(2018, 4, 2)))
            })
            .returning(|order_id, _| {
                let mut order = pending_order(order_id, OrderStatus::Completed);
                order.shipped_date = Some(date(2018, 4, 2));
                Ok(order)
            });

        let order =
            ship_order_on(&repo, 5, ShipOrderForm::default(), date(2018, 4, 2)).unwrap();
        assert_eq!(order.shipped_date, Some(date(2018, 4, 2)));
    }

    #[test]
    fn shipping_a_missing_order_is_not_found() {
        let mut repo = FakeRepo::new();
        repo.order_reader
            .expect_get_order_by_id()
            .returning(|_| Ok(None));

        let result = ship_order_on(&repo, 5, ShipOrderForm::default(), date(2018, 4, 2));
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let repo = MockOrderReader::new();
        let query = OrdersQuery {
            placed_from: Some(date(2018, 1, 1)),
            placed_to: Some(date(2017, 1, 1)),
            ..OrdersQuery::default()
        };
        assert!(matches!(list_orders(&repo, query), Err(ServiceError::Form(_))));
    }

    #[test]
    fn revenue_groups_only_on_request() {
        let mut repo = MockOrderItemReader::new();
        repo.expect_aggregate_order_items()
            .withf(|filter| filter.product_id == Some(20))
            .returning(|_| {
                Ok(OrderItemAggregate {
                    net_revenue: dec!(479.99),
                    ..OrderItemAggregate::default()
                })
            });
        repo.expect_group_order_items()
            .times(1)
            .withf(|_, by| *by == OrderItemGroupBy::Order)
            .returning(|_, _| Ok(Vec::new()));

        let query = RevenueQuery {
            group_by: Some(OrderItemGroupBy::Order),
            product_id: Some(20),
            ..RevenueQuery::default()
        };
        let revenue = order_revenue(&repo, query).unwrap();
        assert_eq!(revenue.overall.net_revenue, dec!(479.99));
        assert_ne!(revenue.overall.net_revenue, Decimal::ZERO);
    }
}
