use mockall::mock;

use super::{
    BrandReader, CategoryReader, CustomerReader, CustomerWriter, IntegrityChecker,
    OrderItemReader, OrderReader, OrderWriter, ProductReader, RepositoryResult, StaffReader,
    StockReader, StockWriter, StoreReader,
};
use crate::domain::{
    brand::{Brand, BrandFilter, BrandListQuery},
    category::{Category, CategoryFilter, CategoryListQuery},
    customer::{Customer, CustomerFilter, CustomerListQuery, NewCustomer, UpdateCustomer},
    integrity::IntegrityReport,
    order::{
        NewOrder, Order, OrderFilter, OrderGroup, OrderGroupBy, OrderItem, OrderItemAggregate,
        OrderItemFilter, OrderItemGroup, OrderItemGroupBy, OrderItemListQuery, OrderListQuery,
        UpdateOrder,
    },
    product::{
        Product, ProductAggregate, ProductDetails, ProductFilter, ProductGroup, ProductGroupBy,
        ProductListQuery,
    },
    staff::{Staff, StaffFilter, StaffListQuery},
    stock::{
        NewStock, Stock, StockAggregate, StockFilter, StockGroup, StockGroupBy, StockListQuery,
        UpdateStock,
    },
    store::{Store, StoreFilter, StoreListQuery},
};

mock! {
    pub BrandReader {}

    impl BrandReader for BrandReader {
        fn get_brand_by_id(&self, brand_id: i32) -> RepositoryResult<Option<Brand>>;
        fn find_first_brand(&self, query: BrandListQuery) -> RepositoryResult<Option<Brand>>;
        fn list_brands(&self, query: BrandListQuery) -> RepositoryResult<(usize, Vec<Brand>)>;
        fn count_brands(&self, filter: &BrandFilter) -> RepositoryResult<usize>;
    }
}

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn get_category_by_id(&self, category_id: i32) -> RepositoryResult<Option<Category>>;
        fn find_first_category(&self, query: CategoryListQuery) -> RepositoryResult<Option<Category>>;
        fn list_categories(&self, query: CategoryListQuery) -> RepositoryResult<(usize, Vec<Category>)>;
        fn count_categories(&self, filter: &CategoryFilter) -> RepositoryResult<usize>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, product_id: i32) -> RepositoryResult<Option<Product>>;
        fn get_product_details(&self, product_id: i32) -> RepositoryResult<Option<ProductDetails>>;
        fn find_first_product(&self, query: ProductListQuery) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
        fn count_products(&self, filter: &ProductFilter) -> RepositoryResult<usize>;
        fn aggregate_products(&self, filter: &ProductFilter) -> RepositoryResult<ProductAggregate>;
        fn group_products(&self, filter: &ProductFilter, by: ProductGroupBy) -> RepositoryResult<Vec<ProductGroup>>;
    }
}

mock! {
    pub StockReader {}

    impl StockReader for StockReader {
        fn get_stock(&self, store_id: i32, product_id: i32) -> RepositoryResult<Option<Stock>>;
        fn find_first_stock(&self, query: StockListQuery) -> RepositoryResult<Option<Stock>>;
        fn list_stocks(&self, query: StockListQuery) -> RepositoryResult<(usize, Vec<Stock>)>;
        fn count_stocks(&self, filter: &StockFilter) -> RepositoryResult<usize>;
        fn aggregate_stocks(&self, filter: &StockFilter) -> RepositoryResult<StockAggregate>;
        fn group_stocks(&self, filter: &StockFilter, by: StockGroupBy) -> RepositoryResult<Vec<StockGroup>>;
    }
}

mock! {
    pub StockWriter {}

    impl StockWriter for StockWriter {
        fn create_stock(&self, new_stock: &NewStock) -> RepositoryResult<Stock>;
        fn create_stocks(&self, new_stocks: &[NewStock]) -> RepositoryResult<usize>;
        fn update_stock(&self, store_id: i32, product_id: i32, updates: &UpdateStock) -> RepositoryResult<Stock>;
        fn update_stocks(&self, filter: &StockFilter, updates: &UpdateStock) -> RepositoryResult<usize>;
        fn upsert_stock(&self, stock: &NewStock) -> RepositoryResult<Stock>;
        fn adjust_stock(&self, store_id: i32, product_id: i32, delta: i32) -> RepositoryResult<Stock>;
        fn delete_stock(&self, store_id: i32, product_id: i32) -> RepositoryResult<()>;
        fn delete_stocks(&self, filter: &StockFilter) -> RepositoryResult<usize>;
    }
}

mock! {
    pub CustomerReader {}

    impl CustomerReader for CustomerReader {
        fn get_customer_by_id(&self, customer_id: i32) -> RepositoryResult<Option<Customer>>;
        fn find_first_customer(&self, query: CustomerListQuery) -> RepositoryResult<Option<Customer>>;
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
        fn count_customers(&self, filter: &CustomerFilter) -> RepositoryResult<usize>;
    }
}

mock! {
    pub CustomerWriter {}

    impl CustomerWriter for CustomerWriter {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn create_customers(&self, new_customers: &[NewCustomer]) -> RepositoryResult<usize>;
        fn update_customer(&self, customer_id: i32, updates: &UpdateCustomer) -> RepositoryResult<Customer>;
        fn update_customers(&self, filter: &CustomerFilter, updates: &UpdateCustomer) -> RepositoryResult<usize>;
        fn upsert_customer(&self, customer_id: i32, create: &NewCustomer, update: &UpdateCustomer) -> RepositoryResult<Customer>;
        fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()>;
        fn delete_customers(&self, filter: &CustomerFilter) -> RepositoryResult<usize>;
    }
}

mock! {
    pub StoreReader {}

    impl StoreReader for StoreReader {
        fn get_store_by_id(&self, store_id: i32) -> RepositoryResult<Option<Store>>;
        fn find_first_store(&self, query: StoreListQuery) -> RepositoryResult<Option<Store>>;
        fn list_stores(&self, query: StoreListQuery) -> RepositoryResult<(usize, Vec<Store>)>;
        fn count_stores(&self, filter: &StoreFilter) -> RepositoryResult<usize>;
    }
}

mock! {
    pub StaffReader {}

    impl StaffReader for StaffReader {
        fn get_staff_by_id(&self, staff_id: i32) -> RepositoryResult<Option<Staff>>;
        fn get_staff_by_email(&self, email: &str) -> RepositoryResult<Option<Staff>>;
        fn find_first_staff(&self, query: StaffListQuery) -> RepositoryResult<Option<Staff>>;
        fn list_staffs(&self, query: StaffListQuery) -> RepositoryResult<(usize, Vec<Staff>)>;
        fn count_staffs(&self, filter: &StaffFilter) -> RepositoryResult<usize>;
        fn list_reports(&self, manager_id: i32) -> RepositoryResult<Vec<Staff>>;
        fn manager_chain(&self, staff_id: i32) -> RepositoryResult<Vec<Staff>>;
    }
}

mock! {
    pub OrderReader {}

    impl OrderReader for OrderReader {
        fn get_order_by_id(&self, order_id: i32) -> RepositoryResult<Option<Order>>;
        fn find_first_order(&self, query: OrderListQuery) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
        fn count_orders(&self, filter: &OrderFilter) -> RepositoryResult<usize>;
        fn group_orders(&self, filter: &OrderFilter, by: OrderGroupBy) -> RepositoryResult<Vec<OrderGroup>>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
        fn create_orders(&self, new_orders: &[NewOrder]) -> RepositoryResult<usize>;
        fn update_order(&self, order_id: i32, updates: &UpdateOrder) -> RepositoryResult<Order>;
        fn update_orders(&self, filter: &OrderFilter, updates: &UpdateOrder) -> RepositoryResult<usize>;
        fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
        fn delete_orders(&self, filter: &OrderFilter) -> RepositoryResult<usize>;
    }
}

mock! {
    pub OrderItemReader {}

    impl OrderItemReader for OrderItemReader {
        fn get_order_item(&self, order_id: i32, item_id: i32) -> RepositoryResult<Option<OrderItem>>;
        fn find_first_order_item(&self, query: OrderItemListQuery) -> RepositoryResult<Option<OrderItem>>;
        fn list_order_items(&self, query: OrderItemListQuery) -> RepositoryResult<(usize, Vec<OrderItem>)>;
        fn count_order_items(&self, filter: &OrderItemFilter) -> RepositoryResult<usize>;
        fn aggregate_order_items(&self, filter: &OrderItemFilter) -> RepositoryResult<OrderItemAggregate>;
        fn group_order_items(&self, filter: &OrderItemFilter, by: OrderItemGroupBy) -> RepositoryResult<Vec<OrderItemGroup>>;
    }
}

mock! {
    pub IntegrityChecker {}

    impl IntegrityChecker for IntegrityChecker {
        fn check_integrity(&self) -> RepositoryResult<IntegrityReport>;
    }
}
