use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use crate::db::{DbConnection, DbPool};
use crate::domain::brand::{Brand, BrandFilter, BrandListQuery, NewBrand, UpdateBrand};
use crate::domain::category::{
    Category, CategoryFilter, CategoryListQuery, NewCategory, UpdateCategory,
};
use crate::domain::customer::{
    Customer, CustomerFilter, CustomerListQuery, NewCustomer, UpdateCustomer,
};
use crate::domain::integrity::IntegrityReport;
use crate::domain::order::{
    NewOrder, NewOrderItem, Order, OrderFilter, OrderGroup, OrderGroupBy, OrderItem,
    OrderItemAggregate, OrderItemFilter, OrderItemGroup, OrderItemGroupBy, OrderItemListQuery,
    OrderListQuery, UpdateOrder, UpdateOrderItem,
};
use crate::domain::product::{
    NewProduct, Product, ProductAggregate, ProductDetails, ProductFilter, ProductGroup,
    ProductGroupBy, ProductListQuery, UpdateProduct,
};
use crate::domain::staff::{NewStaff, Staff, StaffFilter, StaffListQuery, UpdateStaff};
use crate::domain::stock::{
    NewStock, Stock, StockAggregate, StockFilter, StockGroup, StockGroupBy, StockListQuery,
    UpdateStock,
};
use crate::domain::store::{NewStore, Store, StoreFilter, StoreListQuery, UpdateStore};
use crate::models::decimal::DecimalColumn;

pub mod brand;
pub mod category;
pub mod customer;
pub mod errors;
pub mod integrity;
pub mod order;
pub mod order_item;
pub mod product;
pub mod staff;
pub mod stock;
pub mod store;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Run `work` inside a single transaction on one pooled connection. The
    /// transaction commits when `work` returns `Ok` and rolls back otherwise.
    pub fn transaction<T, F>(&self, work: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T>,
    {
        let mut pooled = self.conn()?;
        let conn: &mut SqliteConnection = &mut pooled;
        conn.transaction(work)
    }

    /// Execute a raw SQL statement and return the number of affected rows.
    pub fn execute_raw(&self, sql: &str) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        log::debug!("Executing raw statement: {sql}");
        Ok(diesel::sql_query(sql).execute(&mut conn)?)
    }
}

/// Read-only operations over brands.
pub trait BrandReader {
    fn get_brand_by_id(&self, brand_id: i32) -> RepositoryResult<Option<Brand>>;
    fn find_first_brand(&self, query: BrandListQuery) -> RepositoryResult<Option<Brand>>;
    fn list_brands(&self, query: BrandListQuery) -> RepositoryResult<(usize, Vec<Brand>)>;
    fn count_brands(&self, filter: &BrandFilter) -> RepositoryResult<usize>;
}

/// Write operations over brands.
pub trait BrandWriter {
    fn create_brand(&self, new_brand: &NewBrand) -> RepositoryResult<Brand>;
    fn create_brands(&self, new_brands: &[NewBrand]) -> RepositoryResult<usize>;
    fn update_brand(&self, brand_id: i32, updates: &UpdateBrand) -> RepositoryResult<Brand>;
    fn update_brands(&self, filter: &BrandFilter, updates: &UpdateBrand)
    -> RepositoryResult<usize>;
    fn upsert_brand(
        &self,
        brand_id: i32,
        create: &NewBrand,
        update: &UpdateBrand,
    ) -> RepositoryResult<Brand>;
    fn delete_brand(&self, brand_id: i32) -> RepositoryResult<()>;
    fn delete_brands(&self, filter: &BrandFilter) -> RepositoryResult<usize>;
}

/// Read-only operations over categories.
pub trait CategoryReader {
    fn get_category_by_id(&self, category_id: i32) -> RepositoryResult<Option<Category>>;
    fn find_first_category(&self, query: CategoryListQuery)
    -> RepositoryResult<Option<Category>>;
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)>;
    fn count_categories(&self, filter: &CategoryFilter) -> RepositoryResult<usize>;
}

/// Write operations over categories.
pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    fn create_categories(&self, new_categories: &[NewCategory]) -> RepositoryResult<usize>;
    fn update_category(
        &self,
        category_id: i32,
        updates: &UpdateCategory,
    ) -> RepositoryResult<Category>;
    fn update_categories(
        &self,
        filter: &CategoryFilter,
        updates: &UpdateCategory,
    ) -> RepositoryResult<usize>;
    fn upsert_category(
        &self,
        category_id: i32,
        create: &NewCategory,
        update: &UpdateCategory,
    ) -> RepositoryResult<Category>;
    fn delete_category(&self, category_id: i32) -> RepositoryResult<()>;
    fn delete_categories(&self, filter: &CategoryFilter) -> RepositoryResult<usize>;
}

/// Read-only operations over products.
pub trait ProductReader {
    fn get_product_by_id(&self, product_id: i32) -> RepositoryResult<Option<Product>>;
    /// Product with its brand, category and stock rows.
    fn get_product_details(&self, product_id: i32) -> RepositoryResult<Option<ProductDetails>>;
    fn find_first_product(&self, query: ProductListQuery) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    fn count_products(&self, filter: &ProductFilter) -> RepositoryResult<usize>;
    fn aggregate_products(&self, filter: &ProductFilter) -> RepositoryResult<ProductAggregate>;
    fn group_products(
        &self,
        filter: &ProductFilter,
        by: ProductGroupBy,
    ) -> RepositoryResult<Vec<ProductGroup>>;
}

/// Write operations over products.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
    fn update_product(
        &self,
        product_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn update_products(
        &self,
        filter: &ProductFilter,
        updates: &UpdateProduct,
    ) -> RepositoryResult<usize>;
    fn upsert_product(
        &self,
        product_id: i32,
        create: &NewProduct,
        update: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    fn delete_products(&self, filter: &ProductFilter) -> RepositoryResult<usize>;
}

/// Read-only operations over stock rows, keyed by `(store_id, product_id)`.
pub trait StockReader {
    fn get_stock(&self, store_id: i32, product_id: i32) -> RepositoryResult<Option<Stock>>;
    fn find_first_stock(&self, query: StockListQuery) -> RepositoryResult<Option<Stock>>;
    fn list_stocks(&self, query: StockListQuery) -> RepositoryResult<(usize, Vec<Stock>)>;
    fn count_stocks(&self, filter: &StockFilter) -> RepositoryResult<usize>;
    fn aggregate_stocks(&self, filter: &StockFilter) -> RepositoryResult<StockAggregate>;
    fn group_stocks(
        &self,
        filter: &StockFilter,
        by: StockGroupBy,
    ) -> RepositoryResult<Vec<StockGroup>>;
}

/// Write operations over stock rows.
pub trait StockWriter {
    fn create_stock(&self, new_stock: &NewStock) -> RepositoryResult<Stock>;
    fn create_stocks(&self, new_stocks: &[NewStock]) -> RepositoryResult<usize>;
    fn update_stock(
        &self,
        store_id: i32,
        product_id: i32,
        updates: &UpdateStock,
    ) -> RepositoryResult<Stock>;
    fn update_stocks(&self, filter: &StockFilter, updates: &UpdateStock)
    -> RepositoryResult<usize>;
    /// Insert the row, or overwrite the quantity of the existing one.
    fn upsert_stock(&self, stock: &NewStock) -> RepositoryResult<Stock>;
    /// Add `delta` units, creating the row when missing. Results below zero
    /// are rejected.
    fn adjust_stock(&self, store_id: i32, product_id: i32, delta: i32)
    -> RepositoryResult<Stock>;
    fn delete_stock(&self, store_id: i32, product_id: i32) -> RepositoryResult<()>;
    fn delete_stocks(&self, filter: &StockFilter) -> RepositoryResult<usize>;
}

/// Read-only operations over customers.
pub trait CustomerReader {
    fn get_customer_by_id(&self, customer_id: i32) -> RepositoryResult<Option<Customer>>;
    fn find_first_customer(&self, query: CustomerListQuery)
    -> RepositoryResult<Option<Customer>>;
    fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<(usize, Vec<Customer>)>;
    fn count_customers(&self, filter: &CustomerFilter) -> RepositoryResult<usize>;
}

/// Write operations over customers.
pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    fn create_customers(&self, new_customers: &[NewCustomer]) -> RepositoryResult<usize>;
    fn update_customer(
        &self,
        customer_id: i32,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer>;
    fn update_customers(
        &self,
        filter: &CustomerFilter,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<usize>;
    fn upsert_customer(
        &self,
        customer_id: i32,
        create: &NewCustomer,
        update: &UpdateCustomer,
    ) -> RepositoryResult<Customer>;
    fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()>;
    fn delete_customers(&self, filter: &CustomerFilter) -> RepositoryResult<usize>;
}

/// Read-only operations over stores.
pub trait StoreReader {
    fn get_store_by_id(&self, store_id: i32) -> RepositoryResult<Option<Store>>;
    fn find_first_store(&self, query: StoreListQuery) -> RepositoryResult<Option<Store>>;
    fn list_stores(&self, query: StoreListQuery) -> RepositoryResult<(usize, Vec<Store>)>;
    fn count_stores(&self, filter: &StoreFilter) -> RepositoryResult<usize>;
}

/// Write operations over stores.
pub trait StoreWriter {
    fn create_store(&self, new_store: &NewStore) -> RepositoryResult<Store>;
    fn create_stores(&self, new_stores: &[NewStore]) -> RepositoryResult<usize>;
    fn update_store(&self, store_id: i32, updates: &UpdateStore) -> RepositoryResult<Store>;
    fn update_stores(&self, filter: &StoreFilter, updates: &UpdateStore)
    -> RepositoryResult<usize>;
    fn upsert_store(
        &self,
        store_id: i32,
        create: &NewStore,
        update: &UpdateStore,
    ) -> RepositoryResult<Store>;
    fn delete_store(&self, store_id: i32) -> RepositoryResult<()>;
    fn delete_stores(&self, filter: &StoreFilter) -> RepositoryResult<usize>;
}

/// Read-only operations over staff members and their reporting lines.
pub trait StaffReader {
    fn get_staff_by_id(&self, staff_id: i32) -> RepositoryResult<Option<Staff>>;
    fn get_staff_by_email(&self, email: &str) -> RepositoryResult<Option<Staff>>;
    fn find_first_staff(&self, query: StaffListQuery) -> RepositoryResult<Option<Staff>>;
    fn list_staffs(&self, query: StaffListQuery) -> RepositoryResult<(usize, Vec<Staff>)>;
    fn count_staffs(&self, filter: &StaffFilter) -> RepositoryResult<usize>;
    /// Staff whose manager is `manager_id`, sorted by id.
    fn list_reports(&self, manager_id: i32) -> RepositoryResult<Vec<Staff>>;
    /// Managers of `staff_id`, nearest first, ending with a top-level member.
    fn manager_chain(&self, staff_id: i32) -> RepositoryResult<Vec<Staff>>;
}

/// Write operations over staff members.
pub trait StaffWriter {
    fn create_staff(&self, new_staff: &NewStaff) -> RepositoryResult<Staff>;
    fn create_staffs(&self, new_staffs: &[NewStaff]) -> RepositoryResult<usize>;
    fn update_staff(&self, staff_id: i32, updates: &UpdateStaff) -> RepositoryResult<Staff>;
    fn update_staffs(&self, filter: &StaffFilter, updates: &UpdateStaff)
    -> RepositoryResult<usize>;
    /// Update the staff member holding `create.email`, or insert `create`.
    fn upsert_staff(&self, create: &NewStaff, update: &UpdateStaff) -> RepositoryResult<Staff>;
    fn delete_staff(&self, staff_id: i32) -> RepositoryResult<()>;
    fn delete_staffs(&self, filter: &StaffFilter) -> RepositoryResult<usize>;
}

/// Read-only operations over orders. Orders are returned with their items.
pub trait OrderReader {
    fn get_order_by_id(&self, order_id: i32) -> RepositoryResult<Option<Order>>;
    fn find_first_order(&self, query: OrderListQuery) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    fn count_orders(&self, filter: &OrderFilter) -> RepositoryResult<usize>;
    fn group_orders(
        &self,
        filter: &OrderFilter,
        by: OrderGroupBy,
    ) -> RepositoryResult<Vec<OrderGroup>>;
}

/// Write operations over orders.
pub trait OrderWriter {
    /// Insert the order and its items in one transaction.
    fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<Order>;
    fn create_orders(&self, new_orders: &[NewOrder]) -> RepositoryResult<usize>;
    fn update_order(&self, order_id: i32, updates: &UpdateOrder) -> RepositoryResult<Order>;
    fn update_orders(&self, filter: &OrderFilter, updates: &UpdateOrder)
    -> RepositoryResult<usize>;
    fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
    fn delete_orders(&self, filter: &OrderFilter) -> RepositoryResult<usize>;
}

/// Read-only operations over order items, keyed by `(order_id, item_id)`.
pub trait OrderItemReader {
    fn get_order_item(&self, order_id: i32, item_id: i32) -> RepositoryResult<Option<OrderItem>>;
    fn find_first_order_item(
        &self,
        query: OrderItemListQuery,
    ) -> RepositoryResult<Option<OrderItem>>;
    fn list_order_items(
        &self,
        query: OrderItemListQuery,
    ) -> RepositoryResult<(usize, Vec<OrderItem>)>;
    fn count_order_items(&self, filter: &OrderItemFilter) -> RepositoryResult<usize>;
    fn aggregate_order_items(
        &self,
        filter: &OrderItemFilter,
    ) -> RepositoryResult<OrderItemAggregate>;
    fn group_order_items(
        &self,
        filter: &OrderItemFilter,
        by: OrderItemGroupBy,
    ) -> RepositoryResult<Vec<OrderItemGroup>>;
}

/// Write operations over order items.
pub trait OrderItemWriter {
    /// Append a line to `order_id`, numbering it after the current last line
    /// unless the item carries its own `item_id`.
    fn create_order_item(&self, order_id: i32, item: &NewOrderItem)
    -> RepositoryResult<OrderItem>;
    fn create_order_items(&self, order_id: i32, items: &[NewOrderItem])
    -> RepositoryResult<usize>;
    fn update_order_item(
        &self,
        order_id: i32,
        item_id: i32,
        updates: &UpdateOrderItem,
    ) -> RepositoryResult<OrderItem>;
    fn update_order_items(
        &self,
        filter: &OrderItemFilter,
        updates: &UpdateOrderItem,
    ) -> RepositoryResult<usize>;
    fn delete_order_item(&self, order_id: i32, item_id: i32) -> RepositoryResult<()>;
    fn delete_order_items(&self, filter: &OrderItemFilter) -> RepositoryResult<usize>;
}

/// Verification of the referential invariants across all tables.
pub trait IntegrityChecker {
    fn check_integrity(&self) -> RepositoryResult<IntegrityReport>;
}

/// SQL `LIKE` pattern matching `term` anywhere.
pub(crate) fn contains_pattern(term: &str) -> String {
    format!("%{}%", term.trim())
}

/// Most ids bound into one `IN (...)` list. Keeps bulk statements below
/// SQLite's host parameter limit.
pub(crate) const ID_CHUNK_SIZE: usize = 500;

/// Reject a decimal the column would round or overflow on write.
pub(crate) fn check_decimal(column: DecimalColumn, value: Decimal) -> RepositoryResult<()> {
    column
        .check(value)
        .map(|_| ())
        .map_err(RepositoryError::Validation)
}
