//! Helpers for integration tests.
#![allow(dead_code)]

use bikestores::db::{DbPool, establish_connection_pool, run_migrations};
use bikestores::domain::brand::NewBrand;
use bikestores::domain::category::NewCategory;
use bikestores::domain::customer::NewCustomer;
use bikestores::domain::product::NewProduct;
use bikestores::domain::staff::NewStaff;
use bikestores::domain::stock::NewStock;
use bikestores::domain::store::NewStore;
use bikestores::repository::{
    BrandWriter, CategoryWriter, CustomerWriter, DieselRepository, ProductWriter, StaffWriter,
    StockWriter, StoreWriter,
};
use rust_decimal_macros::dec;

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        run_migrations(&mut conn).expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

/// Small catalog shared by the tests:
///
/// * brands 1 Electra, 2 Trek; categories 1 Cruisers, 2 Mountain Bikes
/// * stores 1 Santa Cruz Bikes (CA), 2 Baldwin Bikes (NY)
/// * staff 1 Fabiola (top level), 2 Mireya reporting to 1, 3 Genna reporting to 2
/// * customers 1 Debra Burks (NY), 2 Kasha Todd (CA)
/// * products 1..=3 with stock in store 1
pub fn seed_catalog(repo: &DieselRepository) {
    repo.create_brands(&[NewBrand::new("Electra").with_id(1), NewBrand::new("Trek").with_id(2)])
        .expect("brands");
    repo.create_categories(&[
        NewCategory::new("Cruisers Bicycles").with_id(1),
        NewCategory::new("Mountain Bikes").with_id(2),
    ])
    .expect("categories");
    repo.create_stores(&[
        NewStore::new("Santa Cruz Bikes")
            .with_id(1)
            .with_address(None, Some("Santa Cruz".into()), Some("CA".into()), None),
        NewStore::new("Baldwin Bikes")
            .with_id(2)
            .with_address(None, Some("Baldwin".into()), Some("NY".into()), None),
    ])
    .expect("stores");
    repo.create_staffs(&[
        NewStaff::new("Fabiola", "Jackson", "fabiola.jackson@bikes.shop", 1).with_id(1),
        NewStaff::new("Mireya", "Copeland", "mireya.copeland@bikes.shop", 1)
            .with_id(2)
            .with_manager(1),
        NewStaff::new("Genna", "Serrano", "genna.serrano@bikes.shop", 1)
            .with_id(3)
            .with_manager(2),
    ])
    .expect("staffs");
    repo.create_customers(&[
        NewCustomer::new("Debra", "Burks", "debra.burks@yahoo.com")
            .with_id(1)
            .with_address(None, Some("Orchard Park".into()), Some("NY".into()), None),
        NewCustomer::new("Kasha", "Todd", "kasha.todd@yahoo.com")
            .with_id(2)
            .with_address(None, Some("Campbell".into()), Some("CA".into()), None),
    ])
    .expect("customers");
    repo.create_products(&[
        NewProduct::new("Trek 820 - 2016", 2, 2, 2016, dec!(379.99)).with_id(1),
        NewProduct::new("Electra Townie Original 7D - 2015/2016", 1, 1, 2016, dec!(599.99))
            .with_id(2),
        NewProduct::new("Trek Fuel EX 8 29 - 2016", 2, 2, 2016, dec!(2899.99)).with_id(3),
    ])
    .expect("products");
    repo.create_stocks(&[
        NewStock::new(1, 1, Some(27)),
        NewStock::new(1, 2, Some(5)),
        NewStock::new(1, 3, None),
    ])
    .expect("stocks");
}
