//! Imports the bike store CSV exports into a SQLite database.
//!
//! ```bash
//! cargo run --bin seed -- bikestores.db ./data
//! ```
//!
//! The directory may hold `brands.csv`, `categories.csv`, `stores.csv`,
//! `staffs.csv`, `customers.csv`, `products.csv`, `stocks.csv`, `orders.csv`
//! and `order_items.csv`. Headers are the column names.

use std::env;
use std::path::Path;

use dotenvy::dotenv;

use bikestores::db::{establish_connection_pool, run_migrations};
use bikestores::import::import_dir;
use bikestores::repository::{DieselRepository, IntegrityChecker};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") || args.len() != 3 {
        println!("Usage: seed <database> <csv-dir>");
        return Ok(());
    }
    let database = &args[1];
    let dir = Path::new(&args[2]);

    let pool = establish_connection_pool(database)?;
    {
        let mut conn = pool.get()?;
        let applied = run_migrations(&mut conn).map_err(|e| e.to_string())?;
        log::info!("Database {database} ready, {applied} migrations applied");
    }

    let repo = DieselRepository::new(pool);
    let start = std::time::Instant::now();
    let summary = import_dir(&repo, dir)?;

    let total: usize = summary.imported.iter().map(|(_, rows)| rows).sum();
    log::info!("Imported {total} rows in {:?}", start.elapsed());
    for file in &summary.skipped {
        log::warn!("{file} was not imported");
    }

    let report = repo.check_integrity()?;
    if !report.is_clean() {
        log::warn!("Imported data is inconsistent: {report:?}");
    }

    Ok(())
}
