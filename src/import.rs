//! Bulk import of the CSV exports of every table.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::brand::NewBrand;
use crate::domain::category::NewCategory;
use crate::domain::customer::NewCustomer;
use crate::domain::order::{NewOrder, NewOrderItem};
use crate::domain::product::NewProduct;
use crate::domain::staff::{NewStaff, UpdateStaff};
use crate::domain::stock::NewStock;
use crate::domain::store::NewStore;
use crate::forms::upload::{
    BrandRow, CategoryRow, CustomerRow, OrderItemRow, OrderRow, ProductRow, StaffRow, StockRow,
    StoreRow, UploadError, read_rows,
};
use crate::repository::{
    BrandWriter, CategoryWriter, CustomerWriter, DieselRepository, OrderItemWriter, OrderWriter,
    ProductWriter, RepositoryError, StaffWriter, StockWriter, StoreWriter,
};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to open {file}: {source}")]
    Io {
        file: String,
        source: std::io::Error,
    },
    #[error("{file}: {source}")]
    Upload { file: String, source: UploadError },
    #[error("failed to store rows from {file}: {source}")]
    Repository {
        file: String,
        source: RepositoryError,
    },
}

/// Rows imported per file, in import order.
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub imported: Vec<(&'static str, usize)>,
    pub skipped: Vec<&'static str>,
}

impl ImportSummary {
    pub fn rows(&self, file: &str) -> Option<usize> {
        self.imported
            .iter()
            .find(|(name, _)| *name == file)
            .map(|(_, rows)| *rows)
    }
}

fn load<T>(dir: &Path, file: &'static str) -> Result<Option<Vec<T>>, ImportError>
where
    T: DeserializeOwned,
{
    let path = dir.join(file);
    if !path.exists() {
        log::warn!("Skipping {file}: not found in {}", dir.display());
        return Ok(None);
    }

    let reader = File::open(&path).map_err(|source| ImportError::Io {
        file: file.to_string(),
        source,
    })?;
    let rows = read_rows(reader).map_err(|source| ImportError::Upload {
        file: file.to_string(),
        source,
    })?;
    Ok(Some(rows))
}

fn stored(file: &'static str) -> impl FnOnce(RepositoryError) -> ImportError {
    move |source| ImportError::Repository {
        file: file.to_string(),
        source,
    }
}

/// Import every known CSV file found in `dir`, parents before children, keeping
/// the primary keys of the files. Missing files are skipped.
pub fn import_dir(repo: &DieselRepository, dir: &Path) -> Result<ImportSummary, ImportError> {
    let mut summary = ImportSummary::default();
    let mut record = |file: &'static str, rows: Option<usize>| match rows {
        Some(rows) => {
            log::info!("Imported {rows} rows from {file}");
            summary.imported.push((file, rows));
        }
        None => summary.skipped.push(file),
    };

    let file = "brands.csv";
    let rows = match load::<BrandRow>(dir, file)? {
        Some(rows) => {
            let brands: Vec<NewBrand> = rows.into_iter().map(NewBrand::from).collect();
            Some(repo.create_brands(&brands).map_err(stored(file))?)
        }
        None => None,
    };
    record(file, rows);

    let file = "categories.csv";
    let rows = match load::<CategoryRow>(dir, file)? {
        Some(rows) => {
            let categories: Vec<NewCategory> = rows.into_iter().map(NewCategory::from).collect();
            Some(repo.create_categories(&categories).map_err(stored(file))?)
        }
        None => None,
    };
    record(file, rows);

    let file = "stores.csv";
    let rows = match load::<StoreRow>(dir, file)? {
        Some(rows) => {
            let stores: Vec<NewStore> = rows.into_iter().map(NewStore::from).collect();
            Some(repo.create_stores(&stores).map_err(stored(file))?)
        }
        None => None,
    };
    record(file, rows);

    // Managers can be listed after their reports, so they are linked once
    // every staff member exists.
    let file = "staffs.csv";
    let rows = match load::<StaffRow>(dir, file)? {
        Some(rows) => {
            let staffs: Vec<NewStaff> = rows.iter().map(StaffRow::to_new_staff).collect();
            let inserted = repo.create_staffs(&staffs).map_err(stored(file))?;
            for row in &rows {
                if let Some(manager_id) = row.manager_id {
                    let link = UpdateStaff::new().manager_id(Some(manager_id));
                    repo.update_staff(row.staff_id, &link)
                        .map_err(stored(file))?;
                }
            }
            Some(inserted)
        }
        None => None,
    };
    record(file, rows);

    let file = "customers.csv";
    let rows = match load::<CustomerRow>(dir, file)? {
        Some(rows) => {
            let customers: Vec<NewCustomer> = rows.into_iter().map(NewCustomer::from).collect();
            Some(repo.create_customers(&customers).map_err(stored(file))?)
        }
        None => None,
    };
    record(file, rows);

    let file = "products.csv";
    let rows = match load::<ProductRow>(dir, file)? {
        Some(rows) => {
            let products: Vec<NewProduct> = rows.into_iter().map(NewProduct::from).collect();
            Some(repo.create_products(&products).map_err(stored(file))?)
        }
        None => None,
    };
    record(file, rows);

    let file = "stocks.csv";
    let rows = match load::<StockRow>(dir, file)? {
        Some(rows) => {
            let stocks: Vec<NewStock> = rows.into_iter().map(NewStock::from).collect();
            Some(repo.create_stocks(&stocks).map_err(stored(file))?)
        }
        None => None,
    };
    record(file, rows);

    let file = "orders.csv";
    let rows = match load::<OrderRow>(dir, file)? {
        Some(rows) => {
            let orders = rows
                .into_iter()
                .enumerate()
                .map(|(index, row)| row.into_new_order(index + 1))
                .collect::<Result<Vec<NewOrder>, _>>()
                .map_err(|source| ImportError::Upload {
                    file: file.to_string(),
                    source,
                })?;
            Some(repo.create_orders(&orders).map_err(stored(file))?)
        }
        None => None,
    };
    record(file, rows);

    let file = "order_items.csv";
    let rows = match load::<OrderItemRow>(dir, file)? {
        Some(rows) => {
            let mut by_order: BTreeMap<i32, Vec<NewOrderItem>> = BTreeMap::new();
            for row in &rows {
                by_order
                    .entry(row.order_id)
                    .or_default()
                    .push(NewOrderItem::from(row));
            }

            let mut inserted = 0;
            for (order_id, items) in &by_order {
                inserted += repo
                    .create_order_items(*order_id, items)
                    .map_err(stored(file))?;
            }
            Some(inserted)
        }
        None => None,
    };
    record(file, rows);

    Ok(summary)
}
