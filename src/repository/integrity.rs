use std::collections::{BTreeMap, HashMap, HashSet};

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::integrity::{DanglingReference, DuplicateKey, IntegrityReport};
use crate::repository::{DieselRepository, IntegrityChecker, RepositoryError, RepositoryResult};
use crate::schema::{brands, categories, customers, order_items, orders, products, staffs};
use crate::schema::{stocks, stores};

/// Primary keys of every table referenced by a foreign key.
struct KnownIds {
    brands: HashSet<i32>,
    categories: HashSet<i32>,
    customers: HashSet<i32>,
    orders: HashSet<i32>,
    products: HashSet<i32>,
    staffs: HashSet<i32>,
    stores: HashSet<i32>,
}

impl KnownIds {
    fn load(conn: &mut SqliteConnection) -> RepositoryResult<Self> {
        Ok(Self {
            brands: brands::table
                .select(brands::brand_id)
                .load::<i32>(conn)?
                .into_iter()
                .collect(),
            categories: categories::table
                .select(categories::category_id)
                .load::<i32>(conn)?
                .into_iter()
                .collect(),
            customers: customers::table
                .select(customers::customer_id)
                .load::<i32>(conn)?
                .into_iter()
                .collect(),
            orders: orders::table
                .select(orders::order_id)
                .load::<i32>(conn)?
                .into_iter()
                .collect(),
            products: products::table
                .select(products::product_id)
                .load::<i32>(conn)?
                .into_iter()
                .collect(),
            staffs: staffs::table
                .select(staffs::staff_id)
                .load::<i32>(conn)?
                .into_iter()
                .collect(),
            stores: stores::table
                .select(stores::store_id)
                .load::<i32>(conn)?
                .into_iter()
                .collect(),
        })
    }
}

#[derive(Default)]
struct Findings {
    dangling: Vec<DanglingReference>,
}

impl Findings {
    fn check_ref(
        &mut self,
        known: &HashSet<i32>,
        table: &'static str,
        row: impl FnOnce() -> String,
        column: &'static str,
        value: i32,
    ) {
        if !known.contains(&value) {
            self.dangling.push(DanglingReference {
                table,
                row: row(),
                column,
                value,
            });
        }
    }
}

fn duplicates(table: &'static str, keys: &[(i32, i32)]) -> Vec<DuplicateKey> {
    let mut counts: BTreeMap<(i32, i32), usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(*key).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, occurrences)| *occurrences > 1)
        .map(|(key, occurrences)| DuplicateKey {
            table,
            key,
            occurrences,
        })
        .collect()
}

/// Staff ids lying on a cycle of the manager relation, sorted.
pub(crate) fn cyclic_staff(managers: &HashMap<i32, Option<i32>>) -> Vec<i32> {
    let mut on_cycle = HashSet::new();
    let mut settled = HashSet::new();

    for &start in managers.keys() {
        let mut path = Vec::new();
        let mut position = HashMap::new();
        let mut current = Some(start);

        while let Some(id) = current {
            if settled.contains(&id) {
                break;
            }
            if let Some(&index) = position.get(&id) {
                on_cycle.extend(path[index..].iter().copied());
                break;
            }
            position.insert(id, path.len());
            path.push(id);
            current = managers.get(&id).copied().flatten();
        }

        settled.extend(path);
    }

    let mut ids: Vec<i32> = on_cycle.into_iter().collect();
    ids.sort_unstable();
    ids
}

fn check(conn: &mut SqliteConnection) -> RepositoryResult<IntegrityReport> {
    let known = KnownIds::load(conn)?;
    let mut findings = Findings::default();

    let product_rows = products::table
        .select((products::product_id, products::brand_id, products::category_id))
        .load::<(i32, i32, i32)>(conn)?;
    for (product_id, brand_id, category_id) in product_rows {
        let row = || product_id.to_string();
        findings.check_ref(&known.brands, "products", row, "brand_id", brand_id);
        findings.check_ref(&known.categories, "products", row, "category_id", category_id);
    }

    let stock_keys = stocks::table
        .select((stocks::store_id, stocks::product_id))
        .load::<(i32, i32)>(conn)?;
    for &(store_id, product_id) in &stock_keys {
        let row = || format!("{store_id}/{product_id}");
        findings.check_ref(&known.stores, "stocks", row, "store_id", store_id);
        findings.check_ref(&known.products, "stocks", row, "product_id", product_id);
    }

    let staff_rows = staffs::table
        .select((staffs::staff_id, staffs::store_id, staffs::manager_id))
        .load::<(i32, i32, Option<i32>)>(conn)?;
    for &(staff_id, store_id, manager_id) in &staff_rows {
        let row = || staff_id.to_string();
        findings.check_ref(&known.stores, "staffs", row, "store_id", store_id);
        if let Some(manager_id) = manager_id {
            findings.check_ref(&known.staffs, "staffs", row, "manager_id", manager_id);
        }
    }

    let order_rows = orders::table
        .select((
            orders::order_id,
            orders::customer_id,
            orders::store_id,
            orders::staff_id,
        ))
        .load::<(i32, Option<i32>, i32, i32)>(conn)?;
    for (order_id, customer_id, store_id, staff_id) in order_rows {
        let row = || order_id.to_string();
        if let Some(customer_id) = customer_id {
            findings.check_ref(&known.customers, "orders", row, "customer_id", customer_id);
        }
        findings.check_ref(&known.stores, "orders", row, "store_id", store_id);
        findings.check_ref(&known.staffs, "orders", row, "staff_id", staff_id);
    }

    let item_rows = order_items::table
        .select((
            order_items::order_id,
            order_items::item_id,
            order_items::product_id,
        ))
        .load::<(i32, i32, i32)>(conn)?;
    let mut item_keys = Vec::with_capacity(item_rows.len());
    for (order_id, item_id, product_id) in item_rows {
        let row = || format!("{order_id}/{item_id}");
        findings.check_ref(&known.orders, "order_items", row, "order_id", order_id);
        findings.check_ref(&known.products, "order_items", row, "product_id", product_id);
        item_keys.push((order_id, item_id));
    }

    let mut duplicate_keys = duplicates("stocks", &stock_keys);
    duplicate_keys.extend(duplicates("order_items", &item_keys));

    let managers: HashMap<i32, Option<i32>> = staff_rows
        .iter()
        .map(|(staff_id, _, manager_id)| (*staff_id, *manager_id))
        .collect();

    Ok(IntegrityReport {
        dangling_references: findings.dangling,
        duplicate_keys,
        manager_cycles: cyclic_staff(&managers),
    })
}

impl IntegrityChecker for DieselRepository {
    fn check_integrity(&self) -> RepositoryResult<IntegrityReport> {
        let mut conn = self.conn()?;

        let report =
            conn.transaction::<IntegrityReport, RepositoryError, _>(|conn| check(conn))?;

        if report.is_clean() {
            log::info!("Integrity check found no problems");
        } else {
            log::warn!(
                "Integrity check found {} dangling references, {} duplicate keys, {} staff on \
                 manager cycles",
                report.dangling_references.len(),
                report.duplicate_keys.len(),
                report.manager_cycles.len()
            );
        }

        Ok(report)
    }
}
