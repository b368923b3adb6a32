use std::fs;

use bikestores::import::{ImportError, import_dir};
use bikestores::repository::{IntegrityChecker, OrderReader, StaffReader, StockReader};
use rust_decimal_macros::dec;

mod common;

const BRANDS: &str = "brand_id,brand_name\n1,Electra\n2,Trek\n";
const CATEGORIES: &str = "category_id,category_name\n1,Cruisers Bicycles\n2,Mountain Bikes\n";
const STORES: &str = "\
store_id,store_name,phone,email,street,city,state,zip_code
1,Santa Cruz Bikes,(831) 476-4321,santacruz@bikes.shop,3700 Portola Drive,Santa Cruz,CA,95060
";
// Managers listed after their reports.
const STAFFS: &str = "\
staff_id,first_name,last_name,email,phone,active,store_id,manager_id
2,Mireya,Copeland,mireya.copeland@bikes.shop,(831) 555-5555,1,1,1
1,Fabiola,Jackson,fabiola.jackson@bikes.shop,(831) 555-5554,1,1,NULL
";
const CUSTOMERS: &str = "\
customer_id,first_name,last_name,phone,email,street,city,state,zip_code
259,Johnathan,Velazquez,NULL,johnathan.velazquez@hotmail.com,9680 E. Somerset Street,Pleasanton,CA,94566
";
const PRODUCTS: &str = "\
product_id,product_name,brand_id,category_id,model_year,list_price
1,Trek 820 - 2016,2,2,2016,379.99
2,Electra Townie Original 7D - 2015/2016,1,1,2016,599.99
";
const STOCKS: &str = "store_id,product_id,quantity\n1,1,27\n1,2,NULL\n";
const ORDERS: &str = "\
order_id,customer_id,order_status,order_date,required_date,shipped_date,store_id,staff_id
1,259,4,2016-01-01,2016-01-03,2016-01-03,1,2
2,NULL,1,2016-01-02,2016-01-04,NULL,1,1
";
const ORDER_ITEMS: &str = "\
order_id,item_id,product_id,quantity,list_price,discount
1,1,2,1,599.99,0.20
1,2,1,2,379.99,0.07
2,1,1,1,379.99,0
";

fn write_all(dir: &std::path::Path, files: &[(&str, &str)]) {
    for (name, contents) in files {
        fs::write(dir.join(name), contents).unwrap();
    }
}

#[test]
fn test_imports_every_table() {
    let test_db = common::TestDb::new("test_imports_every_table.db");
    let repo = test_db.repo();
    let dir = tempfile::tempdir().unwrap();
    write_all(
        dir.path(),
        &[
            ("brands.csv", BRANDS),
            ("categories.csv", CATEGORIES),
            ("stores.csv", STORES),
            ("staffs.csv", STAFFS),
            ("customers.csv", CUSTOMERS),
            ("products.csv", PRODUCTS),
            ("stocks.csv", STOCKS),
            ("orders.csv", ORDERS),
            ("order_items.csv", ORDER_ITEMS),
        ],
    );

    let summary = import_dir(&repo, dir.path()).unwrap();
    assert!(summary.skipped.is_empty());
    assert_eq!(summary.rows("staffs.csv"), Some(2));
    assert_eq!(summary.rows("order_items.csv"), Some(3));

    let mireya = repo.get_staff_by_id(2).unwrap().unwrap();
    assert_eq!(mireya.manager_id, Some(1));
    assert_eq!(repo.get_stock(1, 2).unwrap().unwrap().quantity, None);

    let order = repo.get_order_by_id(1).unwrap().unwrap();
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[1].discount, dec!(0.07));
    assert_eq!(order.total(), dec!(1186.77));

    let walk_in = repo.get_order_by_id(2).unwrap().unwrap();
    assert_eq!(walk_in.customer_id, None);
    assert_eq!(walk_in.shipped_date, None);

    assert!(repo.check_integrity().unwrap().is_clean());
}

#[test]
fn test_missing_files_are_skipped() {
    let test_db = common::TestDb::new("test_missing_files_are_skipped.db");
    let repo = test_db.repo();
    let dir = tempfile::tempdir().unwrap();
    write_all(dir.path(), &[("brands.csv", BRANDS)]);

    let summary = import_dir(&repo, dir.path()).unwrap();
    assert_eq!(summary.rows("brands.csv"), Some(2));
    assert_eq!(summary.skipped.len(), 8);
}

#[test]
fn test_rows_referencing_missing_parents_fail() {
    let test_db = common::TestDb::new("test_rows_referencing_missing_parents_fail.db");
    let repo = test_db.repo();
    let dir = tempfile::tempdir().unwrap();
    write_all(dir.path(), &[("products.csv", PRODUCTS)]);

    let err = import_dir(&repo, dir.path()).unwrap_err();
    assert!(matches!(err, ImportError::Repository { ref file, .. } if file == "products.csv"));
}

#[test]
fn test_prices_that_would_be_rounded_fail() {
    let test_db = common::TestDb::new("test_prices_that_would_be_rounded_fail.db");
    let repo = test_db.repo();
    let dir = tempfile::tempdir().unwrap();
    write_all(
        dir.path(),
        &[
            ("brands.csv", BRANDS),
            ("categories.csv", CATEGORIES),
            (
                "products.csv",
                "product_id,product_name,brand_id,category_id,model_year,list_price\n\
                 1,Trek 820 - 2016,2,2,2016,379.999\n",
            ),
        ],
    );

    let err = import_dir(&repo, dir.path()).unwrap_err();
    assert!(matches!(
        err,
        ImportError::Repository {
            ref file,
            source: bikestores::repository::RepositoryError::Validation(_),
        } if file == "products.csv"
    ));
}
