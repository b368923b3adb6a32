use bikestores::repository::IntegrityChecker;

mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let base = "test_creates_and_removes_db_files.db";

    {
        let test_db = common::TestDb::new(base);
        let conn = test_db.pool().get();
        assert!(conn.is_ok());
    }

    let db_path = std::path::Path::new(base);
    assert!(!db_path.exists());
    assert!(!std::path::Path::new(&format!("{base}-shm")).exists());
    assert!(!std::path::Path::new(&format!("{base}-wal")).exists());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let test_db = common::TestDb::new("test_foreign_keys_are_enforced.db");
    let repo = test_db.repo();

    let err = repo
        .execute_raw(
            "INSERT INTO products \
             (product_id, product_name, brand_id, category_id, model_year, list_price) \
             VALUES (1, 'Orphan', 99, 99, 2016, '1.00')",
        )
        .unwrap_err();
    assert!(matches!(
        err,
        bikestores::repository::RepositoryError::ForeignKeyViolation(_)
    ));
}

#[test]
fn test_transaction_rolls_back_on_error() {
    let test_db = common::TestDb::new("test_transaction_rolls_back_on_error.db");
    let repo = test_db.repo();
    common::seed_catalog(&repo);

    let result: Result<(), _> = repo.transaction(|conn| {
        use diesel::RunQueryDsl;
        diesel::sql_query("DELETE FROM stocks").execute(conn)?;
        Err(bikestores::repository::RepositoryError::Validation(
            "abort".to_string(),
        ))
    });
    assert!(result.is_err());

    let affected = repo
        .execute_raw("UPDATE stocks SET quantity = quantity WHERE store_id = 1")
        .unwrap();
    assert_eq!(affected, 3);
    assert!(repo.check_integrity().unwrap().is_clean());
}
