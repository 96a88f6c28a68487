//! Cart persistence across sessions.

use jiff::Timestamp;
use tempfile::tempdir;
use testresult::TestResult;

use encebollado::{
    cart::{
        engine::CartEngine,
        storage::{CART_STORAGE_KEY, FileStorage, decode},
    },
    fixtures::embedded_catalog,
    products::ProductId,
};

#[test]
fn cart_survives_a_restart() -> TestResult {
    let catalog = embedded_catalog()?;
    let dir = tempdir()?;
    let now: Timestamp = "2024-03-09T19:05:07Z".parse()?;

    let first = {
        let mut engine = CartEngine::with_defaults(&catalog, FileStorage::new(dir.path()));

        engine.add_by_id(ProductId::new(4), 2, now)?;
        engine.add_by_id(ProductId::new(31), 1, now)?;
        engine.add_by_id(ProductId::new(35), 3, now)?;

        engine.cart().snapshot()
    };

    let path = dir.path().join(format!("{CART_STORAGE_KEY}.json"));

    assert_eq!(decode(&std::fs::read_to_string(&path)?)?, first);

    let engine = CartEngine::with_defaults(&catalog, FileStorage::new(dir.path()));

    assert_eq!(engine.cart().snapshot(), first);
    assert_eq!(engine.cart().total_item_count(), 6);

    Ok(())
}

#[test]
fn missing_store_starts_an_empty_cart() -> TestResult {
    let catalog = embedded_catalog()?;
    let dir = tempdir()?;

    let engine = CartEngine::with_defaults(&catalog, FileStorage::new(dir.path().join("nested")));

    assert!(engine.cart().is_empty());

    Ok(())
}

#[test]
fn stale_lines_are_dropped_on_restore() -> TestResult {
    let catalog = embedded_catalog()?;
    let dir = tempdir()?;

    std::fs::write(
        dir.path().join(format!("{CART_STORAGE_KEY}.json")),
        r#"[
            {"product_id":4,"quantity":1,"added_at":"2024-03-09T19:05:07Z"},
            {"product_id":999,"quantity":2,"added_at":"2024-03-09T19:05:07Z"},
            {"product_id":4,"quantity":2,"added_at":"2024-03-09T19:06:00Z"}
        ]"#,
    )?;

    let engine = CartEngine::with_defaults(&catalog, FileStorage::new(dir.path()));

    assert_eq!(engine.cart().len(), 1);
    assert_eq!(engine.cart().quantity_of(ProductId::new(4)), 3);

    Ok(())
}
