//! Integration tests for the pending-purchase store.

use serde_json::json;
use sqlx::PgPool;
use syllabee_db::repositories::PendingPurchaseRepo;

#[sqlx::test(migrations = "./migrations")]
async fn get_returns_none_for_unknown_email(pool: PgPool) {
    let record = PendingPurchaseRepo::get(&pool, "nobody@example.com")
        .await
        .unwrap();
    assert!(record.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn add_module_creates_record_in_list_shape(pool: PgPool) {
    PendingPurchaseRepo::add_module(&pool, "p@example.com", "alphabet-sounds")
        .await
        .unwrap();

    let record = PendingPurchaseRepo::get(&pool, "p@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.modules, json!(["alphabet-sounds"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn add_module_is_idempotent(pool: PgPool) {
    for _ in 0..3 {
        PendingPurchaseRepo::add_module(&pool, "p@example.com", "alphabet-sounds")
            .await
            .unwrap();
    }
    PendingPurchaseRepo::add_module(&pool, "p@example.com", "first-readers")
        .await
        .unwrap();

    let record = PendingPurchaseRepo::get(&pool, "p@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.modules, json!(["alphabet-sounds", "first-readers"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn add_module_normalizes_legacy_map_shape(pool: PgPool) {
    sqlx::query("INSERT INTO pending_purchases (email, modules) VALUES ($1, $2)")
        .bind("legacy@example.com")
        .bind(json!({"alphabet-sounds": true, "retired-module": false}))
        .execute(&pool)
        .await
        .unwrap();

    PendingPurchaseRepo::add_module(&pool, "legacy@example.com", "first-readers")
        .await
        .unwrap();

    // Rewritten in the canonical list shape; the falsy flag is dropped.
    let record = PendingPurchaseRepo::get(&pool, "legacy@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.modules, json!(["alphabet-sounds", "first-readers"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_is_a_noop_on_absent_record(pool: PgPool) {
    let existed = PendingPurchaseRepo::delete(&pool, "nobody@example.com")
        .await
        .unwrap();
    assert!(!existed);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_removes_record(pool: PgPool) {
    PendingPurchaseRepo::add_module(&pool, "p@example.com", "alphabet-sounds")
        .await
        .unwrap();

    let existed = PendingPurchaseRepo::delete(&pool, "p@example.com")
        .await
        .unwrap();
    assert!(existed);
    assert!(PendingPurchaseRepo::get(&pool, "p@example.com")
        .await
        .unwrap()
        .is_none());
}
