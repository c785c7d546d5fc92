use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    // Health check
    syllabee_db::health_check(&pool).await.unwrap();

    // Verify the core tables exist and are empty after migration.
    for table in ["users", "pending_purchases", "user_sessions"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The unique constraint on users.email must use the uq_ prefix so the API
/// layer maps violations to HTTP 409.
#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_email_violates_named_constraint(pool: PgPool) {
    let insert = "INSERT INTO users (email, display_name, password_hash) \
                  VALUES ('dup@example.com', '', 'x')";
    sqlx::query(insert).execute(&pool).await.unwrap();

    let err = sqlx::query(insert).execute(&pool).await.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_users_email"));
        }
        other => panic!("expected a database error, got: {other}"),
    }
}
