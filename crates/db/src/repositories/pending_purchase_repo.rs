//! Repository for the `pending_purchases` table.

use sqlx::{PgPool, Postgres, Transaction};
use syllabee_core::pending::parse_pending_modules;

use crate::models::pending_purchase::PendingPurchase;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "email, modules, created_at, updated_at";

/// Provides access to pending-purchase records, keyed by canonical email.
pub struct PendingPurchaseRepo;

impl PendingPurchaseRepo {
    /// Fetch the pending record for a canonical email.
    pub async fn get(pool: &PgPool, email: &str) -> Result<Option<PendingPurchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pending_purchases WHERE email = $1");
        sqlx::query_as::<_, PendingPurchase>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Merge `module_id` into the record's module set, creating the record if
    /// absent.
    ///
    /// Set semantics: adding a module that is already present changes nothing,
    /// so webhook redelivery is safe to repeat.
    pub async fn add_module(pool: &PgPool, email: &str, module_id: &str) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::add_module_in_tx(&mut tx, email, module_id).await?;
        tx.commit().await
    }

    /// Transaction-scoped variant of [`Self::add_module`] for callers that
    /// need the merge inside a larger transaction.
    ///
    /// Reads the existing record under a row lock and rewrites it in the
    /// canonical list shape (normalizing any legacy shape it finds). When no
    /// row exists yet, the insert merges on conflict so two concurrent
    /// first-purchase webhooks cannot drop each other's module.
    pub async fn add_module_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        module_id: &str,
    ) -> Result<(), sqlx::Error> {
        let existing: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT modules FROM pending_purchases WHERE email = $1 FOR UPDATE")
                .bind(email)
                .fetch_optional(&mut **tx)
                .await?;

        match existing {
            Some((raw,)) => {
                let mut modules = parse_pending_modules(&raw);
                if !modules.iter().any(|m| m == module_id) {
                    modules.push(module_id.to_string());
                }
                sqlx::query(
                    "UPDATE pending_purchases SET modules = $2, updated_at = NOW()
                     WHERE email = $1",
                )
                .bind(email)
                .bind(serde_json::json!(modules))
                .execute(&mut **tx)
                .await?;
            }
            None => {
                // The row can appear between our read and this insert (two
                // concurrent deliveries); the conflict arm appends instead of
                // overwriting. A row created that way is always in list
                // shape, so `||` is well-defined.
                sqlx::query(
                    "INSERT INTO pending_purchases (email, modules) VALUES ($1, $2)
                     ON CONFLICT (email) DO UPDATE SET
                        modules = CASE
                            WHEN pending_purchases.modules @> EXCLUDED.modules
                                THEN pending_purchases.modules
                            ELSE pending_purchases.modules || EXCLUDED.modules
                        END,
                        updated_at = NOW()",
                )
                .bind(email)
                .bind(serde_json::json!([module_id]))
                .execute(&mut **tx)
                .await?;
            }
        }
        Ok(())
    }

    /// Delete the pending record. Returns `true` if a row existed; deleting an
    /// absent record is a no-op, not an error.
    pub async fn delete(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pending_purchases WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
