//! The purchase-to-access reconciliation transaction.
//!
//! Both entry points that can grant course access -- the payment webhook and
//! the post-auth trigger -- funnel into this repository, so the unlock policy
//! lives in exactly one place. Every sequence here runs inside a single
//! Postgres transaction with `FOR UPDATE` row locks: reads observe one
//! consistent snapshot and writes commit atomically or not at all.

use sqlx::{PgPool, Postgres, Transaction};
use syllabee_core::catalog::ModuleCatalog;
use syllabee_core::pending::parse_pending_modules;
use syllabee_core::progress::ProgressMap;
use syllabee_core::types::DbId;
use syllabee_core::unlock::{apply_update, unlock_updates};

use crate::repositories::PendingPurchaseRepo;

/// Result of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Whether any pending purchase was applied.
    pub applied: bool,
    /// The module ids unlocked by this run, in pending-record order.
    pub modules: Vec<String>,
}

impl ReconcileOutcome {
    fn skipped() -> Self {
        Self {
            applied: false,
            modules: Vec::new(),
        }
    }
}

/// Result of recording a paid purchase from the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOutcome {
    /// A matching account existed; the module was unlocked directly.
    Unlocked { user_id: DbId },
    /// No matching account yet; the purchase was parked as pending.
    Deferred,
}

pub struct ReconciliationRepo;

impl ReconciliationRepo {
    /// Apply all pending purchases for `email` to user `user_id`, deleting
    /// the pending record in the same transaction.
    ///
    /// The `FOR UPDATE` lock on the pending row serializes concurrent
    /// attempts for the same email; whichever transaction commits second
    /// finds no pending record and returns `applied = false`. Rerunning after
    /// a successful apply is therefore a no-op, which is what makes webhook
    /// redelivery and overlapping login triggers safe.
    ///
    /// A pending record whose module list parses to empty is malformed; it is
    /// deleted without touching the progress document.
    pub async fn reconcile(
        pool: &PgPool,
        catalog: &ModuleCatalog,
        user_id: DbId,
        email: &str,
    ) -> Result<ReconcileOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let pending: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT modules FROM pending_purchases WHERE email = $1 FOR UPDATE")
                .bind(email)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((raw_modules,)) = pending else {
            return Ok(ReconcileOutcome::skipped());
        };

        let modules = parse_pending_modules(&raw_modules);
        if modules.is_empty() {
            delete_pending(&mut tx, email).await?;
            tx.commit().await?;
            tracing::warn!(email, "deleted pending purchase with no usable modules");
            return Ok(ReconcileOutcome::skipped());
        }

        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT progress FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (raw_progress,) = row.ok_or(sqlx::Error::RowNotFound)?;

        let mut progress = decode_progress(raw_progress)?;
        for module_id in &modules {
            for update in unlock_updates(catalog, module_id) {
                apply_update(&mut progress, &update);
            }
        }

        write_progress(&mut tx, user_id, &progress).await?;
        delete_pending(&mut tx, email).await?;
        tx.commit().await?;

        tracing::info!(user_id, email, modules = ?modules, "applied pending purchases");
        Ok(ReconcileOutcome {
            applied: true,
            modules,
        })
    }

    /// Record a paid purchase of `module_id` by `email`.
    ///
    /// Unlocks directly when a matching account already exists, otherwise
    /// parks the purchase in the pending store for the post-signup/login
    /// reconcile to pick up.
    pub async fn grant_purchase(
        pool: &PgPool,
        catalog: &ModuleCatalog,
        email: &str,
        module_id: &str,
    ) -> Result<GrantOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(DbId, serde_json::Value)> =
            sqlx::query_as("SELECT id, progress FROM users WHERE email = $1 FOR UPDATE")
                .bind(email)
                .fetch_optional(&mut *tx)
                .await?;

        match row {
            Some((user_id, raw_progress)) => {
                let mut progress = decode_progress(raw_progress)?;
                for update in unlock_updates(catalog, module_id) {
                    apply_update(&mut progress, &update);
                }
                write_progress(&mut tx, user_id, &progress).await?;
                tx.commit().await?;
                tracing::info!(user_id, email, module_id, "unlocked purchased module");
                Ok(GrantOutcome::Unlocked { user_id })
            }
            None => {
                PendingPurchaseRepo::add_module_in_tx(&mut tx, email, module_id).await?;
                tx.commit().await?;
                tracing::info!(email, module_id, "parked purchase as pending (no account yet)");
                Ok(GrantOutcome::Deferred)
            }
        }
    }
}

/// Decode a raw JSONB progress value into the typed document.
///
/// `NULL` (a user row predating the progress column) heals to an empty map;
/// the unlock rule recreates whatever entries it touches.
fn decode_progress(raw: serde_json::Value) -> Result<ProgressMap, sqlx::Error> {
    if raw.is_null() {
        return Ok(ProgressMap::new());
    }
    serde_json::from_value(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

async fn write_progress(
    tx: &mut Transaction<'_, Postgres>,
    user_id: DbId,
    progress: &ProgressMap,
) -> Result<(), sqlx::Error> {
    let encoded = serde_json::to_value(progress).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    sqlx::query("UPDATE users SET progress = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(encoded)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn delete_pending(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM pending_purchases WHERE email = $1")
        .bind(email)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
