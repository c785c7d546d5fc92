//! Pending purchase entity model.

use sqlx::FromRow;
use syllabee_core::types::Timestamp;

/// A row from the `pending_purchases` table.
///
/// `modules` may carry any of the legacy wire shapes (list, map of id ->
/// flag, bare string); normalize it with
/// [`syllabee_core::pending::parse_pending_modules`] before use.
#[derive(Debug, Clone, FromRow)]
pub struct PendingPurchase {
    pub email: String,
    pub modules: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
