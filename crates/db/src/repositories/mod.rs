//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument.

pub mod pending_purchase_repo;
pub mod reconciliation_repo;
pub mod session_repo;
pub mod user_repo;

pub use pending_purchase_repo::PendingPurchaseRepo;
pub use reconciliation_repo::{GrantOutcome, ReconcileOutcome, ReconciliationRepo};
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
