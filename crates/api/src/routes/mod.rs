//! Route builders.

pub mod auth;
pub mod health;
pub mod me;
pub mod webhooks;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup         create account, apply pre-signup purchases (public)
/// /auth/login          login (public)
/// /auth/refresh        rotate refresh token (public)
/// /auth/logout         revoke sessions (requires auth)
///
/// /reconcile           post-auth purchase reconciliation (requires auth)
///
/// /me/progress         the caller's progress document (requires auth)
///
/// /webhooks/payment    payment-provider purchase notifications (HMAC-signed)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (signup, login, refresh, logout).
        .nest("/auth", auth::router())
        // Post-auth purchase reconciliation trigger.
        .route("/reconcile", post(handlers::reconcile::reconcile))
        // Authenticated user resources.
        .nest("/me", me::router())
        // Inbound payment-provider webhooks.
        .nest("/webhooks", webhooks::router())
}
