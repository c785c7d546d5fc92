//! Route definitions for the authenticated `/me` resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/me`.
pub fn router() -> Router<AppState> {
    Router::new().route("/progress", get(progress::get_progress))
}
