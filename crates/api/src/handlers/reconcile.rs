//! Handler for the post-auth reconciliation trigger.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use syllabee_core::email;
use syllabee_core::error::CoreError;
use syllabee_db::repositories::{ReconciliationRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response body for `POST /reconcile`.
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub ok: bool,
    /// Whether any pending purchase was applied.
    pub applied: bool,
    /// Module ids unlocked by this call.
    pub modules: Vec<String>,
}

/// POST /api/v1/reconcile
///
/// Called by the client right after login or signup: applies any purchases
/// recorded against the caller's email before the account existed. Cheap and
/// side-effect-free when nothing is pending.
pub async fn reconcile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ReconcileResponse>> {
    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        }))?;

    if account.email.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Account has no email to reconcile purchases against".into(),
        ));
    }

    let canonical = email::normalize(&account.email);
    let outcome =
        ReconciliationRepo::reconcile(&state.pool, &state.catalog, account.id, &canonical).await?;

    Ok(Json(ReconcileResponse {
        ok: true,
        applied: outcome.applied,
        modules: outcome.modules,
    }))
}
