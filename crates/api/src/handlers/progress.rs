//! Handler for the authenticated user's progress document.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use syllabee_core::error::CoreError;
use syllabee_core::progress::ProgressMap;
use syllabee_db::models::user::UserResponse;
use syllabee_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response body for `GET /me/progress`.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub user: UserResponse,
    pub progress: ProgressMap,
}

/// GET /api/v1/me/progress
///
/// The dashboard's view of the caller's progress document.
pub async fn get_progress(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ProgressResponse>> {
    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        }))?;

    let progress: ProgressMap = serde_json::from_value(account.progress.clone())
        .map_err(|e| AppError::InternalError(format!("Corrupt progress document: {e}")))?;

    Ok(Json(ProgressResponse {
        user: UserResponse::from(&account),
        progress,
    }))
}
