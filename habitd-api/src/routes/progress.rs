/// Progress summary endpoint
///
/// # Endpoints
///
/// - `GET /habits/progress/me` - Today's progress for every owned habit

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use habitd_shared::{
    auth::middleware::AuthContext,
    progress::{progress_for_user, HabitProgress},
};
use serde::Serialize;
use uuid::Uuid;

/// Progress summary response
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    /// The authenticated user
    pub user_id: Uuid,

    /// One entry per owned habit, each with today's count and status
    pub habits: Vec<HabitProgress>,
}

/// Returns today's progress for every habit the caller owns
///
/// Habits without a log today report `{count: 0, status: "in_progress"}`
/// without a row being created; the summary is a pure read.
///
/// # Endpoint
///
/// ```text
/// GET /habits/progress/me
/// ```
///
/// # Errors
///
/// - `404 Not Found`: the caller owns no habits
pub async fn my_progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProgressResponse>> {
    let habits = progress_for_user(&state.db, auth.user_id).await?;

    if habits.is_empty() {
        return Err(ApiError::NotFound("No habits found".to_string()));
    }

    Ok(Json(ProgressResponse {
        user_id: auth.user_id,
        habits,
    }))
}
