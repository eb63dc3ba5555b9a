/// Daily log engine endpoints
///
/// # Endpoints
///
/// - `POST /habits/:id/increment` - Advance today's count by one.
///   Idempotent per-row: the first call of the UTC day creates today's log
///   with count 1, later calls update the same row.
/// - `POST /habit/:id/log` - Append a log row unconditionally. Two calls on
///   the same day produce two rows; clients that want several distinct
///   entries per day use this instead of increment.
/// - `GET /habits/:id/logs` - All logs for an owned habit, newest first.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use habitd_shared::{
    auth::middleware::AuthContext,
    models::habit::Habit,
    models::habit_log::{HabitLog, NewHabitLog},
};
use serde::Serialize;
use uuid::Uuid;

/// Increment response: the habit snapshot plus today's log after the bump
#[derive(Debug, Serialize)]
pub struct IncrementResponse {
    /// The habit that was incremented
    pub habit: Habit,

    /// Today's log after the increment
    pub today_log: HabitLog,
}

/// Advances today's count for an owned habit
///
/// # Endpoint
///
/// ```text
/// POST /habits/:id/increment
/// ```
///
/// # Response
///
/// ```json
/// {
///   "habit": { "id": "...", "name": "...", "target_per_day": 3, ... },
///   "today_log": { "id": "...", "count": 2, "status": "in_progress", "date": "..." }
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: habit absent or owned by another user
pub async fn increment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(habit_id): Path<Uuid>,
) -> ApiResult<Json<IncrementResponse>> {
    let (habit, today_log) = HabitLog::increment(&state.db, auth.user_id, habit_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Habit not found".to_string()))?;

    tracing::debug!(
        habit_id = %habit.id,
        count = today_log.count,
        status = today_log.status.as_str(),
        "Habit incremented"
    );

    Ok(Json(IncrementResponse { habit, today_log }))
}

/// Appends a log row for an owned habit
///
/// Deliberately skips the one-row-per-day check; see the module docs.
/// Defaults: `count = 1`, `status = "completed"`.
///
/// # Errors
///
/// - `404 Not Found`: habit absent or owned by another user
pub async fn create_log(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(habit_id): Path<Uuid>,
    Json(data): Json<NewHabitLog>,
) -> ApiResult<(StatusCode, Json<HabitLog>)> {
    let log = HabitLog::insert(&state.db, auth.user_id, habit_id, data)
        .await?
        .ok_or_else(|| ApiError::NotFound("Habit not found".to_string()))?;

    Ok((StatusCode::CREATED, Json(log)))
}

/// Lists all logs for an owned habit, newest first
///
/// # Errors
///
/// - `404 Not Found`: habit absent or owned by another user
pub async fn list_logs(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(habit_id): Path<Uuid>,
) -> ApiResult<Json<Vec<HabitLog>>> {
    let logs = HabitLog::list_for_habit(&state.db, auth.user_id, habit_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Habit not found".to_string()))?;

    Ok(Json(logs))
}
