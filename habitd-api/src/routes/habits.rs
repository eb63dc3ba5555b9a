/// Habit CRUD endpoints
///
/// All endpoints are bearer-authenticated and operate only on habits owned
/// by the caller; a habit owned by another user answers 404.
///
/// # Endpoints
///
/// - `GET /habits` - List owned habits
/// - `POST /habits` - Create habit
/// - `GET /habits/:id` - Fetch one habit
/// - `PUT /habits/:id` - Partial update
/// - `DELETE /habits/:id` - Delete habit and its logs

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
    models::habit::{CreateHabit, Habit, UpdateHabit},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create habit request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateHabitRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    /// Description, defaults to ""
    pub description: Option<String>,

    /// Polarity, defaults to true (build-up habit)
    pub is_positive: Option<bool>,

    /// Daily target, defaults to 1
    #[validate(range(min = 1, message = "target_per_day must be at least 1"))]
    pub target_per_day: Option<i32>,
}

/// Partial update request
///
/// Only the whitelisted fields are deserialized; unknown keys are silently
/// ignored rather than rejected.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateHabitRequest {
    /// New display name
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New polarity
    pub is_positive: Option<bool>,

    /// New daily target
    #[validate(range(min = 1, message = "target_per_day must be at least 1"))]
    pub target_per_day: Option<i32>,
}

/// Deletion confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Always true on success
    pub deleted: bool,

    /// ID of the removed habit
    pub id: Uuid,
}

/// Lists all habits owned by the caller, in insertion order
pub async fn list_habits(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Habit>>> {
    let habits = Habit::list_for_user(&state.db, auth.user_id).await?;

    Ok(Json(habits))
}

/// Creates a habit owned by the caller
///
/// # Errors
///
/// - `422 Unprocessable Entity`: empty name or `target_per_day < 1`
pub async fn create_habit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateHabitRequest>,
) -> ApiResult<(StatusCode, Json<Habit>)> {
    req.validate()?;

    let habit = Habit::create(
        &state.db,
        auth.user_id,
        CreateHabit {
            name: req.name,
            description: req.description,
            is_positive: req.is_positive,
            target_per_day: req.target_per_day,
        },
    )
    .await?;

    tracing::info!(habit_id = %habit.id, user_id = %auth.user_id, "Habit created");

    Ok((StatusCode::CREATED, Json(habit)))
}

/// Fetches one owned habit
pub async fn get_habit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(habit_id): Path<Uuid>,
) -> ApiResult<Json<Habit>> {
    let habit = Habit::find_owned(&state.db, auth.user_id, habit_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Habit not found".to_string()))?;

    Ok(Json(habit))
}

/// Applies a partial update to an owned habit
///
/// Absent fields are left untouched.
pub async fn update_habit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(habit_id): Path<Uuid>,
    Json(req): Json<UpdateHabitRequest>,
) -> ApiResult<Json<Habit>> {
    req.validate()?;

    let habit = Habit::update(
        &state.db,
        auth.user_id,
        habit_id,
        UpdateHabit {
            name: req.name,
            description: req.description,
            is_positive: req.is_positive,
            target_per_day: req.target_per_day,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Habit not found".to_string()))?;

    Ok(Json(habit))
}

/// Deletes an owned habit, cascading its logs
pub async fn delete_habit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(habit_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = Habit::delete(&state.db, auth.user_id, habit_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Habit not found".to_string()));
    }

    tracing::info!(habit_id = %habit_id, user_id = %auth.user_id, "Habit deleted");

    Ok(Json(DeleteResponse {
        deleted: true,
        id: habit_id,
    }))
}
