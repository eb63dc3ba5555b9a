/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Login and get a bearer token
///
/// Both endpoints take an OAuth2-style urlencoded password form
/// (`username`, `password`); the username field is the registration
/// identifier and lands in the `email` column. Duplicate registration and
/// failed login both answer 400 for compatibility with existing clients,
/// and login failures use one message for "no such user" and "wrong
/// password" so registered identifiers cannot be probed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Form, Json};
use chrono::Duration;
use habitd_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration / login form (OAuth2 password-form shape)
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsForm {
    /// Registration identifier
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Human-readable confirmation
    pub msg: String,

    /// Registered identifier
    pub email: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/x-www-form-urlencoded
///
/// username=user@example.com&password=hunter2hunter2
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Identifier already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    form.validate()?;

    if User::find_by_email(&state.db, &form.username).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&form.password)?;

    // A concurrent duplicate insert still trips the unique constraint,
    // which the error layer also maps to 400.
    let user = User::create(
        &state.db,
        CreateUser {
            email: form.username,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            msg: "User registered successfully".to_string(),
            email: user.email,
        }),
    ))
}

/// Login with username and password, returns a bearer token
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/x-www-form-urlencoded
///
/// username=user@example.com&password=hunter2hunter2
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Unknown identifier or wrong password
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> ApiResult<Json<LoginResponse>> {
    let user = User::find_by_email(&state.db, &form.username)
        .await?
        .ok_or_else(|| ApiError::InvalidCredentials("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&form.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredentials(
            "Invalid credentials".to_string(),
        ));
    }

    let claims = jwt::Claims::with_expiration(
        user.id,
        Duration::days(state.config.jwt.expiry_days),
    );
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
