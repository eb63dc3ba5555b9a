/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Example
///
/// ```no_run
/// use habitd_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = habitd_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use habitd_shared::{
    auth::{
        jwt,
        middleware::{bearer_token, AuthContext},
    },
    models::user::User,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                     # Health check (public)
/// ├── /ping                       # Liveness check (public)
/// ├── /auth/
/// │   ├── POST /register          # Register (form: username, password)
/// │   └── POST /login             # Login, returns bearer token
/// ├── /habits                     # All bearer-authenticated
/// │   ├── GET    /                # List owned habits
/// │   ├── POST   /                # Create habit
/// │   ├── GET    /:id             # Fetch one habit
/// │   ├── PUT    /:id             # Partial update
/// │   ├── DELETE /:id             # Delete (cascades logs)
/// │   ├── GET    /:id/logs        # All logs for habit
/// │   ├── POST   /:id/increment   # Advance today's count
/// │   └── GET    /progress/me     # Today's progress summary
/// └── /habit/:id/log              # POST, append-style log insert
/// ```
///
/// The `/habit/:id/log` singular path is kept as-is for compatibility with
/// existing clients.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes, no auth
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/ping", get(routes::health::ping));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything touching habits or logs requires a valid bearer token
    let habit_routes = Router::new()
        .route(
            "/habits",
            get(routes::habits::list_habits).post(routes::habits::create_habit),
        )
        .route("/habits/progress/me", get(routes::progress::my_progress))
        .route(
            "/habits/:id",
            get(routes::habits::get_habit)
                .put(routes::habits::update_habit)
                .delete(routes::habits::delete_habit),
        )
        .route("/habits/:id/logs", get(routes::logs::list_logs))
        .route("/habits/:id/increment", post(routes::logs::increment))
        .route("/habit/:id/log", post(routes::logs::create_log))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .nest("/auth", auth_routes)
        .merge(habit_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token, confirms the subject still
/// exists, then injects [`AuthContext`] into request extensions. A token
/// whose user has been removed is as unauthorized as no token at all.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let token = bearer_token(req.headers())?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Could not validate credentials".to_string())
        })?;

    req.extensions_mut().insert(AuthContext::new(user.id));

    Ok(next.run(req).await)
}
