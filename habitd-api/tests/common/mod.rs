/// Common test utilities for integration tests
///
/// Shared infrastructure for the integration suite:
/// - Test database setup (migrations run on first connect)
/// - Test user creation and JWT token generation
/// - Request helpers for driving the router

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use habitd_api::app::{build_router, AppState};
use habitd_api::config::Config;
use habitd_shared::auth::jwt::{create_token, Claims};
use habitd_shared::auth::password;
use habitd_shared::models::habit::{CreateHabit, Habit};
use habitd_shared::models::user::{CreateUser, User};
use sqlx::PgPool;
use tower::ServiceExt as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh test user
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations").run(&db).await?;

        let user = User::create(
            &db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: password::hash_password("Test-password-1")?,
            },
        )
        .await?;

        let claims = Claims::new(user.id);
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Sends a JSON request with the context user's token
    pub async fn request_json(
        &self,
        method: &str,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Response {
        self.request_json_as(method, path, &self.jwt_token, body).await
    }

    /// Sends a JSON request with an explicit token
    pub async fn request_json_as(
        &self,
        method: &str,
        path: &str,
        token: &str,
        body: Option<serde_json::Value>,
    ) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", token));

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Sends an urlencoded form request (no auth), as the auth routes expect
    pub async fn post_form(&self, path: &str, body: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Cleans up test data
    ///
    /// Habits and logs cascade from the user row.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.user.id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Helper to create a habit for the context user directly in the database
pub async fn create_test_habit(
    ctx: &TestContext,
    name: &str,
    target_per_day: i32,
) -> anyhow::Result<Habit> {
    let habit = Habit::create(
        &ctx.db,
        ctx.user.id,
        CreateHabit {
            name: name.to_string(),
            description: None,
            is_positive: Some(true),
            target_per_day: Some(target_per_day),
        },
    )
    .await?;

    Ok(habit)
}

/// Helper to register a second user with their own token
pub async fn create_other_user(ctx: &TestContext) -> anyhow::Result<(User, String)> {
    let user = User::create(
        &ctx.db,
        CreateUser {
            email: format!("other-{}@example.com", Uuid::new_v4()),
            password_hash: password::hash_password("Other-password-1")?,
        },
    )
    .await?;

    let token = create_token(&Claims::new(user.id), &ctx.config.jwt.secret)?;

    Ok((user, token))
}

/// Counts the log rows currently stored for a habit
pub async fn count_logs(ctx: &TestContext, habit_id: Uuid) -> anyhow::Result<i64> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM habit_logs WHERE habit_id = $1")
            .bind(habit_id)
            .fetch_one(&ctx.db)
            .await?;

    Ok(count)
}

/// Reads a response body as JSON, panicking with the body text on failure
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| panic!("Body was not JSON: {}", String::from_utf8_lossy(&bytes)))
}

/// Asserts a status, printing the body when it doesn't match
pub async fn assert_status(response: Response, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&body).to_string();

    assert_eq!(status, expected, "Unexpected status, body: {}", text);

    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}
