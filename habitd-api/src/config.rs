/// Configuration management for the API server
///
/// Loads configuration from environment variables into a type-safe struct.
/// The struct is built once at startup and shared through `AppState`; there
/// is no process-global mutable configuration.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `APP_ENV`: "production" enables production mode
/// - `JWT_SECRET`: Secret key for token signing. A built-in development
///   fallback is used when unset, and startup fails if production mode is
///   running on the fallback or on a short secret.
/// - `JWT_EXPIRY_DAYS`: Session token lifetime (default: 30)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: "*")
/// - `RUST_LOG`: Log filter (default: info)

use serde::{Deserialize, Serialize};
use std::env;

/// Development-only signing secret
///
/// Kept deliberately recognizable so it can never be mistaken for a real
/// secret; production startup refuses to run with it.
const FALLBACK_JWT_SECRET: &str = "habitd-insecure-dev-secret-do-not-deploy";

/// Minimum secret length accepted in production (HS256 wants >= 256 bits)
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; "*" means permissive
    pub cors_origins: Vec<String>,

    /// Whether the server runs in production mode
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for token signing
    #[serde(skip_serializing)]
    pub secret: String,

    /// Session token lifetime in days
    pub expiry_days: i64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing, values fail to
    /// parse, or production mode is configured with the fallback secret.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = resolve_jwt_secret(env::var("JWT_SECRET").ok(), production)?;

        let expiry_days = env::var("JWT_EXPIRY_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<i64>()?;
        if expiry_days <= 0 {
            anyhow::bail!("JWT_EXPIRY_DAYS must be positive");
        }

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiry_days,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Picks the signing secret, enforcing production requirements
///
/// Development falls back to a built-in secret (with a warning) so the
/// server runs out of the box; production refuses the fallback and short
/// secrets outright.
fn resolve_jwt_secret(explicit: Option<String>, production: bool) -> anyhow::Result<String> {
    match explicit {
        Some(secret) if secret == FALLBACK_JWT_SECRET => {
            anyhow::bail!("JWT_SECRET is set to the built-in fallback; choose a real secret")
        }
        Some(secret) => {
            if production && secret.len() < MIN_PRODUCTION_SECRET_LEN {
                anyhow::bail!(
                    "JWT_SECRET must be at least {} characters in production",
                    MIN_PRODUCTION_SECRET_LEN
                );
            }
            Ok(secret)
        }
        None if production => {
            anyhow::bail!("JWT_SECRET environment variable is required in production")
        }
        None => {
            tracing::warn!("JWT_SECRET not set, using insecure development fallback");
            Ok(FALLBACK_JWT_SECRET.to_string())
        }
    }
}
