/// Database migration runner
///
/// Migrations live in the `migrations/` directory at the workspace root and
/// are applied with sqlx's embedded migration system.
///
/// # Example
///
/// ```no_run
/// use habitd_shared::db::pool::{create_pool, DatabaseConfig};
/// use habitd_shared::db::migrations::{ensure_database_exists, run_migrations};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let url = std::env::var("DATABASE_URL")?;
///     ensure_database_exists(&url).await?;
///
///     let config = DatabaseConfig { url, ..Default::default() };
///     let pool = create_pool(config).await?;
///
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info};

/// Runs all pending database migrations
///
/// Each migration runs in a transaction where possible; a failing migration
/// is rolled back and surfaced as an error.
///
/// # Errors
///
/// Returns an error if a migration fails to apply or the database is
/// unreachable.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    sqlx::migrate!("../migrations").run(pool).await?;

    info!("Database migrations applied");
    Ok(())
}

/// Creates the database if it doesn't exist
///
/// Useful for development and testing; in production the database should
/// already exist.
///
/// # Errors
///
/// Returns an error if the server is unreachable or the caller lacks
/// permission to create databases.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
        info!("Database created successfully");
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
