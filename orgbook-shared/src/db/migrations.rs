/// Database migration runner
///
/// Migrations live in the `migrations/` directory at the workspace root
/// and are embedded into the binary with `sqlx::migrate!`. Each migration
/// is a `{version}_{name}.up.sql` / `{version}_{name}.down.sql` pair.
///
/// # Example
///
/// ```no_run
/// use orgbook_shared::db::pool::{create_pool, DatabaseConfig};
/// use orgbook_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations.
///
/// # Errors
///
/// Returns an error if a migration file is malformed or fails to execute.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("../migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
