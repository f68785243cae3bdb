//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! rosewood migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migration files live in `crates/api/migrations/`. The server never runs
//! them on startup; this command is the only migration path.

use tracing::info;

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;
    info!("Migrations complete");

    Ok(())
}
