//! Database setup and initialization

use anyhow::{Context, Result};
use meeting_core::{Config, DatabaseConfig};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

pub fn connect_options(database: &DatabaseConfig) -> Result<PgConnectOptions> {
    let ssl_mode: PgSslMode = database
        .ssl_mode
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid DB_SSLMODE '{}': {}", database.ssl_mode, e))?;

    Ok(PgConnectOptions::new()
        .host(&database.host)
        .port(database.port)
        .username(&database.user)
        .password(&database.password)
        .database(&database.name)
        .ssl_mode(ssl_mode))
}

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let database = &config.database;
    tracing::info!(host = %database.host, port = database.port, name = %database.name, "Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(Duration::from_secs(database.timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(connect_options(database)?)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = database.max_connections,
        "Database connected successfully"
    );

    // Run pending migrations on startup (path: workspace migrations/ from crate root)
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
