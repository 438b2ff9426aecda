use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;

pub use sqlx; // Re-export for convenience
pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;

pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, Seed};
pub use repositories::Repositories;

#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    /// Connects to PostgreSQL. `max_connections` caps the shared pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Arc<Self>> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(max_connections.min(5))
            .acquire_timeout(Duration::from_secs(3)) // Fail fast if DB is overloaded
            .idle_timeout(Duration::from_secs(60 * 5))
            .test_before_acquire(true)
            .connect(database_url)
            .await
            .context("Failed to connect to the database")?;

        Ok(Arc::new(Self { pool }))
    }

    /// Runs pending migrations. Safe to run on startup due to Postgres advisory locks.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("src/migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(())
    }

    /// Repositories sharing this connection pool.
    pub fn repositories(&self) -> Repositories {
        Repositories::postgres(self.pool.clone())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}
