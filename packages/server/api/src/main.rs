use database::{Database, MemoryStore, Repositories};
use dotenv::dotenv;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod handlers;
mod router;
mod services;
mod state;

use config::Config;
use services::settings_resolver::SettingsResolver;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Connect to the store
    let (repos, db) = match &config.database_url {
        Some(url) => {
            let db = Database::connect(url, config.db_max_connections).await?;
            db.migrate().await?;
            (db.repositories(), Some(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, settings are kept in memory only");
            let store = match &config.seed_file {
                Some(path) => {
                    let store = MemoryStore::from_seed(config::load_seed(path)?).await?;
                    tracing::info!("Seeded in-memory store from {}", path.display());
                    store
                }
                None => {
                    tracing::warn!("SEED_FILE not set, the in-memory store starts empty");
                    MemoryStore::new()
                }
            };
            (Repositories::in_memory(Arc::new(store)), None)
        }
    };

    let app_state = AppState {
        resolver: Arc::new(SettingsResolver::new(repos)),
        db,
    };

    let app = router::app(app_state, config.cors_origin.clone());

    tracing::info!("Tool settings API listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
