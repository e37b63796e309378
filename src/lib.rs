use std::path::Path;

use crate::error::AppResult;
use crate::model::{DatabaseError, DbConnection, ModelManager};
use sqlx::migrate::Migrator;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod error;
pub mod model;

static APPLICATION_NAME: &str = "learnbase";

/// Connects to the database named in the config file, applies pending
/// migrations and returns the model manager the rest of the application
/// works through.
#[tracing::instrument]
pub async fn init_model() -> AppResult<ModelManager> {
    let use_local = cfg!(debug_assertions);
    let config = config::Config::get_or_init(use_local).await;

    let db = DbConnection::connect(config.database().uri())?;

    let migrator = Migrator::new(Path::new("./migrations"))
        .await
        .map_err(DatabaseError::from)?;
    tracing::debug!("applying migrations...");
    migrator.run(db.pool()).await.map_err(DatabaseError::from)?;

    Ok(ModelManager::new(db))
}

/// Builds a model manager on top of an existing pool. Used by tests and by
/// embedders that manage their own connection lifecycle.
pub fn init_model_with_pool(db: DbConnection) -> ModelManager {
    ModelManager::new(db)
}

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}
