use std::sync::Arc;

use anyhow::Result;
use sea_orm::Database;

use crate::schemas::AppState;
use crate::storage::{DbStorage, MemStorage};

/// Build application state backed by a relational database.
pub async fn database_state(database_url: &str) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState {
        storage: Arc::new(DbStorage::new(db)),
    })
}

/// Build application state backed by the in-memory store. Nothing survives
/// a restart; intended for demos and tests.
pub fn memory_state() -> AppState {
    AppState {
        storage: Arc::new(MemStorage::new()),
    }
}
