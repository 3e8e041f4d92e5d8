#[cfg(test)]
pub mod test_utils {
    use std::sync::Arc;

    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    use crate::router::create_router;
    use crate::schemas::AppState;
    use crate::storage::{DbStorage, MemStorage};

    /// Create AppState over the in-memory store
    pub fn setup_mem_state() -> AppState {
        AppState {
            storage: Arc::new(MemStorage::new()),
        }
    }

    /// Create AppState over a fresh in-memory SQLite database
    pub async fn setup_db_state() -> AppState {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        AppState {
            storage: Arc::new(DbStorage::new(db)),
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is taken from RUST_LOG, defaulting to WARN.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing, backed by the in-memory store
    pub fn setup_test_app() -> Router {
        let _ = init_test_tracing();
        create_router(setup_mem_state())
    }

    /// Create axum app for testing, backed by in-memory SQLite
    pub async fn setup_db_test_app() -> Router {
        let _ = init_test_tracing();
        let state = setup_db_state().await;
        create_router(state)
    }
}
