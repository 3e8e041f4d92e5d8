use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::{database_state, memory_state};
use crate::router::create_router;

pub async fn serve(database_url: &str, bind_address: &str, in_memory: bool) -> Result<()> {
    info!("Gridmarket application starting up");
    debug!("Bind address: {}", bind_address);

    let state = if in_memory {
        info!("Using in-memory storage; data will not persist");
        memory_state()
    } else {
        debug!("Database URL: {}", database_url);
        match database_state(database_url).await {
            Ok(state) => {
                debug!("Application state initialized successfully");
                state
            }
            Err(e) => {
                error!("Failed to initialize application state: {}", e);
                return Err(e);
            }
        }
    };

    let app = create_router(state);
    debug!("Router created successfully");

    info!("Starting server on {}", bind_address);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Gridmarket API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
