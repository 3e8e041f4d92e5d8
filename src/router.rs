use crate::handlers::{
    auth::{login, register},
    generation::{get_generation, upsert_generation},
    health::health_check,
    offers::{create_offer, get_offer, get_offers, get_seller_offers, update_offer_status},
    transactions::{create_transaction, get_transactions, update_transaction_status},
    wallet::connect_wallet,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router,
    routing::{get, patch, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth routes
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        // Wallet routes
        .route("/api/wallet/connect", post(connect_wallet))
        // Offer routes
        .route("/api/energy/offers", get(get_offers))
        .route("/api/energy/offers", post(create_offer))
        .route("/api/energy/offers/:id", get(get_offer))
        .route("/api/energy/offers/seller/:seller_id", get(get_seller_offers))
        .route("/api/energy/offers/:id/status", patch(update_offer_status))
        // Transaction routes
        .route("/api/transactions", get(get_transactions))
        .route("/api/transactions", post(create_transaction))
        .route("/api/transactions/:id/status", patch(update_transaction_status))
        // Generation routes
        .route("/api/energy/generation/:user_id", get(get_generation))
        .route("/api/energy/generation", post(upsert_generation))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
