use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::storage::Storage;

/// Application state shared across handlers. The storage backend is picked
/// at startup (in-memory or relational) and injected here; handlers never
/// know which one they talk to.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description of what went wrong
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Storage backend status
    pub storage: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::wallet::connect_wallet,
        crate::handlers::offers::get_offers,
        crate::handlers::offers::get_offer,
        crate::handlers::offers::get_seller_offers,
        crate::handlers::offers::create_offer,
        crate::handlers::offers::update_offer_status,
        crate::handlers::transactions::get_transactions,
        crate::handlers::transactions::create_transaction,
        crate::handlers::transactions::update_transaction_status,
        crate::handlers::generation::get_generation,
        crate::handlers::generation::upsert_generation,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::AuthResponse,
            crate::handlers::auth::UserView,
            crate::handlers::wallet::ConnectWalletRequest,
            crate::handlers::wallet::WalletResponse,
            crate::handlers::offers::CreateOfferRequest,
            crate::handlers::offers::UpdateOfferStatusRequest,
            crate::handlers::offers::OfferView,
            crate::handlers::offers::OfferResponse,
            crate::handlers::offers::OffersResponse,
            crate::handlers::transactions::CreateTransactionRequest,
            crate::handlers::transactions::UpdateTransactionStatusRequest,
            crate::handlers::transactions::TransactionView,
            crate::handlers::transactions::TransactionResponse,
            crate::handlers::transactions::TransactionsResponse,
            crate::handlers::generation::UpsertGenerationRequest,
            crate::handlers::generation::GenerationView,
            crate::handlers::generation::GenerationResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "wallet", description = "Browser-wallet address attachment"),
        (name = "offers", description = "Energy offer listing and lifecycle"),
        (name = "transactions", description = "Purchase records and their status"),
        (name = "generation", description = "Per-user generation snapshots"),
    ),
    info(
        title = "Gridmarket API",
        description = "Peer-to-peer energy trading marketplace - offers, purchases and generation snapshots",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
