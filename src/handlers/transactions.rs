use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::energy_transaction::{self, TransactionStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::ApiError;
use crate::schemas::AppState;
use crate::storage::NewEnergyTransaction;

/// Query parameters for the transaction listing
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    /// Restrict to rows where this user is buyer or seller
    pub user_id: Option<String>,
    /// Maximum number of transactions to return (default 50)
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u64>,
}

/// Request body for recording a purchase
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub offer_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    #[schema(value_type = String)]
    pub energy_amount: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub block_number: Option<i32>,
    /// Accepted for wire compatibility and ignored: new transactions are
    /// always created pending.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub status: Option<TransactionStatus>,
}

/// Request body for moving a transaction through its lifecycle
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionStatusRequest {
    #[schema(value_type = String)]
    pub status: TransactionStatus,
    /// Preserved if absent
    #[serde(default)]
    pub transaction_hash: Option<String>,
    /// Preserved if absent
    #[serde(default)]
    pub block_number: Option<i32>,
}

/// Transaction as exposed over the wire
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: String,
    pub offer_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    #[schema(value_type = String)]
    pub energy_amount: Decimal,
    #[schema(value_type = String)]
    pub total_price: Decimal,
    pub transaction_hash: Option<String>,
    pub block_number: Option<i32>,
    #[schema(value_type = String)]
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl From<energy_transaction::Model> for TransactionView {
    fn from(model: energy_transaction::Model) -> Self {
        Self {
            id: model.id,
            offer_id: model.offer_id,
            buyer_id: model.buyer_id,
            seller_id: model.seller_id,
            energy_amount: model.energy_amount,
            total_price: model.total_price,
            transaction_hash: model.transaction_hash,
            block_number: model.block_number,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub transaction: TransactionView,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionView>,
}

/// List transactions, optionally filtered to one user's trades
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "transactions",
    params(TransactionsQuery),
    responses(
        (status = 200, description = "Transactions, newest first", body = TransactionsResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transactions(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<TransactionsQuery>>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let transactions = state
        .storage
        .get_transactions(query.user_id.as_deref(), query.limit)
        .await?;
    Ok(Json(TransactionsResponse {
        transactions: transactions
            .into_iter()
            .map(TransactionView::from)
            .collect(),
    }))
}

/// Record a purchase against an offer
///
/// Deliberately does not deactivate the offer or adjust its remaining
/// energy; offer lifecycle is driven separately through the status route.
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = TransactionResponse),
        (status = 400, description = "Invalid transaction data", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let new_transaction = NewEnergyTransaction {
        offer_id: request.offer_id,
        buyer_id: request.buyer_id,
        seller_id: request.seller_id,
        energy_amount: request.energy_amount,
        total_price: request.total_price,
        transaction_hash: request.transaction_hash,
        block_number: request.block_number,
    };

    let transaction = state
        .storage
        .create_transaction(new_transaction)
        .await
        .map_err(ApiError::bad_reference)?;

    info!(
        transaction_id = %transaction.id,
        offer_id = %transaction.offer_id,
        "transaction recorded"
    );
    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            transaction: transaction.into(),
        }),
    ))
}

/// Update a transaction's status and optionally its chain reference
#[utoipa::path(
    patch,
    path = "/api/transactions/{id}/status",
    tag = "transactions",
    params(("id" = String, Path, description = "Transaction ID")),
    request_body = UpdateTransactionStatusRequest,
    responses(
        (status = 200, description = "Transaction updated", body = TransactionResponse),
        (status = 404, description = "Transaction not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_transaction_status(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdateTransactionStatusRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction = state
        .storage
        .update_transaction_status(
            &id,
            request.status,
            request.transaction_hash,
            request.block_number,
        )
        .await?;

    info!(transaction_id = %transaction.id, "transaction status updated");
    Ok(Json(TransactionResponse {
        transaction: transaction.into(),
    }))
}
