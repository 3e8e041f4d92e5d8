use axum::{extract::State, http::HeaderMap, response::Json};
use axum_valid::Valid;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use super::auth::UserView;
use crate::error::ApiError;
use crate::schemas::AppState;

/// Request body for attaching a wallet address
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConnectWalletRequest {
    #[validate(length(min = 1))]
    pub wallet_address: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub user: UserView,
}

/// Attach a wallet address to the calling user
///
/// The caller identifies itself through the `user-id` header; there is no
/// token verification gating this route.
#[utoipa::path(
    post,
    path = "/api/wallet/connect",
    tag = "wallet",
    request_body = ConnectWalletRequest,
    responses(
        (status = 200, description = "Wallet attached", body = WalletResponse),
        (status = 400, description = "Address already connected elsewhere", body = crate::schemas::ErrorResponse),
        (status = 401, description = "Missing user-id header", body = crate::schemas::ErrorResponse),
        (status = 404, description = "User not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, headers, request))]
pub async fn connect_wallet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Valid(Json(request)): Valid<Json<ConnectWalletRequest>>,
) -> Result<Json<WalletResponse>, ApiError> {
    let user_id = headers
        .get("user-id")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("user-id header required".to_string()))?;

    let user = state
        .storage
        .update_user_wallet(user_id, &request.wallet_address)
        .await?;

    info!(user_id = %user.id, "wallet connected");
    Ok(Json(WalletResponse { user: user.into() }))
}
