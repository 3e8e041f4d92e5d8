use axum::{
    extract::{Path, State},
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::energy_generation;
use model::entities::energy_offer::EnergyType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::ApiError;
use crate::schemas::AppState;
use crate::storage::GenerationUpdate;

/// Request body for upserting a user's generation snapshot
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertGenerationRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[schema(value_type = String)]
    pub current_output: Decimal,
    #[schema(value_type = String)]
    pub daily_generation: Decimal,
    #[schema(value_type = String)]
    pub available_to_sell: Decimal,
    #[schema(value_type = String)]
    pub energy_type: EnergyType,
}

/// Generation snapshot as exposed over the wire
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationView {
    pub id: String,
    pub user_id: String,
    #[schema(value_type = String)]
    pub current_output: Decimal,
    #[schema(value_type = String)]
    pub daily_generation: Decimal,
    #[schema(value_type = String)]
    pub available_to_sell: Decimal,
    #[schema(value_type = String)]
    pub energy_type: EnergyType,
    pub last_updated: DateTime<Utc>,
}

impl From<energy_generation::Model> for GenerationView {
    fn from(model: energy_generation::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            current_output: model.current_output,
            daily_generation: model.daily_generation,
            available_to_sell: model.available_to_sell,
            energy_type: model.energy_type,
            last_updated: model.last_updated,
        }
    }
}

/// The generation field is null for users without a snapshot yet.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerationResponse {
    pub generation: Option<GenerationView>,
}

/// Fetch a user's generation snapshot
#[utoipa::path(
    get,
    path = "/api/energy/generation/{user_id}",
    tag = "generation",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Snapshot, or null if none exists", body = GenerationResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_generation(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<GenerationResponse>, ApiError> {
    let generation = state.storage.get_energy_generation(&user_id).await?;
    Ok(Json(GenerationResponse {
        generation: generation.map(GenerationView::from),
    }))
}

/// Insert or merge-update a user's generation snapshot
#[utoipa::path(
    post,
    path = "/api/energy/generation",
    tag = "generation",
    request_body = UpsertGenerationRequest,
    responses(
        (status = 200, description = "Snapshot upserted", body = GenerationResponse),
        (status = 400, description = "Invalid generation data", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn upsert_generation(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpsertGenerationRequest>>,
) -> Result<Json<GenerationResponse>, ApiError> {
    let update = GenerationUpdate {
        current_output: request.current_output,
        daily_generation: request.daily_generation,
        available_to_sell: request.available_to_sell,
        energy_type: request.energy_type,
    };

    let generation = state
        .storage
        .update_energy_generation(&request.user_id, update)
        .await
        .map_err(ApiError::bad_reference)?;

    info!(user_id = %generation.user_id, "generation snapshot upserted");
    Ok(Json(GenerationResponse {
        generation: Some(generation.into()),
    }))
}
