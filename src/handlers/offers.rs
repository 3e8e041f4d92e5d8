use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{DateTime, Utc};
use model::entities::energy_offer::{self, EnergyType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::error::ApiError;
use crate::schemas::AppState;
use crate::storage::NewEnergyOffer;

/// Query parameters for the offer listing
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct OffersQuery {
    /// Maximum number of offers to return (default 50)
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<u64>,
}

/// Request body for creating an offer
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferRequest {
    pub seller_id: String,
    /// Energy on offer in kWh, as a decimal string
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String)]
    pub energy_amount: Decimal,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String)]
    pub price_per_kwh: Decimal,
    #[schema(value_type = String)]
    pub energy_type: EnergyType,
    #[serde(default)]
    pub location: Option<String>,
    /// Accepted for wire compatibility and ignored: new offers are always
    /// created active.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Request body for toggling an offer's active flag
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferStatusRequest {
    pub is_active: bool,
}

/// Offer as exposed over the wire
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferView {
    pub id: String,
    pub seller_id: String,
    #[schema(value_type = String)]
    pub energy_amount: Decimal,
    #[schema(value_type = String)]
    pub price_per_kwh: Decimal,
    #[schema(value_type = String)]
    pub energy_type: EnergyType,
    pub location: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<energy_offer::Model> for OfferView {
    fn from(model: energy_offer::Model) -> Self {
        Self {
            id: model.id,
            seller_id: model.seller_id,
            energy_amount: model.energy_amount,
            price_per_kwh: model.price_per_kwh,
            energy_type: model.energy_type,
            location: model.location,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OfferResponse {
    pub offer: OfferView,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OffersResponse {
    pub offers: Vec<OfferView>,
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

/// List active offers, newest first
#[utoipa::path(
    get,
    path = "/api/energy/offers",
    tag = "offers",
    params(OffersQuery),
    responses(
        (status = 200, description = "Active offers", body = OffersResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_offers(
    State(state): State<AppState>,
    Valid(Query(query)): Valid<Query<OffersQuery>>,
) -> Result<Json<OffersResponse>, ApiError> {
    let offers = state.storage.get_energy_offers(query.limit).await?;
    Ok(Json(OffersResponse {
        offers: offers.into_iter().map(OfferView::from).collect(),
    }))
}

/// Fetch one offer by id, active or not
#[utoipa::path(
    get,
    path = "/api/energy/offers/{id}",
    tag = "offers",
    params(("id" = String, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Offer", body = OfferResponse),
        (status = 404, description = "Offer not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_offer(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<OfferResponse>, ApiError> {
    let offer = state
        .storage
        .get_energy_offer(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("offer not found".to_string()))?;
    Ok(Json(OfferResponse {
        offer: offer.into(),
    }))
}

/// List all of a seller's offers, including withdrawn ones
#[utoipa::path(
    get,
    path = "/api/energy/offers/seller/{seller_id}",
    tag = "offers",
    params(("seller_id" = String, Path, description = "Seller's user ID")),
    responses(
        (status = 200, description = "Seller's offers", body = OffersResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_seller_offers(
    Path(seller_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<OffersResponse>, ApiError> {
    let offers = state.storage.get_offers_by_seller(&seller_id).await?;
    Ok(Json(OffersResponse {
        offers: offers.into_iter().map(OfferView::from).collect(),
    }))
}

/// Create a new offer; always created active
#[utoipa::path(
    post,
    path = "/api/energy/offers",
    tag = "offers",
    request_body = CreateOfferRequest,
    responses(
        (status = 201, description = "Offer created", body = OfferResponse),
        (status = 400, description = "Invalid offer data", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_offer(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateOfferRequest>>,
) -> Result<(StatusCode, Json<OfferResponse>), ApiError> {
    let new_offer = NewEnergyOffer {
        seller_id: request.seller_id,
        energy_amount: request.energy_amount,
        price_per_kwh: request.price_per_kwh,
        energy_type: request.energy_type,
        location: request.location,
    };

    let offer = state
        .storage
        .create_energy_offer(new_offer)
        .await
        .map_err(ApiError::bad_reference)?;

    info!(offer_id = %offer.id, seller_id = %offer.seller_id, "offer created");
    Ok((
        StatusCode::CREATED,
        Json(OfferResponse {
            offer: offer.into(),
        }),
    ))
}

/// Toggle an offer's active flag
#[utoipa::path(
    patch,
    path = "/api/energy/offers/{id}/status",
    tag = "offers",
    params(("id" = String, Path, description = "Offer ID")),
    request_body = UpdateOfferStatusRequest,
    responses(
        (status = 200, description = "Offer updated", body = OfferResponse),
        (status = 404, description = "Offer not found", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_offer_status(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdateOfferStatusRequest>,
) -> Result<Json<OfferResponse>, ApiError> {
    let offer = state
        .storage
        .update_offer_status(&id, request.is_active)
        .await?;

    info!(offer_id = %offer.id, is_active = offer.is_active, "offer status updated");
    Ok(Json(OfferResponse {
        offer: offer.into(),
    }))
}
