use axum::{extract::State, http::StatusCode, response::Json};
use axum_valid::Valid;
use model::entities::user::{self, UserType};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::ApiError;
use crate::password::{hash_password, issue_token, verify_password};
use crate::schemas::AppState;
use crate::storage::NewUser;

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    /// Raw password; stored only as a salted digest
    #[validate(length(min = 1))]
    pub password: String,
    /// Optional wallet address to attach right away
    #[serde(default)]
    pub wallet_address: Option<String>,
    /// "prosumer" or "consumer"; defaults to consumer
    #[serde(default)]
    #[schema(value_type = String)]
    pub user_type: UserType,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// User as exposed over the wire. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    #[schema(value_type = String)]
    pub user_type: UserType,
    pub wallet_address: Option<String>,
}

impl From<user::Model> for UserView {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            user_type: model.user_type,
            wallet_address: model.wallet_address,
        }
    }
}

/// Response for register and login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserView,
    /// Opaque bearer token; authentication state is client-held
    pub token: String,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid registration data or username taken", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let new_user = NewUser {
        username: request.username,
        password_hash: hash_password(&request.password),
        wallet_address: request.wallet_address,
        user_type: request.user_type,
    };

    let created = state.storage.create_user(new_user).await?;
    info!(user_id = %created.id, username = %created.username, "user registered");

    let response = AuthResponse {
        user: created.into(),
        token: issue_token(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Authenticate with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<LoginRequest>>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = state
        .storage
        .get_user_by_username(&request.username)
        .await?;

    // One rejection path for unknown user and bad password
    let user = match user {
        Some(user) if verify_password(&request.password, &user.password_hash) => user,
        _ => {
            warn!(username = %request.username, "rejected login attempt");
            return Err(ApiError::Unauthorized("invalid credentials".to_string()));
        }
    };

    info!(user_id = %user.id, "user logged in");
    let response = AuthResponse {
        user: user.into(),
        token: issue_token(),
    };
    Ok(Json(response))
}
