//! Account registration, login, and profile endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::models::User;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::services::AuthService;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Routes requiring authentication, mounted behind the auth middleware.
pub fn me_router() -> Router<AppState> {
    Router::new().route("/api/auth/me", get(me))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    email: String,

    #[validate(length(min = 3, max = 50, message = "must be 3-50 characters"))]
    username: String,

    #[validate(length(min = 8, max = 128, message = "must be 8-128 characters"))]
    password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    email: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
    token_type: &'static str,
    user: User,
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    payload.validate()?;

    let service = AuthService::new(state.pool.clone(), &state.config.jwt);
    let (user, access_token) = service
        .register(&payload.email, &payload.username, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            access_token,
            token_type: "Bearer",
            user,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.validate()?;

    let service = AuthService::new(state.pool.clone(), &state.config.jwt);
    let (user, access_token) = service.login(&payload.email, &payload.password).await?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        user,
    }))
}

async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<User>, ApiError> {
    let service = AuthService::new(state.pool.clone(), &state.config.jwt);
    let user = service.current_user(current_user.user_id).await?;
    Ok(Json(user))
}
