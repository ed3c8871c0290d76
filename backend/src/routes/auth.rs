//! Authentication routes
//!
//! Endpoints for user registration, login, and token refresh.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use weighin_shared::types::{AuthTokens, LoginRequest, RegisterRequest, UserProfile};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/me", axum::routing::get(get_profile))
}

/// Register a new user
///
/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::register(
        &state.db,
        state.jwt(),
        &req.email,
        &req.password,
        &req.nickname,
    )
    .await?;
    Ok(Json(tokens))
}

/// Login with email and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::login(&state.db, state.jwt(), &req.email, &req.password).await?;
    Ok(Json(tokens))
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Refresh access token
///
/// POST /api/v1/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = UserService::refresh_token(&state.db, state.jwt(), &req.refresh_token).await?;
    Ok(Json(tokens))
}

/// Get current user profile (requires authentication)
///
/// GET /api/v1/auth/me
async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::get_profile(&state.db, auth_user.user_id).await?;
    Ok(Json(profile))
}
