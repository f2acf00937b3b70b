use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest, TokenResponse},
        extractors::{AuthUser, Validated},
        jwt::JwtKeys,
        services::{authenticate, register_user},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(profile))
}

#[instrument(skip(state, reg))]
pub async fn register(
    State(state): State<AppState>,
    Validated(reg): Validated<RegisterRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let email = reg.email.clone();
    let user = register_user(state.users.as_ref(), reg)
        .await
        .inspect_err(|e| {
            if matches!(e, ApiError::AlreadyExists) {
                warn!(email = %email, "email already registered");
            }
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(user.into()))
}

#[instrument(skip(state, keys, creds))]
pub async fn login(
    State(state): State<AppState>,
    State(keys): State<JwtKeys>,
    Validated(creds): Validated<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = authenticate(state.users.as_ref(), &creds.email, &creds.password)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let access_token = keys.issue_access(&user.email)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse::bearer(access_token)))
}

#[instrument(skip_all)]
pub async fn profile(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(user.into())
}
