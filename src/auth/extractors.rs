use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::{dto::Validate, repo_types::User};
use crate::{
    error::{ApiError, FieldError},
    state::AppState,
};

/// Resolves the bearer token to the stored user it was issued for.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            warn!("missing or malformed Authorization header");
            ApiError::Unauthorized
        })?;

        let email = state.keys.verify(token).map_err(|e| {
            warn!(reason = %e, "token rejected");
            ApiError::from(e)
        })?;

        // The subject may no longer exist; that is reported the same as a bad token.
        let user = state.users.find_by_email(&email).await?.ok_or_else(|| {
            warn!(email = %email, "token subject not found");
            ApiError::Unauthorized
        })?;

        Ok(AuthUser(user))
    }
}

// Expect "Bearer <token>", scheme case-insensitive.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let auth = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = auth.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// JSON body that has been deserialized and then run through [`Validate`].
pub struct Validated<T: Validate>(pub T::Valid);

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned + Send,
    T::Valid: Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state).await.map_err(|rej| {
            warn!(error = %rej.body_text(), "rejected request body");
            ApiError::Validation(vec![FieldError::new("body", rej.body_text())])
        })?;

        body.validate().map(Validated).map_err(|errors| {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            warn!(?fields, "invalid request fields");
            ApiError::Validation(errors)
        })
    }
}
