//! Bearer-token authentication extractors for Axum handlers.

use agrinit_core::error::CoreError;
use agrinit_core::user::CallerIdentity;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::auth::{AuthError, AuthProvider};
use crate::error::{AppError, INVALID_TOKEN_MESSAGE, NO_TOKEN_MESSAGE};
use crate::state::AppState;

/// The token after `Bearer ` in the `Authorization` header.
///
/// A missing header, another scheme, or an empty token all yield `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve a bearer token to the calling user.
///
/// Every call goes to the provider. A missing or refused token is
/// `Unauthorized`; a provider outage stays an upstream failure.
pub async fn authenticate(
    provider: &dyn AuthProvider,
    token: Option<&str>,
) -> Result<CallerIdentity, AppError> {
    let token =
        token.ok_or_else(|| AppError::Core(CoreError::Unauthorized(NO_TOKEN_MESSAGE.into())))?;

    match provider.get_user(token).await {
        Ok(caller) => Ok(caller),
        Err(AuthError::Unavailable(msg)) => Err(AppError::Auth(AuthError::Unavailable(msg))),
        Err(err) => {
            tracing::debug!(error = %err, "Bearer token rejected");
            Err(AppError::Core(CoreError::Unauthorized(
                INVALID_TOKEN_MESSAGE.into(),
            )))
        }
    }
}

/// Authenticated caller extracted from a Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that mutates data.
/// It runs before the body is read, so a rejected request never reaches
/// the store:
///
/// ```ignore
/// async fn my_handler(AuthUser(caller): AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %caller.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub CallerIdentity);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = authenticate(state.auth.as_ref(), bearer_token(&parts.headers)).await?;
        Ok(AuthUser(caller))
    }
}

/// Gate for `POST /signup`.
///
/// When `PUBLIC_ANON_KEY` is configured the bearer token must equal it;
/// otherwise the extractor always succeeds.
#[derive(Debug, Clone, Copy)]
pub struct AnonKey;

impl FromRequestParts<AppState> for AnonKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.public_anon_key.as_deref() else {
            return Ok(AnonKey);
        };

        match bearer_token(&parts.headers) {
            Some(token) if token == expected => Ok(AnonKey),
            Some(_) => Err(AppError::Core(CoreError::Unauthorized(
                INVALID_TOKEN_MESSAGE.into(),
            ))),
            None => Err(AppError::Core(CoreError::Unauthorized(
                NO_TOKEN_MESSAGE.into(),
            ))),
        }
    }
}
