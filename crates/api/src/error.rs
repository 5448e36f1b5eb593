use agrinit_core::error::CoreError;
use agrinit_db::kv::KvError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::auth::AuthError;

/// Message returned when a protected route is called without a bearer token.
pub const NO_TOKEN_MESSAGE: &str = "Unauthorized - No token provided";
/// Message returned when the auth provider does not accept the bearer token.
pub const INVALID_TOKEN_MESSAGE: &str = "Unauthorized - Invalid token";

const UPSTREAM_MESSAGE: &str = "An upstream service failed, please try again later";
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`KvError`] for storage failures and
/// [`AuthError`] for identity provider failures, and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{ "error": message, "code": code }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `agrinit_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The key-value store failed.
    #[error(transparent)]
    Store(#[from] KvError),

    /// The identity provider refused or failed the request.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A request body axum refused before decoding (wrong content type,
    /// oversized body). Keeps axum's status.
    #[error("Rejected body ({status}): {message}")]
    BodyRejected { status: StatusCode, message: String },
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // axum reports type mismatches as 422; clients get 400 for any
            // body that is not a usable JSON document.
            r @ (JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_)) => {
                AppError::BadRequest(r.body_text())
            }
            other => AppError::BodyRejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            // --- Storage errors ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "Key-value store error");
                upstream_failure()
            }

            // --- Identity provider errors ---
            AppError::Auth(err) => match err {
                AuthError::InvalidToken => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    INVALID_TOKEN_MESSAGE.to_string(),
                ),
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Invalid email or password".to_string(),
                ),
                AuthError::Rejected(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
                AuthError::Unavailable(msg) => {
                    tracing::error!(error = %msg, "Auth provider unavailable");
                    upstream_failure()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::BodyRejected { status, message } => {
                (*status, rejection_code(*status), message.clone())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn upstream_failure() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "UPSTREAM_FAILURE",
        UPSTREAM_MESSAGE.to_string(),
    )
}

fn rejection_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        _ => "BAD_REQUEST",
    }
}
