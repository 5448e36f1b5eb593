//! Handlers for sign-up and login.
//!
//! Credentials are never stored here: both handlers delegate to the
//! configured [`AuthProvider`](crate::auth::AuthProvider). Sign-up also
//! writes a display-only profile mirror under `user:<id>`.

use agrinit_core::user::{LoginRequest, SignupRequest, UserProfile, ROLE_USER};
use agrinit_db::repositories::UserProfileRepo;
use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::auth::Session;
use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AnonKey;
use crate::response::{SignupResponse, SignupUser, USER_CREATED};
use crate::state::AppState;

/// POST /signup
///
/// Create a confirmed account with the provider, then mirror the profile.
pub async fn signup(
    State(state): State<AppState>,
    _anon: AnonKey,
    ApiJson(input): ApiJson<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    input.validate_input()?;

    let name = input.name.trim().to_string();
    let record = state
        .auth
        .create_user(input.email.trim(), &input.password, &name)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Sign-up refused by auth provider"))?;

    let profile = UserProfile {
        id: record.id.clone(),
        email: record.email.clone(),
        name: name.clone(),
        role: ROLE_USER.to_string(),
        created_at: Utc::now(),
    };
    UserProfileRepo::save(state.store.as_ref(), &profile)
        .await
        .inspect_err(|e| {
            tracing::error!(user_id = %record.id, error = %e, "Failed to write profile mirror")
        })?;

    tracing::info!(user_id = %record.id, "User signed up");

    Ok(Json(SignupResponse {
        message: USER_CREATED,
        user: SignupUser {
            id: record.id,
            email: record.email,
            name,
        },
    }))
}

/// POST /login
///
/// Exchange e-mail and password for an access token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<Json<Session>> {
    input.validate_input()?;

    let session = state
        .auth
        .sign_in(input.email.trim(), &input.password)
        .await?;

    tracing::info!(user_id = %session.user.id, "User logged in");
    Ok(Json(session))
}
