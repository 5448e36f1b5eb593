//! Identity provider port and adapters.
//!
//! - [`AuthProvider`] -- the port: create users, sign in, resolve a bearer token.
//! - [`supabase`] -- hosted Supabase Auth over HTTP.
//! - [`local`] -- in-process accounts for development and tests.
//! - [`jwt`] -- HS256 access tokens issued by the local provider.
//! - [`password`] -- Argon2id hashing used by the local provider.

use async_trait::async_trait;
use serde::Serialize;

use agrinit_core::types::RecordId;
use agrinit_core::user::CallerIdentity;

pub mod jwt;
pub mod local;
pub mod password;
pub mod supabase;

/// Errors surfaced by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The bearer token is unknown, expired, or malformed.
    #[error("invalid or expired token")]
    InvalidToken,

    /// E-mail and password do not match an account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The provider refused the request (e.g. e-mail already registered).
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached or failed internally.
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

/// A user as returned by the provider after sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUserRecord {
    pub id: RecordId,
    pub email: String,
}

/// Public user info embedded in [`Session`].
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: RecordId,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Result of a successful sign-in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionUser,
}

/// An external identity provider.
///
/// Implementations are constructed once at startup and shared through
/// `AppState`. Every call goes to the provider; nothing is cached here.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register a confirmed user with a display name.
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthUserRecord, AuthError>;

    /// Exchange e-mail and password for an access token.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Resolve a bearer token to the user it was issued for.
    async fn get_user(&self, access_token: &str) -> Result<CallerIdentity, AuthError>;
}
