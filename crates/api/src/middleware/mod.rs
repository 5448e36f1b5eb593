//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from a Bearer token via the auth provider.
//! - [`auth::AnonKey`] -- Checks the public anon key on sign-up when one is configured.

pub mod auth;
