pub mod auth;
pub mod health;
pub mod initiative;
pub mod statistics;

use axum::Router;

use crate::state::AppState;

/// Build the route tree mounted under the configured prefix.
///
/// Route hierarchy:
///
/// ```text
/// /health                      service health (public)
///
/// /signup                      create account (anon key when configured)
/// /login                       exchange credentials for a token (public)
///
/// /initiatives                 list (public), create (requires auth)
/// /initiatives/{id}            get (public), update, delete (requires auth)
///
/// /statistics                  dashboard aggregates (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .nest("/initiatives", initiative::router())
        .merge(statistics::router())
}
