use axum::routing::get;
use axum::Router;

use crate::handlers::statistics;
use crate::state::AppState;

/// ```text
/// GET    /statistics    -> get_statistics
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/statistics", get(statistics::get_statistics))
}
