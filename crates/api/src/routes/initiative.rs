//! Route definitions for the `/initiatives` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::initiative;
use crate::state::AppState;

/// Routes mounted at `/initiatives`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(initiative::list).post(initiative::create))
        .route(
            "/{id}",
            get(initiative::get_by_id)
                .put(initiative::update)
                .delete(initiative::delete),
        )
}
