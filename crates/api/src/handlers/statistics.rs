use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::response::StatsResponse;
use crate::services::StatisticsService;
use crate::state::AppState;

/// GET /statistics
pub async fn get_statistics(State(state): State<AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = StatisticsService::compute(state.store.as_ref()).await?;
    Ok(Json(StatsResponse { stats }))
}
