use agrinit_core::statistics::{compute_statistics, Stats};
use agrinit_db::kv::KvStore;
use agrinit_db::repositories::InitiativeRepo;

use crate::error::AppResult;

/// Dashboard aggregates, recomputed from a full scan on every call.
pub struct StatisticsService;

impl StatisticsService {
    pub async fn compute(store: &dyn KvStore) -> AppResult<Stats> {
        let values = InitiativeRepo::list_raw(store).await?;
        let stats = compute_statistics(&values);
        tracing::debug!(total = stats.total_initiatives, "Computed statistics");
        Ok(stats)
    }
}
