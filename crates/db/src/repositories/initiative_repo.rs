//! Repository for initiative records (`initiative:<id>` keys).

use agrinit_core::initiative::Initiative;
use serde_json::Value;

use crate::keys::{initiative_key, INITIATIVE_PREFIX};
use crate::kv::{KvError, KvStore};

/// Typed access to initiatives in the key-value store.
pub struct InitiativeRepo;

impl InitiativeRepo {
    /// Find an initiative by id.
    ///
    /// A stored value that does not decode as an initiative is an error.
    pub async fn find_by_id(store: &dyn KvStore, id: &str) -> Result<Option<Initiative>, KvError> {
        let key = initiative_key(id);
        store
            .get(&key)
            .await?
            .map(|value| decode(&key, value))
            .transpose()
    }

    /// Every stored initiative value, undecoded. Used by the statistics fold,
    /// which tolerates partially shaped records.
    pub async fn list_raw(store: &dyn KvStore) -> Result<Vec<Value>, KvError> {
        store.get_by_prefix(INITIATIVE_PREFIX).await
    }

    /// Every stored initiative in storage order.
    ///
    /// Values that do not decode are skipped with a warning so that one bad
    /// record does not hide the rest.
    pub async fn list(store: &dyn KvStore) -> Result<Vec<Initiative>, KvError> {
        let values = Self::list_raw(store).await?;
        let total = values.len();
        let initiatives: Vec<Initiative> = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Initiative>(value) {
                Ok(initiative) => Some(initiative),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed initiative record");
                    None
                }
            })
            .collect();
        if initiatives.len() < total {
            tracing::warn!(
                skipped = total - initiatives.len(),
                total,
                "Some initiative records could not be decoded"
            );
        }
        Ok(initiatives)
    }

    /// Insert or overwrite an initiative under its id-derived key.
    pub async fn save(store: &dyn KvStore, initiative: &Initiative) -> Result<(), KvError> {
        let key = initiative_key(&initiative.id);
        let value = serde_json::to_value(initiative).map_err(|e| KvError::Serialization {
            key: key.clone(),
            message: e.to_string(),
        })?;
        store.set(&key, value).await
    }

    /// Hard-delete an initiative. Returns `true` if a record was removed,
    /// `false` if none existed.
    pub async fn delete(store: &dyn KvStore, id: &str) -> Result<bool, KvError> {
        let key = initiative_key(id);
        if store.get(&key).await?.is_none() {
            return Ok(false);
        }
        store.delete(&key).await?;
        Ok(true)
    }
}

fn decode(key: &str, value: Value) -> Result<Initiative, KvError> {
    serde_json::from_value(value).map_err(|e| KvError::Serialization {
        key: key.to_string(),
        message: e.to_string(),
    })
}
