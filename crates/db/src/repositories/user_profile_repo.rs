//! Repository for the user profile mirror (`user:<id>` keys).

use agrinit_core::user::UserProfile;

use crate::keys::user_key;
use crate::kv::{KvError, KvStore};

/// Typed access to user profile mirrors.
pub struct UserProfileRepo;

impl UserProfileRepo {
    pub async fn find_by_id(store: &dyn KvStore, id: &str) -> Result<Option<UserProfile>, KvError> {
        let key = user_key(id);
        match store.get(&key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| KvError::Serialization {
                    key,
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Insert or overwrite a profile under its id-derived key.
    pub async fn save(store: &dyn KvStore, profile: &UserProfile) -> Result<(), KvError> {
        let key = user_key(&profile.id);
        let value = serde_json::to_value(profile).map_err(|e| KvError::Serialization {
            key: key.clone(),
            message: e.to_string(),
        })?;
        store.set(&key, value).await
    }
}
