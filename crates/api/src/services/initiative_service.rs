use agrinit_core::error::CoreError;
use agrinit_core::initiative::{
    sort_newest_first, CreateInitiative, Initiative, UpdateInitiative, ENTITY,
};
use agrinit_core::types::new_record_id;
use agrinit_core::user::CallerIdentity;
use agrinit_db::kv::KvStore;
use agrinit_db::repositories::InitiativeRepo;
use chrono::Utc;

use crate::error::{AppError, AppResult};

/// CRUD over initiatives.
///
/// Any authenticated caller may edit or delete any initiative; the caller is
/// recorded as `createdBy` on create and logged on every mutation.
pub struct InitiativeService;

fn not_found(id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: ENTITY,
        id: id.to_string(),
    })
}

impl InitiativeService {
    /// Every initiative, newest first.
    pub async fn list(store: &dyn KvStore) -> AppResult<Vec<Initiative>> {
        let mut initiatives = InitiativeRepo::list(store).await?;
        sort_newest_first(&mut initiatives);
        Ok(initiatives)
    }

    pub async fn get(store: &dyn KvStore, id: &str) -> AppResult<Initiative> {
        InitiativeRepo::find_by_id(store, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Validate, stamp and persist a new initiative.
    pub async fn create(
        store: &dyn KvStore,
        input: CreateInitiative,
        caller: &CallerIdentity,
    ) -> AppResult<Initiative> {
        let initiative = input.into_initiative(new_record_id(), caller.user_id.clone(), Utc::now())?;
        InitiativeRepo::save(store, &initiative).await?;

        tracing::info!(
            initiative_id = %initiative.id,
            user_id = %caller.user_id,
            "Initiative created"
        );
        Ok(initiative)
    }

    /// Merge the present fields of `input` over the stored record.
    pub async fn update(
        store: &dyn KvStore,
        id: &str,
        input: UpdateInitiative,
        caller: &CallerIdentity,
    ) -> AppResult<Initiative> {
        let existing = Self::get(store, id).await?;
        let updated = existing.apply_update(input, Utc::now())?;
        InitiativeRepo::save(store, &updated).await?;

        tracing::info!(initiative_id = %id, user_id = %caller.user_id, "Initiative updated");
        Ok(updated)
    }

    /// Hard-delete an initiative. Deleting twice is `NotFound` the second time.
    pub async fn delete(store: &dyn KvStore, id: &str, caller: &CallerIdentity) -> AppResult<()> {
        if !InitiativeRepo::delete(store, id).await? {
            return Err(not_found(id));
        }

        tracing::info!(initiative_id = %id, user_id = %caller.user_id, "Initiative deleted");
        Ok(())
    }
}
