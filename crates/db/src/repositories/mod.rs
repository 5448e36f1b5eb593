//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&dyn KvStore` as the first argument and translate between typed
//! records and stored JSON values.

pub mod initiative_repo;
pub mod user_profile_repo;

pub use initiative_repo::InitiativeRepo;
pub use user_profile_repo::UserProfileRepo;
