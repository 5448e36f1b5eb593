//! Business operations shared by the HTTP handlers.
//!
//! Like the repositories, each service is a zero-sized struct whose methods
//! take `&dyn KvStore` as the first argument. Services own the lifecycle
//! rules (ids, timestamps, existence checks) and log every mutation.

pub mod initiative_service;
pub mod statistics_service;

pub use initiative_service::InitiativeService;
pub use statistics_service::StatisticsService;
