//! Domain types and pure logic for the initiatives service.
//!
//! Nothing in this crate performs I/O; persistence lives in `agrinit-db`
//! and the HTTP surface in `agrinit-api`.

pub mod amount;
pub mod category;
pub mod error;
pub mod initiative;
pub mod statistics;
pub mod types;
pub mod user;
