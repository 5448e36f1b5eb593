pub mod auth;
pub mod initiative;
pub mod statistics;
