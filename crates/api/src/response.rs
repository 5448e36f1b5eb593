//! Shared response envelope types for API handlers.
//!
//! Every payload is wrapped in a named key (`initiatives`, `initiative`,
//! `stats`, ...) that the browser client reads directly. Use these types
//! instead of ad-hoc `serde_json::json!` bodies.

use agrinit_core::initiative::Initiative;
use agrinit_core::statistics::Stats;
use agrinit_core::types::RecordId;
use serde::Serialize;

pub const INITIATIVE_CREATED: &str = "Initiative created successfully";
pub const INITIATIVE_UPDATED: &str = "Initiative updated successfully";
pub const INITIATIVE_DELETED: &str = "Initiative deleted successfully";
pub const USER_CREATED: &str = "User created successfully";

/// `{ "initiatives": [...] }`
#[derive(Debug, Serialize)]
pub struct InitiativeListResponse {
    pub initiatives: Vec<Initiative>,
}

/// `{ "initiative": {...} }`
#[derive(Debug, Serialize)]
pub struct InitiativeResponse {
    pub initiative: Initiative,
}

/// `{ "message": "...", "initiative": {...} }` for create and update.
#[derive(Debug, Serialize)]
pub struct InitiativeMutationResponse {
    pub message: &'static str,
    pub initiative: Initiative,
}

/// `{ "message": "..." }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `{ "stats": {...} }`
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: Stats,
}

/// Public user info returned by sign-up.
#[derive(Debug, Serialize)]
pub struct SignupUser {
    pub id: RecordId,
    pub email: String,
    pub name: String,
}

/// `{ "message": "...", "user": { id, email, name } }`
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user: SignupUser,
}
