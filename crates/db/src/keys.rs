//! Key namespacing for the flat key-value store.
//!
//! Each record lives under exactly one key derived from its id. There are
//! no secondary indexes; listing is a prefix scan.

pub const INITIATIVE_PREFIX: &str = "initiative:";
pub const USER_PREFIX: &str = "user:";

/// Key of the initiative with the given id.
pub fn initiative_key(id: &str) -> String {
    format!("{INITIATIVE_PREFIX}{id}")
}

/// Key of the user profile mirror with the given id.
pub fn user_key(id: &str) -> String {
    format!("{USER_PREFIX}{id}")
}
