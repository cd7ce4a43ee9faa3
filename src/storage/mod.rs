mod codec;
mod repository;

pub use codec::*;
pub use repository::*;

/// SQL migration for the key/value table
pub const MIGRATION_001_KEY_VALUE: &str = include_str!("migrations/001_key_value.sql");
