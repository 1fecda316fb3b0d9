//! This module acts as a central hub for all database-related logic.
//! It declares one specialized submodule per concern, mirroring the trait
//! split in `crate::services`, so queries can be reached via their full
//! path, e.g., `database::duels::get_duel`. All adapters share a `PgPool`.

use crate::error::ServiceError;

pub mod duels;
pub mod models;
pub mod roster;
pub mod social;
pub mod techniques;

/// Alias for the connection pool handed to every adapter.
pub type DbPool = sqlx::PgPool;

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Backend(e.to_string())
    }
}
