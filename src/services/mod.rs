//! Collaborator boundary of the duel engine: the traits the engine consumes,
//! in-memory implementations of each, and a TTL cache for catalog reads.
//! Postgres equivalents live in `crate::database`.

pub mod cache;
pub mod catalog;
pub mod catalog_cache;
pub mod directory;
pub mod memory;
pub mod social;
pub mod store;
