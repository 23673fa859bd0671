//! In-memory record store, index helpers and read-time joins.

/// Foreign-key index helpers.
pub mod indices;
/// Book and author composition for read paths.
pub mod join;
/// Authoritative record store.
pub mod store;
