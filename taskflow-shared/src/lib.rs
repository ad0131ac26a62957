//! # TaskFlow Shared Library
//!
//! This crate contains the records, validation schemas and persistence layer
//! used by the TaskFlow API server and the legacy migration tool.
//!
//! ## Module Organization
//!
//! - `models`: user and task records, creation payloads, listing filters
//! - `normalize`: repair pass for legacy JSON records
//! - `store`: storage capability trait and its SQL and JSON backends
//! - `db`: SQLite connection pool and schema bootstrap

pub mod db;
pub mod models;
pub mod normalize;
pub mod store;

/// Current version of the TaskFlow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
