//! dbd-db - Query executor layer for dbdeploy
//!
//! This crate provides the `QueryExecutor` trait, a thin transport that runs
//! SQL text against a live connection, and its DuckDB implementation. It
//! owns no migration semantics.

pub mod connect;
pub mod duckdb;
pub mod error;
pub mod traits;

pub use connect::connect;
pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{QueryExecutor, Row};
