//! Live executor construction by dbms name

use crate::duckdb::DuckDbBackend;
use crate::error::{DbError, DbResult};
use crate::traits::QueryExecutor;

/// Engines reachable only through rendered scripts and an external tool.
const TOOL_ONLY: [&str; 3] = ["mssql", "postgres", "mysql"];

/// Open a live executor for a canonical dbms name.
///
/// Only DuckDB is linked in-process; the other engines are served by the
/// template applier plus an external SQL tool.
pub fn connect(dbms: &str, connection: &str) -> DbResult<Box<dyn QueryExecutor>> {
    match dbms {
        "duckdb" => Ok(Box::new(DuckDbBackend::new(connection)?)),
        other if TOOL_ONLY.contains(&other) => Err(DbError::NotImplemented {
            backend: other.to_string(),
            feature: "direct connection (render a script and run it with an external tool)"
                .to_string(),
        }),
        other => Err(DbError::ConnectionError(format!(
            "no executor for dbms '{other}'"
        ))),
    }
}
