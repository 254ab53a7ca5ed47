//! dbd-sql - SQL dialect layer for dbdeploy
//!
//! This crate provides the per-DBMS syntax needed to manage the changelog
//! table, classification of "table not found" errors, and a statement
//! splitter that respects quoting and comments.

pub mod classify;
pub mod dialect;
pub mod error;
pub mod splitter;

pub use classify::{classify_error, ErrorClass};
pub use dialect::{
    create_syntax, DbmsSyntax, DuckDbSyntax, MsSqlSyntax, MySqlSyntax, PostgresSyntax,
    NotFoundPattern, CHANGELOG_COLUMNS, SUPPORTED_DBMS,
};
pub use error::{SqlError, SqlResult};
pub use splitter::{LexicalRules, StatementSplitter};
