//! Values exposed to apply templates

use serde::Serialize;

/// Everything an apply template can reference.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyContext {
    /// Canonical dbms name
    pub dbms: String,

    /// Qualified, quoted changelog table
    pub changelog_table: String,

    /// Text placed after every statement (delimiter in its configured style)
    pub separator: String,

    /// When the artifact was rendered
    pub generated_at: String,

    /// Changelog DDL, empty unless the table should be created
    pub create_changelog: Vec<String>,

    /// Pending scripts in application order
    pub scripts: Vec<RenderedScript>,
}

/// One pending script, split and ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedScript {
    /// Changelog key, `folder/number`
    pub key: String,

    /// Script folder
    pub folder: String,

    /// Script number
    pub number: u64,

    /// Script display name
    pub name: String,

    /// Statements in original order, without delimiters
    pub statements: Vec<String>,

    /// The same statements as dialect string literals, for dynamic SQL
    pub statement_literals: Vec<String>,

    /// Insert recording this script in the changelog
    pub changelog_insert: String,

    /// The changelog insert as a dialect string literal
    pub changelog_insert_literal: String,

    /// Query returning a row once this script is in the changelog
    pub applied_check: String,

    /// Dialect string literal naming the failed script
    pub failure_message: String,
}
