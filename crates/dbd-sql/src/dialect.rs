//! Changelog syntax per DBMS
//!
//! Each dialect supplies the SQL fragments the engine needs to manage the
//! changelog table: identifier and literal quoting, the table DDL, and the
//! literal error texts that mean "table not found". The engine itself never
//! hard-codes dialect text.

use chrono::NaiveDateTime;
use dbd_core::{ChangeEntry, ChangeScript, TableName};

use crate::error::{SqlError, SqlResult};
use crate::splitter::LexicalRules;

/// Changelog columns in the order the engine reads and writes them.
pub const CHANGELOG_COLUMNS: [&str; 8] = [
    "Folder",
    "ScriptNumber",
    "StartDate",
    "CompleteDate",
    "AppliedBy",
    "ScriptName",
    "ScriptStatus",
    "ScriptOutput",
];

/// Literal fragments that must all appear in one error message
pub type NotFoundPattern = &'static [&'static str];

/// DBMS identifiers accepted by [`create_syntax`].
pub const SUPPORTED_DBMS: [&str; 4] = ["mssql", "postgres", "mysql", "duckdb"];

/// Trait for DBMS syntax implementations
pub trait DbmsSyntax: Send + Sync {
    /// Get the canonical dbms name
    fn name(&self) -> &'static str;

    /// Quote an identifier for this dialect
    fn quote_ident(&self, ident: &str) -> String;

    /// Quote a string literal for this dialect
    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    /// Render a timestamp literal
    fn timestamp_literal(&self, ts: &NaiveDateTime) -> String {
        format!("TIMESTAMP '{}'", ts.format("%Y-%m-%d %H:%M:%S%.3f"))
    }

    /// Expression for the current timestamp
    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    /// Expression for the connected principal
    fn current_user(&self) -> &'static str;

    /// Quoting and comment conventions the statement splitter must respect
    fn lexical_rules(&self) -> LexicalRules {
        LexicalRules::default()
    }

    /// Error-message patterns meaning "table not found".
    ///
    /// A message matches a pattern when it contains every fragment of it.
    fn table_not_found_messages(&self) -> &'static [NotFoundPattern];

    /// Statements that create the changelog table (and its schema) if absent
    fn create_changelog_table_sql(&self, table: &TableName) -> Vec<String>;

    /// Render `table` qualified and quoted
    fn qualify(&self, table: &TableName) -> String {
        match table.schema() {
            Some(schema) => format!(
                "{}.{}",
                self.quote_ident(schema),
                self.quote_ident(table.table())
            ),
            None => self.quote_ident(table.table()),
        }
    }

    /// Cheap query that fails when the changelog table is missing
    fn changelog_exists_sql(&self, table: &TableName) -> String {
        format!("SELECT COUNT(*) FROM {} WHERE 1 = 0", self.qualify(table))
    }

    /// Query listing applied changes ordered by folder then script number
    fn select_applied_changes_sql(&self, table: &TableName) -> String {
        let columns: Vec<String> = CHANGELOG_COLUMNS
            .iter()
            .map(|c| self.quote_ident(c))
            .collect();
        format!(
            "SELECT {} FROM {} ORDER BY {}, {}",
            columns.join(", "),
            self.qualify(table),
            self.quote_ident("Folder"),
            self.quote_ident("ScriptNumber")
        )
    }

    /// Query returning a row when `script` is already in the changelog
    fn applied_check_sql(&self, table: &TableName, script: &ChangeScript) -> String {
        format!(
            "SELECT 1 FROM {} WHERE {} = {} AND {} = {}",
            self.qualify(table),
            self.quote_ident("Folder"),
            self.quote_literal(&script.folder),
            self.quote_ident("ScriptNumber"),
            script.number
        )
    }

    /// Whether a rendered script can skip itself when already applied.
    ///
    /// Requires conditional execution in the client or the server; rendered
    /// artifacts for dialects without it rely on the changelog having been
    /// read before rendering.
    fn supports_guarded_scripts(&self) -> bool {
        true
    }

    /// Insert for an entry whose values are all known up front
    fn insert_change_entry_sql(&self, table: &TableName, entry: &ChangeEntry) -> String {
        let timestamp = |ts: &Option<NaiveDateTime>| match ts {
            Some(ts) => self.timestamp_literal(ts),
            None => "NULL".to_string(),
        };
        let values = [
            self.quote_literal(&entry.folder),
            entry.script_number.to_string(),
            timestamp(&entry.start_date),
            timestamp(&entry.complete_date),
            entry
                .applied_by
                .as_deref()
                .map(|a| self.quote_literal(a))
                .unwrap_or_else(|| "NULL".to_string()),
            self.quote_literal(&entry.script_name),
            entry.status.code().to_string(),
            self.quote_literal(&entry.output),
        ];
        insert_sql(self, table, &values)
    }

    /// Insert for a script rendered ahead of execution, stamped by the server
    fn insert_rendered_entry_sql(
        &self,
        table: &TableName,
        script: &ChangeScript,
        applied_by: Option<&str>,
    ) -> String {
        let values = [
            self.quote_literal(&script.folder),
            script.number.to_string(),
            self.current_timestamp().to_string(),
            self.current_timestamp().to_string(),
            applied_by
                .map(|a| self.quote_literal(a))
                .unwrap_or_else(|| self.current_user().to_string()),
            self.quote_literal(&script.name),
            dbd_core::ScriptStatus::Success.code().to_string(),
            self.quote_literal(""),
        ];
        insert_sql(self, table, &values)
    }
}

fn insert_sql<S: DbmsSyntax + ?Sized>(syntax: &S, table: &TableName, values: &[String]) -> String {
    let columns: Vec<String> = CHANGELOG_COLUMNS
        .iter()
        .map(|c| syntax.quote_ident(c))
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        syntax.qualify(table),
        columns.join(", "),
        values.join(", ")
    )
}

/// Create the syntax provider for a dbms identifier.
pub fn create_syntax(dbms: &str) -> SqlResult<Box<dyn DbmsSyntax>> {
    match dbms.trim().to_ascii_lowercase().as_str() {
        "mssql" | "sqlserver" => Ok(Box::new(MsSqlSyntax)),
        "postgres" | "postgresql" | "pgsql" => Ok(Box::new(PostgresSyntax)),
        "mysql" => Ok(Box::new(MySqlSyntax)),
        "duckdb" => Ok(Box::new(DuckDbSyntax)),
        _ => Err(SqlError::UnsupportedDialect {
            dbms: dbms.to_string(),
            supported: SUPPORTED_DBMS.join(", "),
        }),
    }
}

/// Microsoft SQL Server
pub struct MsSqlSyntax;

impl DbmsSyntax for MsSqlSyntax {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("[{}]", ident.replace(']', "]]"))
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("N'{}'", value.replace('\'', "''"))
    }

    fn timestamp_literal(&self, ts: &NaiveDateTime) -> String {
        format!("'{}'", ts.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }

    fn current_user(&self) -> &'static str {
        "user_name()"
    }

    fn lexical_rules(&self) -> LexicalRules {
        LexicalRules {
            bracket_identifiers: true,
            ..LexicalRules::ANSI
        }
    }

    fn table_not_found_messages(&self) -> &'static [NotFoundPattern] {
        &[&["Invalid object name"], &["No table found with name"]]
    }

    fn create_changelog_table_sql(&self, table: &TableName) -> Vec<String> {
        let mut statements = Vec::new();
        if let Some(schema) = table.schema() {
            let create_schema = format!("CREATE SCHEMA {}", self.quote_ident(schema));
            statements.push(format!(
                "IF SCHEMA_ID({}) IS NULL EXEC({})",
                self.quote_literal(schema),
                self.quote_literal(&create_schema)
            ));
        }
        let qualified = self.qualify(table);
        statements.push(format!(
            "IF OBJECT_ID({}, N'U') IS NULL CREATE TABLE {} (\
             [Folder] NVARCHAR(256) NOT NULL, \
             [ScriptNumber] INT NOT NULL, \
             [StartDate] DATETIME NULL, \
             [CompleteDate] DATETIME NULL, \
             [AppliedBy] NVARCHAR(128) NULL, \
             [ScriptName] NVARCHAR(512) NOT NULL, \
             [ScriptStatus] TINYINT NOT NULL, \
             [ScriptOutput] NVARCHAR(MAX) NULL, \
             CONSTRAINT {} PRIMARY KEY ([Folder], [ScriptNumber]))",
            self.quote_literal(&qualified),
            qualified,
            self.quote_ident(&format!("PK_{}", table.table()))
        ));
        statements
    }
}

/// PostgreSQL
pub struct PostgresSyntax;

impl DbmsSyntax for PostgresSyntax {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    fn current_user(&self) -> &'static str {
        "current_user"
    }

    fn lexical_rules(&self) -> LexicalRules {
        LexicalRules {
            dollar_quotes: true,
            ..LexicalRules::ANSI
        }
    }

    fn table_not_found_messages(&self) -> &'static [NotFoundPattern] {
        &[
            &["42P01"],
            &["undefined_table"],
            &["relation \"", "\" does not exist"],
        ]
    }

    fn create_changelog_table_sql(&self, table: &TableName) -> Vec<String> {
        let mut statements = Vec::new();
        if let Some(schema) = table.schema() {
            statements.push(format!(
                "CREATE SCHEMA IF NOT EXISTS {}",
                self.quote_ident(schema)
            ));
        }
        statements.push(format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             \"Folder\" VARCHAR(256) NOT NULL, \
             \"ScriptNumber\" INTEGER NOT NULL, \
             \"StartDate\" TIMESTAMP NULL, \
             \"CompleteDate\" TIMESTAMP NULL, \
             \"AppliedBy\" VARCHAR(128) NULL, \
             \"ScriptName\" VARCHAR(512) NOT NULL, \
             \"ScriptStatus\" SMALLINT NOT NULL, \
             \"ScriptOutput\" TEXT NULL, \
             PRIMARY KEY (\"Folder\", \"ScriptNumber\"))",
            self.qualify(table)
        ));
        statements
    }
}

/// MySQL
pub struct MySqlSyntax;

impl DbmsSyntax for MySqlSyntax {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
    }

    fn current_user(&self) -> &'static str {
        "CURRENT_USER()"
    }

    fn lexical_rules(&self) -> LexicalRules {
        LexicalRules {
            backslash_escapes: true,
            hash_comments: true,
            backtick_identifiers: true,
            ..LexicalRules::ANSI
        }
    }

    fn table_not_found_messages(&self) -> &'static [NotFoundPattern] {
        &[&["ERROR 1146 ("], &["Table '", "' doesn't exist"]]
    }

    fn create_changelog_table_sql(&self, table: &TableName) -> Vec<String> {
        let mut statements = Vec::new();
        if let Some(schema) = table.schema() {
            statements.push(format!(
                "CREATE SCHEMA IF NOT EXISTS {}",
                self.quote_ident(schema)
            ));
        }
        statements.push(format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             `Folder` VARCHAR(256) NOT NULL, \
             `ScriptNumber` INT NOT NULL, \
             `StartDate` DATETIME NULL, \
             `CompleteDate` DATETIME NULL, \
             `AppliedBy` VARCHAR(128) NULL, \
             `ScriptName` VARCHAR(512) NOT NULL, \
             `ScriptStatus` TINYINT NOT NULL, \
             `ScriptOutput` LONGTEXT NULL, \
             PRIMARY KEY (`Folder`, `ScriptNumber`))",
            self.qualify(table)
        ));
        statements
    }
}

/// DuckDB
pub struct DuckDbSyntax;

impl DbmsSyntax for DuckDbSyntax {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_ident(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    // No conditional execution outside SELECT.
    fn supports_guarded_scripts(&self) -> bool {
        false
    }

    // DuckDB has no user accounts; record the engine name.
    fn current_user(&self) -> &'static str {
        "'duckdb'"
    }

    fn lexical_rules(&self) -> LexicalRules {
        LexicalRules {
            dollar_quotes: true,
            ..LexicalRules::ANSI
        }
    }

    fn table_not_found_messages(&self) -> &'static [NotFoundPattern] {
        &[
            &["Table with name", "does not exist"],
            &["Schema with name", "does not exist"],
        ]
    }

    fn create_changelog_table_sql(&self, table: &TableName) -> Vec<String> {
        let mut statements = Vec::new();
        if let Some(schema) = table.schema() {
            statements.push(format!(
                "CREATE SCHEMA IF NOT EXISTS {}",
                self.quote_ident(schema)
            ));
        }
        statements.push(format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             \"Folder\" VARCHAR NOT NULL, \
             \"ScriptNumber\" BIGINT NOT NULL, \
             \"StartDate\" TIMESTAMP, \
             \"CompleteDate\" TIMESTAMP, \
             \"AppliedBy\" VARCHAR, \
             \"ScriptName\" VARCHAR NOT NULL, \
             \"ScriptStatus\" INTEGER NOT NULL, \
             \"ScriptOutput\" VARCHAR, \
             PRIMARY KEY (\"Folder\", \"ScriptNumber\"))",
            self.qualify(table)
        ));
        statements
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
