//! Schema Version Manager: reads and writes the changelog table.

use std::sync::Arc;

use chrono::NaiveDateTime;
use dbd_core::{ChangeEntry, ScriptStatus, TableName};
use dbd_db::{QueryExecutor, Row};
use dbd_sql::{classify_error, DbmsSyntax, ErrorClass};

use crate::error::{DeployError, DeployResult};

/// Formats accepted when reading stored timestamps back as text
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Changelog access for one table on one connection.
///
/// A missing changelog table is a normal state ("nothing applied yet"),
/// recognised from the driver's error text using the dialect's pattern list.
#[derive(Clone)]
pub struct SchemaVersionManager {
    syntax: Arc<dyn DbmsSyntax>,
    executor: Arc<dyn QueryExecutor>,
    table: TableName,
}

impl SchemaVersionManager {
    /// Create a manager for `table`
    pub fn new(
        syntax: Arc<dyn DbmsSyntax>,
        executor: Arc<dyn QueryExecutor>,
        table: TableName,
    ) -> Self {
        Self {
            syntax,
            executor,
            table,
        }
    }

    /// Dialect syntax in use
    pub fn syntax(&self) -> &dyn DbmsSyntax {
        self.syntax.as_ref()
    }

    /// Executor in use
    pub fn executor(&self) -> &dyn QueryExecutor {
        self.executor.as_ref()
    }

    /// Changelog table name
    pub fn table(&self) -> &TableName {
        &self.table
    }

    fn qualified_table(&self) -> String {
        self.syntax.qualify(&self.table)
    }

    /// List applied changes ordered by folder then script number.
    ///
    /// Returns an empty list when the changelog table does not exist.
    pub fn get_applied_changes(&self) -> DeployResult<Vec<ChangeEntry>> {
        let sql = self.syntax.select_applied_changes_sql(&self.table);
        let rows = match self.executor.query(&sql) {
            Ok(rows) => rows,
            Err(e) => {
                let message = e.message();
                return match classify_error(&message, self.syntax.as_ref()) {
                    ErrorClass::TableNotFound => {
                        log::warn!(
                            "Changelog table {} not found; treating all scripts as pending",
                            self.qualified_table()
                        );
                        Ok(Vec::new())
                    }
                    ErrorClass::Other => Err(DeployError::ChangelogReadFailure {
                        table: self.qualified_table(),
                        message,
                    }),
                };
            }
        };

        rows.iter().map(|row| self.parse_row(row)).collect()
    }

    /// Whether the changelog table exists
    pub fn does_changelog_table_exist(&self) -> DeployResult<bool> {
        let sql = self.syntax.changelog_exists_sql(&self.table);
        match self.executor.query(&sql) {
            Ok(_) => Ok(true),
            Err(e) => {
                let message = e.message();
                match classify_error(&message, self.syntax.as_ref()) {
                    ErrorClass::TableNotFound => Ok(false),
                    ErrorClass::Other => Err(DeployError::ChangelogReadFailure {
                        table: self.qualified_table(),
                        message,
                    }),
                }
            }
        }
    }

    /// Create the changelog table (and its schema). A no-op when it exists.
    pub fn create_changelog_table(&self) -> DeployResult<()> {
        for statement in self.syntax.create_changelog_table_sql(&self.table) {
            log::debug!("Changelog DDL: {statement}");
            self.executor.execute(&statement).map_err(|source| {
                DeployError::ChangeLogTableCreationFailure {
                    table: self.qualified_table(),
                    source,
                }
            })?;
        }
        log::info!("Changelog table {} is ready", self.qualified_table());
        Ok(())
    }

    /// Insert one changelog row.
    ///
    /// Callers run this inside the transaction of the script it records.
    pub fn record_applied_change(&self, entry: &ChangeEntry) -> DeployResult<()> {
        let sql = self.syntax.insert_change_entry_sql(&self.table, entry);
        self.executor
            .execute(&sql)
            .map_err(|source| DeployError::ChangelogWriteFailure {
                script: entry.unique_key(),
                source,
            })?;
        Ok(())
    }

    fn parse_row(&self, row: &Row) -> DeployResult<ChangeEntry> {
        let corrupt = |reason: String| DeployError::ChangelogReadFailure {
            table: self.qualified_table(),
            message: reason,
        };
        let cell = |idx: usize| row.get(idx).and_then(|c| c.as_deref());

        let folder = cell(0)
            .ok_or_else(|| corrupt("row without Folder".to_string()))?
            .to_string();
        let number_text =
            cell(1).ok_or_else(|| corrupt(format!("row in {folder} without ScriptNumber")))?;
        let script_number: u64 = number_text
            .trim()
            .parse()
            .map_err(|_| corrupt(format!("invalid ScriptNumber '{number_text}' in {folder}")))?;
        let key = dbd_core::script::unique_key(&folder, script_number);

        let status_text = cell(6).unwrap_or_default();
        let status = status_text
            .trim()
            .parse::<i32>()
            .ok()
            .and_then(ScriptStatus::from_code)
            .ok_or_else(|| corrupt(format!("invalid ScriptStatus '{status_text}' for {key}")))?;

        Ok(ChangeEntry {
            folder,
            script_number,
            start_date: cell(2).and_then(|t| parse_timestamp(t, &key)),
            complete_date: cell(3).and_then(|t| parse_timestamp(t, &key)),
            applied_by: cell(4).map(str::to_string),
            script_name: cell(5).unwrap_or_default().to_string(),
            status,
            output: cell(7).unwrap_or_default().to_string(),
        })
    }
}

fn parse_timestamp(text: &str, key: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    let parsed = TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok());
    if parsed.is_none() {
        log::warn!("Ignoring unreadable changelog timestamp '{text}' for {key}");
    }
    parsed
}

#[cfg(test)]
#[path = "version_manager_test.rs"]
mod tests;
