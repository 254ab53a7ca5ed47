//! Direct Applier: one transaction per script against a live connection.

use chrono::{NaiveDateTime, Utc};
use dbd_core::{ChangeEntry, ChangeScript};
use dbd_sql::StatementSplitter;

use super::Applier;
use crate::error::{DeployError, DeployResult};
use crate::version_manager::SchemaVersionManager;

/// `AppliedBy` recorded when no principal is configured
pub const DEFAULT_APPLIED_BY: &str = "dbdeploy";

/// Executes pending scripts in-process.
///
/// Each script runs in its own transaction together with its changelog
/// insert, so the changelog lists exactly the scripts that committed.
pub struct DirectApplier {
    manager: SchemaVersionManager,
    splitter: StatementSplitter,
    applied_by: String,
}

impl DirectApplier {
    /// Create a direct applier
    pub fn new(manager: SchemaVersionManager, splitter: StatementSplitter) -> Self {
        Self {
            manager,
            splitter,
            applied_by: DEFAULT_APPLIED_BY.to_string(),
        }
    }

    /// Override the recorded principal; `None` keeps the default
    pub fn with_applied_by(mut self, applied_by: Option<String>) -> Self {
        if let Some(applied_by) = applied_by {
            self.applied_by = applied_by;
        }
        self
    }

    fn apply_script(&self, script: &ChangeScript) -> DeployResult<()> {
        let executor = self.manager.executor();
        let key = script.unique_key();
        let statements = self.splitter.split(&script.content);
        let start = now();

        executor
            .begin()
            .map_err(|source| DeployError::TransactionFailure {
                script: key.clone(),
                operation: "begin",
                source,
            })?;

        let mut rows_affected = 0usize;
        for (idx, statement) in statements.iter().enumerate() {
            log::debug!("{key} statement {}: {statement}", idx + 1);
            match executor.execute(statement) {
                Ok(rows) => rows_affected += rows,
                Err(source) => {
                    self.rollback(&key);
                    return Err(DeployError::ScriptApplicationFailure {
                        script: key,
                        name: script.name.clone(),
                        statement_index: idx + 1,
                        statement: statement.clone(),
                        source,
                    });
                }
            }
        }

        let output = format!(
            "{} statements, {} rows affected",
            statements.len(),
            rows_affected
        );
        let entry = ChangeEntry::success(script, start, now(), self.applied_by.as_str(), output);
        if let Err(e) = self.manager.record_applied_change(&entry) {
            self.rollback(&key);
            return Err(e);
        }

        if let Err(source) = executor.commit() {
            self.rollback(&key);
            return Err(DeployError::TransactionFailure {
                script: key,
                operation: "commit",
                source,
            });
        }

        log::info!("Applied change script {script}: {}", entry.output);
        Ok(())
    }

    fn rollback(&self, key: &str) {
        if let Err(e) = self.manager.executor().rollback() {
            log::warn!("Rollback after failure of {key} failed: {e}");
        }
    }
}

impl Applier for DirectApplier {
    fn apply(
        &mut self,
        pending: &[ChangeScript],
        create_changelog_table: bool,
    ) -> DeployResult<()> {
        if create_changelog_table && !self.manager.does_changelog_table_exist()? {
            self.manager.create_changelog_table()?;
        }

        for script in pending {
            self.apply_script(script)?;
        }
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "direct"
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[cfg(test)]
#[path = "direct_test.rs"]
mod tests;
