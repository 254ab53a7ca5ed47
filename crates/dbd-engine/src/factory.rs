//! Construction of the dialect-bound collaborators

use std::sync::Arc;

use dbd_core::{Config, DelimiterType, TableName};
use dbd_db::QueryExecutor;
use dbd_sql::{create_syntax, DbmsSyntax, StatementSplitter};

use crate::error::{DeployError, DeployResult};
use crate::version_manager::SchemaVersionManager;

/// Builds syntax providers, executors and version managers for one dbms.
///
/// The dbms identifier is validated here, so an unsupported dialect fails
/// before any connection is attempted.
#[derive(Clone)]
pub struct DbmsFactory {
    syntax: Arc<dyn DbmsSyntax>,
}

impl DbmsFactory {
    /// Create a factory, failing with `UnsupportedDialect` for unknown identifiers
    pub fn new(dbms: &str) -> DeployResult<Self> {
        let syntax = create_syntax(dbms)?;
        Ok(Self {
            syntax: Arc::from(syntax),
        })
    }

    /// Canonical dbms name
    pub fn dbms(&self) -> &'static str {
        self.syntax.name()
    }

    /// Shared syntax provider
    pub fn syntax(&self) -> Arc<dyn DbmsSyntax> {
        Arc::clone(&self.syntax)
    }

    /// Open a live executor for `connection`
    pub fn create_executor(&self, connection: &str) -> DeployResult<Arc<dyn QueryExecutor>> {
        let executor = dbd_db::connect(self.syntax.name(), connection)
            .map_err(DeployError::Connection)?;
        Ok(Arc::from(executor))
    }

    /// Version manager over an already-open executor
    pub fn create_version_manager(
        &self,
        executor: Arc<dyn QueryExecutor>,
        table: TableName,
    ) -> SchemaVersionManager {
        SchemaVersionManager::new(self.syntax(), executor, table)
    }

    /// Statement splitter for the configured delimiter and this dialect's quoting
    pub fn create_splitter(
        &self,
        delimiter: &str,
        delimiter_type: DelimiterType,
    ) -> StatementSplitter {
        StatementSplitter::new(delimiter, delimiter_type).with_rules(self.syntax.lexical_rules())
    }

    /// Factory for the dbms named in `config`
    pub fn from_config(config: &Config) -> DeployResult<Self> {
        Self::new(&config.dbms)
    }
}
