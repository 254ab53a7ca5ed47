//! Shared helpers for dbd-engine integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use dbd_core::{ChangeScript, DelimiterType, TableName};
use dbd_db::{DbError, DbResult, DuckDbBackend, QueryExecutor, Row};
use dbd_engine::{DbmsFactory, SchemaVersionManager};
use dbd_sql::StatementSplitter;

/// Executor for engines without an embedded driver.
///
/// Queries fail with a fixed driver message; statements are recorded.
pub struct ScriptedExecutor {
    query_error: String,
    pub executed: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new(query_error: &str) -> Self {
        Self {
            query_error: query_error.to_string(),
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl QueryExecutor for ScriptedExecutor {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(0)
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute(sql).map(|_| ())
    }

    fn query(&self, _sql: &str) -> DbResult<Vec<Row>> {
        Err(DbError::ExecutionError(self.query_error.clone()))
    }

    fn begin(&self) -> DbResult<()> {
        self.execute("BEGIN").map(|_| ())
    }

    fn commit(&self) -> DbResult<()> {
        self.execute("COMMIT").map(|_| ())
    }

    fn rollback(&self) -> DbResult<()> {
        self.execute("ROLLBACK").map(|_| ())
    }

    fn db_type(&self) -> &'static str {
        "scripted"
    }
}

pub fn script(number: u64, content: &str) -> ChangeScript {
    ChangeScript::new("Scripts", number, format!("{number}.sql"), content)
}

pub fn duckdb_manager(table: &str) -> (SchemaVersionManager, Arc<DuckDbBackend>) {
    let factory = DbmsFactory::new("duckdb").unwrap();
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let manager = factory.create_version_manager(db.clone(), TableName::parse(table).unwrap());
    (manager, db)
}

pub fn scripted_manager(dbms: &str, query_error: &str) -> (SchemaVersionManager, Arc<ScriptedExecutor>) {
    let factory = DbmsFactory::new(dbms).unwrap();
    let executor = Arc::new(ScriptedExecutor::new(query_error));
    let manager =
        factory.create_version_manager(executor.clone(), TableName::unqualified("ChangeLog"));
    (manager, executor)
}

pub fn splitter() -> StatementSplitter {
    StatementSplitter::new(";", DelimiterType::Normal)
}

pub fn table_exists(db: &DuckDbBackend, name: &str) -> bool {
    let rows = db
        .query(&format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = '{name}'"
        ))
        .unwrap();
    rows[0][0].as_deref() == Some("1")
}
