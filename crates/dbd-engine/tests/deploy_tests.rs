//! End-to-end deployment behaviour against DuckDB and scripted dialects

mod common;

use common::{duckdb_manager, script, scripted_manager, splitter, table_exists};
use dbd_core::{discover_scripts, ChangeEntry, ChangeScript, DelimiterType, TableName};
use dbd_db::QueryExecutor;
use dbd_engine::{
    Applier, DbmsFactory, DeployError, Deployer, DirectApplier, SchemaVersionManager,
    TemplateApplier,
};
use dbd_sql::StatementSplitter;
use dbd_template::TemplateEnvironment;
use std::fs;
use tempfile::TempDir;

fn keys(entries: &[ChangeEntry]) -> Vec<String> {
    entries.iter().map(ChangeEntry::unique_key).collect()
}

#[test]
fn test_idempotent_rerun() {
    let (manager, db) = duckdb_manager("ChangeLog");
    let deployer = Deployer::new(manager.clone());
    let scripts = vec![
        script(1, "CREATE TABLE people (id INT);"),
        script(2, "INSERT INTO people VALUES (1);"),
    ];

    let mut applier = DirectApplier::new(manager.clone(), splitter());
    deployer.run(scripts.clone(), &mut applier, true).unwrap();
    let second = deployer.run(scripts, &mut applier, true).unwrap();

    assert!(second.pending.is_empty());
    let rows = db.query("SELECT COUNT(*) FROM people").unwrap();
    assert_eq!(rows[0][0].as_deref(), Some("1"));
    assert_eq!(keys(&manager.get_applied_changes().unwrap()), vec!["Scripts/1", "Scripts/2"]);
}

#[test]
fn test_retry_after_failure_resumes_at_failed_script() {
    let (manager, db) = duckdb_manager("ChangeLog");
    let deployer = Deployer::new(manager.clone());
    let mut applier = DirectApplier::new(manager.clone(), splitter());

    let broken = vec![
        script(1, "CREATE TABLE a (id INT);"),
        script(2, "INSERT INTO nope VALUES (1);"),
        script(3, "CREATE TABLE c (id INT);"),
    ];
    let err = deployer.run(broken, &mut applier, true).unwrap_err();
    assert!(matches!(err, DeployError::ScriptApplicationFailure { ref script, .. } if script == "Scripts/2"));
    assert!(table_exists(&db, "a"));
    assert!(!table_exists(&db, "c"));

    let fixed = vec![
        script(1, "CREATE TABLE a (id INT);"),
        script(2, "INSERT INTO a VALUES (1);"),
        script(3, "CREATE TABLE c (id INT);"),
    ];
    let report = deployer.run(fixed, &mut applier, true).unwrap();
    assert_eq!(report.pending_keys(), vec!["Scripts/2", "Scripts/3"]);
    assert!(table_exists(&db, "c"));
    assert_eq!(
        keys(&manager.get_applied_changes().unwrap()),
        vec!["Scripts/1", "Scripts/2", "Scripts/3"]
    );
}

#[test]
fn test_template_failure_rolls_back_whole_batch() {
    let (manager, db) = duckdb_manager("ChangeLog");
    let factory = DbmsFactory::new("duckdb").unwrap();
    let mut applier = TemplateApplier::new(
        factory.syntax(),
        TableName::unqualified("ChangeLog"),
        splitter(),
        TemplateEnvironment::default(),
        Vec::new(),
    );

    let scripts = vec![
        script(1, "INSERT INTO missing_table VALUES (1);"),
        script(2, "CREATE TABLE later_table (id INT);"),
    ];
    Deployer::new(manager.clone())
        .run(scripts, &mut applier, true)
        .unwrap();
    let artifact = String::from_utf8(applier.into_inner()).unwrap();

    // Emulate `duckdb -bail`: the batch stops at the first error and the
    // session ends without COMMIT.
    assert!(db.execute_batch(&artifact).is_err());
    let _ = db.rollback();

    assert!(!table_exists(&db, "later_table"));
    assert!(!manager.does_changelog_table_exist().unwrap());
}

/// Render against the live changelog, returning pending keys and the artifact
fn render_against(
    manager: &SchemaVersionManager,
    scripts: Vec<ChangeScript>,
) -> (Vec<String>, String) {
    let factory = DbmsFactory::new("duckdb").unwrap();
    let mut applier = TemplateApplier::new(
        factory.syntax(),
        manager.table().clone(),
        splitter(),
        TemplateEnvironment::default(),
        Vec::new(),
    );
    let report = Deployer::new(manager.clone())
        .run(scripts, &mut applier, true)
        .unwrap();
    let artifact = String::from_utf8(applier.into_inner()).unwrap();
    (report.pending_keys(), artifact)
}

#[test]
fn test_template_rerender_after_adding_script() {
    let (manager, db) = duckdb_manager("ChangeLog");
    let first = script(1, "CREATE TABLE a (id INT);");
    let second = script(2, "CREATE TABLE b (id INT);");

    let (pending, artifact) = render_against(&manager, vec![first.clone()]);
    assert_eq!(pending, vec!["Scripts/1"]);
    db.execute_batch(&artifact).unwrap();

    let (pending, artifact) = render_against(&manager, vec![first, second]);
    assert_eq!(pending, vec!["Scripts/2"]);
    assert!(!artifact.contains("CREATE TABLE a"));
    db.execute_batch(&artifact).unwrap();

    assert!(table_exists(&db, "a"));
    assert!(table_exists(&db, "b"));
    assert_eq!(
        keys(&manager.get_applied_changes().unwrap()),
        vec!["Scripts/1", "Scripts/2"]
    );
}

#[test]
fn test_template_success_records_every_script() {
    let (manager, db) = duckdb_manager("log.Installs");
    let factory = DbmsFactory::new("duckdb").unwrap();
    let mut applier = TemplateApplier::new(
        factory.syntax(),
        manager.table().clone(),
        splitter(),
        TemplateEnvironment::default(),
        Vec::new(),
    );

    Deployer::new(manager.clone())
        .run(
            vec![script(1, "CREATE TABLE t (id INT);"), script(2, "INSERT INTO t VALUES (7);")],
            &mut applier,
            true,
        )
        .unwrap();
    db.execute_batch(&String::from_utf8(applier.into_inner()).unwrap())
        .unwrap();

    assert_eq!(
        keys(&manager.get_applied_changes().unwrap()),
        vec!["Scripts/1", "Scripts/2"]
    );
}

#[test]
fn test_already_applied_script_not_pending() {
    let (manager, _db) = duckdb_manager("ChangeLog");
    let mut applier = DirectApplier::new(manager.clone(), splitter());
    applier
        .apply(&[script(3, "CREATE TABLE t (id INT);")], true)
        .unwrap();

    let report = Deployer::new(manager.clone())
        .status(vec![script(3, "INSERT INTO t VALUES (1);")])
        .unwrap();
    assert!(report.pending.is_empty());
    assert_eq!(keys(&manager.get_applied_changes().unwrap()), vec!["Scripts/3"]);
}

#[test]
fn test_schema_qualified_changelog_with_nothing_pending() {
    let (manager, db) = duckdb_manager("log.Installs");
    let mut applier = DirectApplier::new(manager.clone(), splitter());
    Deployer::new(manager.clone())
        .run(Vec::new(), &mut applier, true)
        .unwrap();

    assert!(manager.does_changelog_table_exist().unwrap());
    let rows = db.query("SELECT COUNT(*) FROM log.\"Installs\"").unwrap();
    assert_eq!(rows[0][0].as_deref(), Some("0"));
}

#[test]
fn test_discovered_scripts_apply_in_number_order() {
    let dir = TempDir::new().unwrap();
    let scripts_dir = dir.path().join("Scripts");
    fs::create_dir(&scripts_dir).unwrap();
    fs::write(scripts_dir.join("10_insert.sql"), "INSERT INTO t VALUES (10);").unwrap();
    fs::write(scripts_dir.join("2_insert.sql"), "INSERT INTO t VALUES (2);").unwrap();
    fs::write(scripts_dir.join("1_create.sql"), "CREATE TABLE t (id INT);").unwrap();

    let (manager, db) = duckdb_manager("ChangeLog");
    let mut applier = DirectApplier::new(manager.clone(), splitter());
    let report = Deployer::new(manager)
        .run(discover_scripts(&scripts_dir).unwrap(), &mut applier, true)
        .unwrap();

    assert_eq!(
        report.pending_keys(),
        vec!["Scripts/1", "Scripts/2", "Scripts/10"]
    );
    let rows = db.query("SELECT COUNT(*) FROM t").unwrap();
    assert_eq!(rows[0][0].as_deref(), Some("2"));
}

#[test]
fn test_row_delimiter_scripts_apply() {
    let (manager, db) = duckdb_manager("ChangeLog");
    let mut applier = DirectApplier::new(
        manager.clone(),
        StatementSplitter::new("GO", DelimiterType::Row),
    );
    applier
        .apply(
            &[script(
                1,
                "CREATE TABLE t (id INT)\nGO\nINSERT INTO t VALUES (1)\ngo\n",
            )],
            true,
        )
        .unwrap();
    let rows = db.query("SELECT COUNT(*) FROM t").unwrap();
    assert_eq!(rows[0][0].as_deref(), Some("1"));
}

#[test]
fn test_missing_changelog_tolerated_for_every_dialect() {
    let cases = [
        ("mssql", "Invalid object name 'ChangeLog'."),
        ("postgres", "ERROR:  relation \"ChangeLog\" does not exist (SQLSTATE 42P01)"),
        ("mysql", "ERROR 1146 (42S02): Table 'app.ChangeLog' doesn't exist"),
    ];
    for (dbms, message) in cases {
        let (manager, _executor) = scripted_manager(dbms, message);
        let report = Deployer::new(manager)
            .status(vec![script(1, "SELECT 1;")])
            .unwrap();
        assert_eq!(report.pending_keys(), vec!["Scripts/1"], "{dbms}");
    }
}

#[test]
fn test_read_failure_aborts_before_any_script() {
    let (manager, executor) = scripted_manager("postgres", "FATAL: password authentication failed");
    let mut applier = DirectApplier::new(manager.clone(), splitter());

    let err = Deployer::new(manager)
        .run(vec![script(1, "CREATE TABLE a (id INT);")], &mut applier, true)
        .unwrap_err();

    assert!(matches!(err, DeployError::ChangelogReadFailure { .. }));
    assert!(executor.executed().is_empty());
}

#[test]
fn test_direct_applier_statement_sequence() {
    let (manager, executor) = scripted_manager("mssql", "Invalid object name 'ChangeLog'.");
    let mut applier = DirectApplier::new(manager.clone(), splitter());

    Deployer::new(manager)
        .run(
            vec![script(1, "CREATE TABLE a (id INT); INSERT INTO a VALUES (1);")],
            &mut applier,
            true,
        )
        .unwrap();

    let executed = executor.executed();
    assert!(executed[0].starts_with("IF OBJECT_ID(N'[ChangeLog]', N'U') IS NULL CREATE TABLE"));
    assert_eq!(executed[1], "BEGIN");
    assert_eq!(executed[2], "CREATE TABLE a (id INT)");
    assert_eq!(executed[3], "INSERT INTO a VALUES (1)");
    assert!(executed[4].starts_with("INSERT INTO [ChangeLog]"));
    assert_eq!(executed[5], "COMMIT");
}
