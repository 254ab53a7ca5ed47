use super::*;
use crate::dialect::create_syntax;

fn class(dbms: &str, message: &str) -> ErrorClass {
    let syntax = create_syntax(dbms).unwrap();
    classify_error(message, syntax.as_ref())
}

#[test]
fn test_mssql_messages() {
    assert_eq!(
        class("mssql", "No table found with name 'ChangeLog'."),
        ErrorClass::TableNotFound
    );
    assert_eq!(
        class("mssql", "Invalid object name 'log.Installs'."),
        ErrorClass::TableNotFound
    );
    assert_eq!(
        class("mssql", "The SELECT permission was denied on the object 'ChangeLog'"),
        ErrorClass::Other
    );
}

#[test]
fn test_postgres_messages() {
    assert_eq!(
        class("postgres", "ERROR:  relation \"changelog\" does not exist"),
        ErrorClass::TableNotFound
    );
    assert_eq!(
        class("postgres", "db error: SQLSTATE 42P01"),
        ErrorClass::TableNotFound
    );
    assert_eq!(
        class("postgres", "permission denied for table changelog"),
        ErrorClass::Other
    );
    assert_eq!(
        class(
            "postgres",
            "ERROR:  could not obtain lock on relation \"ChangeLog\" (SQLSTATE 55P03)"
        ),
        ErrorClass::Other
    );
}

#[test]
fn test_mysql_messages() {
    assert_eq!(
        class("mysql", "ERROR 1146 (42S02): Table 'app.ChangeLog' doesn't exist"),
        ErrorClass::TableNotFound
    );
    assert_eq!(
        class("mysql", "ERROR 1142 (42000): SELECT command denied to user"),
        ErrorClass::Other
    );
    assert_eq!(
        class("mysql", "Error 1146: Table 'app.ChangeLog' doesn't exist"),
        ErrorClass::TableNotFound
    );
    assert_eq!(
        class("mysql", "ERROR 2013 (HY000): Lost connection after 11460 ms"),
        ErrorClass::Other
    );
    assert_eq!(
        class("mysql", "ERROR 1049 (42000): Unknown database 'app'"),
        ErrorClass::Other
    );
}

#[test]
fn test_duckdb_messages() {
    assert_eq!(
        class("duckdb", "Catalog Error: Table with name ChangeLog does not exist!"),
        ErrorClass::TableNotFound
    );
    assert_eq!(
        class("duckdb", "Catalog Error: Schema with name log does not exist!"),
        ErrorClass::TableNotFound
    );
    assert_eq!(
        class("duckdb", "IO Error: Could not set lock on file"),
        ErrorClass::Other
    );
    assert_eq!(
        class("duckdb", "Catalog Error: Table with name ChangeLog already exists!"),
        ErrorClass::Other
    );
}

#[test]
fn test_explicit_patterns() {
    assert_eq!(
        classify_with_patterns("no such table: ChangeLog", &[&["no such table"]]),
        ErrorClass::TableNotFound
    );
    assert_eq!(
        classify_with_patterns("no such column: x", &[&["no such", "table"]]),
        ErrorClass::Other
    );
    assert_eq!(classify_with_patterns("anything", &[]), ErrorClass::Other);
    assert_eq!(classify_with_patterns("anything", &[&[]]), ErrorClass::Other);
}
