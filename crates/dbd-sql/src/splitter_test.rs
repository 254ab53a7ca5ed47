use super::*;

fn normal() -> StatementSplitter {
    StatementSplitter::new(";", DelimiterType::Normal)
}

fn row_go() -> StatementSplitter {
    StatementSplitter::new("GO", DelimiterType::Row)
}

#[test]
fn test_split_simple_statements() {
    let stmts = normal().split("CREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);\n");
    assert_eq!(stmts, vec!["CREATE TABLE t (id INT)", "INSERT INTO t VALUES (1)"]);
}

#[test]
fn test_split_several_on_one_line() {
    let stmts = normal().split("SELECT 1; SELECT 2;SELECT 3");
    assert_eq!(stmts, vec!["SELECT 1", "SELECT 2", "SELECT 3"]);
}

#[test]
fn test_delimiter_inside_literal_is_kept() {
    let stmts = normal().split("INSERT INTO t VALUES ('a;b', 'it''s; fine');\nSELECT 2;");
    assert_eq!(
        stmts,
        vec!["INSERT INTO t VALUES ('a;b', 'it''s; fine')", "SELECT 2"]
    );
}

#[test]
fn test_delimiter_inside_quoted_identifier_is_kept() {
    let stmts = normal().split("SELECT \"odd;name\", `other;one` FROM t;");
    assert_eq!(stmts, vec!["SELECT \"odd;name\", `other;one` FROM t"]);
}

#[test]
fn test_delimiter_inside_comments_is_kept() {
    let script = "-- first; still a comment\nSELECT 1 /* not; here */;\nSELECT 2;";
    let stmts = normal().split(script);
    assert_eq!(
        stmts,
        vec![
            "-- first; still a comment\nSELECT 1 /* not; here */",
            "SELECT 2"
        ]
    );
}

#[test]
fn test_empty_and_comment_only_statements_dropped() {
    let stmts = normal().split(";;\n  ;\nSELECT 1;\n-- trailing note\n");
    assert_eq!(stmts, vec!["SELECT 1"]);
}

#[test]
fn test_dollar_quoted_body() {
    let script = "CREATE FUNCTION f() RETURNS int AS $body$\nBEGIN\n  RETURN 1;\nEND;\n$body$ LANGUAGE plpgsql;\nSELECT f();";
    let stmts = normal().split(script);
    assert_eq!(stmts.len(), 2);
    assert!(stmts[0].contains("RETURN 1;"));
    assert!(stmts[0].ends_with("LANGUAGE plpgsql"));
    assert_eq!(stmts[1], "SELECT f()");
}

#[test]
fn test_positional_parameter_is_not_dollar_quote() {
    let stmts = normal().split("PREPARE p AS SELECT $1; EXECUTE p(1);");
    assert_eq!(stmts, vec!["PREPARE p AS SELECT $1", "EXECUTE p(1)"]);
}

#[test]
fn test_row_delimiter() {
    let script = "CREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);\nGO\nSELECT 1;\n  go  \n";
    let stmts = row_go().split(script);
    assert_eq!(
        stmts,
        vec![
            "CREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);",
            "SELECT 1;"
        ]
    );
}

#[test]
fn test_row_delimiter_must_stand_alone() {
    let script = "SELECT 'GO' AS word\nGOTO label\nGO";
    let stmts = row_go().split(script);
    assert_eq!(stmts, vec!["SELECT 'GO' AS word\nGOTO label"]);
}

#[test]
fn test_row_delimiter_inside_block_comment_is_kept() {
    let script = "/*\nGO\n*/\nSELECT 1\nGO\nSELECT 2";
    let stmts = row_go().split(script);
    assert_eq!(stmts, vec!["/*\nGO\n*/\nSELECT 1", "SELECT 2"]);
}

#[test]
fn test_word_delimiter_in_normal_style() {
    let splitter = StatementSplitter::new("GO", DelimiterType::Normal);
    let stmts = splitter.split("SELECT category FROM t GO\nSELECT 2 go\n");
    assert_eq!(stmts, vec!["SELECT category FROM t", "SELECT 2"]);
}

#[test]
fn test_statement_without_trailing_delimiter() {
    let stmts = normal().split("SELECT 1");
    assert_eq!(stmts, vec!["SELECT 1"]);
}

fn dialect_splitter(dbms: &str) -> StatementSplitter {
    let syntax = crate::dialect::create_syntax(dbms).unwrap();
    normal().with_rules(syntax.lexical_rules())
}

#[test]
fn test_mysql_backslash_escaped_quote() {
    let script = "INSERT INTO t VALUES ('it\\'s; fine');\nINSERT INTO t VALUES ('x');";
    let stmts = dialect_splitter("mysql").split(script);
    assert_eq!(
        stmts,
        vec![
            "INSERT INTO t VALUES ('it\\'s; fine')",
            "INSERT INTO t VALUES ('x')"
        ]
    );
}

#[test]
fn test_mysql_escaped_backslash_closes_literal() {
    let stmts = dialect_splitter("mysql").split("SELECT 'C:\\\\'; SELECT \"a\\\";b\";");
    assert_eq!(stmts, vec!["SELECT 'C:\\\\'", "SELECT \"a\\\";b\""]);
}

#[test]
fn test_mysql_hash_comment() {
    let script = "# setup; part one\nCREATE TABLE t (id INT);\n# done;\n";
    let stmts = dialect_splitter("mysql").split(script);
    assert_eq!(stmts, vec!["# setup; part one\nCREATE TABLE t (id INT)"]);
}

#[test]
fn test_standard_strings_treat_backslash_literally() {
    let stmts = dialect_splitter("postgres").split("SELECT 'C:\\'; SELECT 2;");
    assert_eq!(stmts, vec!["SELECT 'C:\\'", "SELECT 2"]);
}

#[test]
fn test_mssql_bracket_identifier() {
    let script = "SELECT [odd;name], [a]];b] FROM t;\nSELECT #tmp.id FROM #tmp;";
    let stmts = dialect_splitter("mssql").split(script);
    assert_eq!(
        stmts,
        vec!["SELECT [odd;name], [a]];b] FROM t", "SELECT #tmp.id FROM #tmp"]
    );
}

#[test]
fn test_brackets_are_plain_code_outside_mssql() {
    let stmts = dialect_splitter("postgres").split("SELECT ARRAY[1;SELECT 2]");
    assert_eq!(stmts, vec!["SELECT ARRAY[1", "SELECT 2]"]);
}

#[test]
fn test_ansi_rules_ignore_dollar_and_backtick() {
    let splitter = normal().with_rules(LexicalRules::ANSI);
    let stmts = splitter.split("SELECT `a;b`; SELECT $$x;y$$;");
    assert_eq!(stmts, vec!["SELECT `a", "b`", "SELECT $$x", "y$$"]);
}
