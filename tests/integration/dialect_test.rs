use anyhow::Result;
use serde_json::{json, Value};

use sqltree::{parse_bigquery, parse_dialect, parse_json, parse_mysql, parse_sqlserver, Dialect};

fn tree(sql: &str, dialect: Dialect) -> Result<Value> {
    Ok(parse_dialect(sql, dialect)?.to_json())
}

#[test]
fn test_ansi_double_quotes_are_identifiers() -> Result<()> {
    assert_eq!(
        parse_json("SELECT \"a b\" FROM t", Dialect::Ansi)?,
        json!({"select": {"value": "a b"}, "from": "t"})
    );
    Ok(())
}

#[test]
fn test_mysql_double_quotes_are_strings() -> Result<()> {
    assert_eq!(
        parse_mysql("SELECT \"hi\" FROM t")?.to_json(),
        json!({"select": {"value": {"literal": "hi"}}, "from": "t"})
    );
    Ok(())
}

#[test]
fn test_bigquery_double_quotes_are_strings() -> Result<()> {
    assert_eq!(
        parse_bigquery("SELECT \"hi\"")?.to_json(),
        json!({"select": {"value": {"literal": "hi"}}})
    );
    Ok(())
}

#[test]
fn test_backtick_identifiers() -> Result<()> {
    assert_eq!(
        tree("SELECT `a b` FROM `my table`", Dialect::MySql)?,
        json!({"select": {"value": "a b"}, "from": "my table"})
    );
    Ok(())
}

#[test]
fn test_bracket_identifiers() -> Result<()> {
    assert_eq!(
        parse_sqlserver("SELECT [a b] FROM [my table]")?.to_json(),
        json!({"select": {"value": "a b"}, "from": "my table"})
    );
    Ok(())
}

#[test]
fn test_bracket_still_subscripts_after_a_name() -> Result<()> {
    assert_eq!(
        parse_sqlserver("SELECT a[1] FROM t")?.to_json(),
        json!({"select": {"value": {"get": ["a", 1]}}, "from": "t"})
    );
    Ok(())
}

#[test]
fn test_quoted_segment_escapes_inner_dot() -> Result<()> {
    // A dot inside a quoted segment must not split the path.
    assert_eq!(
        parse_json("SELECT \"a.b\".c FROM t", Dialect::Ansi)?,
        json!({"select": {"value": "a\\.b.c"}, "from": "t"})
    );
    Ok(())
}

#[test]
fn test_doubled_quote_escapes() -> Result<()> {
    assert_eq!(
        parse_json("SELECT 'it''s'", Dialect::Ansi)?,
        json!({"select": {"value": {"literal": "it's"}}})
    );
    assert_eq!(
        parse_json("SELECT \"a\"\"b\"", Dialect::Ansi)?,
        json!({"select": {"value": "a\"b"}})
    );
    Ok(())
}

#[test]
fn test_sqlserver_top() -> Result<()> {
    assert_eq!(
        parse_sqlserver("SELECT TOP 5 a FROM t")?.to_json(),
        json!({"select": {"value": "a"}, "top": 5, "from": "t"})
    );
    assert_eq!(
        parse_sqlserver("SELECT TOP 10 PERCENT a FROM t")?.to_json(),
        json!({"select": {"value": "a"}, "top": {"percent": 10}, "from": "t"})
    );
    Ok(())
}

#[test]
fn test_mysql_limit_with_offset_count() -> Result<()> {
    assert_eq!(
        parse_mysql("SELECT a FROM t LIMIT 10, 5")?.to_json(),
        json!({"select": {"value": "a"}, "from": "t", "limit": 5, "offset": 10})
    );
    Ok(())
}

#[test]
fn test_mysql_hash_comment() -> Result<()> {
    assert_eq!(
        parse_mysql("SELECT a # comment\nFROM t")?.to_json(),
        json!({"select": {"value": "a"}, "from": "t"})
    );
    Ok(())
}

#[test]
fn test_all_dialects_share_the_grammar() -> Result<()> {
    let sql = "SELECT a FROM t WHERE b BETWEEN 1 AND 2";
    let expected = json!({
        "select": {"value": "a"},
        "from": "t",
        "where": {"between": ["b", 1, 2]},
    });
    for dialect in [Dialect::Ansi, Dialect::MySql, Dialect::SqlServer, Dialect::BigQuery] {
        assert_eq!(tree(sql, dialect)?, expected);
    }
    Ok(())
}
