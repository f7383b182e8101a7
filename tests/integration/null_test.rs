use anyhow::Result;
use serde_json::{json, Value};

use sqltree::{parse, parse_json, parse_json_with_null, Dialect};

fn tree(sql: &str) -> Result<Value> {
    Ok(parse_json(sql, Dialect::Ansi)?)
}

#[test]
fn test_null_literal_projects_as_sentinel() -> Result<()> {
    assert_eq!(tree("SELECT NULL")?, json!({"select": {"value": {"null": {}}}}));
    Ok(())
}

#[test]
fn test_null_replacement_is_threaded() -> Result<()> {
    assert_eq!(
        parse_json_with_null("SELECT NULL", Dialect::Ansi, &Value::Null)?,
        json!({"select": {"value": null}})
    );
    assert_eq!(
        parse_json_with_null("SELECT NULL", Dialect::Ansi, &json!("NULL"))?,
        json!({"select": {"value": "NULL"}})
    );
    Ok(())
}

#[test]
fn test_equality_with_null_becomes_missing() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t WHERE b = NULL")?["where"],
        json!({"missing": "b"})
    );
    assert_eq!(
        tree("SELECT a FROM t WHERE b IS NULL")?["where"],
        json!({"missing": "b"})
    );
    Ok(())
}

#[test]
fn test_inequality_with_null_becomes_exists() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t WHERE b != NULL")?["where"],
        json!({"exists": "b"})
    );
    assert_eq!(
        tree("SELECT a FROM t WHERE b IS NOT NULL")?["where"],
        json!({"exists": "b"})
    );
    Ok(())
}

#[test]
fn test_is_with_non_null_rhs_is_plain_comparison() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t WHERE b IS TRUE")?["where"],
        json!({"eq": ["b", true]})
    );
    assert_eq!(
        tree("SELECT a FROM t WHERE b IS NOT FALSE")?["where"],
        json!({"neq": ["b", false]})
    );
    Ok(())
}

#[test]
fn test_null_inside_expressions() -> Result<()> {
    assert_eq!(
        tree("SELECT COALESCE(a, NULL, 1) FROM t")?,
        json!({
            "select": {"value": {"coalesce": ["a", {"null": {}}, 1]}},
            "from": "t",
        })
    );
    Ok(())
}

#[test]
fn test_null_in_replacement_does_not_leak_between_calls() -> Result<()> {
    let stmt = parse("SELECT NULL")?;
    let first = stmt.to_json_with_null(&json!(-1));
    let second = stmt.to_json();
    assert_eq!(first, json!({"select": {"value": -1}}));
    assert_eq!(second, json!({"select": {"value": {"null": {}}}}));
    Ok(())
}

#[test]
fn test_complex_missing_operand() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t WHERE x + y IS NULL")?["where"],
        json!({"missing": {"add": ["x", "y"]}})
    );
    Ok(())
}
