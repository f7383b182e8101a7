use anyhow::Result;
use serde_json::{json, Value};

use sqltree::{parse, parse_json, Dialect};

fn tree(sql: &str) -> Result<Value> {
    Ok(parse_json(sql, Dialect::Ansi)?)
}

#[test]
fn test_insert_with_columns_zips_records() -> Result<()> {
    assert_eq!(
        tree("INSERT INTO t (a, b) VALUES (1, 'x'), (2, 'y')")?,
        json!({
            "insert": "t",
            "columns": ["a", "b"],
            "values": [
                {"a": 1, "b": {"literal": "x"}},
                {"a": 2, "b": {"literal": "y"}},
            ],
        })
    );
    Ok(())
}

#[test]
fn test_insert_without_columns_keeps_rows() -> Result<()> {
    assert_eq!(
        tree("INSERT INTO t VALUES (1, 'x'), (2, 'y')")?,
        json!({
            "insert": "t",
            "values": [
                [1, {"literal": "x"}],
                [2, {"literal": "y"}],
            ],
        })
    );
    Ok(())
}

#[test]
fn test_insert_column_arity_mismatch_is_an_error() {
    assert!(parse("INSERT INTO t (a, b) VALUES (1)").is_err());
}

#[test]
fn test_insert_from_query() -> Result<()> {
    assert_eq!(
        tree("INSERT INTO t SELECT a FROM u")?,
        json!({
            "insert": "t",
            "query": {"select": {"value": "a"}, "from": "u"},
        })
    );
    Ok(())
}

#[test]
fn test_insert_overwrite() -> Result<()> {
    assert_eq!(
        tree("INSERT OVERWRITE TABLE t SELECT a FROM u")?,
        json!({
            "insert": "t",
            "overwrite": true,
            "query": {"select": {"value": "a"}, "from": "u"},
        })
    );
    Ok(())
}

#[test]
fn test_update_preserves_set_order() -> Result<()> {
    let tree = tree("UPDATE t SET b = 1, a = 2 WHERE c = 3")?;
    assert_eq!(
        tree,
        json!({
            "update": "t",
            "set": {"b": 1, "a": 2},
            "where": {"eq": ["c", 3]},
        })
    );
    let keys: Vec<&String> = tree["set"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["b", "a"]);
    Ok(())
}

#[test]
fn test_update_without_where() -> Result<()> {
    assert_eq!(
        tree("UPDATE t SET a = a + 1")?,
        json!({"update": "t", "set": {"a": {"add": ["a", 1]}}})
    );
    Ok(())
}

#[test]
fn test_delete() -> Result<()> {
    assert_eq!(
        tree("DELETE FROM t WHERE a = 1")?,
        json!({"delete": "t", "where": {"eq": ["a", 1]}})
    );
    assert_eq!(tree("DELETE FROM t")?, json!({"delete": "t"}));
    Ok(())
}

#[test]
fn test_delete_requires_from() {
    assert!(parse("DELETE t WHERE a = 1").is_err());
}

#[test]
fn test_copy_into_from_location() -> Result<()> {
    assert_eq!(
        tree("COPY INTO t FROM 's3://bucket/path'")?,
        json!({"copy into": "t", "from": {"literal": "s3://bucket/path"}})
    );
    Ok(())
}

#[test]
fn test_copy_into_from_query_with_options() -> Result<()> {
    assert_eq!(
        tree("COPY INTO t FROM (SELECT a FROM stage) file_format = (type = csv)")?,
        json!({
            "copy into": "t",
            "from": {"select": {"value": "a"}, "from": "stage"},
            "file_format": {"eq": ["type", "csv"]},
        })
    );
    Ok(())
}

#[test]
fn test_copy_into_requires_source() {
    assert!(parse("COPY INTO t").is_err());
}
