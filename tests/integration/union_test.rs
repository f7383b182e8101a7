use anyhow::Result;
use serde_json::{json, Value};

use sqltree::{parse_json, Dialect};

fn tree(sql: &str) -> Result<Value> {
    Ok(parse_json(sql, Dialect::Ansi)?)
}

#[test]
fn test_union_of_two() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t UNION SELECT b FROM u")?,
        json!({"union": [
            {"select": {"value": "a"}, "from": "t"},
            {"select": {"value": "b"}, "from": "u"},
        ]})
    );
    Ok(())
}

#[test]
fn test_union_run_stays_flat() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t UNION SELECT b FROM u UNION SELECT c FROM v")?,
        json!({"union": [
            {"select": {"value": "a"}, "from": "t"},
            {"select": {"value": "b"}, "from": "u"},
            {"select": {"value": "c"}, "from": "v"},
        ]})
    );
    Ok(())
}

#[test]
fn test_mixed_set_ops_nest_right() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t UNION SELECT b FROM u UNION ALL SELECT c FROM v")?,
        json!({"union": [
            {"select": {"value": "a"}, "from": "t"},
            {"union_all": [
                {"select": {"value": "b"}, "from": "u"},
                {"select": {"value": "c"}, "from": "v"},
            ]},
        ]})
    );
    Ok(())
}

#[test]
fn test_intersect_except_minus() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t INTERSECT SELECT b FROM u")?,
        json!({"intersect": [
            {"select": {"value": "a"}, "from": "t"},
            {"select": {"value": "b"}, "from": "u"},
        ]})
    );
    assert_eq!(
        tree("SELECT a FROM t EXCEPT SELECT b FROM u")?,
        json!({"except": [
            {"select": {"value": "a"}, "from": "t"},
            {"select": {"value": "b"}, "from": "u"},
        ]})
    );
    assert_eq!(
        tree("SELECT a FROM t MINUS SELECT b FROM u")?,
        json!({"minus": [
            {"select": {"value": "a"}, "from": "t"},
            {"select": {"value": "b"}, "from": "u"},
        ]})
    );
    Ok(())
}

#[test]
fn test_trailing_orderby_binds_whole_union() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t UNION SELECT b FROM u ORDER BY a LIMIT 5")?,
        json!({
            "from": {"union": [
                {"select": {"value": "a"}, "from": "t"},
                {"select": {"value": "b"}, "from": "u"},
            ]},
            "orderby": {"value": "a"},
            "limit": 5,
        })
    );
    Ok(())
}

#[test]
fn test_parenthesized_arm_keeps_its_own_orderby() -> Result<()> {
    assert_eq!(
        tree("(SELECT a FROM t ORDER BY a) UNION ALL SELECT b FROM u")?,
        json!({"union_all": [
            {"select": {"value": "a"}, "from": "t", "orderby": {"value": "a"}},
            {"select": {"value": "b"}, "from": "u"},
        ]})
    );
    Ok(())
}

#[test]
fn test_with_merges_beside_set_op() -> Result<()> {
    assert_eq!(
        tree("WITH s AS (SELECT 1) SELECT a FROM s UNION ALL SELECT b FROM u")?,
        json!({
            "union_all": [
                {"select": {"value": "a"}, "from": "s"},
                {"select": {"value": "b"}, "from": "u"},
            ],
            "with": {"name": "s", "value": {"select": {"value": 1}}},
        })
    );
    Ok(())
}

#[test]
fn test_nested_with_keeps_inner_ctes() -> Result<()> {
    assert_eq!(
        tree("WITH a AS (SELECT 1) (WITH b AS (SELECT 2) SELECT x FROM b)")?,
        json!({
            "from": {
                "select": {"value": "x"},
                "from": "b",
                "with": {"name": "b", "value": {"select": {"value": 2}}},
            },
            "with": {"name": "a", "value": {"select": {"value": 1}}},
        })
    );
    Ok(())
}

#[test]
fn test_union_arms_may_be_parenthesized() -> Result<()> {
    assert_eq!(
        tree("(SELECT a FROM t) UNION (SELECT b FROM u)")?,
        json!({"union": [
            {"select": {"value": "a"}, "from": "t"},
            {"select": {"value": "b"}, "from": "u"},
        ]})
    );
    Ok(())
}
