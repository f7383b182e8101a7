use anyhow::Result;
use serde_json::{json, Value};

use sqltree::{parse_json, Dialect};

fn tree(sql: &str) -> Result<Value> {
    Ok(parse_json(sql, Dialect::Ansi)?)
}

fn value(sql: &str) -> Result<Value> {
    let mut tree = tree(sql)?;
    let select = tree
        .as_object_mut()
        .and_then(|map| map.remove("select"))
        .expect("no select clause");
    Ok(select.as_object().map(|map| map["value"].clone()).unwrap_or(select))
}

#[test]
fn test_multiplication_binds_before_addition() -> Result<()> {
    assert_eq!(value("SELECT 1 + 2 * 3")?, json!({"add": [1, {"mul": [2, 3]}]}));
    assert_eq!(
        value("SELECT (1 + 2) * 3")?,
        json!({"mul": [{"add": [1, 2]}, 3]})
    );
    Ok(())
}

#[test]
fn test_associative_chains_flatten() -> Result<()> {
    assert_eq!(value("SELECT 1 + 2 + 3 + 4")?, json!({"add": [1, 2, 3, 4]}));
    assert_eq!(
        tree("SELECT x FROM t WHERE a AND b AND c")?["where"],
        json!({"and": ["a", "b", "c"]})
    );
    Ok(())
}

#[test]
fn test_comparison_chain() -> Result<()> {
    assert_eq!(
        tree("SELECT x FROM t WHERE a < b AND b <= c AND c <> d")?["where"],
        json!({"and": [
            {"lt": ["a", "b"]},
            {"lte": ["b", "c"]},
            {"neq": ["c", "d"]},
        ]})
    );
    Ok(())
}

#[test]
fn test_not_binds_looser_than_comparison() -> Result<()> {
    assert_eq!(
        tree("SELECT x FROM t WHERE NOT a = b")?["where"],
        json!({"not": {"eq": ["a", "b"]}})
    );
    Ok(())
}

#[test]
fn test_unary_minus() -> Result<()> {
    assert_eq!(value("SELECT -5")?, json!(-5));
    assert_eq!(value("SELECT -x")?, json!({"neg": "x"}));
    assert_eq!(value("SELECT -(x + 1)")?, json!({"neg": {"add": ["x", 1]}}));
    Ok(())
}

#[test]
fn test_concat_merges_literals() -> Result<()> {
    assert_eq!(
        value("SELECT 'a' || 'b'")?,
        json!({"concat": {"literal": ["a", "b"]}})
    );
    assert_eq!(value("SELECT a || 'b'")?, json!({"concat": ["a", {"literal": "b"}]}));
    Ok(())
}

#[test]
fn test_between() -> Result<()> {
    assert_eq!(
        tree("SELECT x FROM t WHERE a BETWEEN 1 AND 10")?["where"],
        json!({"between": ["a", 1, 10]})
    );
    assert_eq!(
        tree("SELECT x FROM t WHERE a NOT BETWEEN 1 AND 10")?["where"],
        json!({"not_between": ["a", 1, 10]})
    );
    Ok(())
}

#[test]
fn test_like_family() -> Result<()> {
    assert_eq!(
        tree("SELECT x FROM t WHERE a LIKE 'x%'")?["where"],
        json!({"like": ["a", {"literal": "x%"}]})
    );
    assert_eq!(
        tree("SELECT x FROM t WHERE a NOT LIKE 'x%'")?["where"],
        json!({"not_like": ["a", {"literal": "x%"}]})
    );
    assert_eq!(
        tree("SELECT x FROM t WHERE a SIMILAR TO 'x%'")?["where"],
        json!({"similar_to": ["a", {"literal": "x%"}]})
    );
    Ok(())
}

#[test]
fn test_in_list_keeps_list_shape() -> Result<()> {
    assert_eq!(
        tree("SELECT x FROM t WHERE a IN (1)")?["where"],
        json!({"in": ["a", [1]]})
    );
    assert_eq!(
        tree("SELECT x FROM t WHERE a NOT IN (1, 2)")?["where"],
        json!({"nin": ["a", [1, 2]]})
    );
    Ok(())
}

#[test]
fn test_cast_forms() -> Result<()> {
    assert_eq!(value("SELECT CAST(a AS int)")?, json!({"cast": ["a", {"int": {}}]}));
    assert_eq!(value("SELECT a::int")?, json!({"cast": ["a", {"int": {}}]}));
    assert_eq!(
        value("SELECT CAST(a AS decimal(10, 2))")?,
        json!({"cast": ["a", {"decimal": [10, 2]}]})
    );
    assert_eq!(
        value("SELECT TRY_CAST(a AS int)")?,
        json!({"safe_cast": ["a", {"int": {}}]})
    );
    Ok(())
}

#[test]
fn test_case_expressions() -> Result<()> {
    assert_eq!(
        value("SELECT CASE WHEN a THEN 1 ELSE 2 END")?,
        json!({"case": [{"when": "a", "then": 1}, 2]})
    );
    // Switch form rewrites to the generic form.
    assert_eq!(
        value("SELECT CASE a WHEN 1 THEN 'x' END")?,
        json!({"case": {"when": {"eq": ["a", 1]}, "then": {"literal": "x"}}})
    );
    Ok(())
}

#[test]
fn test_interval() -> Result<()> {
    assert_eq!(value("SELECT INTERVAL 2 DAY")?, json!({"interval": [2, "day"]}));
    assert_eq!(
        value("SELECT INTERVAL 2 DAY 3 HOUR")?,
        json!({"add": [{"interval": [2, "day"]}, {"interval": [3, "hour"]}]})
    );
    Ok(())
}

#[test]
fn test_extract_and_trim() -> Result<()> {
    assert_eq!(value("SELECT EXTRACT(year FROM a)")?, json!({"extract": ["year", "a"]}));
    assert_eq!(value("SELECT TRIM(' x ')")?, json!({"trim": {"literal": " x "}}));
    assert_eq!(
        value("SELECT TRIM(LEADING 'x' FROM a)")?,
        json!({"trim": "a", "characters": {"literal": "x"}, "direction": "leading"})
    );
    Ok(())
}

#[test]
fn test_subscript() -> Result<()> {
    assert_eq!(value("SELECT a[1]")?, json!({"get": ["a", 1]}));
    assert_eq!(value("SELECT a[1][2]")?, json!({"get": [{"get": ["a", 1]}, 2]}));
    Ok(())
}

#[test]
fn test_implicit_multiplication() -> Result<()> {
    assert_eq!(value("SELECT 23e7test")?, json!({"mul": [230000000, "test"]}));
    Ok(())
}

#[test]
fn test_numbers() -> Result<()> {
    assert_eq!(value("SELECT 23e7")?, json!(230000000));
    assert_eq!(value("SELECT 1.5")?, json!(1.5));
    assert_eq!(value("SELECT 0xFF")?, json!({"hex": "FF"}));
    Ok(())
}

#[test]
fn test_count_distinct() -> Result<()> {
    assert_eq!(
        value("SELECT COUNT(DISTINCT a)")?,
        json!({"count": {"distinct": "a"}})
    );
    Ok(())
}

#[test]
fn test_deep_nesting_is_rejected() {
    let mut sql = String::from("SELECT ");
    for _ in 0..300 {
        sql.push('(');
    }
    sql.push('1');
    for _ in 0..300 {
        sql.push(')');
    }
    assert!(sqltree::parse(&sql).is_err());
}
