use anyhow::Result;
use serde_json::{json, Value};

use sqltree::{parse, parse_json, Dialect};

fn tree(sql: &str) -> Result<Value> {
    Ok(parse_json(sql, Dialect::Ansi)?)
}

#[test]
fn test_simple_select_query() -> Result<()> {
    assert_eq!(
        tree("SELECT id, name FROM test_table WHERE id > 5")?,
        json!({
            "select": [{"value": "id"}, {"value": "name"}],
            "from": "test_table",
            "where": {"gt": ["id", 5]},
        })
    );
    Ok(())
}

#[test]
fn test_select_star() -> Result<()> {
    assert_eq!(tree("SELECT * FROM t")?, json!({"select": "*", "from": "t"}));
    Ok(())
}

#[test]
fn test_select_without_from() -> Result<()> {
    assert_eq!(tree("SELECT 1")?, json!({"select": {"value": 1}}));
    Ok(())
}

#[test]
fn test_aliases() -> Result<()> {
    assert_eq!(
        tree("SELECT a AS x, b y FROM t AS s")?,
        json!({
            "select": [
                {"value": "a", "name": "x"},
                {"value": "b", "name": "y"},
            ],
            "from": {"value": "t", "name": "s"},
        })
    );
    Ok(())
}

#[test]
fn test_dotted_names() -> Result<()> {
    assert_eq!(
        tree("SELECT t.a, t.* FROM db.t")?,
        json!({
            "select": [{"value": "t.a"}, {"value": "t.*"}],
            "from": "db.t",
        })
    );
    Ok(())
}

#[test]
fn test_join_with_on() -> Result<()> {
    assert_eq!(
        tree("SELECT * FROM t LEFT JOIN u ON t.a = u.a")?,
        json!({
            "select": "*",
            "from": ["t", {"left join": "u", "on": {"eq": ["t.a", "u.a"]}}],
        })
    );
    Ok(())
}

#[test]
fn test_join_with_using() -> Result<()> {
    assert_eq!(
        tree("SELECT * FROM t JOIN u USING (a, b)")?,
        json!({
            "select": "*",
            "from": ["t", {"join": "u", "using": ["a", "b"]}],
        })
    );
    Ok(())
}

#[test]
fn test_comma_sources() -> Result<()> {
    assert_eq!(
        tree("SELECT * FROM t, u")?,
        json!({"select": "*", "from": ["t", "u"]})
    );
    Ok(())
}

#[test]
fn test_group_by_and_having() -> Result<()> {
    assert_eq!(
        tree("SELECT a, COUNT(b) FROM t GROUP BY a HAVING COUNT(b) > 1")?,
        json!({
            "select": [{"value": "a"}, {"value": {"count": "b"}}],
            "from": "t",
            "groupby": {"value": "a"},
            "having": {"gt": [{"count": "b"}, 1]},
        })
    );
    Ok(())
}

#[test]
fn test_order_limit_offset() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t ORDER BY a DESC, b NULLS FIRST LIMIT 10 OFFSET 5")?,
        json!({
            "select": {"value": "a"},
            "from": "t",
            "orderby": [
                {"value": "a", "sort": "desc"},
                {"value": "b", "nulls": "first"},
            ],
            "limit": 10,
            "offset": 5,
        })
    );
    Ok(())
}

#[test]
fn test_subquery_in_from() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM (SELECT b AS a FROM t) AS s")?,
        json!({
            "select": {"value": "a"},
            "from": {
                "value": {"select": {"value": "b", "name": "a"}, "from": "t"},
                "name": "s",
            },
        })
    );
    Ok(())
}

#[test]
fn test_subquery_in_where() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t WHERE b IN (SELECT c FROM u)")?,
        json!({
            "select": {"value": "a"},
            "from": "t",
            "where": {"in": ["b", {"select": {"value": "c"}, "from": "u"}]},
        })
    );
    Ok(())
}

#[test]
fn test_with_clause() -> Result<()> {
    assert_eq!(
        tree("WITH s AS (SELECT 1 AS a) SELECT * FROM s")?,
        json!({
            "select": "*",
            "from": "s",
            "with": {"name": "s", "value": {"select": {"value": 1, "name": "a"}}},
        })
    );
    Ok(())
}

#[test]
fn test_qualify_clause() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t QUALIFY ROW_NUMBER() OVER (ORDER BY a) = 1")?,
        json!({
            "select": {"value": "a"},
            "from": "t",
            "qualify": {"eq": [
                {"over": {"orderby": {"value": "a"}}, "value": {"row_number": {}}},
                1,
            ]},
        })
    );
    Ok(())
}

#[test]
fn test_window_function() -> Result<()> {
    assert_eq!(
        tree("SELECT SUM(x) OVER (PARTITION BY a ORDER BY b) FROM t")?,
        json!({
            "select": {
                "over": {"partitionby": "a", "orderby": {"value": "b"}},
                "value": {"sum": "x"},
            },
            "from": "t",
        })
    );
    Ok(())
}

#[test]
fn test_distinct() -> Result<()> {
    assert_eq!(
        tree("SELECT DISTINCT a, b FROM t")?,
        json!({
            "select_distinct": [{"value": "a"}, {"value": "b"}],
            "from": "t",
        })
    );
    Ok(())
}

#[test]
fn test_trailing_semicolon_is_accepted() -> Result<()> {
    assert_eq!(
        tree("SELECT a FROM t;")?,
        json!({"select": {"value": "a"}, "from": "t"})
    );
    Ok(())
}

#[test]
fn test_comments_are_skipped() -> Result<()> {
    assert_eq!(
        tree("SELECT a -- trailing words\nFROM t /* block */ WHERE b = 1")?,
        json!({
            "select": {"value": "a"},
            "from": "t",
            "where": {"eq": ["b", 1]},
        })
    );
    Ok(())
}

#[test]
fn test_syntax_error_reports_position() {
    let err = parse("SELECT a FROM\nWHERE b").unwrap_err();
    let text = err.to_string();
    assert!(text.contains("line 2"), "unexpected message: {}", text);
}

#[test]
fn test_garbage_after_statement_is_an_error() {
    assert!(parse("SELECT a FROM t extra garbage here ~").is_err());
}
