use anyhow::Result;
use serde_json::{json, Value};

use sqltree::{parse_json, Dialect};

fn tree(sql: &str) -> Result<Value> {
    Ok(parse_json(sql, Dialect::Ansi)?)
}

#[test]
fn test_create_table_columns() -> Result<()> {
    assert_eq!(
        tree("CREATE TABLE t (id INTEGER PRIMARY KEY, name VARCHAR(25) NOT NULL)")?,
        json!({"create table": {
            "name": "t",
            "columns": [
                {"name": "id", "type": {"integer": {}}, "primary_key": true},
                {"name": "name", "type": {"varchar": 25}, "nullable": false},
            ],
        }})
    );
    Ok(())
}

#[test]
fn test_create_table_single_column_collapses() -> Result<()> {
    assert_eq!(
        tree("CREATE TABLE t (id int)")?,
        json!({"create table": {
            "name": "t",
            "columns": {"name": "id", "type": {"int": {}}},
        }})
    );
    Ok(())
}

#[test]
fn test_create_table_with_default_and_check() -> Result<()> {
    assert_eq!(
        tree("CREATE TABLE t (n int DEFAULT 0 CHECK (n >= 0))")?,
        json!({"create table": {
            "name": "t",
            "columns": {
                "name": "n",
                "type": {"int": {}},
                "default": 0,
                "check": {"gte": ["n", 0]},
            },
        }})
    );
    Ok(())
}

#[test]
fn test_create_table_constraint_and_options() -> Result<()> {
    assert_eq!(
        tree("CREATE TABLE t (id int, CONSTRAINT pk PRIMARY KEY (id)) ENGINE=InnoDB DEFAULT CHARSET=utf8")?,
        json!({"create table": {
            "name": "t",
            "columns": {"name": "id", "type": {"int": {}}},
            "constraint": {"primary_key": {"columns": "id"}, "name": "pk"},
            "engine": "InnoDB",
            "default_charset": "utf8",
        }})
    );
    Ok(())
}

#[test]
fn test_create_table_if_not_exists() -> Result<()> {
    assert_eq!(
        tree("CREATE TABLE IF NOT EXISTS t (a int)")?,
        json!({"create table": {
            "name": "t",
            "if_not_exists": true,
            "columns": {"name": "a", "type": {"int": {}}},
        }})
    );
    Ok(())
}

#[test]
fn test_create_table_as_select() -> Result<()> {
    assert_eq!(
        tree("CREATE TABLE t AS SELECT a FROM u")?,
        json!({"create table": {
            "name": "t",
            "query": {"select": {"value": "a"}, "from": "u"},
        }})
    );
    Ok(())
}

#[test]
fn test_create_or_replace_temporary_table() -> Result<()> {
    assert_eq!(
        tree("CREATE OR REPLACE TEMPORARY TABLE t (a int)")?,
        json!({"create table": {
            "name": "t",
            "replace": true,
            "temporary": true,
            "columns": {"name": "a", "type": {"int": {}}},
        }})
    );
    Ok(())
}

#[test]
fn test_create_view() -> Result<()> {
    assert_eq!(
        tree("CREATE VIEW v AS SELECT a FROM t")?,
        json!({"create view": {
            "name": "v",
            "query": {"select": {"value": "a"}, "from": "t"},
        }})
    );
    Ok(())
}

#[test]
fn test_create_index() -> Result<()> {
    assert_eq!(
        tree("CREATE UNIQUE INDEX i ON t (a, b DESC)")?,
        json!({"create index": {
            "name": "i",
            "table": "t",
            "unique": true,
            "columns": [
                {"value": "a"},
                {"value": "b", "sort": "desc"},
            ],
        }})
    );
    Ok(())
}

#[test]
fn test_drop_statements() -> Result<()> {
    assert_eq!(tree("DROP TABLE t")?, json!({"drop": {"table": "t"}}));
    assert_eq!(
        tree("DROP TABLE IF EXISTS t")?,
        json!({"drop": {"table": "t", "if_exists": true}})
    );
    assert_eq!(tree("DROP VIEW v")?, json!({"drop": {"view": "v"}}));
    assert_eq!(tree("DROP INDEX i")?, json!({"drop": {"index": "i"}}));
    Ok(())
}

#[test]
fn test_alter_table() -> Result<()> {
    assert_eq!(
        tree("ALTER TABLE t ADD COLUMN c int")?,
        json!({"alter table": {
            "table": "t",
            "add": {"name": "c", "type": {"int": {}}},
        }})
    );
    assert_eq!(
        tree("ALTER TABLE t DROP COLUMN c")?,
        json!({"alter table": {"table": "t", "drop": "c"}})
    );
    assert_eq!(
        tree("ALTER TABLE t RENAME TO u")?,
        json!({"alter table": {"table": "t", "rename_to": "u"}})
    );
    Ok(())
}

#[test]
fn test_cache_table() -> Result<()> {
    assert_eq!(
        tree("CACHE TABLE t AS SELECT a FROM u")?,
        json!({"cache table": {
            "name": "t",
            "query": {"select": {"value": "a"}, "from": "u"},
        }})
    );
    Ok(())
}

#[test]
fn test_struct_and_array_column_types() -> Result<()> {
    assert_eq!(
        tree("CREATE TABLE t (a array<int64>)")?,
        json!({"create table": {
            "name": "t",
            "columns": {"name": "a", "type": {"array": {"int64": {}}}},
        }})
    );
    Ok(())
}
