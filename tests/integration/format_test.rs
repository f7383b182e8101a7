use anyhow::Result;

use sqltree::{format, format_with, parse, parse_mysql, FormatError, FormatOptions};

fn roundtrip(sql: &str) -> Result<String> {
    Ok(format(&parse(sql)?)?)
}

#[test]
fn test_basic_select() -> Result<()> {
    assert_eq!(
        roundtrip("select a, b as c from t where d = 1")?,
        "SELECT a, b AS c FROM t WHERE d = 1"
    );
    Ok(())
}

#[test]
fn test_precedence_parens() -> Result<()> {
    assert_eq!(roundtrip("select a + b * c")?, "SELECT a + b * c");
    assert_eq!(roundtrip("select (a + b) * c")?, "SELECT (a + b) * c");
    assert_eq!(
        roundtrip("select a from t where (x or y) and z")?,
        "SELECT a FROM t WHERE (x OR y) AND z"
    );
    Ok(())
}

#[test]
fn test_identifier_quoting() -> Result<()> {
    assert_eq!(roundtrip("select \"a b\" from t")?, "SELECT \"a b\" FROM t");
    assert_eq!(roundtrip("select \"from\" from t")?, "SELECT \"from\" FROM t");
    assert_eq!(roundtrip("select plain from t")?, "SELECT plain FROM t");
    Ok(())
}

#[test]
fn test_backtick_option() -> Result<()> {
    let stmt = parse_mysql("select `a b` from t")?;
    let options = FormatOptions { ansi_quotes: false };
    assert_eq!(format_with(&stmt, &options)?, "SELECT `a b` FROM t");
    Ok(())
}

#[test]
fn test_string_escaping() -> Result<()> {
    assert_eq!(roundtrip("select 'it''s'")?, "SELECT 'it''s'");
    Ok(())
}

#[test]
fn test_null_tests() -> Result<()> {
    assert_eq!(
        roundtrip("select a from t where b = null")?,
        "SELECT a FROM t WHERE b IS NULL"
    );
    assert_eq!(
        roundtrip("select a from t where b is not null")?,
        "SELECT a FROM t WHERE b IS NOT NULL"
    );
    Ok(())
}

#[test]
fn test_clause_order() -> Result<()> {
    assert_eq!(
        roundtrip(
            "select a from t where b = 1 group by a having count(c) > 0 order by a limit 5 offset 2"
        )?,
        "SELECT a FROM t WHERE b = 1 GROUP BY a HAVING COUNT(c) > 0 ORDER BY a LIMIT 5 OFFSET 2"
    );
    Ok(())
}

#[test]
fn test_set_operations() -> Result<()> {
    assert_eq!(
        roundtrip("select a from t union all select b from u")?,
        "SELECT a FROM t UNION ALL SELECT b FROM u"
    );
    Ok(())
}

#[test]
fn test_with_clause() -> Result<()> {
    assert_eq!(
        roundtrip("with s as (select 1 as a) select a from s")?,
        "WITH s AS (SELECT 1 AS a) SELECT a FROM s"
    );
    Ok(())
}

#[test]
fn test_joins() -> Result<()> {
    assert_eq!(
        roundtrip("select a from t left join u on t.x = u.x")?,
        "SELECT a FROM t LEFT JOIN u ON t.x = u.x"
    );
    Ok(())
}

#[test]
fn test_case_expression() -> Result<()> {
    assert_eq!(
        roundtrip("select case when a = 1 then 'x' else 'y' end from t")?,
        "SELECT CASE WHEN a = 1 THEN 'x' ELSE 'y' END FROM t"
    );
    Ok(())
}

#[test]
fn test_window_function() -> Result<()> {
    assert_eq!(
        roundtrip("select sum(a) over (partition by b order by c) from t")?,
        "SELECT SUM(a) OVER (PARTITION BY b ORDER BY c) FROM t"
    );
    Ok(())
}

#[test]
fn test_dml_and_ddl_are_unsupported() -> Result<()> {
    let delete = parse("delete from t")?;
    assert!(matches!(format(&delete), Err(FormatError::UnsupportedNode(_))));
    let create = parse("create table t (a int)")?;
    assert!(matches!(format(&create), Err(FormatError::UnsupportedNode(_))));
    Ok(())
}

#[test]
fn test_formatted_text_reparses_to_same_tree() -> Result<()> {
    let cases = [
        "SELECT a, b FROM t WHERE c IN (1, 2, 3)",
        "SELECT DISTINCT x FROM t ORDER BY x DESC NULLS LAST",
        "SELECT a FROM t WHERE b BETWEEN 1 AND 10 OR c LIKE 'x%'",
        "SELECT CAST(a AS INT) FROM t",
    ];
    for sql in cases {
        let stmt = parse(sql)?;
        let text = format(&stmt)?;
        let restmt = parse(&text)?;
        assert_eq!(stmt.to_json(), restmt.to_json(), "not stable: {}", sql);
    }
    Ok(())
}
