// sqltree: SQL parsing into a canonical JSON-friendly tree

pub mod ast;
pub mod dialect;
pub mod format;
pub mod json;
pub mod keywords;
pub mod lexer;
pub mod parser;

use serde_json::Value;

pub use ast::Stmt;
pub use dialect::Dialect;
pub use format::{FormatError, FormatOptions};
pub use parser::{ParseError, ParseResult, Parser};

/// Parse one statement in the permissive ANSI dialect.
pub fn parse(sql: &str) -> ParseResult<Stmt> {
    parse_dialect(sql, Dialect::Ansi)
}

/// Parse one statement in the given dialect.
pub fn parse_dialect(sql: &str, dialect: Dialect) -> ParseResult<Stmt> {
    let mut parser = Parser::new(sql, dialect);
    parser.parse_statement()
}

pub fn parse_mysql(sql: &str) -> ParseResult<Stmt> {
    parse_dialect(sql, Dialect::MySql)
}

pub fn parse_sqlserver(sql: &str) -> ParseResult<Stmt> {
    parse_dialect(sql, Dialect::SqlServer)
}

pub fn parse_bigquery(sql: &str) -> ParseResult<Stmt> {
    parse_dialect(sql, Dialect::BigQuery)
}

/// Parse and project straight to the JSON tree, with `{"null": {}}`
/// standing in for SQL NULL.
pub fn parse_json(sql: &str, dialect: Dialect) -> ParseResult<Value> {
    Ok(parse_dialect(sql, dialect)?.to_json())
}

/// Parse to JSON with a caller-supplied replacement for SQL NULL.
pub fn parse_json_with_null(sql: &str, dialect: Dialect, null: &Value) -> ParseResult<Value> {
    Ok(parse_dialect(sql, dialect)?.to_json_with_null(null))
}

/// Render a parsed statement back to SQL text.
pub fn format(stmt: &Stmt) -> Result<String, FormatError> {
    format::format(stmt)
}

pub fn format_with(stmt: &Stmt, options: &FormatOptions) -> Result<String, FormatError> {
    format::format_with(stmt, options)
}
