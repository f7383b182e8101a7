// SQL parser: recursive descent over the lexer's token stream, split
// by grammar area.

mod core;
mod ddl;
mod dml;
mod expr;
mod select;

pub use self::core::{ParseError, ParseResult, Parser};

use crate::ast::Stmt;
use crate::lexer::TokenType;

impl Parser {
    /// Parse one complete statement; all input must be consumed.
    pub fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let stmt = if self.is_query_start() || self.current_token_is(&TokenType::LParen) {
            Stmt::Query(self.parse_query()?)
        } else if self.at_keyword("insert") {
            Stmt::Insert(self.parse_insert()?)
        } else if self.at_keyword("update") {
            Stmt::Update(self.parse_update()?)
        } else if self.at_keyword("delete") {
            Stmt::Delete(self.parse_delete()?)
        } else if self.at_keyword("copy") {
            Stmt::Copy(self.parse_copy()?)
        } else if self.at_keyword("create") {
            self.parse_create()?
        } else if self.at_keyword("drop") {
            Stmt::Drop(self.parse_drop()?)
        } else if self.at_keyword("alter") {
            Stmt::AlterTable(self.parse_alter_table()?)
        } else if self.at_keyword("cache") {
            Stmt::CacheTable(self.parse_cache_table()?)
        } else {
            return Err(self.error("statement"));
        };
        self.expect_end()?;
        Ok(stmt)
    }
}
