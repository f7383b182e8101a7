// DML grammar: INSERT, UPDATE, DELETE.

use linked_hash_map::LinkedHashMap;

use crate::ast::{
    CopySource, CopyStatement, DeleteStatement, Expr, InsertSource, InsertStatement,
    UpdateStatement,
};
use crate::lexer::TokenType;
use crate::parser::core::{ParseResult, Parser};

impl Parser {
    pub(crate) fn parse_insert(&mut self) -> ParseResult<InsertStatement> {
        self.expect_keyword("insert")?;
        let overwrite = self.eat_keyword("overwrite");
        if !overwrite {
            self.eat_keyword("into");
        }
        self.eat_keyword("table");
        let table = self.dotted_name()?;
        let if_exists = self.eat_keywords(&["if", "exists"]);

        // A parenthesized SELECT directly after the table is the source,
        // not a column list.
        let columns = if self.current_token_is(&TokenType::LParen)
            && !self.peek_keyword("select")
            && !self.peek_keyword("with")
        {
            self.paren_identifier_list()?
        } else {
            Vec::new()
        };

        let source = if self.eat_keyword("values") {
            let mut rows = vec![self.parse_values_row()?];
            while self.eat_token(&TokenType::Comma) {
                rows.push(self.parse_values_row()?);
            }
            if columns.is_empty() {
                InsertSource::Rows(rows)
            } else {
                let mut records = Vec::with_capacity(rows.len());
                for row in rows {
                    if row.len() != columns.len() {
                        return Err(self.error(format!(
                            "{} values to match {} columns",
                            row.len(),
                            columns.len()
                        )));
                    }
                    let mut record = LinkedHashMap::new();
                    for (column, value) in columns.iter().zip(row) {
                        record.insert(column.clone(), value);
                    }
                    records.push(record);
                }
                InsertSource::Records(records)
            }
        } else {
            InsertSource::Query(Box::new(self.parse_query()?))
        };

        Ok(InsertStatement { table, overwrite, if_exists, columns, source })
    }

    fn parse_values_row(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect_token(&TokenType::LParen)?;
        let mut row = vec![self.parse_expr()?];
        while self.eat_token(&TokenType::Comma) {
            row.push(self.parse_expr()?);
        }
        self.expect_token(&TokenType::RParen)?;
        Ok(row)
    }

    pub(crate) fn parse_update(&mut self) -> ParseResult<UpdateStatement> {
        self.expect_keyword("update")?;
        let table = self.dotted_name()?;
        self.expect_keyword("set")?;

        // Assignment order is preserved in the wire shape.
        let mut set = LinkedHashMap::new();
        loop {
            let column = self.dotted_name()?;
            self.expect_token(&TokenType::Eq)?;
            let value = self.parse_expr()?;
            set.insert(column, value);
            if !self.eat_token(&TokenType::Comma) {
                break;
            }
        }

        let where_clause = if self.eat_keyword("where") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(UpdateStatement { table, set, where_clause })
    }

    pub(crate) fn parse_copy(&mut self) -> ParseResult<CopyStatement> {
        self.expect_keyword("copy")?;
        self.expect_keyword("into")?;
        let target = self.dotted_name()?;
        self.expect_keyword("from")?;

        let source = match self.current_token().token_type.clone() {
            TokenType::Str(location) => {
                self.next_token();
                CopySource::Location(location)
            }
            TokenType::LParen => {
                self.next_token();
                let query = self.parse_query()?;
                self.expect_token(&TokenType::RParen)?;
                CopySource::Query(Box::new(query))
            }
            _ => CopySource::Name(self.dotted_name()?),
        };

        // Trailing key = value options, as in table options.
        let mut options = LinkedHashMap::new();
        while matches!(self.current_token().token_type, TokenType::Ident(_)) {
            let key = self.any_identifier()?.to_lowercase();
            self.eat_token(&TokenType::Eq);
            options.insert(key, self.parse_expr()?);
        }

        Ok(CopyStatement { target, source, options })
    }

    pub(crate) fn parse_delete(&mut self) -> ParseResult<DeleteStatement> {
        self.expect_keyword("delete")?;
        self.expect_keyword("from")?;
        let table = self.dotted_name()?;
        let where_clause = if self.eat_keyword("where") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(DeleteStatement { table, where_clause })
    }
}
