// DDL grammar: CREATE TABLE / VIEW / INDEX, CACHE TABLE, DROP, ALTER
// TABLE.

use linked_hash_map::LinkedHashMap;

use crate::ast::{
    AlterAction, AlterTableStatement, CacheTableStatement, ColumnDef, ColumnOption,
    CreateIndexStatement, CreateTableStatement, CreateViewStatement, DropKind,
    DropStatement, References, SortItem, Stmt, TableConstraint,
};
use crate::lexer::TokenType;
use crate::parser::core::{ParseResult, Parser};

impl Parser {
    pub(crate) fn parse_create(&mut self) -> ParseResult<Stmt> {
        self.expect_keyword("create")?;
        let replace = self.eat_keywords(&["or", "replace"]);
        let temporary = self.eat_keyword("temporary") || self.eat_keyword("temp");
        let unique = self.eat_keyword("unique");

        if self.eat_keyword("table") {
            Ok(Stmt::CreateTable(self.parse_create_table(replace, temporary)?))
        } else if self.eat_keyword("view") {
            let name = self.dotted_name()?;
            self.expect_keyword("as")?;
            let query = self.parse_query()?;
            Ok(Stmt::CreateView(CreateViewStatement {
                name,
                replace,
                temporary,
                query: Box::new(query),
            }))
        } else if self.eat_keyword("index") {
            Ok(Stmt::CreateIndex(self.parse_create_index(unique)?))
        } else {
            Err(self.error("TABLE, VIEW or INDEX"))
        }
    }

    fn parse_create_table(
        &mut self,
        replace: bool,
        temporary: bool,
    ) -> ParseResult<CreateTableStatement> {
        let if_not_exists = self.eat_keywords(&["if", "not", "exists"]);
        let name = self.dotted_name()?;

        let mut stmt = CreateTableStatement {
            name,
            replace,
            temporary,
            if_not_exists,
            columns: Vec::new(),
            constraints: Vec::new(),
            options: Vec::new(),
            query: None,
        };

        if self.current_token_is(&TokenType::LParen) && !self.peek_keyword("select") {
            self.next_token();
            loop {
                if let Some(constraint) = self.parse_table_constraint()? {
                    stmt.constraints.push(constraint);
                } else {
                    stmt.columns.push(self.parse_column_def()?);
                }
                if !self.eat_token(&TokenType::Comma) {
                    break;
                }
            }
            self.expect_token(&TokenType::RParen)?;
        }

        // Trailing table options up to an optional AS query.
        loop {
            if self.eat_keyword("as") {
                stmt.query = Some(Box::new(self.parse_query()?));
                break;
            }
            if self.is_query_start() {
                stmt.query = Some(Box::new(self.parse_query()?));
                break;
            }
            if !matches!(self.current_token().token_type, TokenType::Ident(_)) {
                break;
            }
            let key = if self.eat_keyword("default") {
                if self.eat_keyword("charset") || self.eat_keywords(&["character", "set"]) {
                    "default_charset".to_string()
                } else {
                    return Err(self.error("CHARSET"));
                }
            } else {
                self.any_identifier()?.to_lowercase()
            };
            self.eat_token(&TokenType::Eq);
            let value = self.parse_expr()?;
            stmt.options.push((key, value));
        }

        Ok(stmt)
    }

    /// A table-level constraint, or None when the element is a column.
    fn parse_table_constraint(&mut self) -> ParseResult<Option<TableConstraint>> {
        let name = if self.eat_keyword("constraint") {
            Some(self.identifier()?)
        } else {
            None
        };

        let constraint = if self.eat_keywords(&["primary", "key"]) {
            Some(TableConstraint::PrimaryKey {
                name,
                columns: self.paren_identifier_list()?,
            })
        } else if self.at_keyword("unique")
            && (self.peek_token_is(&TokenType::LParen)
                || self.peek_keyword("key")
                || self.peek_keyword("index"))
        {
            self.next_token();
            self.eat_keyword("key");
            self.eat_keyword("index");
            Some(TableConstraint::Unique {
                name,
                columns: self.paren_identifier_list()?,
            })
        } else if self.at_keyword("index") || self.at_keyword("key") {
            self.next_token();
            let index_name = if self.current_token_is(&TokenType::LParen) {
                None
            } else {
                Some(self.identifier()?)
            };
            Some(TableConstraint::Index {
                name: name.or(index_name),
                columns: self.paren_identifier_list()?,
            })
        } else if self.eat_keywords(&["foreign", "key"]) {
            let columns = self.paren_identifier_list()?;
            self.expect_keyword("references")?;
            let references = self.parse_references()?;
            Some(TableConstraint::ForeignKey { name, columns, references })
        } else if self.at_keyword("check") && self.peek_token_is(&TokenType::LParen) {
            self.next_token();
            self.expect_token(&TokenType::LParen)?;
            let expr = self.parse_expr()?;
            self.expect_token(&TokenType::RParen)?;
            Some(TableConstraint::Check { name, expr })
        } else if name.is_some() {
            return Err(self.error("constraint definition"));
        } else {
            None
        };
        Ok(constraint)
    }

    pub(crate) fn parse_column_def(&mut self) -> ParseResult<ColumnDef> {
        let name = self.identifier()?;
        let ty = self.parse_type()?;
        let mut options = Vec::new();

        loop {
            if self.eat_keywords(&["not", "null"]) {
                options.push(ColumnOption::NotNull);
            } else if self.eat_keyword("null") {
                options.push(ColumnOption::Null);
            } else if self.eat_keyword("unique") {
                self.eat_keyword("key");
                options.push(ColumnOption::Unique);
            } else if self.eat_keyword("auto_increment") {
                options.push(ColumnOption::AutoIncrement);
            } else if self.eat_keywords(&["primary", "key"]) {
                options.push(ColumnOption::PrimaryKey);
            } else if self.eat_keyword("default") {
                options.push(ColumnOption::Default(self.parse_expr()?));
            } else if self.at_keyword("check") && self.peek_token_is(&TokenType::LParen) {
                self.next_token();
                self.expect_token(&TokenType::LParen)?;
                let expr = self.parse_expr()?;
                self.expect_token(&TokenType::RParen)?;
                options.push(ColumnOption::Check(expr));
            } else if self.eat_keyword("references") {
                options.push(ColumnOption::References(self.parse_references()?));
            } else if self.eat_keyword("comment") {
                match self.current_token().token_type.clone() {
                    TokenType::Str(text) => {
                        self.next_token();
                        options.push(ColumnOption::Comment(text));
                    }
                    _ => return Err(self.error("string literal")),
                }
            } else if self.eat_keyword("collate") {
                options.push(ColumnOption::Collate(self.identifier()?));
            } else if self.at_keyword("identity") && self.peek_token_is(&TokenType::LParen) {
                self.next_token();
                self.expect_token(&TokenType::LParen)?;
                let start = self.parse_signed_int()?;
                self.expect_token(&TokenType::Comma)?;
                let increment = self.parse_signed_int()?;
                self.expect_token(&TokenType::RParen)?;
                options.push(ColumnOption::Identity { start, increment });
            } else {
                break;
            }
        }
        Ok(ColumnDef { name, ty, options })
    }

    fn parse_signed_int(&mut self) -> ParseResult<i64> {
        let negative = self.eat_token(&TokenType::Minus);
        match self.current_token().token_type {
            TokenType::Int(n) => {
                self.next_token();
                Ok(if negative { -n } else { n })
            }
            _ => Err(self.error("integer")),
        }
    }

    fn parse_references(&mut self) -> ParseResult<References> {
        let table = self.dotted_name()?;
        let columns = if self.current_token_is(&TokenType::LParen) {
            self.paren_identifier_list()?
        } else {
            Vec::new()
        };
        Ok(References { table, columns })
    }

    fn parse_create_index(&mut self, unique: bool) -> ParseResult<CreateIndexStatement> {
        let name = self.dotted_name()?;
        self.expect_keyword("on")?;
        let table = self.dotted_name()?;
        let mut using = if self.eat_keyword("using") {
            Some(self.identifier()?)
        } else {
            None
        };
        self.expect_token(&TokenType::LParen)?;
        let columns: Vec<SortItem> = self.parse_sort_items()?;
        self.expect_token(&TokenType::RParen)?;
        if using.is_none() && self.eat_keyword("using") {
            using = Some(self.identifier()?);
        }
        Ok(CreateIndexStatement { name, table, unique, using, columns })
    }

    pub(crate) fn parse_cache_table(&mut self) -> ParseResult<CacheTableStatement> {
        self.expect_keyword("cache")?;
        let lazy = self.eat_keyword("lazy");
        self.expect_keyword("table")?;
        let name = self.dotted_name()?;

        let mut options = LinkedHashMap::new();
        if self.eat_keyword("options") {
            self.expect_token(&TokenType::LParen)?;
            loop {
                let key = match self.current_token().token_type.clone() {
                    TokenType::Str(key) => {
                        self.next_token();
                        key
                    }
                    _ => self.any_identifier()?,
                };
                self.expect_token(&TokenType::Eq)?;
                options.insert(key, self.parse_expr()?);
                if !self.eat_token(&TokenType::Comma) {
                    break;
                }
            }
            self.expect_token(&TokenType::RParen)?;
        }

        let query = if self.eat_keyword("as") || self.is_query_start() {
            Some(Box::new(self.parse_query()?))
        } else {
            None
        };
        Ok(CacheTableStatement { name, lazy, options, query })
    }

    pub(crate) fn parse_drop(&mut self) -> ParseResult<DropStatement> {
        self.expect_keyword("drop")?;
        let kind = if self.eat_keyword("table") {
            DropKind::Table
        } else if self.eat_keyword("view") {
            DropKind::View
        } else if self.eat_keyword("index") {
            DropKind::Index
        } else {
            return Err(self.error("TABLE, VIEW or INDEX"));
        };
        let if_exists = self.eat_keywords(&["if", "exists"]);
        let name = self.dotted_name()?;
        Ok(DropStatement { kind, name, if_exists })
    }

    pub(crate) fn parse_alter_table(&mut self) -> ParseResult<AlterTableStatement> {
        self.expect_keyword("alter")?;
        self.expect_keyword("table")?;
        let table = self.dotted_name()?;

        let action = if self.eat_keyword("add") {
            self.eat_keyword("column");
            AlterAction::AddColumn(self.parse_column_def()?)
        } else if self.eat_keyword("drop") {
            self.eat_keyword("column");
            AlterAction::DropColumn(self.identifier()?)
        } else if self.eat_keyword("rename") {
            self.expect_keyword("to")?;
            AlterAction::RenameTo(self.identifier()?)
        } else {
            return Err(self.error("ADD, DROP or RENAME"));
        };
        Ok(AlterTableStatement { table, action })
    }
}
