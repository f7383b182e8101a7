// Query grammar: WITH, SELECT cores, FROM sources with joins and
// modifiers, set operations, and the trailing clauses that bind to the
// whole query.

use crate::ast::{
    Alias, CteClause, Expr, FromItem, JoinClause, Pivot, Query, QueryBody, SelectCore,
    SelectItem, SetOp, TableSample, TableSource, TableValue, Top, Unpivot,
};
use crate::keywords::{self, JOIN_KINDS};
use crate::lexer::TokenType;
use crate::parser::core::{ParseResult, Parser};

impl Parser {
    /// Parse a query: optional WITH, one or more set-operation arms,
    /// then ORDER BY / LIMIT / OFFSET over the whole result.
    pub fn parse_query(&mut self) -> ParseResult<Query> {
        self.enter()?;
        let result = self.parse_query_inner();
        self.leave();
        result
    }

    fn parse_query_inner(&mut self) -> ParseResult<Query> {
        let (with, recursive) = if self.at_keyword("with") {
            self.parse_with_clause()?
        } else {
            (Vec::new(), false)
        };

        let mut arms = vec![self.parse_query_arm()?];
        let mut ops = Vec::new();
        while let Some(op) = self.scan_set_op() {
            ops.push(op);
            arms.push(self.parse_query_arm()?);
        }

        let mut query = fold_set_ops(arms, ops);

        // Trailing clauses bind to the whole chain; a non-plain result
        // (an arm that already carries its own clauses) nests first.
        let has_trailing = self.at_keyword("order")
            || self.at_keyword("limit")
            || self.at_keyword("offset");
        if has_trailing && !query.is_plain() {
            query = Query::plain(QueryBody::Nested(Box::new(query)));
        }

        if self.eat_keyword("order") {
            self.expect_keyword("by")?;
            query.orderby = self.parse_sort_items()?;
        }
        if self.eat_keyword("limit") {
            let first = self.parse_expr()?;
            if self.eat_token(&TokenType::Comma) {
                // MySQL LIMIT offset, count
                query.offset = Some(first);
                query.limit = Some(self.parse_expr()?);
            } else {
                query.limit = Some(first);
            }
        }
        if self.eat_keyword("offset") {
            query.offset = Some(self.parse_expr()?);
            self.eat_keyword("rows");
            self.eat_keyword("row");
        }

        if !with.is_empty() {
            if !query.with.is_empty() {
                query = Query::plain(QueryBody::Nested(Box::new(query)));
            }
            query.with = with;
            query.recursive = recursive;
        }
        Ok(query)
    }

    fn parse_with_clause(&mut self) -> ParseResult<(Vec<CteClause>, bool)> {
        self.expect_keyword("with")?;
        let recursive = self.eat_keyword("recursive");
        let mut ctes = Vec::new();
        loop {
            let name = self.identifier()?;
            let columns = if self.current_token_is(&TokenType::LParen) {
                self.paren_identifier_list()?
            } else {
                Vec::new()
            };
            self.expect_keyword("as")?;
            self.expect_token(&TokenType::LParen)?;
            let query = self.parse_query()?;
            self.expect_token(&TokenType::RParen)?;
            ctes.push(CteClause { name, columns, query });
            if !self.eat_token(&TokenType::Comma) {
                break;
            }
        }
        Ok((ctes, recursive))
    }

    /// One arm of a set-operation chain: a SELECT core, VALUES rows, or
    /// a parenthesized query carrying its own trailing clauses.
    fn parse_query_arm(&mut self) -> ParseResult<Query> {
        if self.current_token_is(&TokenType::LParen) {
            self.next_token();
            let query = self.parse_query()?;
            self.expect_token(&TokenType::RParen)?;
            return Ok(query);
        }
        if self.eat_keyword("values") {
            let mut rows = vec![self.parse_prefix_row()?];
            while self.eat_token(&TokenType::Comma) {
                rows.push(self.parse_prefix_row()?);
            }
            return Ok(Query::plain(QueryBody::Values(rows)));
        }
        let core = self.parse_select_core()?;
        Ok(Query::plain(QueryBody::Select(Box::new(core))))
    }

    fn parse_prefix_row(&mut self) -> ParseResult<Expr> {
        self.expect_token(&TokenType::LParen)?;
        let mut items = vec![self.parse_expr()?];
        while self.eat_token(&TokenType::Comma) {
            items.push(self.parse_expr()?);
        }
        self.expect_token(&TokenType::RParen)?;
        if items.len() == 1 {
            Ok(items.pop().unwrap())
        } else {
            Ok(Expr::Tuple(items))
        }
    }

    fn scan_set_op(&mut self) -> Option<SetOp> {
        if self.eat_keyword("union") {
            if self.eat_keyword("all") {
                Some(SetOp::UnionAll)
            } else {
                self.eat_keyword("distinct");
                Some(SetOp::Union)
            }
        } else if self.eat_keyword("intersect") {
            Some(SetOp::Intersect)
        } else if self.eat_keyword("except") {
            Some(SetOp::Except)
        } else if self.eat_keyword("minus") {
            Some(SetOp::Minus)
        } else {
            None
        }
    }

    /// A single SELECT core without trailing query clauses.
    pub(crate) fn parse_select_core(&mut self) -> ParseResult<SelectCore> {
        self.expect_keyword("select")?;
        let mut core = SelectCore::default();

        if self.at_keyword("top") {
            self.next_token();
            let value = self.parse_expression(keywords::precedence("neg").unwrap())?;
            let percent = self.eat_keyword("percent");
            let ties = self.eat_keywords(&["with", "ties"]);
            core.top = Some(Top { value, percent, ties });
        }

        if self.eat_keyword("distinct") {
            if self.eat_keyword("on") {
                self.expect_token(&TokenType::LParen)?;
                core.distinct_on.push(self.parse_expr()?);
                while self.eat_token(&TokenType::Comma) {
                    core.distinct_on.push(self.parse_expr()?);
                }
                self.expect_token(&TokenType::RParen)?;
            } else {
                core.distinct = true;
            }
        } else {
            self.eat_keyword("all");
        }

        core.select.push(self.parse_select_item()?);
        while self.eat_token(&TokenType::Comma) {
            core.select.push(self.parse_select_item()?);
        }

        if self.eat_keyword("from") {
            core.from.push(FromItem::Source(self.parse_table_source()?));
            loop {
                if self.eat_token(&TokenType::Comma) {
                    core.from.push(FromItem::Source(self.parse_table_source()?));
                    continue;
                }
                match self.scan_join_kind() {
                    Some(kind) => {
                        let join = self.parse_join_tail(kind)?;
                        core.from.push(FromItem::Join(join));
                    }
                    None => break,
                }
            }
        }

        if self.eat_keyword("where") {
            core.where_clause = Some(self.parse_expr()?);
        }
        if self.eat_keyword("group") {
            self.expect_keyword("by")?;
            core.groupby.push(self.parse_select_item()?);
            while self.eat_token(&TokenType::Comma) {
                core.groupby.push(self.parse_select_item()?);
            }
        }
        if self.eat_keyword("having") {
            core.having = Some(self.parse_expr()?);
        }
        if self.eat_keyword("qualify") {
            core.qualify = Some(self.parse_expr()?);
        }

        Ok(core)
    }

    fn parse_select_item(&mut self) -> ParseResult<SelectItem> {
        let value = self.parse_expr()?;
        let alias = self.parse_alias()?;
        Ok(SelectItem { value, alias })
    }

    /// Optional alias: `AS name`, or a bare unreserved name, each with
    /// an optional column list.
    pub(crate) fn parse_alias(&mut self) -> ParseResult<Option<Alias>> {
        let name = if self.eat_keyword("as") {
            self.identifier()?
        } else {
            match &self.current_token().token_type {
                TokenType::Ident(word) if !keywords::is_reserved(word) => {
                    let word = word.clone();
                    self.next_token();
                    word
                }
                TokenType::QuotedIdent(word) => {
                    let word = word.replace('.', "\\.");
                    self.next_token();
                    word
                }
                _ => return Ok(None),
            }
        };
        let columns = if self.current_token_is(&TokenType::LParen) {
            self.paren_identifier_list()?
        } else {
            Vec::new()
        };
        Ok(Some(Alias { name, columns }))
    }

    fn scan_join_kind(&mut self) -> Option<String> {
        for kind in JOIN_KINDS {
            let words: Vec<&str> = kind.split(' ').collect();
            if self.eat_keywords(&words) {
                return Some((*kind).to_string());
            }
        }
        None
    }

    fn parse_join_tail(&mut self, kind: String) -> ParseResult<JoinClause> {
        let mut source = self.parse_table_source()?;
        // LATERAL VIEW fn(x) tbl AS col, ...: the column list trails the
        // table alias instead of sitting in parentheses.
        if kind.starts_with("lateral view") && self.eat_keyword("as") {
            match &mut source.alias {
                Some(alias) if alias.columns.is_empty() => {
                    alias.columns = self.identifier_list()?;
                }
                _ => return Err(self.error("generated-column alias")),
            }
        }
        let mut join = JoinClause { kind, source, on: None, using: Vec::new() };
        if self.eat_keyword("on") {
            join.on = Some(self.parse_expr()?);
        }
        if self.eat_keyword("using") {
            join.using = self.paren_identifier_list()?;
            if join.on.is_some() {
                return Err(self.error("either ON or USING, not both"));
            }
        }
        Ok(join)
    }

    /// A table source: name, subquery, or table function, followed by
    /// its modifiers and finally an alias.
    pub(crate) fn parse_table_source(&mut self) -> ParseResult<TableSource> {
        let value = if self.eat_token(&TokenType::LParen) {
            let query = self.parse_query()?;
            self.expect_token(&TokenType::RParen)?;
            TableValue::Subquery(Box::new(query))
        } else {
            let name = self.dotted_name()?;
            if self.current_token_is(&TokenType::LParen) {
                match self.parse_call(name)? {
                    Expr::Call(call) => TableValue::Call(call),
                    _ => return Err(self.error("table function")),
                }
            } else {
                TableValue::Name(name)
            }
        };

        let mut source = TableSource {
            value,
            with_ordinality: false,
            tablesample: None,
            pivot: None,
            unpivot: None,
            alias: None,
        };

        loop {
            if self.eat_keywords(&["with", "ordinality"]) {
                source.with_ordinality = true;
            } else if self.at_keyword("tablesample") {
                source.tablesample = Some(self.parse_tablesample()?);
            } else if self.at_keyword("pivot") && self.peek_token_is(&TokenType::LParen) {
                source.pivot = Some(self.parse_pivot()?);
            } else if self.at_keyword("unpivot") && self.peek_token_is(&TokenType::LParen) {
                source.unpivot = Some(self.parse_unpivot()?);
            } else {
                break;
            }
        }

        source.alias = self.parse_alias()?;
        Ok(source)
    }

    fn parse_tablesample(&mut self) -> ParseResult<TableSample> {
        self.expect_keyword("tablesample")?;
        self.expect_token(&TokenType::LParen)?;
        let sample = if self.eat_keyword("bucket") {
            let numerator = self.parse_int()?;
            self.expect_keyword("out")?;
            self.expect_keyword("of")?;
            let denominator = self.parse_int()?;
            let on = if self.eat_keyword("on") {
                Some(Box::new(self.parse_expr()?))
            } else {
                None
            };
            TableSample::Bucket { numerator, denominator, on }
        } else if let TokenType::Str(size) = self.current_token().token_type.clone() {
            self.next_token();
            TableSample::Size(size)
        } else {
            let value = self.parse_expr()?;
            if self.eat_keyword("percent") {
                TableSample::Percent(Box::new(value))
            } else {
                self.expect_keyword("rows")?;
                TableSample::Rows(Box::new(value))
            }
        };
        self.expect_token(&TokenType::RParen)?;
        Ok(sample)
    }

    fn parse_int(&mut self) -> ParseResult<i64> {
        match self.current_token().token_type {
            TokenType::Int(n) => {
                self.next_token();
                Ok(n)
            }
            _ => Err(self.error("integer")),
        }
    }

    fn parse_pivot(&mut self) -> ParseResult<Pivot> {
        self.expect_keyword("pivot")?;
        self.expect_token(&TokenType::LParen)?;
        let mut aggregate = vec![self.parse_pivot_item()?];
        while self.eat_token(&TokenType::Comma) {
            aggregate.push(self.parse_pivot_item()?);
        }
        self.expect_keyword("for")?;
        let for_name = self.dotted_name()?;
        self.expect_keyword("in")?;
        self.expect_token(&TokenType::LParen)?;
        let mut in_values = vec![self.parse_pivot_item()?];
        while self.eat_token(&TokenType::Comma) {
            in_values.push(self.parse_pivot_item()?);
        }
        self.expect_token(&TokenType::RParen)?;
        self.expect_token(&TokenType::RParen)?;
        Ok(Pivot { aggregate, for_name, in_values })
    }

    fn parse_unpivot(&mut self) -> ParseResult<Unpivot> {
        self.expect_keyword("unpivot")?;
        self.expect_token(&TokenType::LParen)?;
        let value = self.identifier()?;
        self.expect_keyword("for")?;
        let for_name = self.identifier()?;
        self.expect_keyword("in")?;
        self.expect_token(&TokenType::LParen)?;
        let mut in_columns = vec![self.parse_pivot_item()?];
        while self.eat_token(&TokenType::Comma) {
            in_columns.push(self.parse_pivot_item()?);
        }
        self.expect_token(&TokenType::RParen)?;
        self.expect_token(&TokenType::RParen)?;
        Ok(Unpivot { value, for_name, in_columns })
    }

    fn parse_pivot_item(&mut self) -> ParseResult<SelectItem> {
        let value = self.parse_expr()?;
        let alias = self.parse_alias()?;
        Ok(SelectItem { value, alias })
    }
}

/// Right-fold a flat set-operation chain, merging runs of the same
/// operator into one n-ary node so mixed chains nest by operator.
fn fold_set_ops(mut arms: Vec<Query>, ops: Vec<SetOp>) -> Query {
    if ops.is_empty() {
        return arms.pop().unwrap();
    }
    let mut args = vec![arms.pop().unwrap()];
    let mut current: Option<SetOp> = None;
    for op in ops.into_iter().rev() {
        let arm = arms.pop().unwrap();
        match current {
            Some(run) if run == op => args.insert(0, arm),
            Some(run) => {
                let inner = Query::plain(QueryBody::SetOp { op: run, args });
                args = vec![arm, inner];
                current = Some(op);
            }
            None => {
                args.insert(0, arm);
                current = Some(op);
            }
        }
    }
    Query::plain(QueryBody::SetOp { op: current.unwrap(), args })
}
