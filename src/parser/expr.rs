// Expression parsing: precedence climbing over the operator table in
// `keywords`, plus the atom grammar (literals, CASE, CAST, INTERVAL,
// function calls with window clauses, subqueries, constructors).
//
// Lower precedence values bind tighter. Left-associative operators
// recurse with `prec - 1` so an equal-precedence neighbor stays with
// the left operand; right-associative (prefix) operators recurse with
// their own precedence.

use crate::ast::{
    Expr, FunctionCall, SortDir, SortItem, NullsOrder, TrimDirection, TypeArg,
    TypeName, WindowFrame, WindowSpec,
};
use crate::keywords::{self, EXPR_PRECEDENCE_LIMIT};
use crate::lexer::TokenType;
use crate::parser::core::{ParseResult, Parser};

impl Parser {
    /// Parse a full expression.
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expression(EXPR_PRECEDENCE_LIMIT)
    }

    /// Parse an expression whose operators all bind at least as tightly
    /// as `limit`.
    pub fn parse_expression(&mut self, limit: i32) -> ParseResult<Expr> {
        self.enter()?;
        let result = self.parse_expression_inner(limit);
        self.leave();
        result
    }

    fn parse_expression_inner(&mut self, limit: i32) -> ParseResult<Expr> {
        let mut left = self.parse_prefix()?;

        loop {
            // Tightest-binding suffixes first: subscript and cast.
            if self.eat_token(&TokenType::LBracket) {
                let index = self.parse_expr()?;
                self.expect_token(&TokenType::RBracket)?;
                left = Expr::Index { base: Box::new(left), index: Box::new(index) };
                continue;
            }
            if self.current_token_is(&TokenType::DoubleColon) {
                self.next_token();
                let ty = self.parse_type()?;
                left = Expr::Cast { expr: Box::new(left), ty, safe: false };
                continue;
            }

            match self.scan_infix(limit)? {
                Some(InfixOp::Plain { op, prec }) => {
                    let right = self.parse_expression(prec - 1)?;
                    left = shape_binary(&op, left, right);
                }
                Some(InfixOp::Between { negated }) => {
                    // Bounds bind below AND so the separator is not
                    // swallowed by the low bound.
                    let low = self.parse_expression(keywords::precedence("between").unwrap() - 1)?;
                    self.expect_keyword("and")?;
                    let high = self.parse_expression(keywords::precedence("between").unwrap() - 1)?;
                    let op = if negated { "not_between" } else { "between" };
                    left = Expr::op(op, vec![left, low, high]);
                }
                Some(InfixOp::In { negated }) => {
                    let right = self.parse_in_rhs()?;
                    let op = if negated { "nin" } else { "in" };
                    left = Expr::op(op, vec![left, right]);
                }
                Some(InfixOp::Is { negated }) => {
                    let right =
                        self.parse_expression(keywords::precedence("is").unwrap() - 1)?;
                    left = if right == Expr::Null {
                        if negated {
                            Expr::Exists(Box::new(left))
                        } else {
                            Expr::Missing(Box::new(left))
                        }
                    } else if negated {
                        Expr::op("neq", vec![left, right])
                    } else {
                        Expr::op("eq", vec![left, right])
                    };
                }
                Some(InfixOp::Collate) => {
                    let collation = self.identifier()?;
                    left = Expr::op("collate", vec![left, Expr::Name(collation)]);
                }
                None => break,
            }
        }

        Ok(left)
    }

    /// Recognize and consume the next infix operator if it binds within
    /// `limit`. Leaves the cursor untouched otherwise.
    fn scan_infix(&mut self, limit: i32) -> ParseResult<Option<InfixOp>> {
        let symbol = match &self.current_token().token_type {
            TokenType::Concat => Some("concat"),
            TokenType::Slash => Some("div"),
            TokenType::Star => Some("mul"),
            TokenType::Percent => Some("mod"),
            TokenType::Minus => Some("sub"),
            TokenType::Plus => Some("add"),
            TokenType::Amp => Some("binary_and"),
            TokenType::Pipe => Some("binary_or"),
            TokenType::Lt => Some("lt"),
            TokenType::Lte => Some("lte"),
            TokenType::Gt => Some("gt"),
            TokenType::Gte => Some("gte"),
            TokenType::Eq | TokenType::DoubleEq | TokenType::Spaceship => Some("eq"),
            TokenType::Neq => Some("neq"),
            _ => None,
        };
        if let Some(op) = symbol {
            let prec = keywords::precedence(op).unwrap();
            if prec > limit {
                return Ok(None);
            }
            self.next_token();
            return Ok(Some(InfixOp::Plain { op: op.to_string(), prec }));
        }

        // Keyword operators
        let family = keywords::precedence("between").unwrap();
        let op = if self.at_keyword("and") {
            InfixOp::Plain { op: "and".to_string(), prec: keywords::precedence("and").unwrap() }
        } else if self.at_keyword("or") {
            InfixOp::Plain { op: "or".to_string(), prec: keywords::precedence("or").unwrap() }
        } else if self.at_keyword("between") {
            InfixOp::Between { negated: false }
        } else if self.at_keyword("in") {
            InfixOp::In { negated: false }
        } else if self.at_keyword("is") {
            InfixOp::Is { negated: false }
        } else if self.at_keyword("like") {
            InfixOp::Plain { op: "like".to_string(), prec: family }
        } else if self.at_keyword("rlike") {
            InfixOp::Plain { op: "rlike".to_string(), prec: family }
        } else if self.at_keyword("collate") {
            InfixOp::Collate
        } else if self.at_keyword("similar") && self.peek_keyword("to") {
            InfixOp::Plain { op: "similar_to".to_string(), prec: family }
        } else if self.at_keyword("not") {
            if self.peek_keyword("like") {
                InfixOp::Plain { op: "not_like".to_string(), prec: family }
            } else if self.peek_keyword("rlike") {
                InfixOp::Plain { op: "not_rlike".to_string(), prec: family }
            } else if self.peek_keyword("in") {
                InfixOp::In { negated: true }
            } else if self.peek_keyword("between") {
                InfixOp::Between { negated: true }
            } else if self.peek_keyword("similar") {
                InfixOp::Plain { op: "not_similar_to".to_string(), prec: family }
            } else {
                return Ok(None);
            }
        } else {
            return Ok(None);
        };

        let prec = match &op {
            InfixOp::Plain { prec, .. } => *prec,
            InfixOp::Collate => keywords::precedence("collate").unwrap(),
            _ => family,
        };
        if prec > limit {
            return Ok(None);
        }

        // Consume the keyword(s) that spell the operator.
        match &op {
            InfixOp::Plain { op: name, .. } => match name.as_str() {
                "similar_to" => {
                    self.next_token();
                    self.expect_keyword("to")?;
                }
                "not_similar_to" => {
                    self.next_token();
                    self.next_token();
                    self.expect_keyword("to")?;
                }
                "not_like" | "not_rlike" => {
                    self.next_token();
                    self.next_token();
                }
                _ => self.next_token(),
            },
            InfixOp::Between { negated } | InfixOp::In { negated } => {
                if *negated {
                    self.next_token();
                }
                self.next_token();
            }
            InfixOp::Is { .. } => {
                self.next_token();
                if self.eat_keyword("not") {
                    return Ok(Some(InfixOp::Is { negated: true }));
                }
            }
            InfixOp::Collate => self.next_token(),
        }
        Ok(Some(op))
    }

    /// Right-hand side of IN / NOT IN: a subquery, a parenthesized list
    /// that always keeps list shape, or a plain expression.
    fn parse_in_rhs(&mut self) -> ParseResult<Expr> {
        if self.current_token_is(&TokenType::LParen) {
            let checkpoint = self.checkpoint();
            self.next_token();
            if self.is_query_start() {
                self.restore(checkpoint);
                return self.parse_prefix();
            }
            let mut items = vec![self.parse_expr()?];
            while self.eat_token(&TokenType::Comma) {
                items.push(self.parse_expr()?);
            }
            self.expect_token(&TokenType::RParen)?;
            return Ok(Expr::Tuple(items));
        }
        self.parse_expression(keywords::precedence("in").unwrap() - 1)
    }

    /// Atom and prefix-operator grammar.
    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        match self.current_token().token_type.clone() {
            TokenType::Minus => {
                self.next_token();
                let operand = self.parse_expression(keywords::precedence("neg").unwrap())?;
                // Negation of a numeric literal folds into the literal.
                Ok(match operand {
                    Expr::Int(n) => Expr::Int(-n),
                    Expr::Float(f) => Expr::Float(-f),
                    other => Expr::op("neg", vec![other]),
                })
            }
            TokenType::Plus => {
                self.next_token();
                self.parse_expression(keywords::precedence("neg").unwrap())
            }
            TokenType::Tilde => {
                self.next_token();
                let operand =
                    self.parse_expression(keywords::precedence("binary_not").unwrap())?;
                Ok(Expr::op("binary_not", vec![operand]))
            }
            TokenType::Str(value) => {
                self.next_token();
                Ok(Expr::Literal(value))
            }
            TokenType::Int(value) => {
                let end = self.current_token().end;
                self.next_token();
                self.with_implicit_mul(Expr::Int(value), end)
            }
            TokenType::Float(value) => {
                let end = self.current_token().end;
                self.next_token();
                self.with_implicit_mul(Expr::Float(value), end)
            }
            TokenType::Hex(digits) => {
                self.next_token();
                Ok(Expr::Hex(digits))
            }
            TokenType::Star => {
                self.next_token();
                Ok(Expr::Star)
            }
            TokenType::LParen => self.parse_paren(),
            TokenType::LBracket => {
                // Bare bracket list is an array constructor (BigQuery).
                self.next_token();
                let mut items = Vec::new();
                if !self.current_token_is(&TokenType::RBracket) {
                    items.push(self.parse_expr()?);
                    while self.eat_token(&TokenType::Comma) {
                        items.push(self.parse_expr()?);
                    }
                }
                self.expect_token(&TokenType::RBracket)?;
                Ok(Expr::Collection { kind: "create_array", items })
            }
            TokenType::Ident(_) | TokenType::QuotedIdent(_) => self.parse_word(),
            _ => Err(self.error("expression")),
        }
    }

    /// Adjacent number-identifier (or number-call) pairs multiply:
    /// `23e7test` is `mul(230000000, test)`.
    fn with_implicit_mul(&mut self, number: Expr, end: usize) -> ParseResult<Expr> {
        let next = self.current_token();
        let adjacent = next.start == end
            && matches!(&next.token_type,
                TokenType::Ident(word) if !keywords::is_reserved(word));
        if adjacent {
            let rhs = self.parse_prefix()?;
            Ok(shape_binary("mul", number, rhs))
        } else {
            Ok(number)
        }
    }

    /// Keyword-led atoms, plain names, and function calls.
    fn parse_word(&mut self) -> ParseResult<Expr> {
        if self.eat_keyword("null") {
            return Ok(Expr::Null);
        }
        if self.eat_keyword("true") {
            return Ok(Expr::Bool(true));
        }
        if self.eat_keyword("false") {
            return Ok(Expr::Bool(false));
        }
        if self.at_keyword("not") {
            self.next_token();
            let operand = self.parse_expression(keywords::precedence("not").unwrap())?;
            return Ok(Expr::op("not", vec![operand]));
        }
        if self.at_keyword("case") {
            return self.parse_case();
        }
        if self.at_keyword("cast") && self.peek_token_is(&TokenType::LParen) {
            return self.parse_cast(false);
        }
        if (self.at_keyword("try_cast") || self.at_keyword("safe_cast"))
            && self.peek_token_is(&TokenType::LParen)
        {
            return self.parse_cast(true);
        }
        if self.at_keyword("trim") && self.peek_token_is(&TokenType::LParen) {
            return self.parse_trim();
        }
        if self.at_keyword("extract") && self.peek_token_is(&TokenType::LParen) {
            return self.parse_extract();
        }
        if self.at_keyword("interval") {
            return self.parse_interval();
        }
        if self.at_keyword("distinct") {
            self.next_token();
            let mut items = Vec::new();
            if self.eat_token(&TokenType::LParen) {
                items.push(self.parse_expr()?);
                while self.eat_token(&TokenType::Comma) {
                    items.push(self.parse_expr()?);
                }
                self.expect_token(&TokenType::RParen)?;
            } else {
                items.push(self.parse_expr()?);
            }
            return Ok(Expr::Distinct(items));
        }
        if self.at_keyword("exists") && self.peek_token_is(&TokenType::LParen) {
            self.next_token();
            self.next_token();
            let query = self.parse_query()?;
            self.expect_token(&TokenType::RParen)?;
            return Ok(Expr::Call(FunctionCall::new(
                "exists",
                vec![Expr::Query(Box::new(query))],
            )));
        }
        if self.at_keyword("array") && self.peek_token_is(&TokenType::LParen) {
            self.next_token();
            self.next_token();
            // ARRAY(SELECT ...) builds from a subquery, ARRAY(a, b) from items.
            if self.is_query_start() {
                let query = self.parse_query()?;
                self.expect_token(&TokenType::RParen)?;
                return Ok(Expr::Collection {
                    kind: "create_array",
                    items: vec![Expr::Query(Box::new(query))],
                });
            }
            let mut items = Vec::new();
            if !self.current_token_is(&TokenType::RParen) {
                items.push(self.parse_expr()?);
                while self.eat_token(&TokenType::Comma) {
                    items.push(self.parse_expr()?);
                }
            }
            self.expect_token(&TokenType::RParen)?;
            return Ok(Expr::Collection { kind: "create_array", items });
        }
        if self.at_keyword("map") && self.peek_token_is(&TokenType::LBracket) {
            self.next_token();
            self.next_token();
            let mut items = vec![self.parse_expr()?];
            while self.eat_token(&TokenType::Comma) {
                items.push(self.parse_expr()?);
            }
            self.expect_token(&TokenType::RBracket)?;
            return Ok(Expr::Collection { kind: "create_map", items });
        }

        // Time-type constructors: DATE '2020-01-01', TIMESTAMP '...'.
        for ty in keywords::TIME_TYPES {
            if self.at_keyword(ty) {
                if let TokenType::Str(value) = self.peek_token().token_type.clone() {
                    let name = ty.to_string();
                    self.next_token();
                    self.next_token();
                    return Ok(Expr::Call(FunctionCall::new(name, vec![Expr::Literal(value)])));
                }
            }
        }

        let name = self.dotted_name()?;
        // Trailing `.*` on a name path
        if self.current_token_is(&TokenType::Dot) && self.peek_token_is(&TokenType::Star) {
            self.next_token();
            self.next_token();
            return Ok(Expr::Name(format!("{}.*", name)));
        }
        if self.current_token_is(&TokenType::LParen) {
            return self.parse_call(name);
        }
        Ok(Expr::Name(name))
    }

    /// Parenthesized subquery, scalar expression, or tuple.
    fn parse_paren(&mut self) -> ParseResult<Expr> {
        self.expect_token(&TokenType::LParen)?;
        if self.is_query_start() {
            let query = self.parse_query()?;
            self.expect_token(&TokenType::RParen)?;
            return Ok(Expr::Query(Box::new(query)));
        }
        let mut items = vec![self.parse_expr()?];
        while self.eat_token(&TokenType::Comma) {
            items.push(self.parse_expr()?);
        }
        self.expect_token(&TokenType::RParen)?;
        if items.len() == 1 {
            // A single parenthesized expression is the expression itself.
            Ok(items.pop().unwrap())
        } else {
            Ok(Expr::Tuple(items))
        }
    }

    /// Whether the cursor sits at the start of a query (for
    /// subquery-vs-expression disambiguation after `(`).
    pub(crate) fn is_query_start(&self) -> bool {
        self.at_keyword("select")
            || self.at_keyword("with")
            || self.at_keyword("values")
            || self.current_token_is(&TokenType::LParen)
                && (self.peek_keyword("select") || self.peek_keyword("with"))
    }

    fn parse_case(&mut self) -> ParseResult<Expr> {
        self.expect_keyword("case")?;
        // Switch form carries a subject; it is rewritten to the generic
        // form with eq comparisons.
        let subject = if self.at_keyword("when") {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let mut whens = Vec::new();
        while self.eat_keyword("when") {
            let cond = self.parse_expr()?;
            self.expect_keyword("then")?;
            let value = self.parse_expr()?;
            let cond = match &subject {
                Some(subject) => Expr::op("eq", vec![subject.clone(), cond]),
                None => cond,
            };
            whens.push((cond, value));
        }
        if whens.is_empty() {
            return Err(self.error("WHEN"));
        }
        let otherwise = if self.eat_keyword("else") {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect_keyword("end")?;
        Ok(Expr::Case { whens, otherwise })
    }

    fn parse_cast(&mut self, safe: bool) -> ParseResult<Expr> {
        self.next_token(); // cast keyword
        self.expect_token(&TokenType::LParen)?;
        let expr = self.parse_expr()?;
        self.expect_keyword("as")?;
        let ty = self.parse_type()?;
        self.expect_token(&TokenType::RParen)?;
        Ok(Expr::Cast { expr: Box::new(expr), ty, safe })
    }

    fn parse_trim(&mut self) -> ParseResult<Expr> {
        self.next_token(); // trim keyword
        self.expect_token(&TokenType::LParen)?;
        let direction = if self.eat_keyword("leading") {
            Some(TrimDirection::Leading)
        } else if self.eat_keyword("trailing") {
            Some(TrimDirection::Trailing)
        } else if self.eat_keyword("both") {
            Some(TrimDirection::Both)
        } else {
            None
        };
        let first = if self.at_keyword("from") {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let (expr, characters) = if self.eat_keyword("from") {
            (self.parse_expr()?, first)
        } else {
            match first {
                Some(expr) => (expr, None),
                None => return Err(self.error("expression")),
            }
        };
        self.expect_token(&TokenType::RParen)?;
        Ok(Expr::Trim {
            expr: Box::new(expr),
            characters: characters.map(Box::new),
            direction,
        })
    }

    fn parse_extract(&mut self) -> ParseResult<Expr> {
        self.next_token(); // extract keyword
        self.expect_token(&TokenType::LParen)?;
        let word = self.any_identifier()?;
        let unit = keywords::duration_unit(&word)
            .map(str::to_string)
            .unwrap_or(word);
        self.expect_keyword("from")?;
        let expr = self.parse_expr()?;
        self.expect_token(&TokenType::RParen)?;
        Ok(Expr::Extract { unit, expr: Box::new(expr) })
    }

    /// INTERVAL literal: single (`INTERVAL 5 DAY`), string
    /// (`INTERVAL '5 day'`), or compound, which decomposes into an
    /// addition of interval nodes.
    fn parse_interval(&mut self) -> ParseResult<Expr> {
        self.expect_keyword("interval")?;

        if let TokenType::Str(text) = self.current_token().token_type.clone() {
            let words: Vec<&str> = text.split_whitespace().collect();
            if let Some(parts) = parse_interval_words(&words) {
                self.next_token();
                return Ok(join_intervals(parts));
            }
        }

        let mut parts = Vec::new();
        loop {
            let value = match self.current_token().token_type.clone() {
                TokenType::Int(n) => {
                    self.next_token();
                    Expr::Int(n)
                }
                TokenType::Float(f) => {
                    self.next_token();
                    Expr::Float(f)
                }
                TokenType::Minus => {
                    self.next_token();
                    match self.current_token().token_type.clone() {
                        TokenType::Int(n) => {
                            self.next_token();
                            Expr::Int(-n)
                        }
                        TokenType::Float(f) => {
                            self.next_token();
                            Expr::Float(-f)
                        }
                        _ => return Err(self.error("number")),
                    }
                }
                TokenType::Str(s) => {
                    self.next_token();
                    Expr::Literal(s)
                }
                TokenType::LParen => self.parse_paren()?,
                TokenType::Ident(_) | TokenType::QuotedIdent(_) if parts.is_empty() => {
                    Expr::Name(self.dotted_name()?)
                }
                _ => break,
            };
            let word = match &self.current_token().token_type {
                TokenType::Ident(word) => word.clone(),
                _ => return Err(self.error("duration unit")),
            };
            let unit = match keywords::duration_unit(&word) {
                Some(unit) => unit.to_string(),
                None => return Err(self.error("duration unit")),
            };
            self.next_token();
            parts.push(Expr::Interval { value: Box::new(value), unit });

            // Another leading number continues a compound interval.
            if !matches!(
                self.current_token().token_type,
                TokenType::Int(_) | TokenType::Float(_)
            ) {
                break;
            }
        }
        if parts.is_empty() {
            return Err(self.error("interval value"));
        }
        Ok(join_intervals(parts))
    }

    /// Function call with optional IGNORE NULLS, WITHIN GROUP and OVER.
    pub(crate) fn parse_call(&mut self, name: String) -> ParseResult<Expr> {
        self.expect_token(&TokenType::LParen)?;
        let mut call = FunctionCall::new(name.to_lowercase(), Vec::new());
        if !self.current_token_is(&TokenType::RParen) {
            if self.eat_keyword("distinct") {
                let mut items = vec![self.parse_expr()?];
                while self.eat_token(&TokenType::Comma) {
                    items.push(self.parse_expr()?);
                }
                call.args.push(Expr::Distinct(items));
            } else {
                call.args.push(self.parse_expr()?);
                while self.eat_token(&TokenType::Comma) {
                    call.args.push(self.parse_expr()?);
                }
            }
        }
        self.expect_token(&TokenType::RParen)?;

        if self.eat_keywords(&["ignore", "nulls"]) {
            call.ignore_nulls = true;
        } else {
            // RESPECT NULLS is the default and parses to nothing.
            self.eat_keywords(&["respect", "nulls"]);
        }

        if self.eat_keywords(&["within", "group"]) {
            self.expect_token(&TokenType::LParen)?;
            self.expect_keyword("order")?;
            self.expect_keyword("by")?;
            call.within = Some(self.parse_sort_items()?);
            self.expect_token(&TokenType::RParen)?;
        }

        if self.eat_keyword("over") {
            self.expect_token(&TokenType::LParen)?;
            let spec = self.parse_window_spec()?;
            self.expect_token(&TokenType::RParen)?;
            call.over = Some(Box::new(spec));
        }

        Ok(Expr::Call(call))
    }

    pub(crate) fn parse_window_spec(&mut self) -> ParseResult<WindowSpec> {
        let mut spec = WindowSpec::default();
        if self.eat_keyword("partition") {
            self.expect_keyword("by")?;
            spec.partitionby.push(self.parse_expr()?);
            while self.eat_token(&TokenType::Comma) {
                spec.partitionby.push(self.parse_expr()?);
            }
        }
        if self.eat_keyword("order") {
            self.expect_keyword("by")?;
            spec.orderby = self.parse_sort_items()?;
        }
        if self.at_keyword("rows") || self.at_keyword("range") {
            self.next_token();
            spec.range = Some(self.parse_window_frame()?);
        }
        Ok(spec)
    }

    /// Frame bounds as offsets from the current row; unbounded sides
    /// are left open.
    fn parse_window_frame(&mut self) -> ParseResult<WindowFrame> {
        if self.eat_keyword("between") {
            let min = self.parse_frame_bound()?;
            self.expect_keyword("and")?;
            let max = self.parse_frame_bound()?;
            Ok(WindowFrame { min, max })
        } else {
            // Single bound: from the bound up to the current row.
            let min = self.parse_frame_bound()?;
            Ok(WindowFrame { min, max: Some(0) })
        }
    }

    fn parse_frame_bound(&mut self) -> ParseResult<Option<i64>> {
        if self.eat_keyword("unbounded") {
            if !self.eat_keyword("preceding") {
                self.expect_keyword("following")?;
            }
            return Ok(None);
        }
        if self.eat_keyword("current") {
            self.expect_keyword("row")?;
            return Ok(Some(0));
        }
        let n = match self.current_token().token_type {
            TokenType::Int(n) => n,
            _ => return Err(self.error("frame bound")),
        };
        self.next_token();
        if self.eat_keyword("preceding") {
            Ok(Some(-n))
        } else {
            self.expect_keyword("following")?;
            Ok(Some(n))
        }
    }

    /// ORDER BY item list, shared by queries and window specs.
    pub(crate) fn parse_sort_items(&mut self) -> ParseResult<Vec<SortItem>> {
        let mut items = vec![self.parse_sort_item()?];
        while self.eat_token(&TokenType::Comma) {
            items.push(self.parse_sort_item()?);
        }
        Ok(items)
    }

    fn parse_sort_item(&mut self) -> ParseResult<SortItem> {
        let value = self.parse_expr()?;
        let sort = if self.eat_keyword("asc") {
            Some(SortDir::Asc)
        } else if self.eat_keyword("desc") {
            Some(SortDir::Desc)
        } else {
            None
        };
        let nulls = if self.eat_keyword("nulls") {
            if self.eat_keyword("first") {
                Some(NullsOrder::First)
            } else {
                self.expect_keyword("last")?;
                Some(NullsOrder::Last)
            }
        } else {
            None
        };
        Ok(SortItem { value, sort, nulls })
    }

    /// Type name with optional parameters: `varchar(25)`,
    /// `decimal(10, 2)`, `array<int64>`, `struct<a int64, b string>`.
    pub(crate) fn parse_type(&mut self) -> ParseResult<TypeName> {
        let mut name = self.any_identifier()?.to_lowercase();
        // Two-word types like DOUBLE PRECISION
        if name == "double" && self.at_keyword("precision") {
            self.next_token();
            name = "double_precision".to_string();
        }
        let mut ty = TypeName::simple(name);

        if self.eat_token(&TokenType::LParen) {
            loop {
                match self.current_token().token_type.clone() {
                    TokenType::Int(n) => {
                        self.next_token();
                        ty.args.push(TypeArg::Int(n));
                    }
                    TokenType::Ident(word) => {
                        self.next_token();
                        ty.args.push(TypeArg::Name(word));
                    }
                    _ => return Err(self.error("type parameter")),
                }
                if !self.eat_token(&TokenType::Comma) {
                    break;
                }
            }
            self.expect_token(&TokenType::RParen)?;
        } else if self.eat_token(&TokenType::Lt) {
            loop {
                if ty.name == "struct" {
                    let field = self.identifier()?;
                    let field_ty = self.parse_type()?;
                    ty.args.push(TypeArg::Field { name: field, ty: field_ty });
                } else {
                    let inner = self.parse_type()?;
                    ty.args.push(TypeArg::Type(inner));
                }
                if !self.eat_token(&TokenType::Comma) {
                    break;
                }
            }
            self.expect_token(&TokenType::Gt)?;
        }
        Ok(ty)
    }
}

enum InfixOp {
    Plain { op: String, prec: i32 },
    Between { negated: bool },
    In { negated: bool },
    Is { negated: bool },
    Collate,
}

/// Combine a binary application, splicing associative chains flat and
/// rewriting NULL comparisons to their canonical forms.
fn shape_binary(op: &str, left: Expr, right: Expr) -> Expr {
    match op {
        "eq" | "neq" => {
            let (value, null) = match (&left, &right) {
                (_, Expr::Null) => (Some(left.clone()), true),
                (Expr::Null, _) => (Some(right.clone()), true),
                _ => (None, false),
            };
            if null {
                let value = Box::new(value.unwrap());
                return if op == "eq" {
                    Expr::Missing(value)
                } else {
                    Expr::Exists(value)
                };
            }
            Expr::op(op, vec![left, right])
        }
        "and" | "or" | "add" | "mul" => match left {
            Expr::Op { op: ref inner, ref args } if inner == op => {
                let mut args = args.clone();
                args.push(right);
                Expr::op(op, args)
            }
            _ => Expr::op(op, vec![left, right]),
        },
        _ => Expr::op(op, vec![left, right]),
    }
}

/// Interpret the words of a string interval like `'2 day 3 hour'`.
fn parse_interval_words(words: &[&str]) -> Option<Vec<Expr>> {
    if words.len() < 2 || words.len() % 2 != 0 {
        return None;
    }
    let mut parts = Vec::new();
    for pair in words.chunks(2) {
        let unit = keywords::duration_unit(pair[1])?.to_string();
        let value = if let Ok(n) = pair[0].parse::<i64>() {
            Expr::Int(n)
        } else if let Ok(f) = pair[0].parse::<f64>() {
            Expr::Float(f)
        } else {
            return None;
        };
        parts.push(Expr::Interval { value: Box::new(value), unit });
    }
    Some(parts)
}

fn join_intervals(mut parts: Vec<Expr>) -> Expr {
    if parts.len() == 1 {
        parts.pop().unwrap()
    } else {
        Expr::op("add", parts)
    }
}
