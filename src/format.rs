// AST to SQL text.
//
// Covers the query and expression core; DML and DDL statements are
// outside the supported subset and return UnsupportedNode. Parentheses
// are emitted exactly when a child operator binds at or above the
// context precedence, so round-tripped text re-parses to the same tree.

use thiserror::Error;

use crate::ast::{
    Expr, FromItem, FunctionCall, NullsOrder, Query, QueryBody, SelectCore, SelectItem,
    SetOp, SortDir, SortItem, Stmt, TableSource, TableValue, TrimDirection, TypeArg,
    TypeName, WindowFrame, WindowSpec,
};
use crate::keywords;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("cannot format {0} nodes")]
    UnsupportedNode(String),
    #[error("malformed tree: {0}")]
    MalformedAst(String),
}

type FormatResult = Result<String, FormatError>;

/// Formatting options.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Quote identifiers with double quotes; backticks otherwise.
    pub ansi_quotes: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions { ansi_quotes: true }
    }
}

/// Format a statement with default options.
pub fn format(stmt: &Stmt) -> FormatResult {
    format_with(stmt, &FormatOptions::default())
}

pub fn format_with(stmt: &Stmt, options: &FormatOptions) -> FormatResult {
    let formatter = Formatter { options };
    match stmt {
        Stmt::Query(query) => formatter.query(query),
        Stmt::Insert(_) => Err(FormatError::UnsupportedNode("insert".to_string())),
        Stmt::Update(_) => Err(FormatError::UnsupportedNode("update".to_string())),
        Stmt::Delete(_) => Err(FormatError::UnsupportedNode("delete".to_string())),
        Stmt::Copy(_) => Err(FormatError::UnsupportedNode("copy into".to_string())),
        _ => Err(FormatError::UnsupportedNode("ddl".to_string())),
    }
}

struct Formatter<'a> {
    options: &'a FormatOptions,
}

impl Formatter<'_> {
    fn query(&self, query: &Query) -> FormatResult {
        let mut parts = Vec::new();

        if !query.with.is_empty() {
            let mut ctes = Vec::new();
            for cte in &query.with {
                let mut binding = self.name(&cte.name);
                if !cte.columns.is_empty() {
                    let columns: Vec<String> =
                        cte.columns.iter().map(|column| self.name(column)).collect();
                    binding.push_str(&format!(" ({})", columns.join(", ")));
                }
                binding.push_str(&format!(" AS ({})", self.query(&cte.query)?));
                ctes.push(binding);
            }
            let keyword = if query.recursive { "WITH RECURSIVE" } else { "WITH" };
            parts.push(format!("{} {}", keyword, ctes.join(", ")));
        }

        // Trailing clauses already bind the whole body at this level, so
        // the wrapper introduced for them needs no parentheses.
        match &query.body {
            QueryBody::Nested(inner) if inner.is_plain() => {
                parts.push(self.body(&inner.body)?);
            }
            body => parts.push(self.body(body)?),
        }

        if !query.orderby.is_empty() {
            parts.push(format!("ORDER BY {}", self.sort_items(&query.orderby)?));
        }
        if let Some(limit) = &query.limit {
            parts.push(format!("LIMIT {}", self.expr(limit)?));
        }
        if let Some(offset) = &query.offset {
            parts.push(format!("OFFSET {}", self.expr(offset)?));
        }
        Ok(parts.join(" "))
    }

    fn body(&self, body: &QueryBody) -> FormatResult {
        match body {
            QueryBody::Select(core) => self.select_core(core),
            QueryBody::SetOp { op, args } => {
                let separator = match op {
                    SetOp::Union => "UNION",
                    SetOp::UnionAll => "UNION ALL",
                    SetOp::Intersect => "INTERSECT",
                    SetOp::Except => "EXCEPT",
                    SetOp::Minus => "MINUS",
                };
                let mut arms = Vec::new();
                for arm in args {
                    // Arms with their own trailing clauses keep parens.
                    if arm.is_plain() && matches!(arm.body, QueryBody::Select(_)) {
                        arms.push(self.query(arm)?);
                    } else {
                        arms.push(format!("({})", self.query(arm)?));
                    }
                }
                Ok(arms.join(&format!(" {} ", separator)))
            }
            QueryBody::Values(rows) => {
                let mut texts = Vec::new();
                for row in rows {
                    match row {
                        Expr::Tuple(items) => texts.push(format!("({})", self.expr_list(items)?)),
                        single => texts.push(format!("({})", self.expr(single)?)),
                    }
                }
                Ok(format!("VALUES {}", texts.join(", ")))
            }
            QueryBody::Nested(inner) => Ok(format!("({})", self.query(inner)?)),
        }
    }

    fn select_core(&self, core: &SelectCore) -> FormatResult {
        let mut parts = Vec::new();
        let mut head = "SELECT".to_string();
        if core.distinct {
            head.push_str(" DISTINCT");
        }
        if !core.distinct_on.is_empty() {
            head.push_str(&format!(" DISTINCT ON ({})", self.expr_list(&core.distinct_on)?));
        }
        if let Some(top) = &core.top {
            head.push_str(&format!(" TOP {}", self.expr(&top.value)?));
            if top.percent {
                head.push_str(" PERCENT");
            }
            if top.ties {
                head.push_str(" WITH TIES");
            }
        }
        let items: Result<Vec<String>, FormatError> = core
            .select
            .iter()
            .map(|item| self.select_item(item))
            .collect();
        head.push(' ');
        head.push_str(&items?.join(", "));
        parts.push(head);

        if !core.from.is_empty() {
            let mut from = "FROM ".to_string();
            for (at, item) in core.from.iter().enumerate() {
                match item {
                    FromItem::Source(source) => {
                        if at > 0 {
                            from.push_str(", ");
                        }
                        from.push_str(&self.table_source(source)?);
                    }
                    FromItem::Join(join) => {
                        from.push_str(&format!(
                            " {} {}",
                            join.kind.to_uppercase(),
                            self.table_source(&join.source)?
                        ));
                        if let Some(on) = &join.on {
                            from.push_str(&format!(" ON {}", self.expr(on)?));
                        }
                        if !join.using.is_empty() {
                            let names: Vec<String> =
                                join.using.iter().map(|name| self.name(name)).collect();
                            from.push_str(&format!(" USING ({})", names.join(", ")));
                        }
                    }
                }
            }
            parts.push(from);
        }

        if let Some(cond) = &core.where_clause {
            parts.push(format!("WHERE {}", self.expr(cond)?));
        }
        if !core.groupby.is_empty() {
            let items: Result<Vec<String>, FormatError> = core
                .groupby
                .iter()
                .map(|item| self.select_item(item))
                .collect();
            parts.push(format!("GROUP BY {}", items?.join(", ")));
        }
        if let Some(cond) = &core.having {
            parts.push(format!("HAVING {}", self.expr(cond)?));
        }
        if let Some(cond) = &core.qualify {
            parts.push(format!("QUALIFY {}", self.expr(cond)?));
        }
        Ok(parts.join(" "))
    }

    fn select_item(&self, item: &SelectItem) -> FormatResult {
        let mut text = self.expr(&item.value)?;
        if let Some(alias) = &item.alias {
            text.push_str(&format!(" AS {}", self.name(&alias.name)));
            if !alias.columns.is_empty() {
                let columns: Vec<String> =
                    alias.columns.iter().map(|column| self.name(column)).collect();
                text.push_str(&format!(" ({})", columns.join(", ")));
            }
        }
        Ok(text)
    }

    fn table_source(&self, source: &TableSource) -> FormatResult {
        if source.with_ordinality
            || source.tablesample.is_some()
            || source.pivot.is_some()
            || source.unpivot.is_some()
        {
            return Err(FormatError::UnsupportedNode("table modifier".to_string()));
        }
        let mut text = match &source.value {
            TableValue::Name(name) => self.name(name),
            TableValue::Subquery(query) => format!("({})", self.query(query)?),
            TableValue::Call(call) => self.call(call)?,
        };
        if let Some(alias) = &source.alias {
            text.push_str(&format!(" AS {}", self.name(&alias.name)));
            if !alias.columns.is_empty() {
                let columns: Vec<String> =
                    alias.columns.iter().map(|column| self.name(column)).collect();
                text.push_str(&format!(" ({})", columns.join(", ")));
            }
        }
        Ok(text)
    }

    fn sort_items(&self, items: &[SortItem]) -> FormatResult {
        let mut texts = Vec::new();
        for item in items {
            let mut text = self.expr(&item.value)?;
            match item.sort {
                Some(SortDir::Asc) => text.push_str(" ASC"),
                Some(SortDir::Desc) => text.push_str(" DESC"),
                None => {}
            }
            match item.nulls {
                Some(NullsOrder::First) => text.push_str(" NULLS FIRST"),
                Some(NullsOrder::Last) => text.push_str(" NULLS LAST"),
                None => {}
            }
            texts.push(text);
        }
        Ok(texts.join(", "))
    }

    fn expr(&self, expr: &Expr) -> FormatResult {
        match expr {
            Expr::Null => Ok("NULL".to_string()),
            Expr::Bool(true) => Ok("TRUE".to_string()),
            Expr::Bool(false) => Ok("FALSE".to_string()),
            Expr::Int(n) => Ok(n.to_string()),
            Expr::Float(f) => Ok(f.to_string()),
            Expr::Literal(s) => Ok(quote_string(s)),
            Expr::Hex(digits) => Ok(format!("0x{}", digits)),
            Expr::Name(name) => Ok(self.name(name)),
            Expr::Star => Ok("*".to_string()),
            Expr::Op { op, args } => self.operator(op, args),
            Expr::Missing(inner) => {
                let prec = keywords::precedence("is").unwrap_or(0);
                Ok(format!("{} IS NULL", self.isolate(inner, prec)?))
            }
            Expr::Exists(inner) => {
                let prec = keywords::precedence("is").unwrap_or(0);
                Ok(format!("{} IS NOT NULL", self.isolate(inner, prec)?))
            }
            Expr::Case { whens, otherwise } => {
                let mut text = "CASE".to_string();
                for (cond, value) in whens {
                    text.push_str(&format!(
                        " WHEN {} THEN {}",
                        self.expr(cond)?,
                        self.expr(value)?
                    ));
                }
                if let Some(otherwise) = otherwise {
                    text.push_str(&format!(" ELSE {}", self.expr(otherwise)?));
                }
                text.push_str(" END");
                Ok(text)
            }
            Expr::Cast { expr, ty, safe } => {
                let keyword = if *safe { "SAFE_CAST" } else { "CAST" };
                Ok(format!(
                    "{}({} AS {})",
                    keyword,
                    self.expr(expr)?,
                    self.type_name(ty)
                ))
            }
            Expr::Interval { value, unit } => Ok(format!(
                "INTERVAL {} {}",
                self.isolate(value, keywords::precedence("add").unwrap())?,
                unit.to_uppercase()
            )),
            Expr::Trim { expr, characters, direction } => {
                let mut inner = String::new();
                match direction {
                    Some(TrimDirection::Leading) => inner.push_str("LEADING "),
                    Some(TrimDirection::Trailing) => inner.push_str("TRAILING "),
                    Some(TrimDirection::Both) => inner.push_str("BOTH "),
                    None => {}
                }
                if let Some(characters) = characters {
                    inner.push_str(&format!("{} FROM ", self.expr(characters)?));
                } else if direction.is_some() {
                    inner.push_str("FROM ");
                }
                inner.push_str(&self.expr(expr)?);
                Ok(format!("TRIM({})", inner))
            }
            Expr::Extract { unit, expr } => Ok(format!(
                "EXTRACT({} FROM {})",
                unit.to_uppercase(),
                self.expr(expr)?
            )),
            Expr::Call(call) => self.call(call),
            Expr::Index { base, index } => {
                Ok(format!("{}[{}]", self.isolate(base, 1)?, self.expr(index)?))
            }
            Expr::Query(query) => Ok(format!("({})", self.query(query)?)),
            Expr::Tuple(items) => Ok(format!("({})", self.expr_list(items)?)),
            Expr::Collection { kind, items } => {
                if *kind == "create_map" {
                    Ok(format!("MAP[{}]", self.expr_list(items)?))
                } else {
                    Ok(format!("[{}]", self.expr_list(items)?))
                }
            }
            Expr::Distinct(items) => Ok(format!("DISTINCT {}", self.expr_list(items)?)),
        }
    }

    fn operator(&self, op: &str, args: &[Expr]) -> FormatResult {
        let prec = keywords::precedence(op).unwrap_or(0);
        match op {
            "neg" => Ok(format!("-{}", self.isolate(&args[0], prec)?)),
            "not" => Ok(format!("NOT {}", self.isolate(&args[0], prec)?)),
            "binary_not" if args.len() == 1 => {
                Ok(format!("~{}", self.isolate(&args[0], prec)?))
            }
            "between" | "not_between" => {
                if args.len() != 3 {
                    return Err(FormatError::MalformedAst(format!(
                        "{} expects three operands",
                        op
                    )));
                }
                let keyword = if op == "between" { "BETWEEN" } else { "NOT BETWEEN" };
                Ok(format!(
                    "{} {} {} AND {}",
                    self.isolate(&args[0], prec)?,
                    keyword,
                    self.isolate(&args[1], prec)?,
                    self.isolate(&args[2], prec)?
                ))
            }
            _ => {
                let symbol = operator_text(op).ok_or_else(|| {
                    FormatError::UnsupportedNode(format!("operator {}", op))
                })?;
                let mut texts = Vec::with_capacity(args.len());
                for arg in args {
                    texts.push(self.isolate(arg, prec)?);
                }
                Ok(texts.join(&format!(" {} ", symbol)))
            }
        }
    }

    fn call(&self, call: &FunctionCall) -> FormatResult {
        let args = if call.args.is_empty() {
            String::new()
        } else {
            self.expr_list(&call.args)?
        };
        let mut text = format!("{}({})", call.name.to_uppercase(), args);
        if call.ignore_nulls {
            text.push_str(" IGNORE NULLS");
        }
        if let Some(within) = &call.within {
            text.push_str(&format!(
                " WITHIN GROUP (ORDER BY {})",
                self.sort_items(within)?
            ));
        }
        if let Some(over) = &call.over {
            text.push_str(&format!(" OVER ({})", self.window(over)?));
        }
        Ok(text)
    }

    fn window(&self, spec: &WindowSpec) -> FormatResult {
        let mut parts = Vec::new();
        if !spec.partitionby.is_empty() {
            parts.push(format!("PARTITION BY {}", self.expr_list(&spec.partitionby)?));
        }
        if !spec.orderby.is_empty() {
            parts.push(format!("ORDER BY {}", self.sort_items(&spec.orderby)?));
        }
        if let Some(frame) = &spec.range {
            parts.push(format!(
                "ROWS BETWEEN {} AND {}",
                frame_bound(frame, true),
                frame_bound(frame, false)
            ));
        }
        Ok(parts.join(" "))
    }

    fn expr_list(&self, items: &[Expr]) -> FormatResult {
        let mut texts = Vec::with_capacity(items.len());
        for item in items {
            texts.push(self.expr(item)?);
        }
        Ok(texts.join(", "))
    }

    /// Parenthesize a child whose operator binds at or above the
    /// context precedence.
    fn isolate(&self, expr: &Expr, prec: i32) -> FormatResult {
        let text = self.expr(expr)?;
        if expr_precedence(expr) >= prec {
            Ok(format!("({})", text))
        } else {
            Ok(text)
        }
    }

    /// Quote a dotted name path per segment.
    fn name(&self, path: &str) -> String {
        split_path(path)
            .into_iter()
            .map(|segment| self.quote_segment(&segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn quote_segment(&self, segment: &str) -> String {
        if segment == "*" || !needs_quote(segment) {
            return segment.to_string();
        }
        if self.options.ansi_quotes {
            format!("\"{}\"", segment.replace('"', "\"\""))
        } else {
            format!("`{}`", segment.replace('`', "``"))
        }
    }

    fn type_name(&self, ty: &TypeName) -> String {
        let name = ty.name.to_uppercase();
        if ty.args.is_empty() {
            return name;
        }
        let args: Vec<String> = ty
            .args
            .iter()
            .map(|arg| match arg {
                TypeArg::Int(n) => n.to_string(),
                TypeArg::Name(word) => word.clone(),
                TypeArg::Type(inner) => self.type_name(inner),
                TypeArg::Field { name, ty } => {
                    format!("{} {}", self.name(name), self.type_name(ty))
                }
            })
            .collect();
        if ty.name == "array" || ty.name == "struct" {
            format!("{}<{}>", name, args.join(", "))
        } else {
            format!("{}({})", name, args.join(", "))
        }
    }
}

fn frame_bound(frame: &WindowFrame, low: bool) -> String {
    let bound = if low { frame.min } else { frame.max };
    match bound {
        None if low => "UNBOUNDED PRECEDING".to_string(),
        None => "UNBOUNDED FOLLOWING".to_string(),
        Some(0) => "CURRENT ROW".to_string(),
        Some(n) if n < 0 => format!("{} PRECEDING", -n),
        Some(n) => format!("{} FOLLOWING", n),
    }
}

fn operator_text(op: &str) -> Option<&'static str> {
    Some(match op {
        "concat" => "||",
        "mul" => "*",
        "div" => "/",
        "mod" => "%",
        "add" => "+",
        "sub" => "-",
        "binary_and" => "&",
        "binary_or" => "|",
        "lt" => "<",
        "lte" => "<=",
        "gt" => ">",
        "gte" => ">=",
        "eq" => "=",
        "neq" => "<>",
        "in" => "IN",
        "nin" => "NOT IN",
        "like" => "LIKE",
        "not_like" => "NOT LIKE",
        "rlike" => "RLIKE",
        "not_rlike" => "NOT RLIKE",
        "similar_to" => "SIMILAR TO",
        "not_similar_to" => "NOT SIMILAR TO",
        "and" => "AND",
        "or" => "OR",
        "collate" => "COLLATE",
        _ => return None,
    })
}

fn expr_precedence(expr: &Expr) -> i32 {
    match expr {
        Expr::Op { op, .. } => keywords::precedence(op).unwrap_or(0),
        Expr::Missing(_) | Expr::Exists(_) => keywords::precedence("is").unwrap_or(0),
        _ => keywords::precedence("literal").unwrap_or(-2),
    }
}

fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Split a dotted path on unescaped dots, unescaping `\.` inside
/// segments.
fn split_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('.') => current.push('.'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

fn needs_quote(word: &str) -> bool {
    if word.is_empty() || keywords::is_reserved(word) {
        return true;
    }
    let mut chars = word.chars();
    let first = chars.next().unwrap();
    if !first.is_ascii_alphabetic() && first != '_' {
        return true;
    }
    chars.any(|c| !c.is_ascii_alphanumeric() && c != '_')
}
