// SQL Abstract Syntax Tree
//
// Typed statement and expression trees built by the parser. Every node
// kind is decided once, at construction; downstream stages (the JSON
// projection in `json.rs` and the formatter in `format.rs`) match on
// variants instead of probing fields. The JSON wire shape is produced
// by `json.rs`, not by serde derives on these types.

use linked_hash_map::LinkedHashMap;
use serde_json::Value;

use crate::json;

/// A parsed SQL statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Query(Query),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    Copy(CopyStatement),
    CreateTable(CreateTableStatement),
    CreateView(CreateViewStatement),
    CreateIndex(CreateIndexStatement),
    CacheTable(CacheTableStatement),
    Drop(DropStatement),
    AlterTable(AlterTableStatement),
}

impl Stmt {
    /// Project the statement to its JSON wire shape, with SQL NULL
    /// rendered as `{"null": {}}`.
    pub fn to_json(&self) -> Value {
        json::stmt_to_json(self, &json::null_sentinel())
    }

    /// Project to JSON with every SQL NULL replaced by `null`.
    pub fn to_json_with_null(&self, null: &Value) -> Value {
        json::stmt_to_json(self, null)
    }
}

/// A query: an optional WITH prefix, a body, and trailing clauses that
/// bind to the whole body (ORDER BY / LIMIT / OFFSET).
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub with: Vec<CteClause>,
    pub recursive: bool,
    pub body: QueryBody,
    pub orderby: Vec<SortItem>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
}

impl Query {
    pub fn plain(body: QueryBody) -> Self {
        Query {
            with: Vec::new(),
            recursive: false,
            body,
            orderby: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Whether the query is a bare body with no wrapping clauses.
    pub fn is_plain(&self) -> bool {
        self.with.is_empty()
            && self.orderby.is_empty()
            && self.limit.is_none()
            && self.offset.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryBody {
    Select(Box<SelectCore>),
    /// Set operation over two or more arms. Arms come from right-folding
    /// runs of the same operator, so mixed chains nest.
    SetOp { op: SetOp, args: Vec<Query> },
    /// VALUES rows used as a query body.
    Values(Vec<Expr>),
    /// A parenthesized query with its own trailing clauses, wrapped by
    /// further outer clauses.
    Nested(Box<Query>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Union,
    UnionAll,
    Intersect,
    Except,
    Minus,
}

impl SetOp {
    /// The operator's JSON key.
    pub fn name(&self) -> &'static str {
        match self {
            SetOp::Union => "union",
            SetOp::UnionAll => "union_all",
            SetOp::Intersect => "intersect",
            SetOp::Except => "except",
            SetOp::Minus => "minus",
        }
    }
}

/// One common-table-expression binding in a WITH clause.
#[derive(Debug, Clone, PartialEq)]
pub struct CteClause {
    pub name: String,
    pub columns: Vec<String>,
    pub query: Query,
}

/// A single SELECT core, without trailing ORDER BY/LIMIT.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectCore {
    pub top: Option<Top>,
    pub distinct: bool,
    pub distinct_on: Vec<Expr>,
    pub select: Vec<SelectItem>,
    pub from: Vec<FromItem>,
    pub where_clause: Option<Expr>,
    pub groupby: Vec<SelectItem>,
    pub having: Option<Expr>,
    pub qualify: Option<Expr>,
}

/// SQL Server TOP clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Top {
    pub value: Expr,
    pub percent: bool,
    pub ties: bool,
}

/// One projection in a select list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub value: Expr,
    pub alias: Option<Alias>,
}

impl SelectItem {
    pub fn bare(value: Expr) -> Self {
        SelectItem { value, alias: None }
    }
}

/// An alias with an optional column list (`AS t(a, b)`).
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub name: String,
    pub columns: Vec<String>,
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub struct SortItem {
    pub value: Expr,
    pub sort: Option<SortDir>,
    pub nulls: Option<NullsOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

/// One entry of a FROM clause: a source, or a join onto the previous
/// sources. The parser flattens join chains into this list.
#[derive(Debug, Clone, PartialEq)]
pub enum FromItem {
    Source(TableSource),
    Join(JoinClause),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// Lowercase join phrase, e.g. "left outer join".
    pub kind: String,
    pub source: TableSource,
    pub on: Option<Expr>,
    pub using: Vec<String>,
}

/// A table source with its modifiers and alias.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSource {
    pub value: TableValue,
    pub with_ordinality: bool,
    pub tablesample: Option<TableSample>,
    pub pivot: Option<Pivot>,
    pub unpivot: Option<Unpivot>,
    pub alias: Option<Alias>,
}

impl TableSource {
    pub fn named(name: String) -> Self {
        TableSource {
            value: TableValue::Name(name),
            with_ordinality: false,
            tablesample: None,
            pivot: None,
            unpivot: None,
            alias: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableValue {
    Name(String),
    Subquery(Box<Query>),
    /// Table function call, e.g. `unnest(tags)`.
    Call(FunctionCall),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableSample {
    Bucket {
        numerator: i64,
        denominator: i64,
        on: Option<Box<Expr>>,
    },
    Percent(Box<Expr>),
    Rows(Box<Expr>),
    /// Byte-sized sample like '100M'.
    Size(String),
}

/// PIVOT (aggregates FOR name IN (values)) modifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub aggregate: Vec<SelectItem>,
    pub for_name: String,
    pub in_values: Vec<SelectItem>,
}

/// UNPIVOT (value FOR name IN (columns)) modifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Unpivot {
    pub value: String,
    pub for_name: String,
    pub in_columns: Vec<SelectItem>,
}

/// An expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// String literal.
    Literal(String),
    /// Hex literal, digits without the 0x prefix.
    Hex(String),
    /// Identifier path, dot-joined with literal dots in quoted segments
    /// escaped as `\.`.
    Name(String),
    Star,
    /// Operator application by canonical name: unary (`neg`, `not`),
    /// binary, and n-ary flattened associative chains (`and`, `add`).
    Op { op: String, args: Vec<Expr> },
    /// `x IS NULL` and `x = NULL` canonical form.
    Missing(Box<Expr>),
    /// `x IS NOT NULL` and `x != NULL` canonical form.
    Exists(Box<Expr>),
    Case {
        whens: Vec<(Expr, Expr)>,
        otherwise: Option<Box<Expr>>,
    },
    Cast {
        expr: Box<Expr>,
        ty: TypeName,
        safe: bool,
    },
    Interval {
        value: Box<Expr>,
        unit: String,
    },
    Trim {
        expr: Box<Expr>,
        characters: Option<Box<Expr>>,
        direction: Option<TrimDirection>,
    },
    Extract {
        unit: String,
        expr: Box<Expr>,
    },
    Call(FunctionCall),
    /// Postfix subscript `base[index]`.
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    /// Parenthesized subquery in expression position.
    Query(Box<Query>),
    /// Parenthesized expression list that always denotes a list
    /// (IN-lists, row constructors), never collapsed.
    Tuple(Vec<Expr>),
    /// Array or map constructor, key is "create_array" or "create_map".
    Collection {
        kind: &'static str,
        items: Vec<Expr>,
    },
    /// DISTINCT applied in expression position.
    Distinct(Vec<Expr>),
}

impl Expr {
    pub fn op(op: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Op { op: op.into(), args }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimDirection {
    Leading,
    Trailing,
    Both,
}

/// A function call, with the window clauses that may attach to it.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Lowercased for known unreserved builtins, otherwise as written.
    pub name: String,
    pub args: Vec<Expr>,
    pub ignore_nulls: bool,
    pub over: Option<Box<WindowSpec>>,
    pub within: Option<Vec<SortItem>>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        FunctionCall {
            name: name.into(),
            args,
            ignore_nulls: false,
            over: None,
            within: None,
        }
    }
}

/// OVER (...) window specification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSpec {
    pub partitionby: Vec<Expr>,
    pub orderby: Vec<SortItem>,
    pub range: Option<WindowFrame>,
}

/// ROWS/RANGE frame, offsets relative to the current row; `None` means
/// unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowFrame {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// A (possibly parametrized) type name: `varchar(25)`,
/// `decimal(10, 2)`, `array<int64>`, `struct<a int64, b string>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub name: String,
    pub args: Vec<TypeArg>,
}

impl TypeName {
    pub fn simple(name: impl Into<String>) -> Self {
        TypeName { name: name.into(), args: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeArg {
    Int(i64),
    Name(String),
    Type(TypeName),
    Field { name: String, ty: TypeName },
}

// ---- DML ----

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    pub overwrite: bool,
    pub if_exists: bool,
    pub columns: Vec<String>,
    pub source: InsertSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// VALUES rows zipped with a declared column list into ordered
    /// column-to-value records.
    Records(Vec<LinkedHashMap<String, Expr>>),
    /// VALUES rows with no column list, kept positional.
    Rows(Vec<Vec<Expr>>),
    Query(Box<Query>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: String,
    pub set: LinkedHashMap<String, Expr>,
    pub where_clause: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: String,
    pub where_clause: Option<Expr>,
}

/// COPY INTO: bulk load from a staged location, a table, or a query.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyStatement {
    pub target: String,
    pub source: CopySource,
    /// Trailing key = value options as written, e.g. file_format.
    pub options: LinkedHashMap<String, Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CopySource {
    /// Quoted stage or file location.
    Location(String),
    Name(String),
    Query(Box<Query>),
}

// ---- DDL ----

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    pub name: String,
    pub replace: bool,
    pub temporary: bool,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
    /// Trailing table options as written, e.g. engine, default_charset.
    pub options: Vec<(String, Expr)>,
    pub query: Option<Box<Query>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: TypeName,
    pub options: Vec<ColumnOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnOption {
    NotNull,
    Null,
    Unique,
    AutoIncrement,
    PrimaryKey,
    Default(Expr),
    Check(Expr),
    References(References),
    Comment(String),
    Collate(String),
    Identity { start: i64, increment: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct References {
    pub table: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    PrimaryKey {
        name: Option<String>,
        columns: Vec<String>,
    },
    Unique {
        name: Option<String>,
        columns: Vec<String>,
    },
    Index {
        name: Option<String>,
        columns: Vec<String>,
    },
    ForeignKey {
        name: Option<String>,
        columns: Vec<String>,
        references: References,
    },
    Check {
        name: Option<String>,
        expr: Expr,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateViewStatement {
    pub name: String,
    pub replace: bool,
    pub temporary: bool,
    pub query: Box<Query>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexStatement {
    pub name: String,
    pub table: String,
    pub unique: bool,
    pub using: Option<String>,
    pub columns: Vec<SortItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheTableStatement {
    pub name: String,
    pub lazy: bool,
    pub options: LinkedHashMap<String, Expr>,
    pub query: Option<Box<Query>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Table,
    View,
    Index,
}

impl DropKind {
    pub fn name(&self) -> &'static str {
        match self {
            DropKind::Table => "table",
            DropKind::View => "view",
            DropKind::Index => "index",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropStatement {
    pub kind: DropKind,
    pub name: String,
    pub if_exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableStatement {
    pub table: String,
    pub action: AlterAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlterAction {
    AddColumn(ColumnDef),
    DropColumn(String),
    RenameTo(String),
}
