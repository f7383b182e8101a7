// JSON projection of the AST.
//
// Produces the canonical mapping shape: a single operator key applied
// to its operand or operand list, `{"literal": v}` wrappers around
// literal values, record maps for aliasing and sorting, and one-element
// lists collapsed to the bare node. The SQL NULL replacement is
// threaded through every call so concurrent projections never share
// state.

use serde_json::{json, Map, Value};

use crate::ast::{
    AlterAction, CopySource, CteClause, Expr, FromItem, InsertSource, NullsOrder, Query,
    QueryBody, SelectCore, SelectItem, SortDir, SortItem, Stmt, TableConstraint,
    TableSample, TableSource, TableValue, TrimDirection, TypeArg, TypeName, WindowSpec,
};

/// The default rendering of SQL NULL.
pub fn null_sentinel() -> Value {
    json!({"null": {}})
}

pub fn stmt_to_json(stmt: &Stmt, null: &Value) -> Value {
    match stmt {
        Stmt::Query(query) => query_to_json(query, null),
        Stmt::Insert(insert) => {
            let mut map = Map::new();
            map.insert("insert".to_string(), Value::String(insert.table.clone()));
            if insert.overwrite {
                map.insert("overwrite".to_string(), Value::Bool(true));
            }
            if insert.if_exists {
                map.insert("if_exists".to_string(), Value::Bool(true));
            }
            if !insert.columns.is_empty() {
                map.insert("columns".to_string(), string_list(&insert.columns));
            }
            match &insert.source {
                InsertSource::Records(records) => {
                    let rows: Vec<Value> = records
                        .iter()
                        .map(|record| {
                            let mut row = Map::new();
                            for (column, value) in record {
                                row.insert(column.clone(), expr_to_json(value, null));
                            }
                            Value::Object(row)
                        })
                        .collect();
                    map.insert("values".to_string(), Value::Array(rows));
                }
                InsertSource::Rows(rows) => {
                    let rows: Vec<Value> =
                        rows.iter().map(|row| expr_list(row, null)).collect();
                    map.insert("values".to_string(), Value::Array(rows));
                }
                InsertSource::Query(query) => {
                    map.insert("query".to_string(), query_to_json(query, null));
                }
            }
            Value::Object(map)
        }
        Stmt::Update(update) => {
            let mut set = Map::new();
            for (column, value) in &update.set {
                set.insert(column.clone(), expr_to_json(value, null));
            }
            let mut map = Map::new();
            map.insert("update".to_string(), Value::String(update.table.clone()));
            map.insert("set".to_string(), Value::Object(set));
            if let Some(cond) = &update.where_clause {
                map.insert("where".to_string(), expr_to_json(cond, null));
            }
            Value::Object(map)
        }
        Stmt::Delete(delete) => {
            let mut map = Map::new();
            map.insert("delete".to_string(), Value::String(delete.table.clone()));
            if let Some(cond) = &delete.where_clause {
                map.insert("where".to_string(), expr_to_json(cond, null));
            }
            Value::Object(map)
        }
        Stmt::Copy(copy) => {
            let mut map = Map::new();
            map.insert("copy into".to_string(), Value::String(copy.target.clone()));
            let source = match &copy.source {
                CopySource::Location(location) => json!({ "literal": location }),
                CopySource::Name(name) => Value::String(name.clone()),
                CopySource::Query(query) => query_to_json(query, null),
            };
            map.insert("from".to_string(), source);
            for (key, value) in &copy.options {
                map.insert(key.clone(), expr_to_json(value, null));
            }
            Value::Object(map)
        }
        Stmt::CreateTable(create) => {
            let mut inner = Map::new();
            inner.insert("name".to_string(), Value::String(create.name.clone()));
            if create.replace {
                inner.insert("replace".to_string(), Value::Bool(true));
            }
            if create.temporary {
                inner.insert("temporary".to_string(), Value::Bool(true));
            }
            if create.if_not_exists {
                inner.insert("if_not_exists".to_string(), Value::Bool(true));
            }
            if !create.columns.is_empty() {
                let columns: Vec<Value> = create
                    .columns
                    .iter()
                    .map(|column| column_def_json(column, null))
                    .collect();
                inner.insert("columns".to_string(), one_or_many(columns));
            }
            if !create.constraints.is_empty() {
                let constraints: Vec<Value> = create
                    .constraints
                    .iter()
                    .map(|constraint| constraint_json(constraint, null))
                    .collect();
                inner.insert("constraint".to_string(), one_or_many(constraints));
            }
            for (key, value) in &create.options {
                inner.insert(key.clone(), expr_to_json(value, null));
            }
            if let Some(query) = &create.query {
                inner.insert("query".to_string(), query_to_json(query, null));
            }
            json!({ "create table": inner })
        }
        Stmt::CreateView(create) => {
            let mut inner = Map::new();
            inner.insert("name".to_string(), Value::String(create.name.clone()));
            if create.replace {
                inner.insert("replace".to_string(), Value::Bool(true));
            }
            if create.temporary {
                inner.insert("temporary".to_string(), Value::Bool(true));
            }
            inner.insert("query".to_string(), query_to_json(&create.query, null));
            json!({ "create view": inner })
        }
        Stmt::CreateIndex(create) => {
            let mut inner = Map::new();
            inner.insert("name".to_string(), Value::String(create.name.clone()));
            inner.insert("table".to_string(), Value::String(create.table.clone()));
            if create.unique {
                inner.insert("unique".to_string(), Value::Bool(true));
            }
            if let Some(using) = &create.using {
                inner.insert("using".to_string(), Value::String(using.clone()));
            }
            let columns: Vec<Value> = create
                .columns
                .iter()
                .map(|column| sort_item_json(column, null))
                .collect();
            inner.insert("columns".to_string(), one_or_many(columns));
            json!({ "create index": inner })
        }
        Stmt::CacheTable(cache) => {
            let mut inner = Map::new();
            inner.insert("name".to_string(), Value::String(cache.name.clone()));
            if cache.lazy {
                inner.insert("lazy".to_string(), Value::Bool(true));
            }
            if !cache.options.is_empty() {
                let mut options = Map::new();
                for (key, value) in &cache.options {
                    options.insert(key.clone(), expr_to_json(value, null));
                }
                inner.insert("options".to_string(), Value::Object(options));
            }
            if let Some(query) = &cache.query {
                inner.insert("query".to_string(), query_to_json(query, null));
            }
            json!({ "cache table": inner })
        }
        Stmt::Drop(drop) => {
            let mut inner = Map::new();
            inner.insert(
                drop.kind.name().to_string(),
                Value::String(drop.name.clone()),
            );
            if drop.if_exists {
                inner.insert("if_exists".to_string(), Value::Bool(true));
            }
            json!({ "drop": inner })
        }
        Stmt::AlterTable(alter) => {
            let mut inner = Map::new();
            inner.insert("table".to_string(), Value::String(alter.table.clone()));
            match &alter.action {
                AlterAction::AddColumn(column) => {
                    inner.insert("add".to_string(), column_def_json(column, null));
                }
                AlterAction::DropColumn(name) => {
                    inner.insert("drop".to_string(), Value::String(name.clone()));
                }
                AlterAction::RenameTo(name) => {
                    inner.insert("rename_to".to_string(), Value::String(name.clone()));
                }
            }
            json!({ "alter table": inner })
        }
    }
}

pub fn query_to_json(query: &Query, null: &Value) -> Value {
    let has_trailing =
        !query.orderby.is_empty() || query.limit.is_some() || query.offset.is_some();

    let mut map = match &query.body {
        QueryBody::Select(core) => select_core_map(core, null),
        body => {
            let inner = body_json(body, null);
            if !has_trailing {
                // Bare set operation (or nested query); the WITH clause
                // still merges into the same map, unless the nested query
                // brought its own WITH, which would collide.
                match inner {
                    Value::Object(map) if query.with.is_empty() => return Value::Object(map),
                    Value::Object(map)
                        if !map.contains_key("with")
                            && !map.contains_key("with recursive") =>
                    {
                        map
                    }
                    other => {
                        let mut map = Map::new();
                        map.insert("from".to_string(), other);
                        map
                    }
                }
            } else {
                // Trailing clauses bind the whole operation through a
                // from-wrapper.
                let mut map = Map::new();
                map.insert("from".to_string(), inner);
                map
            }
        }
    };

    if !query.orderby.is_empty() {
        let items: Vec<Value> = query
            .orderby
            .iter()
            .map(|item| sort_item_json(item, null))
            .collect();
        map.insert("orderby".to_string(), one_or_many(items));
    }
    if let Some(limit) = &query.limit {
        map.insert("limit".to_string(), expr_to_json(limit, null));
    }
    if let Some(offset) = &query.offset {
        map.insert("offset".to_string(), expr_to_json(offset, null));
    }

    if !query.with.is_empty() {
        let key = if query.recursive { "with recursive" } else { "with" };
        let ctes: Vec<Value> = query
            .with
            .iter()
            .map(|cte| cte_json(cte, null))
            .collect();
        map.insert(key.to_string(), one_or_many(ctes));
    }

    Value::Object(map)
}

fn body_json(body: &QueryBody, null: &Value) -> Value {
    match body {
        QueryBody::Select(core) => Value::Object(select_core_map(core, null)),
        QueryBody::SetOp { op, args } => {
            let arms: Vec<Value> = args.iter().map(|arm| query_to_json(arm, null)).collect();
            let mut map = Map::new();
            map.insert(op.name().to_string(), Value::Array(arms));
            Value::Object(map)
        }
        QueryBody::Values(rows) => {
            let rows: Vec<Value> = rows.iter().map(|row| expr_to_json(row, null)).collect();
            let mut map = Map::new();
            map.insert("values".to_string(), one_or_many(rows));
            Value::Object(map)
        }
        QueryBody::Nested(inner) => query_to_json(inner, null),
    }
}

fn cte_json(cte: &CteClause, null: &Value) -> Value {
    let name = if cte.columns.is_empty() {
        Value::String(cte.name.clone())
    } else {
        let mut named = Map::new();
        named.insert(cte.name.clone(), string_list(&cte.columns));
        Value::Object(named)
    };
    json!({ "name": name, "value": query_to_json(&cte.query, null) })
}

fn select_core_map(core: &SelectCore, null: &Value) -> Map<String, Value> {
    let mut map = Map::new();

    let select_key = if core.distinct { "select_distinct" } else { "select" };
    let items: Vec<Value> = core
        .select
        .iter()
        .map(|item| select_item_json(item, null))
        .collect();
    map.insert(select_key.to_string(), one_or_many(items));

    if !core.distinct_on.is_empty() {
        map.insert("distinct_on".to_string(), expr_list(&core.distinct_on, null));
    }
    if let Some(top) = &core.top {
        let value = expr_to_json(&top.value, null);
        let top_json = if top.percent {
            let mut inner = Map::new();
            inner.insert("percent".to_string(), value);
            if top.ties {
                inner.insert("ties".to_string(), Value::Bool(true));
            }
            Value::Object(inner)
        } else if top.ties {
            json!({ "value": value, "ties": true })
        } else {
            value
        };
        map.insert("top".to_string(), top_json);
    }

    if !core.from.is_empty() {
        let items: Vec<Value> = core
            .from
            .iter()
            .map(|item| from_item_json(item, null))
            .collect();
        map.insert("from".to_string(), one_or_many(items));
    }
    if let Some(cond) = &core.where_clause {
        map.insert("where".to_string(), expr_to_json(cond, null));
    }
    if !core.groupby.is_empty() {
        let items: Vec<Value> = core
            .groupby
            .iter()
            .map(|item| select_item_json(item, null))
            .collect();
        map.insert("groupby".to_string(), one_or_many(items));
    }
    if let Some(cond) = &core.having {
        map.insert("having".to_string(), expr_to_json(cond, null));
    }
    if let Some(cond) = &core.qualify {
        map.insert("qualify".to_string(), expr_to_json(cond, null));
    }

    map
}

/// Select items project as `{"value": ...}` records with alias and
/// window clauses as sibling fields; a bare `*` stays a string.
fn select_item_json(item: &SelectItem, null: &Value) -> Value {
    if item.alias.is_none() {
        if let Expr::Star = item.value {
            return Value::String("*".to_string());
        }
    }

    let mut map = Map::new();
    match &item.value {
        Expr::Call(call) if call.over.is_some() || call.within.is_some() => {
            let record = call_record(call, null);
            for (key, value) in record {
                map.insert(key, value);
            }
        }
        value => {
            map.insert("value".to_string(), expr_to_json(value, null));
        }
    }
    if let Some(alias) = &item.alias {
        map.insert("name".to_string(), alias_json(alias));
    }
    Value::Object(map)
}

fn alias_json(alias: &crate::ast::Alias) -> Value {
    if alias.columns.is_empty() {
        Value::String(alias.name.clone())
    } else {
        let mut named = Map::new();
        named.insert(alias.name.clone(), string_list(&alias.columns));
        Value::Object(named)
    }
}

fn from_item_json(item: &FromItem, null: &Value) -> Value {
    match item {
        FromItem::Source(source) => table_source_json(source, null),
        FromItem::Join(join) => {
            let mut map = Map::new();
            map.insert(join.kind.clone(), table_source_json(&join.source, null));
            if let Some(on) = &join.on {
                map.insert("on".to_string(), expr_to_json(on, null));
            }
            if !join.using.is_empty() {
                map.insert("using".to_string(), one_or_many_strings(&join.using));
            }
            Value::Object(map)
        }
    }
}

fn table_source_json(source: &TableSource, null: &Value) -> Value {
    let value = match &source.value {
        TableValue::Name(name) => Value::String(name.clone()),
        TableValue::Subquery(query) => query_to_json(query, null),
        TableValue::Call(call) => call_json(call, null),
    };

    let bare = source.alias.is_none()
        && !source.with_ordinality
        && source.tablesample.is_none()
        && source.pivot.is_none()
        && source.unpivot.is_none();
    if bare {
        return value;
    }

    let mut map = Map::new();
    map.insert("value".to_string(), value);
    if source.with_ordinality {
        map.insert("with_ordinality".to_string(), Value::Bool(true));
    }
    if let Some(sample) = &source.tablesample {
        map.insert("tablesample".to_string(), tablesample_json(sample, null));
    }
    if let Some(pivot) = &source.pivot {
        let aggregate: Vec<Value> = pivot
            .aggregate
            .iter()
            .map(|item| select_item_json(item, null))
            .collect();
        let in_values: Vec<Value> = pivot
            .in_values
            .iter()
            .map(|item| select_item_json(item, null))
            .collect();
        map.insert(
            "pivot".to_string(),
            json!({
                "aggregate": one_or_many(aggregate),
                "for": pivot.for_name.clone(),
                "in": one_or_many(in_values),
            }),
        );
    }
    if let Some(unpivot) = &source.unpivot {
        let in_columns: Vec<Value> = unpivot
            .in_columns
            .iter()
            .map(|item| select_item_json(item, null))
            .collect();
        map.insert(
            "unpivot".to_string(),
            json!({
                "value": unpivot.value.clone(),
                "for": unpivot.for_name.clone(),
                "in": one_or_many(in_columns),
            }),
        );
    }
    if let Some(alias) = &source.alias {
        map.insert("name".to_string(), alias_json(alias));
    }
    Value::Object(map)
}

fn tablesample_json(sample: &TableSample, null: &Value) -> Value {
    match sample {
        TableSample::Bucket { numerator, denominator, on } => {
            let mut map = Map::new();
            map.insert("bucket".to_string(), json!([numerator, denominator]));
            if let Some(on) = on {
                map.insert("on".to_string(), expr_to_json(on, null));
            }
            Value::Object(map)
        }
        TableSample::Percent(value) => json!({ "percent": expr_to_json(value, null) }),
        TableSample::Rows(value) => json!({ "rows": expr_to_json(value, null) }),
        TableSample::Size(size) => json!({ "size": size.clone() }),
    }
}

fn sort_item_json(item: &SortItem, null: &Value) -> Value {
    let mut map = Map::new();
    map.insert("value".to_string(), expr_to_json(&item.value, null));
    if let Some(sort) = &item.sort {
        let dir = match sort {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        };
        map.insert("sort".to_string(), Value::String(dir.to_string()));
    }
    if let Some(nulls) = &item.nulls {
        let order = match nulls {
            NullsOrder::First => "first",
            NullsOrder::Last => "last",
        };
        map.insert("nulls".to_string(), Value::String(order.to_string()));
    }
    Value::Object(map)
}

pub fn expr_to_json(expr: &Expr, null: &Value) -> Value {
    match expr {
        Expr::Null => null.clone(),
        Expr::Bool(b) => Value::Bool(*b),
        Expr::Int(n) => json!(n),
        Expr::Float(f) => json!(f),
        Expr::Literal(s) => json!({ "literal": s.clone() }),
        Expr::Hex(digits) => json!({ "hex": digits.clone() }),
        Expr::Name(name) => Value::String(name.clone()),
        Expr::Star => Value::String("*".to_string()),
        Expr::Op { op, args } => {
            let mut map = Map::new();
            map.insert(op.clone(), expr_list(args, null));
            Value::Object(map)
        }
        Expr::Missing(inner) => json!({ "missing": expr_to_json(inner, null) }),
        Expr::Exists(inner) => json!({ "exists": expr_to_json(inner, null) }),
        Expr::Case { whens, otherwise } => {
            let mut branches: Vec<Value> = whens
                .iter()
                .map(|(cond, value)| {
                    json!({
                        "when": expr_to_json(cond, null),
                        "then": expr_to_json(value, null),
                    })
                })
                .collect();
            if let Some(otherwise) = otherwise {
                branches.push(expr_to_json(otherwise, null));
            }
            json!({ "case": one_or_many(branches) })
        }
        Expr::Cast { expr, ty, safe } => {
            let key = if *safe { "safe_cast" } else { "cast" };
            let mut map = Map::new();
            map.insert(
                key.to_string(),
                json!([expr_to_json(expr, null), type_json(ty)]),
            );
            Value::Object(map)
        }
        Expr::Interval { value, unit } => {
            json!({ "interval": [expr_to_json(value, null), unit.clone()] })
        }
        Expr::Trim { expr, characters, direction } => {
            let mut map = Map::new();
            map.insert("trim".to_string(), expr_to_json(expr, null));
            if let Some(characters) = characters {
                map.insert("characters".to_string(), expr_to_json(characters, null));
            }
            if let Some(direction) = direction {
                let word = match direction {
                    TrimDirection::Leading => "leading",
                    TrimDirection::Trailing => "trailing",
                    TrimDirection::Both => "both",
                };
                map.insert("direction".to_string(), Value::String(word.to_string()));
            }
            Value::Object(map)
        }
        Expr::Extract { unit, expr } => {
            json!({ "extract": [unit.clone(), expr_to_json(expr, null)] })
        }
        Expr::Call(call) => {
            if call.over.is_some() || call.within.is_some() {
                Value::Object(call_record(call, null))
            } else {
                call_json(call, null)
            }
        }
        Expr::Index { base, index } => {
            json!({ "get": [expr_to_json(base, null), expr_to_json(index, null)] })
        }
        Expr::Query(query) => query_to_json(query, null),
        Expr::Tuple(items) => tuple_json(items, null),
        Expr::Collection { kind, items } => {
            let mut map = Map::new();
            map.insert((*kind).to_string(), expr_list(items, null));
            Value::Object(map)
        }
        Expr::Distinct(items) => {
            json!({ "distinct": expr_list(items, null) })
        }
    }
}

/// The plain call shape, without window clauses.
fn call_json(call: &crate::ast::FunctionCall, null: &Value) -> Value {
    let args = if call.args.is_empty() {
        json!({})
    } else {
        expr_list(&call.args, null)
    };
    let mut map = Map::new();
    map.insert(call.name.clone(), args);
    if call.ignore_nulls {
        map.insert("ignore_nulls".to_string(), Value::Bool(true));
    }
    Value::Object(map)
}

/// A call with OVER / WITHIN GROUP becomes a value record so the window
/// clauses sit beside the call, not inside it.
fn call_record(call: &crate::ast::FunctionCall, null: &Value) -> Map<String, Value> {
    let mut stripped = call.clone();
    stripped.over = None;
    stripped.within = None;
    let mut map = Map::new();
    if let Some(over) = &call.over {
        map.insert("over".to_string(), window_json(over, null));
    }
    if let Some(within) = &call.within {
        let items: Vec<Value> = within.iter().map(|item| sort_item_json(item, null)).collect();
        map.insert("within".to_string(), json!({ "orderby": one_or_many(items) }));
    }
    map.insert("value".to_string(), call_json(&stripped, null));
    map
}

fn window_json(spec: &WindowSpec, null: &Value) -> Value {
    let mut map = Map::new();
    if !spec.partitionby.is_empty() {
        map.insert("partitionby".to_string(), expr_list(&spec.partitionby, null));
    }
    if !spec.orderby.is_empty() {
        let items: Vec<Value> = spec
            .orderby
            .iter()
            .map(|item| sort_item_json(item, null))
            .collect();
        map.insert("orderby".to_string(), one_or_many(items));
    }
    if let Some(frame) = &spec.range {
        let mut range = Map::new();
        if let Some(min) = frame.min {
            range.insert("min".to_string(), json!(min));
        }
        if let Some(max) = frame.max {
            range.insert("max".to_string(), json!(max));
        }
        map.insert("range".to_string(), Value::Object(range));
    }
    Value::Object(map)
}

pub fn type_json(ty: &TypeName) -> Value {
    let args: Vec<Value> = ty
        .args
        .iter()
        .map(|arg| match arg {
            TypeArg::Int(n) => json!(n),
            TypeArg::Name(name) => Value::String(name.clone()),
            TypeArg::Type(inner) => type_json(inner),
            TypeArg::Field { name, ty } => {
                json!({ "name": name.clone(), "type": type_json(ty) })
            }
        })
        .collect();
    let args = if args.is_empty() { json!({}) } else { one_or_many(args) };
    let mut map = Map::new();
    map.insert(ty.name.clone(), args);
    Value::Object(map)
}

/// Project an expression list with the one-or-many collapse and the
/// all-literal merge.
fn expr_list(items: &[Expr], null: &Value) -> Value {
    let values: Vec<Value> = items.iter().map(|item| expr_to_json(item, null)).collect();
    if values.len() > 1 {
        if let Some(merged) = merge_literals(&values) {
            return merged;
        }
    }
    one_or_many(values)
}

/// A tuple always keeps list shape; an all-literal tuple merges into a
/// single literal list.
fn tuple_json(items: &[Expr], null: &Value) -> Value {
    let values: Vec<Value> = items.iter().map(|item| expr_to_json(item, null)).collect();
    if let Some(merged) = merge_literals(&values) {
        return merged;
    }
    Value::Array(values)
}

fn merge_literals(values: &[Value]) -> Option<Value> {
    let mut literals = Vec::with_capacity(values.len());
    for value in values {
        let map = value.as_object()?;
        if map.len() != 1 {
            return None;
        }
        literals.push(map.get("literal")?.clone());
    }
    Some(json!({ "literal": literals }))
}

fn one_or_many(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.pop().unwrap()
    } else {
        Value::Array(values)
    }
}

fn string_list(names: &[String]) -> Value {
    one_or_many_strings(names)
}

fn one_or_many_strings(names: &[String]) -> Value {
    let values: Vec<Value> = names.iter().map(|name| Value::String(name.clone())).collect();
    one_or_many(values)
}

fn column_def_json(column: &crate::ast::ColumnDef, null: &Value) -> Value {
    use crate::ast::ColumnOption;

    let mut map = Map::new();
    map.insert("name".to_string(), Value::String(column.name.clone()));
    map.insert("type".to_string(), type_json(&column.ty));
    for option in &column.options {
        match option {
            ColumnOption::NotNull => {
                map.insert("nullable".to_string(), Value::Bool(false));
            }
            ColumnOption::Null => {
                map.insert("nullable".to_string(), Value::Bool(true));
            }
            ColumnOption::Unique => {
                map.insert("unique".to_string(), Value::Bool(true));
            }
            ColumnOption::AutoIncrement => {
                map.insert("auto_increment".to_string(), Value::Bool(true));
            }
            ColumnOption::PrimaryKey => {
                map.insert("primary_key".to_string(), Value::Bool(true));
            }
            ColumnOption::Default(value) => {
                map.insert("default".to_string(), expr_to_json(value, null));
            }
            ColumnOption::Check(value) => {
                map.insert("check".to_string(), expr_to_json(value, null));
            }
            ColumnOption::References(references) => {
                map.insert(
                    "references".to_string(),
                    json!({
                        "table": references.table.clone(),
                        "columns": string_list(&references.columns),
                    }),
                );
            }
            ColumnOption::Comment(text) => {
                map.insert("comment".to_string(), Value::String(text.clone()));
            }
            ColumnOption::Collate(name) => {
                map.insert("collate".to_string(), Value::String(name.clone()));
            }
            ColumnOption::Identity { start, increment } => {
                map.insert(
                    "identity".to_string(),
                    json!({ "start": start, "increment": increment }),
                );
            }
        }
    }
    Value::Object(map)
}

fn constraint_json(constraint: &TableConstraint, null: &Value) -> Value {
    let mut map = Map::new();
    let name = match constraint {
        TableConstraint::PrimaryKey { name, columns } => {
            map.insert(
                "primary_key".to_string(),
                json!({ "columns": string_list(columns) }),
            );
            name
        }
        TableConstraint::Unique { name, columns } => {
            map.insert(
                "unique".to_string(),
                json!({ "columns": string_list(columns) }),
            );
            name
        }
        TableConstraint::Index { name, columns } => {
            map.insert(
                "index".to_string(),
                json!({ "columns": string_list(columns) }),
            );
            name
        }
        TableConstraint::ForeignKey { name, columns, references } => {
            map.insert(
                "foreign_key".to_string(),
                json!({
                    "columns": string_list(columns),
                    "references": {
                        "table": references.table.clone(),
                        "columns": string_list(&references.columns),
                    },
                }),
            );
            name
        }
        TableConstraint::Check { name, expr } => {
            map.insert("check".to_string(), expr_to_json(expr, null));
            name
        }
    };
    if let Some(name) = name {
        map.insert("name".to_string(), Value::String(name.clone()));
    }
    Value::Object(map)
}
