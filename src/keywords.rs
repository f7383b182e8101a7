// SQL keyword and operator tables
//
// Pure data consulted by the lexer, the expression parser and the
// formatter: the reserved-word set, the canonical operator names with their
// numeric precedence, and the duration-unit aliases used by INTERVAL and
// EXTRACT. Tables are assembled once and shared by every parse.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// Words that can never be used as a bare identifier or alias.
pub static RESERVED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    log::debug!("building reserved-word table");
    [
        "all", "and", "as", "asc", "between", "by", "case", "collate",
        "constraint", "create", "cross", "desc", "distinct", "else", "end",
        "except", "false", "foreign", "from", "full", "group", "having",
        "in", "index", "inner", "intersect", "interval", "is", "join",
        "key", "lateral", "left", "like", "limit", "minus", "nocase", "not", "null",
        "offset", "on", "or", "order", "outer", "over", "partition",
        "primary", "qualify", "references", "right", "rlike", "select",
        "then", "true", "union", "unique", "using", "when", "where",
        "with", "within",
    ]
    .into_iter()
    .collect()
});

pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(word.to_lowercase().as_str())
}

/// Operator precedence, lower binds tighter. Even values leave odd
/// slots free for the operators that sit between levels (div, sub).
pub static PRECEDENCE: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| {
    [
        ("literal", -2),
        ("cast", 0),
        ("safe_cast", 0),
        ("collate", 0),
        ("get", 0),
        ("concat", 2),
        ("div", 3),
        ("mul", 4),
        ("mod", 4),
        ("sub", 5),
        ("neg", 6),
        ("add", 6),
        ("binary_not", 8),
        ("binary_and", 8),
        ("binary_or", 8),
        ("gte", 10),
        ("lte", 10),
        ("lt", 10),
        ("gt", 12),
        ("eq", 14),
        ("neq", 14),
        ("between", 16),
        ("not_between", 16),
        ("in", 16),
        ("nin", 16),
        ("is", 16),
        ("like", 16),
        ("not_like", 16),
        ("rlike", 16),
        ("not_rlike", 16),
        ("similar_to", 16),
        ("not_similar_to", 16),
        ("missing", 16),
        ("exists", 16),
        ("not", 18),
        ("and", 20),
        ("or", 22),
        ("select", 60),
        ("select_distinct", 60),
        ("from", 60),
        ("window", 70),
        ("union", 80),
        ("union_all", 80),
        ("except", 80),
        ("minus", 80),
        ("intersect", 80),
        ("order", 100),
    ]
    .into_iter()
    .collect()
});

/// Highest value `parse_expression` climbs over; clause-level entries
/// (select, union, order) sit above it and never participate.
pub const EXPR_PRECEDENCE_LIMIT: i32 = 50;

pub fn precedence(op: &str) -> Option<i32> {
    PRECEDENCE.get(op).copied()
}

/// Join phrases recognized in a FROM clause, in match order (longest first
/// so `left outer join` is not consumed as `left join` + garbage).
pub const JOIN_KINDS: &[&str] = &[
    "full outer join",
    "left outer join",
    "left inner join",
    "right outer join",
    "right inner join",
    "lateral view outer",
    "cross join",
    "full join",
    "inner join",
    "left join",
    "right join",
    "outer join",
    "lateral view",
    "join",
];

/// Duration aliases accepted by INTERVAL and EXTRACT, mapped to the
/// canonical unit name.
pub static DURATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("microseconds", "microsecond"),
        ("microsecond", "microsecond"),
        ("microsecs", "microsecond"),
        ("microsec", "microsecond"),
        ("useconds", "microsecond"),
        ("usecond", "microsecond"),
        ("usecs", "microsecond"),
        ("usec", "microsecond"),
        ("us", "microsecond"),
        ("milliseconds", "millisecond"),
        ("millisecond", "millisecond"),
        ("mseconds", "millisecond"),
        ("msecond", "millisecond"),
        ("millisecs", "millisecond"),
        ("millisec", "millisecond"),
        ("msecs", "millisecond"),
        ("msec", "millisecond"),
        ("ms", "millisecond"),
        ("seconds", "second"),
        ("second", "second"),
        ("secs", "second"),
        ("sec", "second"),
        ("s", "second"),
        ("minutes", "minute"),
        ("minute", "minute"),
        ("mins", "minute"),
        ("min", "minute"),
        ("m", "minute"),
        ("hours", "hour"),
        ("hour", "hour"),
        ("hrs", "hour"),
        ("hr", "hour"),
        ("h", "hour"),
        ("days", "day"),
        ("day", "day"),
        ("d", "day"),
        ("dayofweek", "dow"),
        ("dow", "dow"),
        ("weekday", "dow"),
        ("weeks", "week"),
        ("week", "week"),
        ("w", "week"),
        ("months", "month"),
        ("month", "month"),
        ("mons", "month"),
        ("mon", "month"),
        ("quarters", "quarter"),
        ("quarter", "quarter"),
        ("years", "year"),
        ("year", "year"),
        ("decades", "decade"),
        ("decade", "decade"),
        ("decs", "decade"),
        ("dec", "decade"),
        ("centuries", "century"),
        ("century", "century"),
        ("cents", "century"),
        ("cent", "century"),
        ("c", "century"),
        ("millennia", "millennium"),
        ("millennium", "millennium"),
        ("mils", "millennium"),
        ("mil", "millennium"),
        ("epoch", "epoch"),
    ]
    .into_iter()
    .collect()
});

pub fn duration_unit(word: &str) -> Option<&'static str> {
    DURATIONS.get(word.to_lowercase().as_str()).copied()
}

/// Type-constructor keywords that take a quoted value (`DATE '2020-01-01'`).
pub const TIME_TYPES: &[&str] = &[
    "date", "datetime", "time", "timestamp", "timestamptz", "timetz",
];
