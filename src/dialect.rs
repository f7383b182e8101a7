// SQL dialect selection
//
// Each dialect shares the same grammar and differs only in lexical choices
// (mostly how quoted text is interpreted) plus a handful of dialect-only
// clauses that are always accepted but only meaningful for their dialect.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Permissive ANSI-flavoured dialect; accepts every quoting style.
    #[default]
    Ansi,
    MySql,
    SqlServer,
    BigQuery,
}

impl Dialect {
    /// True when a double-quoted token is a string literal rather than a
    /// quoted identifier.
    pub fn double_quote_is_string(&self) -> bool {
        matches!(self, Dialect::MySql | Dialect::BigQuery)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Ansi => "ansi",
            Dialect::MySql => "mysql",
            Dialect::SqlServer => "sqlserver",
            Dialect::BigQuery => "bigquery",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ansi" => Ok(Dialect::Ansi),
            "mysql" => Ok(Dialect::MySql),
            "sqlserver" | "mssql" | "tsql" => Ok(Dialect::SqlServer),
            "bigquery" => Ok(Dialect::BigQuery),
            other => Err(format!("unknown dialect: {}", other)),
        }
    }
}
