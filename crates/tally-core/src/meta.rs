//! Open metadata attached to transactions.
//!
//! Callers can attach arbitrary scalar attributes (a client id, an invoice
//! number, ...) to each transaction line. The engine never interprets them;
//! their only query use is exact-match filtering.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata value types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetaValue {
    /// String value
    String(String),
    /// Numeric value
    Number(Decimal),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Date(DateTime<Utc>),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{d}"),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Decimal> for MetaValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Number(Decimal::from(value))
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for MetaValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

/// Metadata is a key-value map attached to each transaction.
pub type Meta = BTreeMap<String, MetaValue>;
