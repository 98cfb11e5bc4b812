//! Non-fatal findings attached to a parse result.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::structured::AggregateFunction;
use crate::understanding::lexer::Span;

/// Something the engine noticed but worked around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A filter fragment had no recognizable comparator and was read as `=`.
    AmbiguousCondition {
        column: String,
        word: Option<String>,
        span: Span,
    },
    /// Request text that bound to nothing in the chosen table.
    DroppedToken { token: String, span: Span },
    /// The table was picked by word overlap rather than by similarity.
    TableFallback { table: String },
    /// `or` was used between conditions; conditions are combined with AND.
    UnsupportedOr { span: Span },
    /// Ordering or a limit was requested alongside an aggregate.
    OrderingIgnored { function: AggregateFunction },
    /// A top-N request on a table with no key to order by.
    UnorderedTopN { table: String },
    /// The named column cannot be used with the aggregate function.
    IneligibleAggregationColumn {
        column: String,
        function: AggregateFunction,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::AmbiguousCondition { column, word, .. } => match word {
                Some(word) => write!(
                    f,
                    "Unrecognized comparison '{}' after '{}', treated as '='",
                    word, column
                ),
                None => write!(f, "No comparison after '{}', treated as '='", column),
            },
            ParseWarning::DroppedToken { token, .. } => {
                write!(f, "'{}' does not match anything in the table and was ignored", token)
            }
            ParseWarning::TableFallback { table } => {
                write!(f, "Table '{}' was chosen by keyword overlap", table)
            }
            ParseWarning::UnsupportedOr { .. } => {
                write!(f, "OR is not supported; conditions were combined with AND")
            }
            ParseWarning::OrderingIgnored { function } => {
                write!(f, "Ordering and limits do not apply to {}; ignored", function)
            }
            ParseWarning::UnorderedTopN { table } => {
                write!(f, "Table '{}' has no key to order by; returning unordered rows", table)
            }
            ParseWarning::IneligibleAggregationColumn { column, function } => {
                write!(f, "Column '{}' cannot be used with {}", column, function)
            }
        }
    }
}
