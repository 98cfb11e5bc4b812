//! Fatal parse errors.

use serde::Serialize;

use crate::query::AggregateFunction;
use crate::sql::BuildError;
use crate::understanding::Span;

/// Conditions under which no SQL is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineError {
    #[error("Query text is empty")]
    EmptyQuery,

    #[error("No table matches the request (nearest: {})", .suggestions.join(", "))]
    UnresolvedTable {
        /// Up to three nearest table names, best first.
        suggestions: Vec<String>,
        /// Identifier tokens that were tried.
        spans: Vec<Span>,
    },

    #[error("No column of '{table}' can be used with {function}")]
    UnresolvedAggregationColumn {
        table: String,
        function: AggregateFunction,
        /// The aggregation keyword.
        span: Span,
    },

    #[error("SQL build failed: {0}")]
    Build(#[from] BuildError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
