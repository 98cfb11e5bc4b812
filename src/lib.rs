//! # Querywise
//!
//! Translates free-text requests into SQL against a known schema catalog.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Request Text                          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [lexer]
//! ┌─────────────────────────────────────────────────────────┐
//! │             Tokens (normalized, with spans)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [matcher + intent + conditions]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Match Candidates · Intent Signals · Raw Conditions     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  StructuredQuery                         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │                      SQL Text                            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog is supplied by the caller through [`catalog::CatalogProvider`]
//! and is only ever read. The library performs no I/O.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod planner;
pub mod query;
pub mod sql;
pub mod suggest;
pub mod understanding;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::{Catalog, CatalogColumn, CatalogProvider, CatalogTable, ColumnType};
    pub use crate::config::EngineConfig;
    pub use crate::engine::{ParseResult, QueryEngine};
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::query::{
        AggregateFunction, Aggregation, Comparator, Complexity, Condition, IntentLabel, Literal,
        ParseWarning, QueryIntent, QueryType, SortDir, StructuredQuery,
    };
    pub use crate::sql::{build_sql, validate_sql};
    pub use crate::suggest::Suggestion;
}
