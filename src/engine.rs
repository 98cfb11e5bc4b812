//! End-to-end translation from request text to SQL.
//!
//! ```text
//! Text → Lexer → Matcher → Intent + Conditions → Planner → SQL Builder
//! ```
//!
//! # Example
//!
//! ```ignore
//! use querywise::catalog::{Catalog, CatalogColumn, CatalogTable, ColumnType};
//! use querywise::engine::QueryEngine;
//!
//! let catalog = Catalog::default().with_table(
//!     CatalogTable::new("customers")
//!         .with_column(CatalogColumn::new("id", ColumnType::Numeric))
//!         .with_primary_key("id"),
//! );
//!
//! let engine = QueryEngine::default();
//! let result = engine.parse("top 5 customers", &catalog)?;
//! assert_eq!(result.sql, "SELECT * FROM customers ORDER BY id DESC LIMIT 5");
//! ```

use serde::Serialize;
use tracing::{debug, trace};

use crate::catalog::{CatalogProvider, CatalogTable};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::planner::{PlanInput, QueryPlanner};
use crate::query::{ParseWarning, QueryIntent, StructuredQuery};
use crate::sql::build_sql;
use crate::suggest::{suggest_queries, Suggestion};
use crate::understanding::{classify, detect_signals, extract_conditions, match_tokens, tokenize};

// ============================================================================
// Result Types
// ============================================================================

/// Outcome of a successful parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    pub query: StructuredQuery,
    pub intent: QueryIntent,
    pub sql: String,
    pub warnings: Vec<ParseWarning>,
}

// ============================================================================
// Engine
// ============================================================================

/// The query understanding engine.
///
/// Holds configuration only. Every call works on a borrowed catalog snapshot
/// and keeps no state between calls, so one engine can be shared freely
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    config: EngineConfig,
}

impl QueryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Translate one request into SQL.
    pub fn parse<C>(&self, text: &str, catalog: &C) -> EngineResult<ParseResult>
    where
        C: CatalogProvider + ?Sized,
    {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(EngineError::EmptyQuery);
        }
        debug!(tokens = tokens.len(), "tokenized request");

        let tables = catalog.get_tables();
        let matches = match_tokens(&tokens, tables);
        trace!(candidates = matches.candidates().len(), "scored match candidates");

        let signals = detect_signals(&tokens);
        let conditions = extract_conditions(&tokens);
        trace!(?signals, conditions = conditions.len(), "detected intent signals");

        let plan = QueryPlanner::new(tables, &self.config).plan(PlanInput {
            tokens: &tokens,
            matches: &matches,
            signals: &signals,
            conditions,
        })?;

        let sql = build_sql(&plan.query)?;
        let intent = classify(
            &signals,
            plan.query.conditions.len(),
            plan.query.order_by.is_some(),
            self.config.max_conditions_simple,
        );
        debug!(%sql, warnings = plan.warnings.len(), label = ?intent.label, "generated SQL");

        Ok(ParseResult {
            query: plan.query,
            intent,
            sql,
            warnings: plan.warnings,
        })
    }

    /// Translate many requests, in parallel, preserving input order.
    ///
    /// Requests are split into one chunk per available core and parsed on
    /// scoped threads sharing the same catalog snapshot.
    pub fn parse_batch<C, S>(&self, texts: &[S], catalog: &C) -> Vec<EngineResult<ParseResult>>
    where
        C: CatalogProvider + ?Sized,
        S: AsRef<str> + Sync,
    {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        if workers <= 1 || texts.len() <= 1 {
            return texts
                .iter()
                .map(|text| self.parse(text.as_ref(), catalog))
                .collect();
        }

        let chunk_size = texts.len().div_ceil(workers);
        debug!(requests = texts.len(), workers, chunk_size, "parsing batch");

        std::thread::scope(|scope| {
            let handles: Vec<_> = texts
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|text| self.parse(text.as_ref(), catalog))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }

    /// Suggested requests for one table.
    pub fn suggest(&self, table: &CatalogTable) -> Vec<Suggestion> {
        suggest_queries(table, &self.config)
    }
}
