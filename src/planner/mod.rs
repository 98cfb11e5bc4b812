//! Query planner - merges match candidates, intent signals and extracted
//! conditions into one [`StructuredQuery`].
//!
//! Planning order:
//! 1. Resolve the target table
//! 2. Bind condition columns (restricted to that table)
//! 3. Pick the aggregation column
//! 4. Ordering and limit
//! 5. Projection from the remaining column mentions
//! 6. Report identifier tokens that bound nowhere

mod resolve;

pub use resolve::{resolve_table, ResolvedTable, NEAREST_TABLES};

use tracing::{debug, trace};

use crate::catalog::{CatalogColumn, CatalogTable};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::query::{
    AggregateFunction, Aggregation, ColumnRef, OrderBy, ParseWarning, SortDir, StructuredQuery,
};
use crate::understanding::intent::{AggregateSignal, IntentSignals};
use crate::understanding::matcher::MAX_WINDOW;
use crate::understanding::{
    ExtractedCondition, MatchSet, MatchTarget, Token, TokenKind, TokenWindow,
};

/// Everything the understanding layer produced for one request.
pub struct PlanInput<'a> {
    pub tokens: &'a [Token],
    pub matches: &'a MatchSet,
    pub signals: &'a IntentSignals,
    pub conditions: Vec<ExtractedCondition>,
}

/// A planned request.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub query: StructuredQuery,
    /// Catalog index of the target table.
    pub table: usize,
    pub warnings: Vec<ParseWarning>,
}

/// Plans requests against a borrowed catalog.
pub struct QueryPlanner<'a> {
    tables: &'a [CatalogTable],
    config: &'a EngineConfig,
}

/// Per-request planning state.
struct PlanState<'a> {
    tokens: &'a [Token],
    matches: &'a MatchSet,
    table: usize,
    exclude: Option<TokenWindow>,
    consumed: Vec<bool>,
    warnings: Vec<ParseWarning>,
}

impl PlanState<'_> {
    fn consume(&mut self, window: TokenWindow) {
        for i in window.indices() {
            if let Some(slot) = self.consumed.get_mut(i) {
                *slot = true;
            }
        }
    }

    fn is_free(&self, window: TokenWindow) -> bool {
        window.indices().all(|i| !self.consumed[i])
            && !self.exclude.is_some_and(|ex| ex.overlaps(&window))
    }

    /// Warn about the unconsumed identifiers, numbers and literals of
    /// `window`, then consume it.
    fn drop_window(&mut self, window: TokenWindow) {
        let free: Vec<usize> = window
            .indices()
            .filter(|&i| {
                !self.consumed[i]
                    && self.tokens[i].is_value()
                    && !self.exclude.is_some_and(|ex| ex.contains(i))
            })
            .collect();
        if let (Some(&first), Some(&last)) = (free.first(), free.last()) {
            let token = free
                .iter()
                .map(|&i| self.tokens[i].text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let span = self.tokens[first].span.merge(self.tokens[last].span);
            self.warnings.push(ParseWarning::DroppedToken { token, span });
        }
        self.consume(window);
    }
}

impl<'a> QueryPlanner<'a> {
    pub fn new(tables: &'a [CatalogTable], config: &'a EngineConfig) -> Self {
        Self { tables, config }
    }

    /// Plan one request.
    pub fn plan(&self, input: PlanInput<'_>) -> EngineResult<Plan> {
        let threshold = self.config.threshold;
        let resolved = resolve_table(
            input.tokens,
            input.matches,
            self.tables,
            threshold,
            &input.signals.consumed,
        )?;
        let table = &self.tables[resolved.index];
        debug!(table = %table.name, fallback = resolved.warning.is_some(), "resolved target table");

        let mut state = PlanState {
            tokens: input.tokens,
            matches: input.matches,
            table: resolved.index,
            exclude: resolved.window,
            consumed: vec![false; input.tokens.len()],
            warnings: resolved.warning.into_iter().collect(),
        };
        for &i in resolved.tokens.iter().chain(&input.signals.consumed) {
            state.consume(TokenWindow::single(i));
        }

        let mut query = StructuredQuery::from_table(&table.name);

        self.bind_conditions(&mut state, &mut query, input.conditions);
        self.check_or(&mut state, &query, input.signals);

        if let Some(signal) = input.signals.aggregation {
            query.aggregation = Some(self.aggregation(&mut state, table, signal)?);
            if input.signals.wants_ordering() || input.signals.limit.is_some() {
                if let Some(column) = input.signals.ordering.and_then(|o| o.column) {
                    state.consume(column);
                }
                state.warnings.push(ParseWarning::OrderingIgnored {
                    function: signal.function,
                });
            }
        } else {
            self.ordering(&mut state, &mut query, table, input.signals);
            query.columns = self.projection(&mut state);
        }

        for i in 0..state.tokens.len() {
            state.drop_window(TokenWindow::single(i));
        }

        trace!(?query, warnings = state.warnings.len(), "planned query");
        Ok(Plan {
            query,
            table: resolved.index,
            warnings: state.warnings,
        })
    }

    /// Best column of the target table named inside `within`.
    fn bind(
        &self,
        state: &PlanState<'_>,
        within: TokenWindow,
    ) -> Option<(&'a CatalogColumn, TokenWindow)> {
        let candidate = state.matches.best_column(
            self.tables,
            state.table,
            within,
            state.exclude,
            self.config.threshold,
        )?;
        if !state.is_free(candidate.window) {
            return None;
        }
        match candidate.target {
            MatchTarget::Column { table, column } => self
                .tables
                .get(table)
                .and_then(|t| t.columns.get(column))
                .map(|c| (c, candidate.window)),
            MatchTarget::Table { .. } => None,
        }
    }

    fn bind_conditions(
        &self,
        state: &mut PlanState<'_>,
        query: &mut StructuredQuery,
        conditions: Vec<ExtractedCondition>,
    ) {
        for extracted in conditions {
            let Some((column, window)) = self.bind(state, extracted.column_window) else {
                trace!(hint = ?extracted.condition.column, "condition column did not bind");
                state.drop_window(extracted.column_window);
                state.consume(extracted.operator_window);
                continue;
            };

            state.consume(window);
            state.consume(extracted.operator_window);

            if extracted.implicit {
                let leftover = TokenWindow::new(window.end, extracted.column_window.end);
                let word = (!leftover.is_empty()).then(|| leftover.text(state.tokens));
                state.consume(leftover);
                state.warnings.push(ParseWarning::AmbiguousCondition {
                    column: column.name.clone(),
                    word,
                    span: extracted.window().span(state.tokens),
                });
            }

            let mut condition = extracted.condition;
            condition.column = ColumnRef::bound(&column.name);
            query.conditions.push(condition);
        }
    }

    /// Warn about `or` between conditions; the conditions stay AND-combined.
    fn check_or(
        &self,
        state: &mut PlanState<'_>,
        query: &StructuredQuery,
        signals: &IntentSignals,
    ) {
        if query.conditions.is_empty() {
            return;
        }
        for &i in &signals.or_tokens {
            let span = state.tokens[i].span;
            let inside_condition = query
                .conditions
                .iter()
                .any(|c| c.span.is_some_and(|s| s.start <= span.start && span.end <= s.end));
            if !inside_condition {
                state.warnings.push(ParseWarning::UnsupportedOr { span });
            }
        }
    }

    /// Column mention right after the aggregation keyword.
    fn aggregation_mention(
        &self,
        state: &PlanState<'_>,
        signal: &AggregateSignal,
    ) -> Option<TokenWindow> {
        let start = (signal.window.end..state.tokens.len())
            .find(|&i| state.tokens[i].kind != TokenKind::Keyword)?;
        let len = state.tokens[start..]
            .iter()
            .take(MAX_WINDOW)
            .take_while(|t| t.is_identifier())
            .count();
        let window = TokenWindow::new(start, start + len);
        (len > 0 && state.is_free(window)).then_some(window)
    }

    fn aggregation(
        &self,
        state: &mut PlanState<'_>,
        table: &CatalogTable,
        signal: AggregateSignal,
    ) -> EngineResult<Aggregation> {
        let function = signal.function;

        let named = self
            .aggregation_mention(state, &signal)
            .and_then(|mention| self.bind(state, mention));
        if let Some((column, window)) = named {
            state.consume(window);
            if !function.requires_numeric() || column.column_type.is_numeric() {
                return Ok(Aggregation::over(function, &column.name));
            }
            state.warnings.push(ParseWarning::IneligibleAggregationColumn {
                column: column.name.clone(),
                function,
            });
        }

        if function == AggregateFunction::Count {
            return Ok(Aggregation::count_star());
        }
        match table.first_numeric_column() {
            Some(column) => Ok(Aggregation::over(function, &column.name)),
            None => Err(EngineError::UnresolvedAggregationColumn {
                table: table.name.clone(),
                function,
                span: signal.window.span(state.tokens),
            }),
        }
    }

    fn ordering(
        &self,
        state: &mut PlanState<'_>,
        query: &mut StructuredQuery,
        table: &CatalogTable,
        signals: &IntentSignals,
    ) {
        let named = match signals.ordering.and_then(|o| o.column) {
            Some(window) => match self.bind(state, window) {
                Some((column, bound)) => {
                    state.consume(bound);
                    Some(column.name.clone())
                }
                None => {
                    state.drop_window(window);
                    None
                }
            },
            None => None,
        };

        if let Some(top) = signals.top_n {
            let direction = signals.direction.unwrap_or(SortDir::Desc);
            let column = named.or_else(|| table.primary_key().map(|c| c.name.clone()));
            match column {
                Some(column) => query.order_by = Some(OrderBy::new(&column, direction)),
                None => state.warnings.push(ParseWarning::UnorderedTopN {
                    table: table.name.clone(),
                }),
            }
            query.limit = Some(top.limit.unwrap_or(self.config.default_limit));
            return;
        }

        if let Some(column) = named {
            let direction = signals.direction.unwrap_or(SortDir::Asc);
            query.order_by = Some(OrderBy::new(&column, direction));
        }
        query.limit = signals.limit;
    }

    /// Column mentions nothing else used, in order of appearance.
    fn projection(&self, state: &mut PlanState<'_>) -> Vec<String> {
        let ranked = state
            .matches
            .ranked_columns(self.tables, state.table, self.config.threshold);

        let mut picked: Vec<(usize, String)> = Vec::new();
        for candidate in ranked {
            if !state.is_free(candidate.window) {
                continue;
            }
            if let MatchTarget::Column { table, column } = candidate.target {
                if let Some(column) = self.tables.get(table).and_then(|t| t.columns.get(column)) {
                    state.consume(candidate.window);
                    picked.push((candidate.window.start, column.name.clone()));
                }
            }
        }

        picked.sort_by_key(|(start, _)| *start);
        let mut columns: Vec<String> = Vec::new();
        for (_, name) in picked {
            if !columns.contains(&name) {
                columns.push(name);
            }
        }
        columns
    }
}
