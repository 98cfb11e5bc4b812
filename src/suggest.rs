//! Example requests derived from one table's metadata.
//!
//! Each suggestion pairs a natural-language hint with the SQL the engine
//! produces for it. Hints use the names as stored, so parsing a hint against
//! a catalog containing the table yields the same SQL.

use serde::Serialize;
use tracing::debug;

use crate::catalog::{CatalogColumn, CatalogTable};
use crate::config::EngineConfig;
use crate::query::{
    AggregateFunction, Aggregation, Comparator, Condition, Literal, SortDir, StructuredQuery,
};
use crate::sql::build_sql;
use crate::understanding::lexer::is_keyword;

/// A suggested request and its SQL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub hint: String,
    pub sql: String,
    pub query: StructuredQuery,
}

fn suggestion(hint: String, query: StructuredQuery) -> Option<Suggestion> {
    let sql = build_sql(&query).ok()?;
    Some(Suggestion { hint, sql, query })
}

/// Names that would be read as grammar words cannot appear in a hint.
fn speakable(name: &str) -> bool {
    !name.is_empty() && !is_keyword(&name.to_lowercase())
}

/// Quote a sample value for a hint, or `None` if it cannot be quoted.
fn quote_sample(value: &str) -> Option<String> {
    match (value.contains('\''), value.contains('"')) {
        (false, _) => Some(format!("'{}'", value)),
        (true, false) => Some(format!("\"{}\"", value)),
        (true, true) => None,
    }
}

fn is_low_cardinality(column: &CatalogColumn, ratio: f64) -> bool {
    column.column_type.is_text() && column.uniqueness_ratio <= ratio
}

/// Generate suggestions for `table`.
///
/// In order: a row count, a top-N listing, one average per numeric column,
/// one equality filter per low-cardinality text column with a sample value.
pub fn suggest_queries(table: &CatalogTable, config: &EngineConfig) -> Vec<Suggestion> {
    let settings = &config.suggestions;
    let name = table.simple_name();
    let mut suggestions = Vec::new();

    suggestions.extend(suggestion(
        format!("How many records are in {}", name),
        StructuredQuery::from_table(&table.name).aggregate(Aggregation::count_star()),
    ));

    let limit = config.default_limit;
    let mut top = StructuredQuery::from_table(&table.name).limit(limit);
    if let Some(pk) = table.primary_key() {
        top = top.order_by(&pk.name, SortDir::Desc);
    }
    suggestions.extend(suggestion(format!("Show the top {} {}", limit, name), top));

    suggestions.extend(
        table
            .numeric_columns()
            .filter(|c| speakable(&c.name))
            .take(settings.max_aggregations)
            .filter_map(|column| {
                suggestion(
                    format!("What is the average {} in {}", column.name, name),
                    StructuredQuery::from_table(&table.name)
                        .aggregate(Aggregation::over(AggregateFunction::Avg, &column.name)),
                )
            }),
    );

    suggestions.extend(
        table
            .columns
            .iter()
            .filter(|c| speakable(&c.name))
            .filter(|c| is_low_cardinality(c, settings.low_cardinality_ratio))
            .filter_map(|column| {
                let (value, quoted) = column
                    .sample_values
                    .iter()
                    .find_map(|v| quote_sample(v).map(|q| (v, q)))?;
                suggestion(
                    format!("Find {} where {} is {}", name, column.name, quoted),
                    StructuredQuery::from_table(&table.name).filter(Condition::on(
                        &column.name,
                        Comparator::Eq,
                        Literal::from_lexeme(value, false),
                    )),
                )
            })
            .take(settings.max_filters),
    );

    debug!(table = %table.name, count = suggestions.len(), "generated suggestions");
    suggestions
}
