//! Target table resolution.
//!
//! Tokens already claimed by phrase detection (`order by`, `first N`) never
//! name the table.
//!
//! 1. Best similarity candidate above the threshold.
//! 2. Otherwise, overlap between singular table-name words and request words.
//! 3. Otherwise, an error naming the three nearest tables.

use crate::catalog::{name_words, CatalogTable};
use crate::error::{EngineError, EngineResult};
use crate::query::ParseWarning;
use crate::understanding::inflection::singularize;
use crate::understanding::{MatchSet, Token, TokenWindow};

/// How many nearest tables an unresolved-table error names.
pub const NEAREST_TABLES: usize = 3;

/// The chosen table and the request tokens that named it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTable {
    pub index: usize,
    /// Window of the similarity match, if that is how the table was found.
    pub window: Option<TokenWindow>,
    /// Every token that named the table.
    pub tokens: Vec<usize>,
    pub warning: Option<ParseWarning>,
}

pub fn resolve_table(
    tokens: &[Token],
    matches: &MatchSet,
    tables: &[CatalogTable],
    threshold: f64,
    reserved: &[usize],
) -> EngineResult<ResolvedTable> {
    if let Some(best) = matches.best_table(tables, threshold, reserved) {
        return Ok(ResolvedTable {
            index: best.target.table(),
            window: Some(best.window),
            tokens: best.window.indices().collect(),
            warning: None,
        });
    }

    if let Some((index, hits)) = keyword_overlap(tokens, tables, reserved) {
        return Ok(ResolvedTable {
            index,
            window: None,
            tokens: hits,
            warning: Some(ParseWarning::TableFallback {
                table: tables[index].name.clone(),
            }),
        });
    }

    Err(EngineError::UnresolvedTable {
        suggestions: nearest_tables(matches, tables),
        spans: tokens
            .iter()
            .filter(|t| t.is_identifier())
            .map(|t| t.span)
            .collect(),
    })
}

/// Table sharing the most singular name words with the request.
///
/// Ties go to the larger table, then to catalog order.
fn keyword_overlap(
    tokens: &[Token],
    tables: &[CatalogTable],
    reserved: &[usize],
) -> Option<(usize, Vec<usize>)> {
    let request_words: Vec<(usize, String)> = tokens
        .iter()
        .enumerate()
        .filter(|(i, t)| t.is_identifier() && !reserved.contains(i))
        .flat_map(|(i, t)| {
            name_words(&t.text)
                .into_iter()
                .map(move |w| (i, singularize(&w)))
        })
        .collect();

    let mut best: Option<(usize, usize, Vec<usize>)> = None;
    for (index, table) in tables.iter().enumerate() {
        let table_words: Vec<String> = table.name_words().iter().map(|w| singularize(w)).collect();

        let overlap = table_words
            .iter()
            .filter(|tw| request_words.iter().any(|(_, rw)| rw == *tw))
            .count();
        if overlap == 0 {
            continue;
        }

        let mut hits: Vec<usize> = request_words
            .iter()
            .filter(|(_, rw)| table_words.contains(rw))
            .map(|(i, _)| *i)
            .collect();
        hits.dedup();

        let better = match &best {
            None => true,
            Some((best_index, best_overlap, _)) => {
                overlap > *best_overlap
                    || (overlap == *best_overlap
                        && table.row_count > tables[*best_index].row_count)
            }
        };
        if better {
            best = Some((index, overlap, hits));
        }
    }

    best.map(|(index, _, hits)| (index, hits))
}

/// Up to [`NEAREST_TABLES`] names by best score, then row count, then name.
fn nearest_tables(matches: &MatchSet, tables: &[CatalogTable]) -> Vec<String> {
    let scores = matches.table_scores(tables.len());
    let mut order: Vec<usize> = (0..tables.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| tables[b].row_count.cmp(&tables[a].row_count))
            .then_with(|| tables[a].name.cmp(&tables[b].name))
    });
    order
        .into_iter()
        .take(NEAREST_TABLES)
        .map(|i| tables[i].name.clone())
        .collect()
}
