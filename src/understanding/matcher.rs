//! Fuzzy matching of request phrases against catalog names.
//!
//! Every window of one to three consecutive identifier tokens is scored
//! against every table and every column of every table. All candidates are
//! kept; the planner decides which ones to use once the table is known.
//! Column scores never depend on which table is eventually chosen.

use std::cmp::Ordering;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::inflection::singular_phrase;
use super::lexer::{Span, Token};
use super::similarity::similarity;
use crate::catalog::{name_words, CatalogTable};

/// Longest phrase considered as a single name.
pub const MAX_WINDOW: usize = 3;

/// Half-open range of token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenWindow {
    pub start: usize,
    pub end: usize,
}

impl TokenWindow {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(index: usize) -> Self {
        Self::new(index, index + 1)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    pub fn covers(&self, other: &TokenWindow) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &TokenWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Byte span covered by the window's tokens.
    pub fn span(&self, tokens: &[Token]) -> Span {
        match (tokens.get(self.start), tokens.get(self.end.saturating_sub(1))) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::new(0, 0),
        }
    }

    /// Token texts joined by spaces.
    pub fn text(&self, tokens: &[Token]) -> String {
        tokens[self.indices()]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What a candidate points at, by catalog position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchTarget {
    Table { table: usize },
    Column { table: usize, column: usize },
}

impl MatchTarget {
    pub fn table(&self) -> usize {
        match *self {
            MatchTarget::Table { table } | MatchTarget::Column { table, .. } => table,
        }
    }

    fn column(&self) -> Option<usize> {
        match *self {
            MatchTarget::Table { .. } => None,
            MatchTarget::Column { column, .. } => Some(column),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub target: MatchTarget,
    pub window: TokenWindow,
    pub score: f64,
}

/// Surface and singular forms of a name or phrase.
#[derive(Debug, Clone)]
struct NameForm {
    surface: String,
    singular: String,
}

impl NameForm {
    fn from_words(words: &[String]) -> Self {
        Self {
            surface: words.join(" "),
            singular: singular_phrase(words),
        }
    }

    fn score(&self, other: &NameForm) -> f64 {
        similarity(&self.surface, &other.surface).max(similarity(&self.singular, &other.singular))
    }
}

/// All candidates produced for one request.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    candidates: Vec<MatchCandidate>,
}

/// Score every identifier window of `tokens` against the catalog.
pub fn match_tokens(tokens: &[Token], tables: &[CatalogTable]) -> MatchSet {
    let table_forms: Vec<NameForm> = tables
        .iter()
        .map(|t| NameForm::from_words(&t.name_words()))
        .collect();
    let column_forms: Vec<Vec<NameForm>> = tables
        .iter()
        .map(|t| {
            t.columns
                .iter()
                .map(|c| NameForm::from_words(&name_words(&c.name)))
                .collect()
        })
        .collect();

    let mut candidates = Vec::new();
    for window in identifier_windows(tokens) {
        let words: Vec<String> = tokens[window.indices()]
            .iter()
            .flat_map(|t| name_words(&t.text))
            .collect();
        let phrase = NameForm::from_words(&words);

        for (t, form) in table_forms.iter().enumerate() {
            let score = phrase.score(form);
            if score > 0.0 {
                candidates.push(MatchCandidate {
                    target: MatchTarget::Table { table: t },
                    window,
                    score,
                });
            }
        }

        for (t, columns) in column_forms.iter().enumerate() {
            for (c, form) in columns.iter().enumerate() {
                let score = phrase.score(form);
                if score > 0.0 {
                    candidates.push(MatchCandidate {
                        target: MatchTarget::Column { table: t, column: c },
                        window,
                        score,
                    });
                }
            }
        }
    }

    MatchSet { candidates }
}

/// Windows of up to [`MAX_WINDOW`] consecutive identifier tokens.
pub fn identifier_windows(tokens: &[Token]) -> Vec<TokenWindow> {
    let mut windows = Vec::new();
    for start in 0..tokens.len() {
        for len in 1..=MAX_WINDOW {
            let end = start + len;
            if end > tokens.len() || !tokens[start..end].iter().all(Token::is_identifier) {
                break;
            }
            windows.push(TokenWindow::new(start, end));
        }
    }
    windows
}

/// Preference order between two candidates; `Greater` means `a` wins.
///
/// Higher score, then longer window, then larger table, then earlier table,
/// then earlier column, then earlier window.
pub fn compare_candidates(
    a: &MatchCandidate,
    b: &MatchCandidate,
    tables: &[CatalogTable],
) -> Ordering {
    let rows = |c: &MatchCandidate| tables.get(c.target.table()).map_or(0, |t| t.row_count);

    a.score
        .partial_cmp(&b.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.window.len().cmp(&b.window.len()))
        .then_with(|| rows(a).cmp(&rows(b)))
        .then_with(|| b.target.table().cmp(&a.target.table()))
        .then_with(|| b.target.column().cmp(&a.target.column()))
        .then_with(|| b.window.start.cmp(&a.window.start))
}

impl MatchSet {
    pub fn candidates(&self) -> &[MatchCandidate] {
        &self.candidates
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    fn best<'a>(
        &'a self,
        tables: &[CatalogTable],
        filter: impl Fn(&MatchCandidate) -> bool,
    ) -> Option<&'a MatchCandidate> {
        self.candidates
            .iter()
            .filter(|c| filter(c))
            .max_by(|a, b| compare_candidates(a, b, tables))
    }

    /// Best table candidate scoring at least `threshold` whose window avoids
    /// the `reserved` token indices.
    pub fn best_table(
        &self,
        tables: &[CatalogTable],
        threshold: f64,
        reserved: &[usize],
    ) -> Option<&MatchCandidate> {
        self.best(tables, |c| {
            matches!(c.target, MatchTarget::Table { .. })
                && c.score >= threshold
                && !c.window.indices().any(|i| reserved.contains(&i))
        })
    }

    /// Best column of `table` whose window lies inside `within` and does not
    /// overlap `exclude`.
    pub fn best_column(
        &self,
        tables: &[CatalogTable],
        table: usize,
        within: TokenWindow,
        exclude: Option<TokenWindow>,
        threshold: f64,
    ) -> Option<&MatchCandidate> {
        self.best(tables, |c| {
            matches!(c.target, MatchTarget::Column { table: t, .. } if t == table)
                && c.score >= threshold
                && within.covers(&c.window)
                && !exclude.is_some_and(|ex| ex.overlaps(&c.window))
        })
    }

    /// Accepted column candidates of `table`, best first.
    pub fn ranked_columns(
        &self,
        tables: &[CatalogTable],
        table: usize,
        threshold: f64,
    ) -> Vec<&MatchCandidate> {
        let mut columns: Vec<&MatchCandidate> = self
            .candidates
            .iter()
            .filter(|c| {
                matches!(c.target, MatchTarget::Column { table: t, .. } if t == table)
                    && c.score >= threshold
            })
            .collect();
        columns.sort_by(|a, b| compare_candidates(b, a, tables));
        columns
    }

    /// Highest score reached by each table, whether accepted or not.
    pub fn table_scores(&self, table_count: usize) -> Vec<f64> {
        let mut scores = vec![0.0; table_count];
        for candidate in &self.candidates {
            if let MatchTarget::Table { table } = candidate.target {
                if let Some(score) = scores.get_mut(table) {
                    *score = f64::max(*score, candidate.score);
                }
            }
        }
        scores
    }
}
