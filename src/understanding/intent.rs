//! Intent detection.
//!
//! Keyword dispatch runs over a fixed, ordered rule table: aggregation rules
//! come first, then filter rules, then retrieval rules. The first matching
//! aggregation rule decides the aggregate function. Ordering, limit and top-N
//! phrasing are detected alongside.

use serde::Serialize;

use super::lexer::{Token, TokenKind};
use super::matcher::{TokenWindow, MAX_WINDOW};
use crate::query::{AggregateFunction, Complexity, IntentLabel, QueryIntent, QueryType, SortDir};

// =============================================================================
// Rule Table
// =============================================================================

/// What a matched rule contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Aggregate(AggregateFunction),
    Filter,
    Retrieve,
}

/// A keyword phrase and the signal it raises.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub phrase: &'static [&'static str],
    pub signal: Signal,
}

const fn rule(phrase: &'static [&'static str], signal: Signal) -> IntentRule {
    IntentRule { phrase, signal }
}

use AggregateFunction::{Avg, Count, Max, Min, Sum};

/// Rules in priority order.
pub static INTENT_RULES: &[IntentRule] = &[
    rule(&["how", "many"], Signal::Aggregate(Count)),
    rule(&["number", "of"], Signal::Aggregate(Count)),
    rule(&["total", "number"], Signal::Aggregate(Count)),
    rule(&["count"], Signal::Aggregate(Count)),
    rule(&["average"], Signal::Aggregate(Avg)),
    rule(&["avg"], Signal::Aggregate(Avg)),
    rule(&["mean"], Signal::Aggregate(Avg)),
    rule(&["sum"], Signal::Aggregate(Sum)),
    rule(&["total"], Signal::Aggregate(Sum)),
    rule(&["max"], Signal::Aggregate(Max)),
    rule(&["maximum"], Signal::Aggregate(Max)),
    rule(&["min"], Signal::Aggregate(Min)),
    rule(&["minimum"], Signal::Aggregate(Min)),
    rule(&["where"], Signal::Filter),
    rule(&["with"], Signal::Filter),
    rule(&["having"], Signal::Filter),
    rule(&["whose"], Signal::Filter),
    rule(&["that"], Signal::Filter),
    rule(&["show"], Signal::Retrieve),
    rule(&["list"], Signal::Retrieve),
    rule(&["get"], Signal::Retrieve),
    rule(&["find"], Signal::Retrieve),
    rule(&["display"], Signal::Retrieve),
    rule(&["select"], Signal::Retrieve),
    rule(&["fetch"], Signal::Retrieve),
];

/// Words that open a filter clause.
pub fn is_filter_word(token: &Token) -> bool {
    token.kind == TokenKind::Keyword
        && INTENT_RULES.iter().any(|r| {
            r.signal == Signal::Filter && r.phrase.len() == 1 && r.phrase[0] == token.text
        })
}

/// First position where `phrase` occurs as consecutive word tokens.
pub fn find_phrase(tokens: &[Token], phrase: &[&str]) -> Option<usize> {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return None;
    }
    (0..=tokens.len() - phrase.len()).find(|&i| phrase_at(tokens, i, phrase))
}

/// True if `phrase` occurs as word tokens starting at `index`.
pub fn phrase_at(tokens: &[Token], index: usize, phrase: &[&str]) -> bool {
    tokens.len() >= index + phrase.len()
        && phrase
            .iter()
            .zip(&tokens[index..])
            .all(|(word, token)| token.is_word() && token.text == *word)
}

// =============================================================================
// Signals
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateSignal {
    pub function: AggregateFunction,
    /// Tokens of the keyword phrase.
    pub window: TokenWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopNSignal {
    /// `None` for "top" without a number.
    pub limit: Option<u64>,
    pub window: TokenWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderingSignal {
    /// Identifier run naming the sort column, if any.
    pub column: Option<TokenWindow>,
}

/// Everything the rule table and phrase detection found in a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntentSignals {
    pub aggregation: Option<AggregateSignal>,
    pub filtered: bool,
    pub retrieval: bool,
    pub top_n: Option<TopNSignal>,
    pub ordering: Option<OrderingSignal>,
    pub direction: Option<SortDir>,
    pub limit: Option<u64>,
    /// Indices of `or` tokens.
    pub or_tokens: Vec<usize>,
    /// Tokens used up by phrase detection: `order`, `sort` and `first` when
    /// they act as grammar, and the counts of top-N and limit phrases.
    pub consumed: Vec<usize>,
}

impl IntentSignals {
    /// Ordering was requested, explicitly or through top-N.
    pub fn wants_ordering(&self) -> bool {
        self.ordering.is_some() || self.top_n.is_some()
    }
}

/// Run the rule table and phrase detectors over a token stream.
pub fn detect_signals(tokens: &[Token]) -> IntentSignals {
    let mut signals = IntentSignals::default();

    for rule in INTENT_RULES {
        let Some(start) = find_phrase(tokens, rule.phrase) else {
            continue;
        };
        match rule.signal {
            Signal::Aggregate(function) if signals.aggregation.is_none() => {
                signals.aggregation = Some(AggregateSignal {
                    function,
                    window: TokenWindow::new(start, start + rule.phrase.len()),
                });
            }
            Signal::Aggregate(_) => {}
            Signal::Filter => signals.filtered = true,
            Signal::Retrieve => signals.retrieval = true,
        }
    }

    detect_top_n(tokens, &mut signals);
    detect_ordering(tokens, &mut signals);
    detect_limit(tokens, &mut signals);

    for (i, token) in tokens.iter().enumerate() {
        if token.is_word() {
            match token.text.as_str() {
                "desc" | "descending" => signals.direction = Some(SortDir::Desc),
                "asc" | "ascending" => signals.direction = Some(SortDir::Asc),
                "or" => signals.or_tokens.push(i),
                _ => {}
            }
        }
    }

    signals
}

/// Positive integer count at `index`. Zero, fractions and values past
/// `u64::MAX` are not counts.
fn number_at(tokens: &[Token], index: usize) -> Option<u64> {
    tokens
        .get(index)
        .filter(|t| t.kind == TokenKind::Number)
        .and_then(|t| t.text.trim_start_matches('+').parse().ok())
        .filter(|&n| n > 0)
}

fn detect_top_n(tokens: &[Token], signals: &mut IntentSignals) {
    for (i, token) in tokens.iter().enumerate() {
        if !token.is_word() {
            continue;
        }
        let window = match (token.text.as_str(), number_at(tokens, i + 1)) {
            ("top" | "first", Some(_)) => TokenWindow::new(i, i + 2),
            ("top", None) => TokenWindow::single(i),
            _ => continue,
        };
        signals.top_n = Some(TopNSignal {
            limit: number_at(tokens, i + 1),
            window,
        });
        signals.consumed.extend(window.indices());
        return;
    }
}

/// Identifier run of up to [`MAX_WINDOW`] tokens starting at `start`.
fn identifier_run(tokens: &[Token], start: usize) -> Option<TokenWindow> {
    let len = tokens
        .iter()
        .skip(start)
        .take(MAX_WINDOW)
        .take_while(|t| t.is_identifier())
        .count();
    (len > 0).then(|| TokenWindow::new(start, start + len))
}

fn detect_ordering(tokens: &[Token], signals: &mut IntentSignals) {
    for (i, token) in tokens.iter().enumerate() {
        if !token.is_word() {
            continue;
        }
        let introduces = matches!(token.text.as_str(), "order" | "sort" | "sorted" | "ordered");
        if introduces && phrase_at(tokens, i + 1, &["by"]) {
            signals.ordering = Some(OrderingSignal {
                column: identifier_run(tokens, i + 2),
            });
            if token.is_identifier() {
                signals.consumed.push(i);
            }
            return;
        }
    }

    // "top 5 customers by revenue"
    if let Some(top) = signals.top_n {
        if let Some(by) = (top.window.end..tokens.len()).find(|&i| phrase_at(tokens, i, &["by"])) {
            if let Some(column) = identifier_run(tokens, by + 1) {
                signals.ordering = Some(OrderingSignal {
                    column: Some(column),
                });
            }
        }
    }
}

fn detect_limit(tokens: &[Token], signals: &mut IntentSignals) {
    for i in 0..tokens.len() {
        if phrase_at(tokens, i, &["limit"]) {
            if let Some(n) = number_at(tokens, i + 1) {
                signals.limit = Some(n);
                signals.consumed.extend([i, i + 1]);
                return;
            }
        }
        if let Some(n) = number_at(tokens, i) {
            let unit = tokens.get(i + 1).filter(|t| t.is_word()).map(|t| t.text.as_str());
            if matches!(unit, Some("rows" | "records" | "results" | "entries")) {
                signals.limit = Some(n);
                signals.consumed.extend([i, i + 1]);
                return;
            }
        }
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Derive the final intent once conditions and ordering are known.
///
/// `conditions` is the number of conditions that survived binding and
/// `ordered` whether the plan sorts its rows.
pub fn classify(
    signals: &IntentSignals,
    conditions: usize,
    ordered: bool,
    max_simple: usize,
) -> QueryIntent {
    let aggregation = signals.aggregation.map(|a| a.function);

    let query_type = if aggregation.is_some() {
        QueryType::Aggregation
    } else if signals.filtered || conditions > 0 {
        QueryType::FilteredRetrieval
    } else {
        QueryType::Retrieval
    };

    let label = match aggregation {
        Some(function) => IntentLabel::from(function),
        None if signals.top_n.is_some() => IntentLabel::TopN,
        None if query_type == QueryType::FilteredRetrieval => IntentLabel::SearchFiltered,
        None => IntentLabel::ShowData,
    };

    let complexity = Complexity::grade(conditions, aggregation.is_some(), ordered, max_simple);

    QueryIntent {
        query_type,
        complexity,
        label,
    }
}
