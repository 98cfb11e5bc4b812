//! Extraction of filter predicates from a token stream.
//!
//! A condition is an identifier run, a comparator (a symbol or a phrase from
//! a fixed table, longest phrase first) and a value token. Inside a filter
//! clause a bare `<ident> <value>` pair is also read as equality and flagged
//! as implicit so the planner can warn about it.

use super::intent::is_filter_word;
use super::lexer::{Token, TokenKind};
use super::matcher::{TokenWindow, MAX_WINDOW};
use crate::query::{ColumnRef, Comparator, Condition, Literal};

struct ComparatorPhrase {
    words: &'static [&'static str],
    comparator: Comparator,
}

const fn phrase(words: &'static [&'static str], comparator: Comparator) -> ComparatorPhrase {
    ComparatorPhrase { words, comparator }
}

/// Comparator phrases, longest first.
static COMPARATOR_PHRASES: &[ComparatorPhrase] = &[
    phrase(&["greater", "than", "or", "equal", "to"], Comparator::Gte),
    phrase(&["less", "than", "or", "equal", "to"], Comparator::Lte),
    phrase(&["is", "not", "equal", "to"], Comparator::Ne),
    phrase(&["is", "greater", "than"], Comparator::Gt),
    phrase(&["is", "less", "than"], Comparator::Lt),
    phrase(&["is", "equal", "to"], Comparator::Eq),
    phrase(&["not", "equal", "to"], Comparator::Ne),
    phrase(&["greater", "than"], Comparator::Gt),
    phrase(&["more", "than"], Comparator::Gt),
    phrase(&["less", "than"], Comparator::Lt),
    phrase(&["fewer", "than"], Comparator::Lt),
    phrase(&["at", "least"], Comparator::Gte),
    phrase(&["at", "most"], Comparator::Lte),
    phrase(&["equal", "to"], Comparator::Eq),
    phrase(&["is", "not"], Comparator::Ne),
    phrase(&["above"], Comparator::Gt),
    phrase(&["over"], Comparator::Gt),
    phrase(&["exceeds"], Comparator::Gt),
    phrase(&["below"], Comparator::Lt),
    phrase(&["under"], Comparator::Lt),
    phrase(&["equals"], Comparator::Eq),
    phrase(&["is"], Comparator::Eq),
    phrase(&["contains"], Comparator::Contains),
    phrase(&["containing"], Comparator::Contains),
    phrase(&["like"], Comparator::Contains),
];

/// Copulas skipped between an identifier and a following comparator
/// ("age is above 30").
const COPULAS: &[&str] = &["is", "are", "was"];

/// A condition plus where it sits in the token stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedCondition {
    pub condition: Condition,
    /// Identifier run naming the column.
    pub column_window: TokenWindow,
    /// Comparator and value tokens.
    pub operator_window: TokenWindow,
    /// Read as `=` without an explicit comparator.
    pub implicit: bool,
}

impl ExtractedCondition {
    /// Tokens from the column run through the value.
    pub fn window(&self) -> TokenWindow {
        TokenWindow::new(self.column_window.start, self.operator_window.end)
    }
}

/// Comparator starting at `index` and the number of tokens it spans.
pub fn comparator_at(tokens: &[Token], index: usize) -> Option<(Comparator, usize)> {
    let token = tokens.get(index)?;
    if token.kind == TokenKind::Comparator {
        return Comparator::from_symbol(&token.text).map(|c| (c, 1));
    }
    COMPARATOR_PHRASES
        .iter()
        .find(|p| {
            p.words.len() + index <= tokens.len()
                && p.words
                    .iter()
                    .zip(&tokens[index..])
                    .all(|(w, t)| t.kind == TokenKind::Keyword && t.text == *w)
        })
        .map(|p| (p.comparator, p.words.len()))
}

fn literal_of(token: &Token) -> Option<Literal> {
    match token.kind {
        TokenKind::Number => Some(Literal::from_lexeme(&token.text, true)),
        TokenKind::Literal => Some(Literal::from_lexeme(&token.text, false)),
        TokenKind::Identifier => Some(Literal::String(token.text.clone())),
        TokenKind::Keyword | TokenKind::Comparator => None,
    }
}

/// Identifier run of up to [`MAX_WINDOW`] tokens ending just before `end`,
/// not reaching back past `floor`.
fn run_before(tokens: &[Token], end: usize, floor: usize) -> Option<TokenWindow> {
    let mut start = end;
    while start > floor && end - start < MAX_WINDOW && tokens[start - 1].is_identifier() {
        start -= 1;
    }
    (start < end).then(|| TokenWindow::new(start, end))
}

fn hint(tokens: &[Token], window: TokenWindow) -> ColumnRef {
    ColumnRef::Unresolved {
        hint: window.text(tokens),
        window,
    }
}

/// Extract every condition in the request, left to right.
pub fn extract_conditions(tokens: &[Token]) -> Vec<ExtractedCondition> {
    let mut conditions = Vec::new();
    let mut in_filter = false;
    let mut floor = 0;
    let mut i = 0;

    while i < tokens.len() {
        if is_filter_word(&tokens[i]) {
            in_filter = true;
            i += 1;
            continue;
        }

        if let Some((comparator, len)) = comparator_at(tokens, i) {
            let mut column_end = i;
            if column_end > floor
                && tokens[column_end - 1].kind == TokenKind::Keyword
                && COPULAS.contains(&tokens[column_end - 1].text.as_str())
            {
                column_end -= 1;
            }
            let value_index = i + len;
            let value = tokens.get(value_index).and_then(literal_of);

            if let (Some(column), Some(value)) = (run_before(tokens, column_end, floor), value) {
                let operator_window = TokenWindow::new(i, value_index + 1);
                let condition = Condition::new(hint(tokens, column), comparator, value)
                    .with_span(column.span(tokens).merge(operator_window.span(tokens)));
                conditions.push(ExtractedCondition {
                    condition,
                    column_window: column,
                    operator_window,
                    implicit: false,
                });
                floor = value_index + 1;
                i = floor;
                continue;
            }
        } else if in_filter && tokens[i].is_identifier() {
            // <ident> [unknown-word] <value>
            let run_len = tokens[i..]
                .iter()
                .take(MAX_WINDOW + 1)
                .take_while(|t| t.is_identifier())
                .count();
            let value_index = i + run_len;
            let value = tokens
                .get(value_index)
                .filter(|t| matches!(t.kind, TokenKind::Number | TokenKind::Literal))
                .and_then(literal_of);

            if let Some(value) = value {
                let column = TokenWindow::new(i, value_index);
                let operator_window = TokenWindow::single(value_index);
                let condition = Condition::new(hint(tokens, column), Comparator::Eq, value)
                    .with_span(column.span(tokens).merge(operator_window.span(tokens)));
                conditions.push(ExtractedCondition {
                    condition,
                    column_window: column,
                    operator_window,
                    implicit: true,
                });
                floor = value_index + 1;
                i = floor;
                continue;
            }
        }

        i += 1;
    }

    conditions
}
