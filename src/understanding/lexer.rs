//! Lexer for natural-language requests.
//!
//! Splits raw text into normalized tokens with byte spans into the original
//! string. Words are lowercased and stripped of punctuation; numbers, dates
//! and quoted strings survive intact; comparison symbols become comparator
//! tokens.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").unwrap());

static GROUPED_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap());

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}[-/]\d{1,2}[-/]\d{1,2}|\d{1,2}[-/]\d{1,2}[-/]\d{4})$").unwrap()
});

/// Words that steer classification or carry no schema meaning.
///
/// Anything not listed here is an identifier candidate and gets matched
/// against the catalog. `order`, `sort` and `first` are deliberately absent:
/// they are common parts of column names (`order_date`, `first_name`) and are
/// recognized by their surrounding phrase instead.
static KEYWORDS: &[&str] = &[
    // Retrieval
    "show", "list", "get", "find", "display", "select", "fetch", "give", "return", "view",
    // Aggregation
    "count", "how", "many", "number", "total", "average", "avg", "mean", "sum", "max",
    "maximum", "min", "minimum",
    // Filtering
    "where", "with", "having", "whose", "that", "which",
    // Comparison words
    "is", "are", "was", "equals", "equal", "to", "above", "over", "greater", "more", "exceeds",
    "below", "under", "less", "fewer", "than", "at", "least", "most", "not", "contains",
    "containing", "like", "and", "or",
    // Ordering and limits
    "top", "by", "sorted", "ordered", "limit", "desc", "descending", "asc", "ascending",
    // Filler
    "a", "an", "the", "all", "me", "i", "we", "you", "my", "our", "of", "for", "in", "from",
    "on", "please", "what", "there", "do", "does", "have", "has", "want", "can", "tell",
    "each", "every", "any", "some", "records", "record", "rows", "row", "entries", "entry",
    "results", "data", "everything", "details", "info", "information", "them",
];

/// Returns true if `word` is a reserved keyword.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Byte range into the original request text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Category tag of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Keyword,
    Number,
    Comparator,
    Identifier,
    /// Quoted string or date.
    Literal,
}

/// A normalized token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Lowercase lexeme. Quoted literals keep their original case.
    pub text: String,
    pub span: Span,
    pub kind: TokenKind,
}

impl Token {
    fn new(text: impl Into<String>, span: Span, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            span,
            kind,
        }
    }

    /// Keyword or identifier.
    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::Identifier)
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// Token that can stand as the value side of a condition.
    pub fn is_value(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Number | TokenKind::Literal | TokenKind::Identifier
        )
    }

    /// Literal that matches the date grammar.
    pub fn is_date(&self) -> bool {
        self.kind == TokenKind::Literal && is_date(&self.text)
    }
}

/// Numeric grammar: optional sign, digits, optional decimal part. A bare
/// fraction (`.5`) is accepted.
pub fn is_number(text: &str) -> bool {
    NUMBER_PATTERN.is_match(text)
}

/// Date grammar: `YYYY-MM-DD`, `YYYY/MM/DD`, `DD-MM-YYYY` or `DD/MM/YYYY`.
pub fn is_date(text: &str) -> bool {
    DATE_PATTERN.is_match(text)
}

fn is_comparator_char(c: char) -> bool {
    matches!(c, '=' | '!' | '<' | '>')
}

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"')
}

/// Characters trimmed from the ends of a numeric lexeme (`$100`, `30,`, `50%`).
///
/// A period is only trimmed from the end, so `.5` keeps its point.
fn is_number_padding(c: char) -> bool {
    matches!(
        c,
        ',' | ';' | ':' | '!' | '?' | '.' | '(' | ')' | '[' | ']' | '{' | '}' | '$' | '%'
    )
}

fn is_leading_padding(c: char) -> bool {
    c != '.' && is_number_padding(c)
}

/// Digits mixed only with numeric punctuation (`3.5.6`, `1-800`, `10:30`).
fn is_numeric_like(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | '/' | ':'))
}

/// Tokenize a request.
///
/// Never fails: unrecognized punctuation is dropped and an unterminated
/// quote runs to the end of the input. Inside a quoted literal a doubled
/// quote character stands for one quote (`'O''Brien'`).
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if is_quote(c) {
            chars.next();
            let mut text = String::new();
            let mut end = input.len();
            while let Some((pos, ch)) = chars.next() {
                if ch == c {
                    if chars.peek().is_some_and(|&(_, next)| next == c) {
                        chars.next();
                        text.push(c);
                        continue;
                    }
                    end = pos + ch.len_utf8();
                    break;
                }
                text.push(ch);
            }
            tokens.push(Token::new(text, Span::new(start, end), TokenKind::Literal));
            continue;
        }

        if is_comparator_char(c) {
            chars.next();
            let mut end = start + c.len_utf8();
            if let Some(&(pos, next)) = chars.peek() {
                if matches!((c, next), ('!', '=') | ('<', '>') | ('>', '=') | ('<', '=') | ('=', '=')) {
                    chars.next();
                    end = pos + next.len_utf8();
                }
            }
            let op = match &input[start..end] {
                "==" => "=",
                "<>" => "!=",
                "!" => continue,
                other => other,
            };
            tokens.push(Token::new(op, Span::new(start, end), TokenKind::Comparator));
            continue;
        }

        let mut end = input.len();
        while let Some(&(pos, ch)) = chars.peek() {
            if ch.is_whitespace() || is_comparator_char(ch) {
                end = pos;
                break;
            }
            chars.next();
        }
        classify_run(input, start, end, &mut tokens);
    }

    tokens
}

/// Classify one whitespace-delimited run of text.
fn classify_run(input: &str, start: usize, end: usize, tokens: &mut Vec<Token>) {
    let raw = &input[start..end];

    let leading = raw.trim_start_matches(is_leading_padding);
    let trimmed = leading.trim_end_matches(is_number_padding);
    let trimmed_start = start + raw.len() - leading.len();
    let span = Span::new(trimmed_start, trimmed_start + trimmed.len());
    if is_number(trimmed) {
        tokens.push(Token::new(trimmed, span, TokenKind::Number));
        return;
    }
    if GROUPED_NUMBER_PATTERN.is_match(trimmed) {
        tokens.push(Token::new(trimmed.replace(',', ""), span, TokenKind::Number));
        return;
    }
    // Dates, and digit runs that are not a single number, stay whole so the
    // value is never cut down to its first piece.
    if is_date(trimmed) || is_numeric_like(trimmed) {
        tokens.push(Token::new(trimmed, span, TokenKind::Literal));
        return;
    }

    // Split into words on punctuation; apostrophes are dropped ("user's" -> "users").
    let mut word = String::new();
    let mut word_start = start;
    for (offset, ch) in raw.char_indices() {
        let pos = start + offset;
        if ch.is_alphanumeric() || ch == '_' {
            if word.is_empty() {
                word_start = pos;
            }
            word.extend(ch.to_lowercase());
        } else if ch == '\'' || ch == '\u{2019}' {
            continue;
        } else if !word.is_empty() {
            push_word(&mut word, Span::new(word_start, pos), tokens);
        }
    }
    if !word.is_empty() {
        push_word(&mut word, Span::new(word_start, end), tokens);
    }
}

fn push_word(word: &mut String, span: Span, tokens: &mut Vec<Token>) {
    let text = std::mem::take(word);
    let kind = if is_keyword(&text) {
        TokenKind::Keyword
    } else if is_number(&text) {
        TokenKind::Number
    } else {
        TokenKind::Identifier
    };
    tokens.push(Token::new(text, span, kind));
}
