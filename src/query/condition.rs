//! Filter predicates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::understanding::lexer::{is_date, Span};
use crate::understanding::matcher::TokenWindow;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Substring match, rendered as `LIKE '%value%'`.
    Contains,
}

impl Comparator {
    /// Parse a comparator symbol as produced by the lexer.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" | "==" => Some(Comparator::Eq),
            "!=" | "<>" => Some(Comparator::Ne),
            ">" => Some(Comparator::Gt),
            ">=" => Some(Comparator::Gte),
            "<" => Some(Comparator::Lt),
            "<=" => Some(Comparator::Lte),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "!=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Contains => "contains",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A typed condition value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Date(String),
}

impl Literal {
    /// Type a value lexeme.
    ///
    /// Numeric grammar yields a number, the date grammar yields a date,
    /// anything else is a string. Integers too large for `i64` fall back to
    /// floats; numbers too large for a finite `f64` stay strings.
    pub fn from_lexeme(text: &str, is_number: bool) -> Literal {
        if is_number {
            if let Ok(n) = text.parse::<i64>() {
                return Literal::Integer(n);
            }
            if let Ok(f) = text.parse::<f64>() {
                if f.is_finite() {
                    return Literal::Float(f);
                }
            }
            return Literal::String(text.to_string());
        }
        if is_date(text) {
            return Literal::Date(text.to_string());
        }
        Literal::String(text.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Literal::Integer(_) | Literal::Float(_))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", ryu::Buffer::new().format(*n)),
            Literal::String(s) | Literal::Date(s) => f.write_str(s),
        }
    }
}

/// How a condition joins the ones before it. Only AND is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    #[default]
    And,
}

/// The column side of a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ColumnRef {
    /// Request text that has not been bound to a catalog column yet.
    Unresolved { hint: String, window: TokenWindow },
    /// Column name exactly as stored.
    Bound { name: String },
}

impl ColumnRef {
    pub fn bound(name: impl Into<String>) -> Self {
        ColumnRef::Bound { name: name.into() }
    }

    pub fn bound_name(&self) -> Option<&str> {
        match self {
            ColumnRef::Bound { name } => Some(name),
            ColumnRef::Unresolved { .. } => None,
        }
    }
}

/// A single filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: ColumnRef,
    pub comparator: Comparator,
    pub value: Literal,
    #[serde(default)]
    pub combinator: Combinator,
    /// Where the fragment came from in the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Condition {
    pub fn new(column: ColumnRef, comparator: Comparator, value: Literal) -> Self {
        Self {
            column,
            comparator,
            value,
            combinator: Combinator::And,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Shorthand for a condition on a bound column.
    pub fn on(column: &str, comparator: Comparator, value: Literal) -> Self {
        Self::new(ColumnRef::bound(column), comparator, value)
    }
}
