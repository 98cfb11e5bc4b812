//! Rendering of a [`StructuredQuery`] into SQL text.
//!
//! Pure and catalog-free: every name in the query is already bound and is
//! emitted as stored. Output is a single line:
//!
//! ```text
//! SELECT <projection> FROM <table> [WHERE ...] [ORDER BY ...] [LIMIT n]
//! ```

use serde::Serialize;

use super::token::{Token, TokenStream};
use crate::query::{
    Aggregation, ColumnRef, Comparator, Condition, Literal, OrderBy, SortDir, StructuredQuery,
};

// =============================================================================
// Errors
// =============================================================================

/// Preconditions the builder refuses to paper over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum BuildError {
    #[error("Query has no target table")]
    MissingTable,

    #[error("Condition column '{0}' is not bound to a catalog column")]
    UnresolvedColumn(String),
}

// =============================================================================
// Clauses
// =============================================================================

fn projection_tokens(query: &StructuredQuery) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(aggregation) = &query.aggregation {
        ts.append(&aggregation_tokens(aggregation));
    } else if query.columns.is_empty() {
        ts.push(Token::Star);
    } else {
        for (i, column) in query.columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.push(Token::Ident(column.clone()));
        }
    }

    ts
}

fn aggregation_tokens(aggregation: &Aggregation) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::FunctionName(aggregation.function.as_sql().into()))
        .lparen();
    match &aggregation.column {
        Some(column) => ts.push(Token::Ident(column.clone())),
        None => ts.push(Token::Star),
    };
    ts.rparen();
    ts
}

fn literal_token(value: &Literal) -> Token {
    match value {
        Literal::Integer(n) => Token::LitInt(*n),
        Literal::Float(f) => Token::LitFloat(*f),
        Literal::String(s) | Literal::Date(s) => Token::LitString(s.clone()),
    }
}

fn condition_tokens(condition: &Condition) -> Result<TokenStream, BuildError> {
    let column = match &condition.column {
        ColumnRef::Bound { name } => name.clone(),
        ColumnRef::Unresolved { hint, .. } => {
            return Err(BuildError::UnresolvedColumn(hint.clone()))
        }
    };

    let mut ts = TokenStream::new();
    ts.push(Token::Ident(column)).space();

    let operator = match condition.comparator {
        Comparator::Eq => Token::Eq,
        Comparator::Ne => Token::Ne,
        Comparator::Gt => Token::Gt,
        Comparator::Gte => Token::Gte,
        Comparator::Lt => Token::Lt,
        Comparator::Lte => Token::Lte,
        Comparator::Contains => {
            let pattern = format!("%{}%", condition.value);
            ts.push(Token::Like).space().push(Token::LitString(pattern));
            return Ok(ts);
        }
    };
    ts.push(operator).space().push(literal_token(&condition.value));

    Ok(ts)
}

fn order_tokens(order: &OrderBy) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::OrderBy)
        .space()
        .push(Token::Ident(order.column.clone()))
        .space()
        .push(match order.direction {
            SortDir::Asc => Token::Asc,
            SortDir::Desc => Token::Desc,
        });
    ts
}

// =============================================================================
// Entry Points
// =============================================================================

/// Build the token stream for a query.
pub fn to_tokens(query: &StructuredQuery) -> Result<TokenStream, BuildError> {
    let table = query.target.as_ref().ok_or(BuildError::MissingTable)?;

    let mut ts = TokenStream::new();
    ts.push(Token::Select).space();
    ts.append(&projection_tokens(query));
    ts.space()
        .push(Token::From)
        .space()
        .push(Token::Ident(table.clone()));

    for (i, condition) in query.conditions.iter().enumerate() {
        ts.space();
        ts.push(if i == 0 { Token::Where } else { Token::And });
        ts.space();
        ts.append(&condition_tokens(condition)?);
    }

    if let Some(order) = &query.order_by {
        ts.space();
        ts.append(&order_tokens(order));
    }

    if let Some(limit) = query.limit {
        ts.space().push(Token::Limit).space().push(Token::LitUint(limit));
    }

    Ok(ts)
}

/// Render a query as SQL text.
pub fn build_sql(query: &StructuredQuery) -> Result<String, BuildError> {
    Ok(to_tokens(query)?.serialize())
}
