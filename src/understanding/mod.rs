//! Text understanding: everything that runs before the catalog is consulted
//! for a final decision.
//!
//! - [`lexer`] - normalized tokens with spans
//! - [`matcher`] - fuzzy table/column candidates over token windows
//! - [`intent`] - rule-table intent detection and classification
//! - [`conditions`] - filter predicate extraction

pub mod conditions;
pub mod inflection;
pub mod intent;
pub mod lexer;
pub mod matcher;
pub mod similarity;

pub use conditions::{extract_conditions, ExtractedCondition};
pub use intent::{classify, detect_signals, IntentSignals};
pub use lexer::{tokenize, Span, Token, TokenKind};
pub use matcher::{match_tokens, MatchCandidate, MatchSet, MatchTarget, TokenWindow};
pub use similarity::similarity;
