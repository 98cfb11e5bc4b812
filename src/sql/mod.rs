//! SQL generation module.
//!
//! - [`token`] - Token types for SQL generation
//! - [`builder`] - StructuredQuery to SQL rendering
//! - [`test_utils`] - sqlparser-based validation of emitted SQL

pub mod builder;
pub mod test_utils;
pub mod token;

pub use builder::{build_sql, to_tokens, BuildError};
pub use test_utils::validate_sql;
pub use token::{Token, TokenStream};
