//! Validation of emitted SQL.
//!
//! Parses SQL with sqlparser-rs to confirm that generated statements are
//! syntactically correct. Used by the test suites and by the driver's
//! `--check` flag.

use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// Validates that a SQL string parses as exactly one statement.
///
/// # Example
///
/// ```ignore
/// use querywise::sql::validate_sql;
///
/// validate_sql("SELECT * FROM users").unwrap();
/// ```
pub fn validate_sql(sql: &str) -> Result<(), String> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql)
        .map_err(|e| format!("Invalid SQL: {}\nSQL: {}", e, sql))?;

    match statements.len() {
        1 => Ok(()),
        n => Err(format!("Expected one statement, found {}\nSQL: {}", n, sql)),
    }
}
