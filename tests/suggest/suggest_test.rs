use querywise::catalog::{Catalog, CatalogColumn, CatalogTable, ColumnType};
use querywise::config::EngineConfig;
use querywise::engine::QueryEngine;
use querywise::sql::validate_sql;
use querywise::suggest::suggest_queries;

fn users() -> CatalogTable {
    CatalogTable::new("dbo.Users")
        .with_column(
            CatalogColumn::new("id", ColumnType::Numeric)
                .not_null()
                .with_uniqueness(1.0),
        )
        .with_column(CatalogColumn::new("name", ColumnType::Text).with_uniqueness(0.9))
        .with_column(CatalogColumn::new("age", ColumnType::Numeric).with_uniqueness(0.1))
        .with_column(
            CatalogColumn::new("status", ColumnType::Text)
                .with_uniqueness(0.01)
                .with_samples(["active", "banned"]),
        )
        .with_primary_key("id")
        .with_row_count(1000)
}

fn catalog() -> Catalog {
    Catalog::default().with_table(users()).with_table(
        CatalogTable::new("dbo.Orders")
            .with_column(CatalogColumn::new("id", ColumnType::Numeric))
            .with_column(CatalogColumn::new("amount", ColumnType::Numeric))
            .with_primary_key("id")
            .with_row_count(5000),
    )
}

#[test]
fn test_hints() {
    let hints: Vec<String> = suggest_queries(&users(), &EngineConfig::default())
        .into_iter()
        .map(|s| s.hint)
        .collect();
    assert_eq!(
        hints,
        vec![
            "How many records are in Users",
            "Show the top 10 Users",
            "What is the average id in Users",
            "What is the average age in Users",
            "Find Users where status is 'active'",
        ]
    );
}

#[test]
fn test_suggested_sql_is_valid() {
    for suggestion in suggest_queries(&users(), &EngineConfig::default()) {
        validate_sql(&suggestion.sql).unwrap();
    }
}

#[test]
fn test_hints_parse_back_to_the_same_sql() {
    let engine = QueryEngine::default();
    let catalog = catalog();
    for suggestion in engine.suggest(&users()) {
        let result = engine.parse(&suggestion.hint, &catalog).unwrap();
        assert_eq!(result.sql, suggestion.sql, "hint: {}", suggestion.hint);
        assert_eq!(
            result.query.aggregation, suggestion.query.aggregation,
            "hint: {}",
            suggestion.hint
        );
    }
}

#[test]
fn test_default_limit_flows_into_top_n() {
    let config = EngineConfig::default().with_default_limit(3);
    let suggestions = suggest_queries(&users(), &config);
    assert_eq!(suggestions[1].hint, "Show the top 3 Users");
    assert_eq!(
        suggestions[1].sql,
        "SELECT * FROM dbo.Users ORDER BY id DESC LIMIT 3"
    );
}

#[test]
fn test_keyword_named_columns_are_skipped() {
    let table = CatalogTable::new("sales")
        .with_column(CatalogColumn::new("total", ColumnType::Numeric))
        .with_column(CatalogColumn::new("price", ColumnType::Numeric));
    let suggestions = suggest_queries(&table, &EngineConfig::default());
    let averages: Vec<&str> = suggestions
        .iter()
        .filter(|s| s.hint.starts_with("What is the average"))
        .map(|s| s.sql.as_str())
        .collect();
    assert_eq!(averages, vec!["SELECT AVG(price) FROM sales"]);
}

#[test]
fn test_sample_with_apostrophe_uses_double_quotes() {
    let table = CatalogTable::new("people").with_column(
        CatalogColumn::new("surname", ColumnType::Text)
            .with_uniqueness(0.05)
            .with_samples(["O'Brien"]),
    );
    let suggestions = suggest_queries(&table, &EngineConfig::default());
    let filter = suggestions.last().unwrap();
    assert_eq!(filter.hint, "Find people where surname is \"O'Brien\"");
    assert_eq!(
        filter.sql,
        "SELECT * FROM people WHERE surname = 'O''Brien'"
    );
}
