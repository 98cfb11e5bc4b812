use querywise::catalog::{CatalogColumn, CatalogTable, ColumnType};
use querywise::config::EngineConfig;
use querywise::error::{EngineError, EngineResult};
use querywise::planner::{Plan, PlanInput, QueryPlanner};
use querywise::query::{
    AggregateFunction, Aggregation, ColumnRef, Comparator, Literal, OrderBy, ParseWarning,
    SortDir,
};
use querywise::understanding::{
    detect_signals, extract_conditions, match_tokens, tokenize, Span,
};

fn tables() -> Vec<CatalogTable> {
    vec![
        CatalogTable::new("users")
            .with_column(CatalogColumn::new("id", ColumnType::Numeric))
            .with_column(CatalogColumn::new("name", ColumnType::Text))
            .with_column(CatalogColumn::new("age", ColumnType::Numeric))
            .with_column(CatalogColumn::new("status", ColumnType::Text))
            .with_primary_key("id")
            .with_row_count(1000),
        CatalogTable::new("orders")
            .with_column(CatalogColumn::new("id", ColumnType::Numeric))
            .with_column(CatalogColumn::new("user_id", ColumnType::Numeric))
            .with_column(CatalogColumn::new("amount", ColumnType::Numeric))
            .with_column(CatalogColumn::new("order_date", ColumnType::Datetime))
            .with_primary_key("id")
            .with_foreign_key("user_id")
            .with_row_count(5000),
        CatalogTable::new("audit_log")
            .with_column(CatalogColumn::new("message", ColumnType::Text))
            .with_row_count(50),
    ]
}

fn plan_with(text: &str, config: &EngineConfig) -> EngineResult<Plan> {
    let tables = tables();
    let tokens = tokenize(text);
    let matches = match_tokens(&tokens, &tables);
    let signals = detect_signals(&tokens);
    QueryPlanner::new(&tables, config).plan(PlanInput {
        tokens: &tokens,
        matches: &matches,
        signals: &signals,
        conditions: extract_conditions(&tokens),
    })
}

fn plan(text: &str) -> Plan {
    plan_with(text, &EngineConfig::default()).unwrap()
}

#[test]
fn test_conditions_bind_to_target_table() {
    let plan = plan("find users where age > 30");
    assert_eq!(plan.table, 0);
    assert_eq!(plan.query.target.as_deref(), Some("users"));
    assert_eq!(plan.query.conditions.len(), 1);

    let condition = &plan.query.conditions[0];
    assert_eq!(condition.column, ColumnRef::bound("age"));
    assert_eq!(condition.comparator, Comparator::Gt);
    assert_eq!(condition.value, Literal::Integer(30));
    assert!(plan.warnings.is_empty());
}

#[test]
fn test_multi_word_condition_column() {
    let plan = plan("show orders where order date > 2024-01-01");
    assert_eq!(plan.query.target.as_deref(), Some("orders"));
    assert_eq!(
        plan.query.conditions[0].column,
        ColumnRef::bound("order_date")
    );
    assert!(plan.warnings.is_empty());
}

#[test]
fn test_unbound_condition_is_dropped_with_warning() {
    let plan = plan("show users with unknownfield = 5");
    assert!(plan.query.conditions.is_empty());
    assert_eq!(
        plan.warnings,
        vec![ParseWarning::DroppedToken {
            token: "unknownfield".into(),
            span: Span::new(16, 28),
        }]
    );
}

#[test]
fn test_implicit_condition_warns() {
    let plan = plan("users with status 'active'");
    assert_eq!(plan.query.conditions[0].column, ColumnRef::bound("status"));
    assert_eq!(
        plan.warnings,
        vec![ParseWarning::AmbiguousCondition {
            column: "status".into(),
            word: None,
            span: Span::new(11, 26),
        }]
    );
}

#[test]
fn test_implicit_condition_reports_unknown_word() {
    let plan = plan("users with age around 30");
    assert_eq!(plan.query.conditions[0].column, ColumnRef::bound("age"));
    assert!(matches!(
        &plan.warnings[..],
        [ParseWarning::AmbiguousCondition { column, word: Some(word), .. }]
            if column == "age" && word == "around"
    ));
}

#[test]
fn test_or_is_reported() {
    let plan = plan("users where age > 30 or status is 'banned'");
    assert_eq!(plan.query.conditions.len(), 2);
    assert!(matches!(
        &plan.warnings[..],
        [ParseWarning::UnsupportedOr { span }] if *span == Span::new(21, 23)
    ));
}

#[test]
fn test_aggregation_uses_named_column() {
    let plan = plan("average amount of orders");
    assert_eq!(
        plan.query.aggregation,
        Some(Aggregation::over(AggregateFunction::Avg, "amount"))
    );
}

#[test]
fn test_ineligible_aggregation_column_falls_back() {
    let plan = plan("average status of users");
    assert_eq!(
        plan.query.aggregation,
        Some(Aggregation::over(AggregateFunction::Avg, "id"))
    );
    assert_eq!(
        plan.warnings,
        vec![ParseWarning::IneligibleAggregationColumn {
            column: "status".into(),
            function: AggregateFunction::Avg,
        }]
    );
}

#[test]
fn test_count_without_column_is_star() {
    let plan = plan("how many orders");
    assert_eq!(plan.query.aggregation, Some(Aggregation::count_star()));
}

#[test]
fn test_aggregation_without_numeric_column() {
    let result = plan_with("sum of audit log", &EngineConfig::default());
    assert!(matches!(
        result,
        Err(EngineError::UnresolvedAggregationColumn {
            function: AggregateFunction::Sum,
            ..
        })
    ));
}

#[test]
fn test_ordering_ignored_under_aggregation() {
    let plan = plan("count users order by age");
    assert_eq!(plan.query.aggregation, Some(Aggregation::count_star()));
    assert_eq!(plan.query.order_by, None);
    assert_eq!(plan.query.limit, None);
    assert_eq!(
        plan.warnings,
        vec![ParseWarning::OrderingIgnored {
            function: AggregateFunction::Count
        }]
    );
}

#[test]
fn test_top_n_orders_by_primary_key() {
    let plan = plan("top 5 orders");
    assert_eq!(plan.query.order_by, Some(OrderBy::new("id", SortDir::Desc)));
    assert_eq!(plan.query.limit, Some(5));
}

#[test]
fn test_top_without_number_uses_default_limit() {
    let config = EngineConfig::default().with_default_limit(25);
    let plan = plan_with("top orders by amount", &config).unwrap();
    assert_eq!(
        plan.query.order_by,
        Some(OrderBy::new("amount", SortDir::Desc))
    );
    assert_eq!(plan.query.limit, Some(25));
}

#[test]
fn test_top_n_without_key_is_unordered() {
    let plan = plan("top 3 audit log");
    assert_eq!(plan.query.order_by, None);
    assert_eq!(plan.query.limit, Some(3));
    assert_eq!(
        plan.warnings,
        vec![ParseWarning::UnorderedTopN {
            table: "audit_log".into()
        }]
    );
}

#[test]
fn test_rejected_limit_is_dropped() {
    let plan = plan("show users limit 0");
    assert_eq!(plan.query.limit, None);
    assert_eq!(
        plan.warnings,
        vec![ParseWarning::DroppedToken {
            token: "0".into(),
            span: Span::new(17, 18),
        }]
    );
}

#[test]
fn test_unbound_value_tokens_are_dropped() {
    let plan = plan("show orders on 2024-01-01");
    assert!(plan.query.conditions.is_empty());
    assert_eq!(
        plan.warnings,
        vec![ParseWarning::DroppedToken {
            token: "2024-01-01".into(),
            span: Span::new(15, 25),
        }]
    );
}

#[test]
fn test_explicit_order_defaults_to_ascending() {
    let plan = plan("show users order by age");
    assert_eq!(plan.query.target.as_deref(), Some("users"));
    assert_eq!(plan.query.order_by, Some(OrderBy::new("age", SortDir::Asc)));
    assert!(plan.warnings.is_empty());
}

#[test]
fn test_projection_in_order_of_appearance() {
    let plan = plan("show status and name of users");
    assert_eq!(plan.query.columns, vec!["status", "name"]);
}

#[test]
fn test_keyword_overlap_fallback() {
    let plan = plan("show the audit entries");
    assert_eq!(plan.query.target.as_deref(), Some("audit_log"));
    assert_eq!(
        plan.warnings,
        vec![ParseWarning::TableFallback {
            table: "audit_log".into()
        }]
    );
}

#[test]
fn test_unresolved_table() {
    match plan_with("show all aliens", &EngineConfig::default()) {
        Err(EngineError::UnresolvedTable { suggestions, spans }) => {
            assert_eq!(suggestions.len(), 3);
            assert!(suggestions.contains(&"users".to_string()));
            assert!(suggestions.contains(&"orders".to_string()));
            assert_eq!(spans, vec![Span::new(9, 15)]);
        }
        other => panic!("expected UnresolvedTable, got {:?}", other),
    }
}
