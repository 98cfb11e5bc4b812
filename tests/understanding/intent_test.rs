use querywise::query::{AggregateFunction, Complexity, IntentLabel, QueryType, SortDir};
use querywise::understanding::intent::INTENT_RULES;
use querywise::understanding::{classify, detect_signals, tokenize, IntentSignals, TokenWindow};

fn signals(text: &str) -> IntentSignals {
    detect_signals(&tokenize(text))
}

fn function(text: &str) -> Option<AggregateFunction> {
    signals(text).aggregation.map(|a| a.function)
}

#[test]
fn test_aggregation_keywords() {
    assert_eq!(function("how many orders"), Some(AggregateFunction::Count));
    assert_eq!(function("number of orders"), Some(AggregateFunction::Count));
    assert_eq!(function("count orders"), Some(AggregateFunction::Count));
    assert_eq!(function("average price"), Some(AggregateFunction::Avg));
    assert_eq!(function("avg price"), Some(AggregateFunction::Avg));
    assert_eq!(function("mean price"), Some(AggregateFunction::Avg));
    assert_eq!(function("sum of price"), Some(AggregateFunction::Sum));
    assert_eq!(function("total price"), Some(AggregateFunction::Sum));
    assert_eq!(function("max price"), Some(AggregateFunction::Max));
    assert_eq!(function("maximum price"), Some(AggregateFunction::Max));
    assert_eq!(function("min price"), Some(AggregateFunction::Min));
    assert_eq!(function("minimum price"), Some(AggregateFunction::Min));
    assert_eq!(function("show orders"), None);
}

#[test]
fn test_first_rule_wins() {
    // "how many" precedes "average" in the rule table
    assert_eq!(
        function("average of how many orders"),
        Some(AggregateFunction::Count)
    );
    assert_eq!(
        function("total number of orders"),
        Some(AggregateFunction::Count)
    );
}

#[test]
fn test_rule_table_order() {
    let first_filter = INTENT_RULES
        .iter()
        .position(|r| r.phrase == ["where"])
        .unwrap();
    let first_retrieve = INTENT_RULES
        .iter()
        .position(|r| r.phrase == ["show"])
        .unwrap();
    let last_aggregate = INTENT_RULES
        .iter()
        .position(|r| r.phrase == ["minimum"])
        .unwrap();
    assert!(last_aggregate < first_filter);
    assert!(first_filter < first_retrieve);
}

#[test]
fn test_aggregation_window() {
    let s = signals("what is the number of users");
    assert_eq!(s.aggregation.unwrap().window, TokenWindow::new(3, 5));
}

#[test]
fn test_explicit_ordering() {
    let s = signals("show users order by age");
    let ordering = s.ordering.unwrap();
    assert_eq!(ordering.column, Some(TokenWindow::new(4, 5)));
    assert_eq!(s.consumed, vec![2]);
    assert_eq!(s.direction, None);
}

#[test]
fn test_direction_words() {
    assert_eq!(signals("users by age asc").direction, Some(SortDir::Asc));
    assert_eq!(signals("users ascending").direction, Some(SortDir::Asc));
    assert_eq!(signals("users desc").direction, Some(SortDir::Desc));
}

#[test]
fn test_top_without_number_has_no_limit() {
    let s = signals("top customers by revenue");
    assert_eq!(s.top_n.unwrap().limit, None);
    assert_eq!(s.ordering.unwrap().column, Some(TokenWindow::new(3, 4)));
}

#[test]
fn test_limit_forms() {
    assert_eq!(signals("users limit 3").limit, Some(3));
    assert_eq!(signals("first 5 records").top_n.unwrap().limit, Some(5));
    assert_eq!(signals("show 15 entries from users").limit, Some(15));
    assert_eq!(signals("users limit").limit, None);
}

#[test]
fn test_classification_labels() {
    let label = |text: &str, conditions: usize| classify(&signals(text), conditions, false, 0).label;

    assert_eq!(label("show users", 0), IntentLabel::ShowData);
    assert_eq!(label("how many users", 0), IntentLabel::CountRecords);
    assert_eq!(label("average age", 0), IntentLabel::CalculateAverage);
    assert_eq!(label("total amount", 0), IntentLabel::SumValues);
    assert_eq!(label("max age", 0), IntentLabel::FindMaximum);
    assert_eq!(label("min age", 0), IntentLabel::FindMinimum);
    assert_eq!(label("users where age > 3", 1), IntentLabel::SearchFiltered);
    assert_eq!(label("top 3 users", 0), IntentLabel::TopN);
}

#[test]
fn test_conditions_alone_make_filtered_retrieval() {
    let intent = classify(&signals("users age > 3"), 1, false, 0);
    assert_eq!(intent.query_type, QueryType::FilteredRetrieval);
    assert_eq!(intent.label, IntentLabel::SearchFiltered);
}

#[test]
fn test_complexity_threshold_is_configurable() {
    let s = signals("users where a > 1 and b > 2");
    assert_eq!(classify(&s, 2, false, 0).complexity, Complexity::Complex);
    assert_eq!(classify(&s, 2, false, 1).complexity, Complexity::Moderate);
    assert_eq!(classify(&s, 2, false, 2).complexity, Complexity::Simple);
}

#[test]
fn test_complexity_uses_the_planned_ordering() {
    let s = signals("top 3 users");
    assert_eq!(classify(&s, 0, true, 0).complexity, Complexity::Moderate);
    // top-N over a table with no key plans no ORDER BY
    assert_eq!(classify(&s, 0, false, 0).complexity, Complexity::Simple);
}

#[test]
fn test_counts_must_be_positive() {
    assert!(signals("first 0 users").top_n.is_none());
    assert_eq!(signals("top 0 users").top_n.unwrap().limit, None);
    assert_eq!(signals("users limit 0").limit, None);
    assert_eq!(signals("show 0 rows of users").limit, None);
    assert_eq!(
        signals("top 18446744073709551616 users").top_n.unwrap().limit,
        None
    );
    assert_eq!(
        signals("top 18446744073709551615 users").top_n.unwrap().limit,
        Some(u64::MAX)
    );
}

#[test]
fn test_count_tokens_are_consumed() {
    assert_eq!(signals("top 3 users").consumed, vec![0, 1]);
    assert_eq!(signals("users limit 3").consumed, vec![1, 2]);
    assert_eq!(signals("show 15 entries from users").consumed, vec![1, 2]);
    // a rejected count stays free so the planner reports it
    assert!(signals("users limit 0").consumed.is_empty());
}
