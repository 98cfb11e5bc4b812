use querywise::query::{ColumnRef, Comparator, Literal};
use querywise::understanding::{extract_conditions, tokenize, ExtractedCondition, TokenWindow};

fn extract(text: &str) -> Vec<ExtractedCondition> {
    extract_conditions(&tokenize(text))
}

fn hint(extracted: &ExtractedCondition) -> &str {
    match &extracted.condition.column {
        ColumnRef::Unresolved { hint, .. } => hint,
        ColumnRef::Bound { name } => name,
    }
}

#[test]
fn test_symbol_comparators() {
    let cases = [
        ("age = 30", Comparator::Eq),
        ("age != 30", Comparator::Ne),
        ("age <> 30", Comparator::Ne),
        ("age > 30", Comparator::Gt),
        ("age >= 30", Comparator::Gte),
        ("age < 30", Comparator::Lt),
        ("age <= 30", Comparator::Lte),
    ];
    for (text, expected) in cases {
        let conditions = extract(text);
        assert_eq!(conditions.len(), 1, "{}", text);
        assert_eq!(conditions[0].condition.comparator, expected, "{}", text);
        assert_eq!(conditions[0].condition.value, Literal::Integer(30), "{}", text);
    }
}

#[test]
fn test_phrase_comparators() {
    let cases = [
        ("age greater than or equal to 30", Comparator::Gte),
        ("age less than or equal to 30", Comparator::Lte),
        ("age is not equal to 30", Comparator::Ne),
        ("age is greater than 30", Comparator::Gt),
        ("age is less than 30", Comparator::Lt),
        ("age more than 30", Comparator::Gt),
        ("age fewer than 30", Comparator::Lt),
        ("age at least 30", Comparator::Gte),
        ("age at most 30", Comparator::Lte),
        ("age is above 30", Comparator::Gt),
        ("age under 30", Comparator::Lt),
        ("age equals 30", Comparator::Eq),
        ("age is 30", Comparator::Eq),
        ("age is not 30", Comparator::Ne),
    ];
    for (text, expected) in cases {
        let conditions = extract(text);
        assert_eq!(conditions.len(), 1, "{}", text);
        assert_eq!(conditions[0].condition.comparator, expected, "{}", text);
        assert_eq!(hint(&conditions[0]), "age", "{}", text);
    }
}

#[test]
fn test_contains() {
    let conditions = extract("name contains 'smith'");
    assert_eq!(conditions[0].condition.comparator, Comparator::Contains);
    assert_eq!(
        conditions[0].condition.value,
        Literal::String("smith".into())
    );
}

#[test]
fn test_literal_types() {
    let value = |text: &str| extract(text).remove(0).condition.value;

    assert_eq!(value("price > 9.5"), Literal::Float(9.5));
    assert_eq!(value("price > -3"), Literal::Integer(-3));
    assert_eq!(value("created > 2024-01-15"), Literal::Date("2024-01-15".into()));
    assert_eq!(value("city = 'New York'"), Literal::String("New York".into()));
    assert_eq!(value("city = boston"), Literal::String("boston".into()));
}

#[test]
fn test_multi_word_column_hint() {
    let conditions = extract("show orders where order date > 2024-01-01");
    assert_eq!(hint(&conditions[0]), "order date");
    assert_eq!(conditions[0].column_window, TokenWindow::new(3, 5));
    assert_eq!(conditions[0].operator_window, TokenWindow::new(5, 7));
}

#[test]
fn test_several_conditions_left_to_right() {
    let conditions = extract("users where age > 30 and score < 5 or city is 'Oslo'");
    let hints: Vec<&str> = conditions.iter().map(hint).collect();
    assert_eq!(hints, vec!["age", "score", "city"]);
    assert!(conditions.iter().all(|c| !c.implicit));
}

#[test]
fn test_implicit_equality_in_filter_clause() {
    let conditions = extract("users with status 'active'");
    assert_eq!(conditions.len(), 1);
    assert!(conditions[0].implicit);
    assert_eq!(conditions[0].condition.comparator, Comparator::Eq);
    assert_eq!(hint(&conditions[0]), "status");
}

#[test]
fn test_no_implicit_equality_outside_filter_clause() {
    assert!(extract("show status 'active'").is_empty());
}

#[test]
fn test_condition_span_covers_fragment() {
    let text = "find users where age > 30";
    let conditions = extract(text);
    let span = conditions[0].condition.span.unwrap();
    assert_eq!(&text[span.start..span.end], "age > 30");
}

#[test]
fn test_missing_value_yields_nothing() {
    assert!(extract("users where age >").is_empty());
    assert!(extract("users where > 5").is_empty());
}
