use querywise::understanding::lexer::{is_date, is_keyword, is_number};
use querywise::understanding::{tokenize, Span, Token, TokenKind};

fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn test_full_request() {
    let tokens = tokenize("Find Users where Age >= 30 and Status is 'Active'");
    assert_eq!(
        texts(&tokens),
        vec!["find", "users", "where", "age", ">=", "30", "and", "status", "is", "Active"]
    );
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Comparator,
            TokenKind::Number,
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Keyword,
            TokenKind::Literal,
        ]
    );
}

#[test]
fn test_symbol_normalization() {
    let tokens = tokenize("a == 1 b <> 2 c != 3");
    let comparators: Vec<&str> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Comparator)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(comparators, vec!["=", "!=", "!="]);
}

#[test]
fn test_comparator_without_spaces() {
    let tokens = tokenize("price<=9.99");
    assert_eq!(texts(&tokens), vec!["price", "<=", "9.99"]);
    assert_eq!(tokens[1].span, Span::new(5, 7));
}

#[test]
fn test_number_padding_is_trimmed() {
    let tokens = tokenize("over $100, or (50%)");
    assert_eq!(texts(&tokens), vec!["over", "100", "or", "50"]);
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[1].span, Span::new(6, 9));
}

#[test]
fn test_double_quoted_literal() {
    let tokens = tokenize(r#"name is "O'Brien""#);
    assert_eq!(tokens[2].text, "O'Brien");
    assert_eq!(tokens[2].kind, TokenKind::Literal);
}

#[test]
fn test_camel_case_survives_as_one_word() {
    let tokens = tokenize("show OrderItems");
    assert_eq!(tokens[1].text, "orderitems");
    assert!(tokens[1].is_identifier());
}

#[test]
fn test_unicode_words() {
    let tokens = tokenize("café prices");
    assert_eq!(texts(&tokens), vec!["café", "prices"]);
    assert_eq!(tokens[0].span, Span::new(0, 5));
}

#[test]
fn test_grammar_helpers() {
    assert!(is_number("42"));
    assert!(is_number("-3.5"));
    assert!(is_number("7."));
    assert!(is_number(".5"));
    assert!(!is_number("."));
    assert!(!is_number("3.5.6"));
    assert!(!is_number("1e5"));
    assert!(!is_number("abc"));

    assert!(is_date("2024-01-15"));
    assert!(is_date("2024/1/5"));
    assert!(is_date("15-01-2024"));
    assert!(!is_date("2024-01"));

    assert!(is_keyword("where"));
    assert!(!is_keyword("order"));
    assert!(!is_keyword("first"));
}

#[test]
fn test_whitespace_only() {
    assert!(tokenize(" \t\n ").is_empty());
}
