//! Singular forms for name matching.
//!
//! Requests say "customers" where the schema says `Customer`, and vice versa;
//! both sides are singularized word by word before comparison. The
//! `inflector` crate handles regular words; a small table covers irregular
//! plurals that show up in schemas.

use inflector::Inflector;

/// Irregular plurals, checked before the inflector rules.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("half", "halves"),
    ("analysis", "analyses"),
    ("crisis", "crises"),
    ("diagnosis", "diagnoses"),
    ("criterion", "criteria"),
    ("medium", "media"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("status", "statuses"),
    ("address", "addresses"),
    ("series", "series"),
    ("species", "species"),
];

/// Singularize one lowercase word.
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    if let Some((singular, _)) = IRREGULAR_PLURALS
        .iter()
        .find(|(singular, plural)| lower == *plural || lower == *singular)
    {
        return singular.to_string();
    }

    lower.to_singular()
}

/// Singularize every word and join with single spaces.
pub fn singular_phrase<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| singularize(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
