use std::sync::LazyLock;

use regex::Regex;

use super::compile;

/// Plausible domain for a numeric field, inferred from its name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberHint {
    pub min: f64,
    pub max: f64,
    pub decimals: u32,
}

const fn hint(pattern: &'static str, min: f64, max: f64, decimals: u32) -> (&'static str, NumberHint) {
    (pattern, NumberHint { min, max, decimals })
}

const TABLE: &[(&str, NumberHint)] = &[
    hint(r"\bage\b", 18.0, 90.0, 0),
    hint(r"\b(rating|score|stars)\b", 1.0, 5.0, 1),
    hint(r"\b(price|cost|amount|total|subtotal|fee)\b", 0.99, 999.99, 2),
    hint(r"\b(latitude|lat)\b", -90.0, 90.0, 6),
    hint(r"\b(longitude|lng|lon)\b", -180.0, 180.0, 6),
    hint(r"\b(quantity|qty|count|stock)\b", 1.0, 100.0, 0),
    hint(r"\byear\b", 1950.0, 2030.0, 0),
    hint(r"\b(percent|percentage|discount|rate)\b", 0.0, 100.0, 2),
    hint(r"\bweight\b", 1.0, 200.0, 1),
    hint(r"\bheight\b", 50.0, 250.0, 1),
    hint(r"\b(duration|minutes)\b", 1.0, 600.0, 0),
    hint(r"\b(views|likes|followers)\b", 0.0, 100_000.0, 0),
    hint(r"\b(priority|level)\b", 1.0, 10.0, 0),
    hint(r"\bmonth\b", 1.0, 12.0, 0),
    hint(r"\bday\b", 1.0, 31.0, 0),
    hint(r"\bhour\b", 0.0, 23.0, 0),
    hint(r"\bport\b", 1024.0, 65535.0, 0),
];

static MATCHERS: LazyLock<Vec<(Regex, NumberHint)>> = LazyLock::new(|| {
    TABLE
        .iter()
        .filter_map(|(pattern, hint)| compile(pattern).map(|regex| (regex, *hint)))
        .collect()
});

/// First hint whose pattern matches a normalised field key.
pub fn number_hint(key: &str) -> Option<NumberHint> {
    MATCHERS
        .iter()
        .find(|(regex, _)| regex.is_match(key))
        .map(|(_, hint)| *hint)
}
