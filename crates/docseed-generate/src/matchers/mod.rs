//! Name-keyed heuristic tables.
//!
//! Field and entity names are matched in a normalised form: the last dotted
//! segment, split on camelCase, snake_case and kebab-case boundaries, as
//! lowercase space-separated words (`billingAddress.postalCode` becomes
//! `postal code`). Table patterns are written against that form.

mod entity;
mod generic;
mod numeric;
mod temporal;

use std::sync::LazyLock;

use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use regex::Regex;

pub use numeric::{NumberHint, number_hint};
pub use temporal::timestamp_window;

/// Produces one candidate text value.
pub type Produce = fn(&mut dyn RngCore) -> String;

static SECRET: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(password|passwd|pass ?hash|hash|digest)\b").ok());

/// Normalise a path or entity name into lowercase space-separated words.
pub fn normalize_key(path: &str) -> String {
    let segment = path.rsplit('.').next().unwrap_or(path);
    let chars: Vec<char> = segment.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (idx, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[idx - 1];
            let next_is_lower = chars.get(idx + 1).is_some_and(|next| next.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join(" ")
}

/// Whether a normalised field key names a password or digest.
pub fn is_secret(key: &str) -> bool {
    SECRET.as_ref().is_some_and(|pattern| pattern.is_match(key))
}

/// Entity-scoped tier: first entry whose entity and field patterns both match.
pub fn entity_text(entity_key: &str, field_key: &str, rng: &mut dyn RngCore) -> Option<String> {
    entity::MATCHERS
        .iter()
        .find(|matcher| matcher.entity.is_match(entity_key) && matcher.field.is_match(field_key))
        .map(|matcher| (matcher.produce)(rng))
}

/// Entity-agnostic tier: first entry whose field pattern matches.
pub fn generic_text(field_key: &str, rng: &mut dyn RngCore) -> Option<String> {
    generic::MATCHERS
        .iter()
        .find(|matcher| matcher.field.is_match(field_key))
        .map(|matcher| (matcher.produce)(rng))
}

pub(crate) struct TextMatcher {
    pub(crate) field: Regex,
    pub(crate) produce: Produce,
}

pub(crate) struct EntityMatcher {
    pub(crate) entity: Regex,
    pub(crate) field: Regex,
    pub(crate) produce: Produce,
}

pub(crate) const fn entry(pattern: &'static str, produce: Produce) -> (&'static str, Produce) {
    (pattern, produce)
}

pub(crate) fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern).ok()
}

pub(crate) fn alphanumeric(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

pub(crate) fn digits(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10_u8)))
        .collect()
}

pub(crate) fn upper_alpha(rng: &mut dyn RngCore, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'A' + rng.random_range(0..26_u8)))
        .collect()
}

pub(crate) fn pick_str(rng: &mut dyn RngCore, values: &[&str]) -> String {
    values
        .choose(rng)
        .map(|value| value.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn splits_case_styles() {
        assert_eq!(normalize_key("firstName"), "first name");
        assert_eq!(normalize_key("first_name"), "first name");
        assert_eq!(normalize_key("billing-address.postal-code"), "postal code");
        assert_eq!(normalize_key("userID"), "user id");
        assert_eq!(normalize_key("URLPath"), "url path");
        assert_eq!(normalize_key("ipv4Address"), "ipv4 address");
        assert_eq!(normalize_key("OrderItem"), "order item");
    }

    #[test]
    fn every_table_pattern_compiles() {
        assert_eq!(generic::MATCHERS.len(), generic::TABLE.len());
        assert_eq!(entity::MATCHERS.len(), entity::TABLE.len());
        assert!(SECRET.is_some());
    }

    #[test]
    fn secret_names_are_detected() {
        assert!(is_secret("password"));
        assert!(is_secret("password hash"));
        assert!(is_secret("digest"));
        assert!(!is_secret("passenger"));
    }

    #[test]
    fn random_tokens_stay_in_their_alphabets() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let token = alphanumeric(&mut rng, 64);
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|ch| ch.is_ascii_alphanumeric()));
        assert!(digits(&mut rng, 12).chars().all(|ch| ch.is_ascii_digit()));
        assert!(upper_alpha(&mut rng, 12).chars().all(|ch| ch.is_ascii_uppercase()));
        assert!(alphanumeric(&mut rng, 0).is_empty());
    }
}
