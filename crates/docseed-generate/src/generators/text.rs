use docseed_core::TextFacets;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use rand_regex::Regex as RandRegex;
use sha2::{Digest, Sha256};
use tracing::warn;

use super::lorem;
use crate::matchers::{entity_text, generic_text, is_secret, normalize_key};

const DEFAULT_MIN_LENGTH: usize = 1;
const DEFAULT_MAX_LENGTH: usize = 255;
const PATTERN_MAX_REPEAT: u32 = 16;

/// Text value for the field at `path` on `entity`, honouring `facets`.
pub fn text(path: &str, entity: &str, facets: &TextFacets, rng: &mut dyn RngCore) -> String {
    let value = raw_text(path, entity, facets, rng);
    fold_case(value, facets)
}

fn raw_text(path: &str, entity: &str, facets: &TextFacets, rng: &mut dyn RngCore) -> String {
    let key = normalize_key(path);
    if is_secret(&key) {
        return secret_digest(facets, rng);
    }
    if let Some(choice) = facets.enumeration.choose(rng) {
        return choice.clone();
    }
    if let Some(pattern) = facets.pattern.as_deref()
        && let Some(value) = from_pattern(path, pattern, rng)
    {
        return value;
    }

    let candidate =
        entity_text(&normalize_key(entity), &key, rng).or_else(|| generic_text(&key, rng));
    if let Some(candidate) = candidate
        && fits(&candidate, facets)
    {
        return candidate;
    }

    let min = facets.minlength.unwrap_or(DEFAULT_MIN_LENGTH);
    let max = facets.maxlength.unwrap_or(DEFAULT_MAX_LENGTH.max(min));
    lorem(rng, min, max)
}

fn fits(value: &str, facets: &TextFacets) -> bool {
    let len = value.chars().count();
    facets.minlength.is_none_or(|min| len >= min) && facets.maxlength.is_none_or(|max| len <= max)
}

fn from_pattern(path: &str, pattern: &str, rng: &mut dyn RngCore) -> Option<String> {
    match RandRegex::compile(strip_anchors(pattern), PATTERN_MAX_REPEAT) {
        Ok(regex) => Some(rng.sample(regex)),
        Err(err) => {
            warn!(path, pattern, error = %err, "unusable match pattern, using heuristics");
            None
        }
    }
}

fn strip_anchors(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix('^').unwrap_or(pattern);
    match pattern.strip_suffix('$') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => pattern,
    }
}

fn secret_digest(facets: &TextFacets, rng: &mut dyn RngCore) -> String {
    let mut secret = [0_u8; 32];
    rng.fill_bytes(&mut secret);
    let mut digest = hex::encode(Sha256::digest(secret));

    if let Some(min) = facets.minlength {
        while digest.len() < min {
            let next = hex::encode(Sha256::digest(digest.as_bytes()));
            digest.push_str(&next);
        }
    }
    if let Some(max) = facets.maxlength {
        digest.truncate(max);
    }
    digest
}

fn fold_case(value: String, facets: &TextFacets) -> String {
    let value = if facets.trim {
        value.trim().to_string()
    } else {
        value
    };
    if facets.lowercase {
        value.to_lowercase()
    } else if facets.uppercase {
        value.to_uppercase()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_are_stripped_once() {
        assert_eq!(strip_anchors("^[a-z]{3}$"), "[a-z]{3}");
        assert_eq!(strip_anchors(r"cost\$"), r"cost\$");
        assert_eq!(strip_anchors("plain"), "plain");
    }
}
