use docseed_core::{FieldValue, Kind, NumberFacets};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::matchers::{number_hint, normalize_key};

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
const ENUM_PRECISION: u32 = 6;
/// Largest magnitude `Decimal` can hold, rounded down to stay representable.
const DECIMAL_LIMIT: f64 = 7.9e28;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Domain {
    min: f64,
    max: f64,
    decimals: u32,
}

impl Domain {
    fn of(kind: Kind) -> Self {
        let (min, max, decimals) = match kind {
            Kind::Float => (1.0, 1_000_000.0, 2),
            Kind::Decimal => (0.0, 1_000_000.0, 2),
            Kind::Int32 => (i32::MIN as f64, i32::MAX as f64, 0),
            _ => (-MAX_SAFE_INTEGER, MAX_SAFE_INTEGER, 0),
        };
        Self { min, max, decimals }
    }

    fn limited_to(self, limit: f64) -> Self {
        Self {
            min: self.min.clamp(-limit, limit),
            max: self.max.clamp(-limit, limit),
            ..self
        }
    }
}

/// Numeric value of `kind` for the field at `path`.
///
/// Rules in order: enumeration, declared bounds, name hint, kind default.
pub fn number(path: &str, kind: Kind, facets: &NumberFacets, rng: &mut dyn RngCore) -> FieldValue {
    if let Some(choice) = facets.enumeration.choose(rng) {
        let decimals = if choice.fract() == 0.0 { 0 } else { ENUM_PRECISION };
        return render(kind, *choice, decimals);
    }

    let domain = domain(path, kind, facets);
    let sampled = sample(&domain, rng);
    let value = round_to(sampled, domain.decimals).clamp(domain.min, domain.max);
    render(kind, value, domain.decimals)
}

/// Uniform draw from `[min, max]`; spans wider than `f64::MAX` interpolate
/// between the ends instead of measuring the width.
fn sample(domain: &Domain, rng: &mut dyn RngCore) -> f64 {
    if domain.min >= domain.max {
        return domain.min;
    }
    if (domain.max - domain.min).is_finite() {
        return rng.random_range(domain.min..=domain.max);
    }
    let t: f64 = rng.random();
    (domain.min * (1.0 - t) + domain.max * t).clamp(domain.min, domain.max)
}

fn domain(path: &str, kind: Kind, facets: &NumberFacets) -> Domain {
    let domain = unlimited_domain(path, kind, facets);
    match kind {
        Kind::Decimal => domain.limited_to(DECIMAL_LIMIT),
        _ => domain,
    }
}

fn unlimited_domain(path: &str, kind: Kind, facets: &NumberFacets) -> Domain {
    let base = Domain::of(kind);
    let whole = matches!(kind, Kind::Int32 | Kind::BigInt);

    if facets.min.is_some() || facets.max.is_some() {
        let (min, max) = declared_bounds(facets, &base);
        let whole_range = min.ceil() <= max.floor();
        let decimals = match kind {
            Kind::Integer | Kind::Int32 | Kind::BigInt if whole_range => 0,
            Kind::Integer => 2,
            _ => base.decimals,
        };
        if decimals == 0 && whole_range {
            return Domain {
                min: min.ceil(),
                max: max.floor(),
                decimals,
            };
        }
        return Domain { min, max, decimals };
    }

    match number_hint(&normalize_key(path)) {
        Some(hint) => Domain {
            min: hint.min,
            max: hint.max,
            decimals: if whole { 0 } else { hint.decimals },
        },
        None => base,
    }
}

fn declared_bounds(facets: &NumberFacets, base: &Domain) -> (f64, f64) {
    match (facets.min, facets.max) {
        (Some(min), Some(max)) if min > max => (max, min),
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, base.max.max(min)),
        (None, Some(max)) => (base.min.min(max), max),
        (None, None) => (base.min, base.max),
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    if decimals == 0 {
        return value.round();
    }
    let scaled = value * 10_f64.powi(decimals as i32);
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 10_f64.powi(decimals as i32)
}

fn render(kind: Kind, value: f64, decimals: u32) -> FieldValue {
    match kind {
        Kind::Integer if decimals == 0 => FieldValue::Int(value as i64),
        Kind::Int32 => FieldValue::Int32(value.round() as i32),
        Kind::BigInt => FieldValue::Long(value.round() as i64),
        Kind::Decimal => FieldValue::Decimal(
            Decimal::from_f64(value)
                .map(|decimal| decimal.round_dp(decimals))
                .unwrap_or(if value.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                }),
        ),
        _ => FieldValue::Float(value),
    }
}
