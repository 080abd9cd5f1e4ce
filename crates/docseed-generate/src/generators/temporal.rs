use chrono::{DateTime, Duration, Utc};
use docseed_core::TimestampFacets;
use rand::{Rng, RngCore};

use crate::matchers::{normalize_key, timestamp_window};

/// Instant for the timestamp field at `path`.
///
/// Declared bounds win; a missing lower bound is the epoch and a missing
/// upper bound is now (or a year past the lower bound when that lies ahead).
/// Without bounds the field name picks a window, else epoch to now.
pub fn timestamp(
    path: &str,
    facets: &TimestampFacets,
    now: DateTime<Utc>,
    rng: &mut dyn RngCore,
) -> DateTime<Utc> {
    let (min, max) = match (facets.min, facets.max) {
        (None, None) => timestamp_window(&normalize_key(path), now)
            .unwrap_or((DateTime::<Utc>::UNIX_EPOCH, now)),
        (Some(min), None) if min > now => (min, min + Duration::days(365)),
        (min, max) => (
            min.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            max.unwrap_or(now),
        ),
    };
    between(min, max, rng)
}

/// Uniform instant in `[min, max]` at millisecond resolution.
pub fn between(min: DateTime<Utc>, max: DateTime<Utc>, rng: &mut dyn RngCore) -> DateTime<Utc> {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    let (low_ms, high_ms) = (low.timestamp_millis(), high.timestamp_millis());
    if low_ms >= high_ms {
        return low;
    }
    let offset = rng.random_range(0..=high_ms - low_ms);
    low + Duration::milliseconds(offset)
}
