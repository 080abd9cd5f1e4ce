use std::sync::LazyLock;

use chrono::{DateTime, Duration, Months, Utc};
use regex::Regex;

use super::compile;

#[derive(Clone, Copy)]
enum Window {
    Birth,
    Expiry,
    Removed,
    Upcoming,
    Past,
}

const TABLE: &[(&str, Window)] = &[
    (r"\b(birth|born|dob)", Window::Birth),
    (r"\b(expir\w*|ends?|until|due)\b", Window::Expiry),
    (r"\b(deleted|removed|archived)\b", Window::Removed),
    (r"\b(future|scheduled|upcoming|starts?)\b", Window::Upcoming),
    (r"\b(past|previous|last)\b", Window::Past),
];

static MATCHERS: LazyLock<Vec<(Regex, Window)>> = LazyLock::new(|| {
    TABLE
        .iter()
        .filter_map(|(pattern, window)| compile(pattern).map(|regex| (regex, *window)))
        .collect()
});

/// Sampling window for a timestamp field named `key`, relative to `now`.
pub fn timestamp_window(key: &str, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (_, window) = MATCHERS.iter().find(|(regex, _)| regex.is_match(key))?;
    let range = match window {
        Window::Birth => (years_before(now, 90), years_before(now, 18)),
        Window::Expiry => (now, now + Duration::days(365)),
        Window::Removed => (now - Duration::days(14), now),
        Window::Upcoming => (now, now + Duration::days(30)),
        Window::Past => (years_before(now, 2), now),
    };
    Some(range)
}

fn years_before(now: DateTime<Utc>, years: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(years * 12))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn birth_dates_describe_adults() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let (min, max) = timestamp_window("birth date", now).expect("birth window");
        assert_eq!(min, Utc.with_ymd_and_hms(1934, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(max, Utc.with_ymd_and_hms(2006, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn expiry_lies_ahead() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let (min, max) = timestamp_window("expires at", now).expect("expiry window");
        assert_eq!(min, now);
        assert!(max > now);
        assert!(timestamp_window("created at", now).is_none());
    }
}
