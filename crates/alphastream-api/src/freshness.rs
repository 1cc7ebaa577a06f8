//! Freshness oracle for the persisted dataset
//!
//! Pure timestamp arithmetic; the only trigger condition for bulk refresh
//! lives here. Dataset freshness is a single global scalar derived from
//! `MAX(last_updated)` across all rows — deliberately not per ticker, so
//! that a freshness check stays O(1) regardless of universe size and a
//! partial refresh still advances the signal for every reader.
//!
//! The aggregate is recomputed from the store on every check rather than
//! cached; at a few hundred rows the query cost is negligible.

use chrono::{DateTime, Utc};

/// Age of the dataset in minutes, or `None` when it has never been
/// populated (no rows, hence no timestamp).
pub fn dataset_age_minutes(
    max_last_updated: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<f64> {
    max_last_updated.map(|ts| (now - ts).num_milliseconds() as f64 / 60_000.0)
}

/// Whether the dataset is due for a bulk refresh. An absent age means the
/// store was never populated, which must count as stale (bootstrap case).
pub fn needs_refresh(age_minutes: Option<f64>, max_age_minutes: f64) -> bool {
    match age_minutes {
        None => true,
        Some(age) => age > max_age_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_empty_dataset_has_no_age() {
        assert_eq!(dataset_age_minutes(None, Utc::now()), None);
    }

    #[test]
    fn test_age_in_minutes() {
        let now = Utc::now();
        let age = dataset_age_minutes(Some(now - Duration::minutes(20)), now).unwrap();
        assert!((age - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_empty_dataset_needs_refresh() {
        assert!(needs_refresh(None, 15.0));
    }

    #[test]
    fn test_old_dataset_needs_refresh() {
        let now = Utc::now();
        let age = dataset_age_minutes(Some(now - Duration::minutes(20)), now);
        assert!(needs_refresh(age, 15.0));
    }

    #[test]
    fn test_recent_dataset_does_not_need_refresh() {
        let now = Utc::now();
        let age = dataset_age_minutes(Some(now - Duration::minutes(5)), now);
        assert!(!needs_refresh(age, 15.0));
    }

    #[test]
    fn test_age_exactly_at_threshold_is_fresh() {
        assert!(!needs_refresh(Some(15.0), 15.0));
        assert!(needs_refresh(Some(15.001), 15.0));
    }
}
