//! Sequence checks run before aggregation: ordering, duplicates and gaps.

pub use candela_types::check_order;
use candela_types::{Bar, Granularity, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How bars that share a timestamp are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep every bar; the aggregator folds them in arrival order.
    #[default]
    KeepAll,
    /// Keep the first bar seen for each timestamp.
    KeepFirst,
    /// Keep the last bar seen for each timestamp.
    KeepLast,
}

/// What to do when timestamps decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicy {
    /// Fail with [`UnsortedInput`](candela_types::CandelaError::UnsortedInput).
    #[default]
    Strict,
    /// Stable-sort by timestamp; bars sharing a timestamp keep input order.
    Sort,
}

/// A run of empty buckets between two consecutive bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    /// Bucket of the bar before the gap.
    pub after: DateTime<Utc>,
    /// Bucket of the bar after the gap.
    pub before: DateTime<Utc>,
    /// Number of buckets with no bar.
    pub missing: u64,
}

/// Applies `policy` to `bars` in place.
///
/// Returns `true` if the bars had to be reordered.
///
/// # Errors
///
/// Returns [`UnsortedInput`](candela_types::CandelaError::UnsortedInput) under
/// [`OrderPolicy::Strict`] if
/// any bar is earlier than its predecessor.
pub fn enforce_order(bars: &mut [Bar], policy: OrderPolicy) -> Result<bool> {
    match (check_order(bars), policy) {
        (Ok(()), _) => Ok(false),
        (Err(err), OrderPolicy::Strict) => Err(err),
        (Err(_), OrderPolicy::Sort) => {
            tracing::warn!(bars = bars.len(), "input out of order, sorting by timestamp");
            bars.sort_by_key(|b| b.timestamp);
            Ok(true)
        }
    }
}

/// Drops bars whose timestamp equals the preceding bar's.
///
/// Expects sorted input; only adjacent duplicates are detected. Returns the
/// surviving bars and how many were dropped.
#[must_use]
pub fn dedup(bars: &[Bar], policy: DuplicatePolicy) -> (Vec<Bar>, usize) {
    if policy == DuplicatePolicy::KeepAll {
        return (bars.to_vec(), 0);
    }

    let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
    let mut dropped = 0;

    for bar in bars {
        match out.last_mut() {
            Some(last) if last.timestamp == bar.timestamp => {
                dropped += 1;
                if policy == DuplicatePolicy::KeepLast {
                    *last = *bar;
                }
            }
            _ => out.push(*bar),
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, ?policy, "removed duplicate timestamps");
    }

    (out, dropped)
}

/// Lists runs of empty `granularity` buckets between consecutive bars.
///
/// Nothing is filled in; the caller decides what a gap means (weekend,
/// holiday, feed outage).
#[must_use]
pub fn find_gaps(bars: &[Bar], granularity: Granularity) -> Vec<Gap> {
    let width = granularity.seconds();

    let gaps: Vec<Gap> = bars
        .windows(2)
        .filter_map(|pair| {
            let after = granularity.bucket_key(pair[0].timestamp);
            let before = granularity.bucket_key(pair[1].timestamp);
            let steps = (before - after) / width;
            (steps > 1).then(|| Gap {
                after: granularity.bucket_start(pair[0].timestamp),
                before: granularity.bucket_start(pair[1].timestamp),
                missing: (steps - 1).unsigned_abs(),
            })
        })
        .collect();

    if !gaps.is_empty() {
        tracing::debug!(
            %granularity,
            gaps = gaps.len(),
            missing = gaps.iter().map(|g| g.missing).sum::<u64>(),
            "found empty buckets"
        );
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use candela_types::CandelaError;

    fn bar_at(secs: i64, close: f64) -> Bar {
        Bar::from_epoch(secs, close, close, close, close, 1.0).unwrap()
    }

    #[test]
    fn test_check_order() {
        let sorted = vec![bar_at(0, 1.0), bar_at(0, 2.0), bar_at(60, 3.0)];
        assert!(check_order(&sorted).is_ok());
        assert!(check_order(&[]).is_ok());

        let unsorted = vec![bar_at(0, 1.0), bar_at(120, 2.0), bar_at(60, 3.0)];
        match check_order(&unsorted).unwrap_err() {
            CandelaError::UnsortedInput { index, .. } => assert_eq!(index, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_enforce_order() {
        let mut bars = vec![bar_at(120, 1.0), bar_at(60, 2.0), bar_at(60, 3.0)];
        assert!(enforce_order(&mut bars, OrderPolicy::Strict).is_err());

        assert!(enforce_order(&mut bars, OrderPolicy::Sort).unwrap());
        let times: Vec<_> = bars.iter().map(Bar::epoch_seconds).collect();
        assert_eq!(times, vec![60, 60, 120]);
        assert_relative_eq!(bars[0].close, 2.0);
        assert_relative_eq!(bars[1].close, 3.0);

        assert!(!enforce_order(&mut bars, OrderPolicy::Strict).unwrap());
    }

    #[test]
    fn test_dedup_keep_first() {
        let bars = vec![bar_at(0, 1.0), bar_at(0, 2.0), bar_at(60, 3.0), bar_at(60, 4.0)];
        let (out, dropped) = dedup(&bars, DuplicatePolicy::KeepFirst);
        assert_eq!(dropped, 2);
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[0].close, 1.0);
        assert_relative_eq!(out[1].close, 3.0);
    }

    #[test]
    fn test_dedup_keep_last() {
        let bars = vec![bar_at(0, 1.0), bar_at(0, 2.0), bar_at(60, 3.0)];
        let (out, dropped) = dedup(&bars, DuplicatePolicy::KeepLast);
        assert_eq!(dropped, 1);
        assert_relative_eq!(out[0].close, 2.0);
    }

    #[test]
    fn test_dedup_keep_all() {
        let bars = vec![bar_at(0, 1.0), bar_at(0, 2.0)];
        let (out, dropped) = dedup(&bars, DuplicatePolicy::KeepAll);
        assert_eq!(dropped, 0);
        assert_eq!(out, bars);
    }

    #[test]
    fn test_find_gaps() {
        let bars = vec![
            bar_at(0, 1.0),
            bar_at(1800, 1.0),
            bar_at(3600, 1.0),
            bar_at(4 * 3600 + 59, 1.0),
        ];
        let gaps = find_gaps(&bars, Granularity::Hourly);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].missing, 2);
        assert_eq!(gaps[0].after.timestamp(), 3600);
        assert_eq!(gaps[0].before.timestamp(), 4 * 3600);
    }

    #[test]
    fn test_no_gaps_in_contiguous_minutes() {
        let bars: Vec<_> = (0..120).map(|i| bar_at(i * 60, 1.0)).collect();
        assert!(find_gaps(&bars, Granularity::Minute).is_empty());
        assert!(find_gaps(&bars, Granularity::Hourly).is_empty());
    }

    #[test]
    fn test_duplicate_policy_serde() {
        let policy: DuplicatePolicy = serde_json::from_str("\"keep-last\"").unwrap();
        assert_eq!(policy, DuplicatePolicy::KeepLast);
    }
}
