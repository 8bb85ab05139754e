//! Copying coarse ATR values down onto the fine bars they were built from.

use candela_types::{Bar, Granularity};
use serde::{Deserialize, Serialize};

use crate::{EnrichedBar, true_ranges};

/// Which coarse bucket a fine bar takes its ATR from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// The bucket containing the fine bar. Its ATR already includes bars
    /// later than the fine bar.
    #[default]
    Containing,
    /// The last coarse bucket strictly before the containing one.
    Previous,
}

/// Looks up a coarse ATR for each fine bar.
///
/// `coarse` must be sorted by timestamp. A fine bar with no matching coarse
/// bucket, or whose bucket is still warming up, gets `None`.
#[must_use]
pub fn project_atr(
    fine: &[Bar],
    coarse: &[EnrichedBar],
    granularity: Granularity,
    projection: Projection,
) -> Vec<Option<f64>> {
    let keys: Vec<i64> = coarse
        .iter()
        .map(|c| granularity.bucket_key(c.bar.timestamp))
        .collect();

    fine.iter()
        .map(|bar| {
            let key = granularity.bucket_key(bar.timestamp);
            let idx = keys.partition_point(|&k| k < key);
            match projection {
                Projection::Containing => keys
                    .get(idx)
                    .filter(|&&k| k == key)
                    .and_then(|_| coarse[idx].atr),
                Projection::Previous => idx.checked_sub(1).and_then(|i| coarse[i].atr),
            }
        })
        .collect()
}

/// Enriches fine bars with their own True Range and a projected coarse ATR.
#[must_use]
pub fn project_onto(
    fine: &[Bar],
    coarse: &[EnrichedBar],
    granularity: Granularity,
    projection: Projection,
) -> Vec<EnrichedBar> {
    let atrs = project_atr(fine, coarse, granularity, projection);
    let missing = atrs.iter().filter(|a| a.is_none()).count();
    tracing::debug!(
        fine = fine.len(),
        coarse = coarse.len(),
        missing,
        ?projection,
        "projected ATR onto fine bars"
    );

    fine.iter()
        .zip(true_ranges(fine))
        .zip(atrs)
        .map(|((bar, tr), atr)| EnrichedBar::new(*bar, tr, atr))
        .collect()
}
