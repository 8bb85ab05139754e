//! True Range.

use candela_types::Bar;

/// True Range of `bar` given the previous bar's close.
///
/// With no predecessor this is the bar's own range.
#[must_use]
pub fn true_range(bar: &Bar, prev_close: Option<f64>) -> f64 {
    let range = bar.high - bar.low;
    match prev_close {
        Some(prev) => range
            .max((bar.high - prev).abs())
            .max((bar.low - prev).abs()),
        None => range,
    }
}

/// True Range of every bar in order.
#[must_use]
pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    let mut prev_close = None;
    bars.iter()
        .map(|bar| {
            let tr = true_range(bar, prev_close);
            prev_close = Some(bar.close);
            tr
        })
        .collect()
}
