//! Per-frame shaping of numeric histories.
//!
//! Both functions are pure: they read ring buffer snapshots and produce a
//! fresh derived series that is thrown away after the frame is drawn.

use std::borrow::Cow;

/// Compress `series` to at most `target` samples, keeping peaks.
///
/// Series that already fit are returned as-is. Longer ones are split into
/// exactly `target` contiguous buckets with fractional boundaries and each
/// bucket contributes its maximum, so short spikes survive and the newest
/// sample always lands in the last bucket.
#[must_use]
pub fn fit_to_width(series: &[f64], target: usize) -> Cow<'_, [f64]> {
    if series.len() <= target {
        return Cow::Borrowed(series);
    }
    if target == 0 {
        return Cow::Owned(Vec::new());
    }

    let len = series.len();
    let ratio = len as f64 / target as f64;
    let mut out = Vec::with_capacity(target);
    for i in 0..target {
        let lo = ((i as f64 * ratio) as usize).min(len - 1);
        let hi = if i + 1 == target {
            len
        } else {
            (((i + 1) as f64 * ratio) as usize).clamp(lo + 1, len)
        };
        let peak = series[lo..hi]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        out.push(peak);
    }
    Cow::Owned(out)
}

/// Sum several histories aligned on their most recent sample.
///
/// The result is as long as the longest input. Index `len - 1` sums every
/// series' newest sample; shorter series contribute nothing at offsets they
/// do not reach. All-empty input gives an empty result, which callers should
/// treat as "no data yet" rather than as zero.
#[must_use]
pub fn aggregate_history<I, S>(series: I) -> Vec<f64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[f64]>,
{
    let mut total: Vec<f64> = Vec::new();
    for s in series {
        let s = s.as_ref();
        if s.len() > total.len() {
            let mut grown = vec![0.0; s.len() - total.len()];
            grown.extend_from_slice(&total);
            total = grown;
        }
        let offset = total.len() - s.len();
        for (slot, value) in total[offset..].iter_mut().zip(s) {
            *slot += value;
        }
    }
    total
}
