//! Ceiling selection for graphs.
//!
//! Auto-scaled graphs snap to a "nice" round ceiling with some headroom so
//! the line does not hug the top edge. Graphs of a resource with a known hard
//! limit (a CPU quota, a memory cap) use the limit itself, so proximity to the
//! cap stays visible.

use serde::{Deserialize, Serialize};

/// Candidate ceilings per decade, scaled by `10^(floor(log10(max)) - 1)`.
const LADDER: [f64; 8] = [1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 75.0, 100.0];

/// Observed maxima above this fraction of the chosen ceiling bump it one step.
const HEADROOM: f64 = 0.9;

/// How the value mapped to a graph's top edge is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum ScalePolicy {
    /// Smallest nice ceiling above the observed maximum, with headroom.
    #[default]
    Auto,
    /// Fixed ceiling at a configured resource limit.
    Limit(f64),
}

impl ScalePolicy {
    /// Policy for an optional resource limit; missing or non-positive limits
    /// fall back to auto scaling.
    #[must_use]
    pub fn for_limit(limit: Option<f64>) -> Self {
        match limit {
            Some(l) if l > 0.0 && l.is_finite() => Self::Limit(l),
            _ => Self::Auto,
        }
    }

    /// Ceiling for a series whose largest sample is `observed_max`.
    #[must_use]
    pub fn ceiling(self, observed_max: f64) -> f64 {
        match self {
            Self::Limit(limit) if limit > 0.0 && limit.is_finite() => limit,
            _ => nice_ceiling(observed_max),
        }
    }

    /// Ceiling for `series`, using its maximum.
    #[must_use]
    pub fn ceiling_for(self, series: &[f64]) -> f64 {
        let max = series
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max);
        self.ceiling(max)
    }
}

/// Smallest ladder value ≥ `max`, bumped one step when `max` exceeds 90% of it.
#[must_use]
pub fn nice_ceiling(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let exponent = max.log10().floor() as i32 - 1;
    let candidates = LADDER
        .iter()
        .map(|step| scaled(*step, exponent))
        .chain(LADDER.iter().map(|step| scaled(*step, exponent + 1)));

    let mut chosen: Option<f64> = None;
    for candidate in candidates {
        match chosen {
            None if candidate >= max => {
                if max <= candidate * HEADROOM {
                    return candidate;
                }
                chosen = Some(candidate);
            }
            Some(c) if candidate > c => return candidate,
            _ => {}
        }
    }
    chosen.unwrap_or(max)
}

/// `step * 10^exponent`, dividing for negative exponents to keep decimal
/// ceilings such as 7.5 exact.
fn scaled(step: f64, exponent: i32) -> f64 {
    if exponent >= 0 {
        step * 10f64.powi(exponent)
    } else {
        step / 10f64.powi(-exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_nice_ceiling_non_positive() {
        assert_eq!(nice_ceiling(0.0), 1.0);
        assert_eq!(nice_ceiling(-3.0), 1.0);
        assert_eq!(nice_ceiling(f64::NAN), 1.0);
    }

    #[test]
    fn test_nice_ceiling_percentages() {
        assert_eq!(nice_ceiling(37.0), 50.0);
        assert_eq!(nice_ceiling(60.0), 75.0);
        assert_eq!(nice_ceiling(20.0), 25.0);
    }

    #[test]
    fn test_nice_ceiling_headroom_bump() {
        // 48 is above 90% of 50.
        assert_eq!(nice_ceiling(48.0), 75.0);
        // 95 is above 90% of 100; the next ladder step is 250.
        assert_eq!(nice_ceiling(95.0), 250.0);
        assert_eq!(nice_ceiling(100.0), 250.0);
    }

    #[test]
    fn test_nice_ceiling_small_values() {
        assert_eq!(nice_ceiling(3.0), 5.0);
        assert_eq!(nice_ceiling(7.0), 10.0);
        assert_eq!(nice_ceiling(0.3), 0.5);
    }

    #[test]
    fn test_nice_ceiling_bytes() {
        assert_eq!(nice_ceiling(300_000_000.0), 500_000_000.0);
    }

    #[test]
    fn test_limit_policy_no_headroom() {
        let policy = ScalePolicy::for_limit(Some(200.0));
        assert_eq!(policy, ScalePolicy::Limit(200.0));
        assert_eq!(policy.ceiling(199.0), 200.0);
        assert_eq!(policy.ceiling(350.0), 200.0);
    }

    #[test]
    fn test_limit_policy_invalid_falls_back() {
        assert_eq!(ScalePolicy::for_limit(Some(0.0)), ScalePolicy::Auto);
        assert_eq!(ScalePolicy::for_limit(None), ScalePolicy::Auto);
        assert_eq!(ScalePolicy::Limit(-1.0).ceiling(37.0), 50.0);
    }

    #[test]
    fn test_ceiling_for_series() {
        assert_eq!(ScalePolicy::Auto.ceiling_for(&[1.0, 37.0, f64::NAN]), 50.0);
        assert_eq!(ScalePolicy::Auto.ceiling_for(&[]), 1.0);
    }

    proptest! {
        #[test]
        fn prop_auto_ceiling_covers_max(max in 0.001f64..1e12) {
            let ceiling = nice_ceiling(max);
            prop_assert!(ceiling >= max);
            prop_assert!(ceiling < max * 3.0);
        }
    }
}
