//! Severity tiers for data colouring.

/// How close a value is to its graph ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SeverityTier {
    #[default]
    Normal,
    Elevated,
    Critical,
}

/// Fractions of the ceiling above which a value changes tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityThresholds {
    pub elevated: f64,
    pub critical: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            elevated: 0.5,
            critical: 0.8,
        }
    }
}

impl SeverityThresholds {
    #[must_use]
    pub fn new(elevated: f64, critical: f64) -> Self {
        Self { elevated, critical }
    }

    /// Tier of `fraction` (value / ceiling). Boundaries belong to the lower
    /// tier; non-finite fractions are `Normal`.
    #[must_use]
    pub fn classify(&self, fraction: f64) -> SeverityTier {
        if !fraction.is_finite() {
            SeverityTier::Normal
        } else if fraction > self.critical {
            SeverityTier::Critical
        } else if fraction > self.elevated {
            SeverityTier::Elevated
        } else {
            SeverityTier::Normal
        }
    }

    /// Tier of `value` against `ceiling`.
    #[must_use]
    pub fn classify_value(&self, value: f64, ceiling: f64) -> SeverityTier {
        if ceiling > 0.0 {
            self.classify(value / ceiling)
        } else {
            SeverityTier::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_default_thresholds() {
        let t = SeverityThresholds::default();
        assert_eq!(t.classify(0.1), SeverityTier::Normal);
        assert_eq!(t.classify(0.6), SeverityTier::Elevated);
        assert_eq!(t.classify(0.95), SeverityTier::Critical);
    }

    #[test]
    fn test_classify_boundaries_are_exclusive() {
        let t = SeverityThresholds::default();
        assert_eq!(t.classify(0.5), SeverityTier::Normal);
        assert_eq!(t.classify(0.8), SeverityTier::Elevated);
    }

    #[test]
    fn test_classify_non_finite() {
        let t = SeverityThresholds::default();
        assert_eq!(t.classify(f64::NAN), SeverityTier::Normal);
        assert_eq!(t.classify(f64::INFINITY), SeverityTier::Normal);
    }

    #[test]
    fn test_classify_value() {
        let t = SeverityThresholds::new(0.25, 0.75);
        assert_eq!(t.classify_value(30.0, 100.0), SeverityTier::Elevated);
        assert_eq!(t.classify_value(80.0, 100.0), SeverityTier::Critical);
        assert_eq!(t.classify_value(80.0, 0.0), SeverityTier::Normal);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(SeverityTier::Normal < SeverityTier::Elevated);
        assert!(SeverityTier::Elevated < SeverityTier::Critical);
    }
}
