//! Threshold policies deciding which correlations become edges.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::error::GraphError;

/// Which side(s) of zero a threshold accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Positive correlations only: `[pos_min, 1]`.
    Single,
    /// Both signs: `[-1, -pos_min] ∪ [pos_min, 1]`.
    #[default]
    Dual,
}

impl FromStr for ThresholdMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "dual" => Ok(Self::Dual),
            _ => Err(format!("unknown threshold mode `{s}`, expected `single` or `dual`")),
        }
    }
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Dual => f.write_str("dual"),
        }
    }
}

/// The correlation interval(s) an edge weight must fall in.
///
/// Both bounds are inclusive. `NaN` is never accepted.
///
/// # Examples
///
/// ```
/// # use strata::graph::ThresholdPolicy;
///
/// let dual = ThresholdPolicy::dual(0.175).unwrap();
/// assert!(dual.accepts(0.175));
/// assert!(dual.accepts(-0.3));
/// assert!(!dual.accepts(0.1749));
///
/// let single = ThresholdPolicy::single(0.175).unwrap();
/// assert!(!single.accepts(-0.3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    mode: ThresholdMode,
    pos_min: f64,
}

impl ThresholdPolicy {
    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidThreshold`] unless `0 < pos_min <= 1`.
    pub fn new(mode: ThresholdMode, pos_min: f64) -> Result<Self, GraphError> {
        if !(pos_min > 0.0 && pos_min <= 1.0) {
            return Err(GraphError::InvalidThreshold(pos_min));
        }
        Ok(Self { mode, pos_min })
    }

    pub fn single(pos_min: f64) -> Result<Self, GraphError> {
        Self::new(ThresholdMode::Single, pos_min)
    }

    pub fn dual(pos_min: f64) -> Result<Self, GraphError> {
        Self::new(ThresholdMode::Dual, pos_min)
    }

    pub fn mode(&self) -> ThresholdMode {
        self.mode
    }

    pub fn pos_min(&self) -> f64 {
        self.pos_min
    }

    /// Returns whether a correlation of `weight` passes.
    pub fn accepts(&self, weight: f64) -> bool {
        let positive = (self.pos_min..=1.0).contains(&weight);
        match self.mode {
            ThresholdMode::Single => positive,
            ThresholdMode::Dual => positive || (-1.0..=-self.pos_min).contains(&weight),
        }
    }
}

impl fmt::Display for ThresholdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mode, self.pos_min)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        let dual = ThresholdPolicy::dual(0.175).unwrap();
        let single = ThresholdPolicy::single(0.175).unwrap();

        for policy in [dual, single] {
            assert!(policy.accepts(0.175));
            assert!(policy.accepts(1.0));
            assert!(!policy.accepts(0.1749));
            assert!(!policy.accepts(1.0001));
        }

        assert!(dual.accepts(-0.175));
        assert!(dual.accepts(-1.0));
        assert!(!dual.accepts(-0.1749));
        assert!(!single.accepts(-0.175));
    }

    #[test]
    fn test_nan_is_never_accepted() {
        assert!(!ThresholdPolicy::dual(0.2).unwrap().accepts(f64::NAN));
        assert!(!ThresholdPolicy::single(0.2).unwrap().accepts(f64::NAN));
    }

    #[test]
    fn test_invalid_thresholds() {
        for value in [0.0, -0.2, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ThresholdPolicy::dual(value),
                Err(GraphError::InvalidThreshold(_))
            ));
        }
        assert!(ThresholdPolicy::single(1.0).is_ok());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Dual".parse::<ThresholdMode>().unwrap(), ThresholdMode::Dual);
        assert_eq!(
            "single".parse::<ThresholdMode>().unwrap(),
            ThresholdMode::Single
        );
        assert!("both".parse::<ThresholdMode>().is_err());
    }

    proptest! {
        #[test]
        fn prop_dual_is_symmetric(pos_min in 0.001f64..=1.0, weight in -1.0f64..=1.0) {
            let dual = ThresholdPolicy::dual(pos_min).unwrap();
            prop_assert_eq!(dual.accepts(weight), dual.accepts(-weight));
        }

        #[test]
        fn prop_single_accepts_subset_of_dual(pos_min in 0.001f64..=1.0, weight in -1.0f64..=1.0) {
            let single = ThresholdPolicy::single(pos_min).unwrap();
            let dual = ThresholdPolicy::dual(pos_min).unwrap();
            prop_assert!(!single.accepts(weight) || dual.accepts(weight));
        }
    }
}
