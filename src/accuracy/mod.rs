//! Comparison of posture metrics against reference poses.
//!
//! A metric passes when its absolute deviation from the reference target is
//! within the tolerance. An unavailable metric never passes and carries no
//! deviation.

/// Front-pose reference and comparator
pub mod front;

/// Side-pose reference and comparator
pub mod side;

pub use front::{FrontAccuracy, ReferencePose};
pub use side::{SideAccuracy, SideReferencePose};

use serde::{Deserialize, Serialize};

/// Target value and allowed deviation for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Reference value
    pub target: f64,
    /// Maximum absolute deviation that still passes
    pub tolerance: f64,
}

impl Target {
    /// Create a new target
    #[must_use]
    pub const fn new(target: f64, tolerance: f64) -> Self {
        Self { target, tolerance }
    }

    /// Compare a metric value against this target
    #[must_use]
    pub fn check(&self, value: Option<f64>) -> MetricCheck {
        match value {
            Some(v) => MetricCheck::within((v - self.target).abs(), self.tolerance),
            None => MetricCheck::unavailable(),
        }
    }
}

/// Outcome of comparing one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricCheck {
    /// Whether the deviation is within tolerance
    pub passed: bool,
    /// Absolute deviation from the target, `None` when the metric was unavailable
    pub deviation: Option<f64>,
}

impl MetricCheck {
    /// Check for a metric that could not be computed
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            passed: false,
            deviation: None,
        }
    }

    /// Check with a known deviation
    #[must_use]
    pub fn within(deviation: f64, tolerance: f64) -> Self {
        Self {
            passed: deviation <= tolerance,
            deviation: Some(deviation),
        }
    }

    /// Whether the metric failed and deviated by more than `threshold`.
    /// Unavailable metrics count as exceeding any threshold.
    #[must_use]
    pub fn failed_beyond(&self, threshold: f64) -> bool {
        !self.passed && self.deviation.map_or(true, |d| d > threshold)
    }
}

/// Common interface of the front and side comparison results
pub trait PoseAccuracy {
    /// Overall pass, including framing
    fn is_pose_accurate(&self) -> bool;

    /// Most important correction to speak, if any metric fails
    fn correction(&self, arm_raise_deviation: f64) -> Option<&'static str>;
}

/// Accuracy result of whichever stage is active
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageAccuracy {
    Front(FrontAccuracy),
    Side(SideAccuracy),
}

impl PoseAccuracy for StageAccuracy {
    fn is_pose_accurate(&self) -> bool {
        match self {
            StageAccuracy::Front(acc) => acc.is_pose_accurate(),
            StageAccuracy::Side(acc) => acc.is_pose_accurate(),
        }
    }

    fn correction(&self, arm_raise_deviation: f64) -> Option<&'static str> {
        match self {
            StageAccuracy::Front(acc) => acc.correction(arm_raise_deviation),
            StageAccuracy::Side(acc) => acc.correction(arm_raise_deviation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_value_passes_with_zero_tolerance() {
        let check = Target::new(45.0, 0.0).check(Some(45.0));
        assert!(check.passed);
        assert_eq!(check.deviation, Some(0.0));
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        assert!(Target::new(180.0, 20.0).check(Some(160.0)).passed);
        assert!(!Target::new(180.0, 20.0).check(Some(159.9)).passed);
    }

    #[test]
    fn test_unavailable_never_passes() {
        let check = Target::new(0.0, f64::MAX).check(None);
        assert!(!check.passed);
        assert!(check.deviation.is_none());
        assert!(check.failed_beyond(1e9));
    }
}
