use super::{MetricCheck, PoseAccuracy, Target};
use crate::metrics::PostureMetrics;
use serde::{Deserialize, Serialize};

/// Reference front pose: arms raised away from the body, legs apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencePose {
    pub shoulder_left: Target,
    pub shoulder_right: Target,
    pub elbow_left: Target,
    pub elbow_right: Target,
    /// Spine tilt is compared against zero directly
    pub spine_tolerance: f64,
    pub hip_left: Target,
    pub hip_right: Target,
    /// Vertical shoulder offset in pixels
    pub shoulder_level: Target,
    pub leg_separation: Target,
}

impl Default for ReferencePose {
    fn default() -> Self {
        Self {
            shoulder_left: Target::new(45.0, 15.0),
            shoulder_right: Target::new(45.0, 15.0),
            elbow_left: Target::new(180.0, 20.0),
            elbow_right: Target::new(180.0, 20.0),
            spine_tolerance: 10.0,
            hip_left: Target::new(180.0, 15.0),
            hip_right: Target::new(180.0, 15.0),
            shoulder_level: Target::new(0.0, 30.0),
            leg_separation: Target::new(45.0, 15.0),
        }
    }
}

impl ReferencePose {
    /// Metrics that sit exactly on every target
    #[must_use]
    pub fn ideal_metrics(&self) -> PostureMetrics {
        PostureMetrics {
            shoulder_left: Some(self.shoulder_left.target),
            shoulder_right: Some(self.shoulder_right.target),
            elbow_left: Some(self.elbow_left.target),
            elbow_right: Some(self.elbow_right.target),
            spine_tilt: Some(0.0),
            hip_left: Some(self.hip_left.target),
            hip_right: Some(self.hip_right.target),
            shoulder_level_diff: Some(self.shoulder_level.target),
            leg_separation: Some(self.leg_separation.target),
        }
    }
}

/// Per-metric comparison of a front pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontAccuracy {
    pub shoulder_left: MetricCheck,
    pub shoulder_right: MetricCheck,
    pub elbow_left: MetricCheck,
    pub elbow_right: MetricCheck,
    pub spine: MetricCheck,
    pub hip_left: MetricCheck,
    pub hip_right: MetricCheck,
    pub shoulder_level: MetricCheck,
    pub leg_separation: MetricCheck,
    /// Framing verdict the comparison was made with
    pub in_box: bool,
}

impl FrontAccuracy {
    /// Compare front metrics against the reference pose
    #[must_use]
    pub fn compare(metrics: &PostureMetrics, reference: &ReferencePose, in_box: bool) -> Self {
        let spine = match metrics.spine_tilt {
            Some(tilt) => MetricCheck::within(tilt.abs(), reference.spine_tolerance),
            None => MetricCheck::unavailable(),
        };

        Self {
            shoulder_left: reference.shoulder_left.check(metrics.shoulder_left),
            shoulder_right: reference.shoulder_right.check(metrics.shoulder_right),
            elbow_left: reference.elbow_left.check(metrics.elbow_left),
            elbow_right: reference.elbow_right.check(metrics.elbow_right),
            spine,
            hip_left: reference.hip_left.check(metrics.hip_left),
            hip_right: reference.hip_right.check(metrics.hip_right),
            shoulder_level: reference.shoulder_level.check(metrics.shoulder_level_diff),
            leg_separation: reference.leg_separation.check(metrics.leg_separation),
            in_box,
        }
    }

    /// All per-metric checks, in display order
    #[must_use]
    pub fn checks(&self) -> [MetricCheck; 9] {
        [
            self.shoulder_left,
            self.shoulder_right,
            self.elbow_left,
            self.elbow_right,
            self.spine,
            self.hip_left,
            self.hip_right,
            self.shoulder_level,
            self.leg_separation,
        ]
    }

    /// Whether every metric passed, ignoring framing
    #[must_use]
    pub fn metrics_pass(&self) -> bool {
        self.checks().iter().all(|c| c.passed)
    }
}

impl PoseAccuracy for FrontAccuracy {
    fn is_pose_accurate(&self) -> bool {
        self.metrics_pass() && self.in_box
    }

    // Left/right are swapped in the wording because the preview is mirrored
    fn correction(&self, arm_raise_deviation: f64) -> Option<&'static str> {
        if self.shoulder_left.failed_beyond(arm_raise_deviation) {
            Some("Raise your right arm higher")
        } else if self.shoulder_right.failed_beyond(arm_raise_deviation) {
            Some("Raise your left arm higher")
        } else if !self.elbow_left.passed {
            Some("Straighten your right arm")
        } else if !self.elbow_right.passed {
            Some("Straighten your left arm")
        } else if !self.spine.passed {
            Some("Stand up straight")
        } else if !self.shoulder_level.passed {
            Some("Level your shoulders")
        } else if !self.leg_separation.passed {
            Some("Spread your legs apart")
        } else if !self.hip_left.passed || !self.hip_right.passed {
            Some("Keep your legs straight")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideal_metrics_pass() {
        let reference = ReferencePose::default();
        let accuracy = FrontAccuracy::compare(&reference.ideal_metrics(), &reference, true);
        assert!(accuracy.is_pose_accurate());
        assert_eq!(accuracy.correction(20.0), None);
    }

    #[test]
    fn test_out_of_box_fails_overall() {
        let reference = ReferencePose::default();
        let accuracy = FrontAccuracy::compare(&reference.ideal_metrics(), &reference, false);
        assert!(accuracy.metrics_pass());
        assert!(!accuracy.is_pose_accurate());
    }

    #[test]
    fn test_small_shoulder_miss_falls_through_to_next_correction() {
        let reference = ReferencePose::default();
        let mut metrics = reference.ideal_metrics();
        // 18 degrees off: fails the 15 tolerance but stays under the 20 cue threshold
        metrics.shoulder_left = Some(63.0);
        metrics.spine_tilt = Some(25.0);
        let accuracy = FrontAccuracy::compare(&metrics, &reference, true);

        assert!(!accuracy.shoulder_left.passed);
        assert_eq!(accuracy.correction(20.0), Some("Stand up straight"));
    }

    #[test]
    fn test_unavailable_metric_fails() {
        let reference = ReferencePose::default();
        let mut metrics = reference.ideal_metrics();
        metrics.elbow_right = None;
        let accuracy = FrontAccuracy::compare(&metrics, &reference, true);

        assert!(!accuracy.is_pose_accurate());
        assert_eq!(accuracy.correction(20.0), Some("Straighten your left arm"));
    }
}
