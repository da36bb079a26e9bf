use super::{MetricCheck, PoseAccuracy, Target};
use crate::constants::{DEFAULT_ARMS_OVERLAP_MAX_PX, DEFAULT_LEGS_OVERLAP_MAX_PX, DEFAULT_SHOULDER_HORIZONTAL_MAX_PX};
use crate::metrics::SidePostureMetrics;
use serde::{Deserialize, Serialize};

/// Reference side pose: upright, head over spine, limbs straight and stacked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideReferencePose {
    pub neck_head: Target,
    pub arm: Target,
    pub spine: Target,
    pub leg: Target,
    /// Vertical shoulder offset in pixels
    pub shoulder_depth: Target,
    /// Maximum horizontal shoulder offset in pixels for a side-on view
    pub shoulder_horizontal_max: f64,
    /// Maximum mean elbow/wrist spread in pixels for a side-on view
    pub arms_overlap_max: f64,
    /// Maximum mean knee/ankle spread in pixels for a side-on view
    pub legs_overlap_max: f64,
}

impl Default for SideReferencePose {
    fn default() -> Self {
        Self {
            neck_head: Target::new(180.0, 15.0),
            arm: Target::new(180.0, 20.0),
            spine: Target::new(0.0, 15.0),
            leg: Target::new(180.0, 15.0),
            shoulder_depth: Target::new(0.0, 30.0),
            shoulder_horizontal_max: DEFAULT_SHOULDER_HORIZONTAL_MAX_PX,
            arms_overlap_max: DEFAULT_ARMS_OVERLAP_MAX_PX,
            legs_overlap_max: DEFAULT_LEGS_OVERLAP_MAX_PX,
        }
    }
}

/// Per-metric comparison of a side pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideAccuracy {
    pub neck_head: MetricCheck,
    pub arm_left: MetricCheck,
    pub arm_right: MetricCheck,
    pub spine: MetricCheck,
    pub leg_left: MetricCheck,
    pub leg_right: MetricCheck,
    /// Shoulders stacked and limbs overlapping
    pub is_side_view: bool,
    /// Framing verdict the comparison was made with
    pub in_box: bool,
}

fn at_most(value: Option<f64>, max: f64) -> bool {
    value.is_some_and(|v| v <= max)
}

impl SideAccuracy {
    /// Compare side metrics against the reference pose
    #[must_use]
    pub fn compare(metrics: &SidePostureMetrics, reference: &SideReferencePose, in_box: bool) -> Self {
        let is_side_view = reference.shoulder_depth.check(metrics.shoulder_depth_diff).passed
            && at_most(metrics.shoulder_horizontal, reference.shoulder_horizontal_max)
            && at_most(metrics.arms_overlap, reference.arms_overlap_max)
            && at_most(metrics.legs_overlap, reference.legs_overlap_max);

        Self {
            neck_head: reference.neck_head.check(metrics.neck_head),
            arm_left: reference.arm.check(metrics.arm_left),
            arm_right: reference.arm.check(metrics.arm_right),
            spine: reference.spine.check(metrics.spine_vertical),
            leg_left: reference.leg.check(metrics.leg_left),
            leg_right: reference.leg.check(metrics.leg_right),
            is_side_view,
            in_box,
        }
    }

    /// At least one arm is straight; the other may be hidden behind the body
    #[must_use]
    pub fn any_arm_accurate(&self) -> bool {
        self.arm_left.passed || self.arm_right.passed
    }

    /// At least one leg is straight
    #[must_use]
    pub fn any_leg_accurate(&self) -> bool {
        self.leg_left.passed || self.leg_right.passed
    }
}

impl PoseAccuracy for SideAccuracy {
    fn is_pose_accurate(&self) -> bool {
        self.is_side_view
            && self.neck_head.passed
            && self.spine.passed
            && self.any_arm_accurate()
            && self.any_leg_accurate()
            && self.in_box
    }

    fn correction(&self, _arm_raise_deviation: f64) -> Option<&'static str> {
        if !self.is_side_view {
            Some("Please turn to your side, stand sideways to the camera")
        } else if !self.neck_head.passed {
            Some("Keep your head straight, align with your spine")
        } else if !self.spine.passed {
            Some("Stand up straight, keep your spine vertical")
        } else if !self.any_arm_accurate() {
            Some("Relax your arms by your sides")
        } else if !self.any_leg_accurate() {
            Some("Keep your legs straight")
        } else {
            None
        }
    }
}
