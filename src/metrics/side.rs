use super::{points, spine_tilt};
use crate::geometry::{angle_between, heading_degrees, horizontal_gap, midpoint, vertical_gap};
use crate::landmark::{LandmarkFrame, LandmarkId};
use nalgebra::Point2;

/// Named side-pose metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideMetric {
    NeckHead,
    ArmLeft,
    ArmRight,
    SpineVertical,
    LegLeft,
    LegRight,
    ShoulderDepth,
    ShoulderHorizontal,
    ArmsOverlap,
    LegsOverlap,
}

impl SideMetric {
    pub const ALL: [SideMetric; 10] = [
        SideMetric::NeckHead,
        SideMetric::ArmLeft,
        SideMetric::ArmRight,
        SideMetric::SpineVertical,
        SideMetric::LegLeft,
        SideMetric::LegRight,
        SideMetric::ShoulderDepth,
        SideMetric::ShoulderHorizontal,
        SideMetric::ArmsOverlap,
        SideMetric::LegsOverlap,
    ];
}

/// Metrics for a side-facing pose.
///
/// Angles are in degrees; the depth, alignment and overlap values are pixel
/// distances used to decide whether the person is really side-on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SidePostureMetrics {
    /// Heading of shoulder-mid to ear, measured against straight up
    pub neck_head: Option<f64>,
    /// Shoulder-elbow-wrist angle, left side
    pub arm_left: Option<f64>,
    /// Shoulder-elbow-wrist angle, right side
    pub arm_right: Option<f64>,
    /// Torso tilt from vertical
    pub spine_vertical: Option<f64>,
    /// Hip-knee-ankle angle, left side
    pub leg_left: Option<f64>,
    /// Hip-knee-ankle angle, right side
    pub leg_right: Option<f64>,
    /// Vertical offset between the shoulders
    pub shoulder_depth_diff: Option<f64>,
    /// Horizontal offset between the shoulders
    pub shoulder_horizontal: Option<f64>,
    /// Mean horizontal spread of elbows and wrists
    pub arms_overlap: Option<f64>,
    /// Mean horizontal spread of knees and ankles
    pub legs_overlap: Option<f64>,
}

impl SidePostureMetrics {
    /// Compute all side metrics from a frame
    #[must_use]
    pub fn from_frame(frame: &LandmarkFrame) -> Self {
        use LandmarkId::*;

        let joint = |a: LandmarkId, mid: LandmarkId, b: LandmarkId| {
            points(frame, [a, mid, b]).map(|[a, m, b]| angle_between(&a, &m, &b))
        };

        let shoulders = points(frame, [LeftShoulder, RightShoulder]);

        let arms_overlap = points(frame, [LeftElbow, RightElbow, LeftWrist, RightWrist])
            .map(|[le, re, lw, rw]| (horizontal_gap(&le, &re) + horizontal_gap(&lw, &rw)) / 2.0);
        let legs_overlap = points(frame, [LeftKnee, RightKnee, LeftAnkle, RightAnkle])
            .map(|[lk, rk, la, ra]| (horizontal_gap(&lk, &rk) + horizontal_gap(&la, &ra)) / 2.0);

        Self {
            neck_head: neck_head_angle(frame),
            arm_left: joint(LeftShoulder, LeftElbow, LeftWrist),
            arm_right: joint(RightShoulder, RightElbow, RightWrist),
            spine_vertical: spine_tilt(frame),
            leg_left: joint(LeftHip, LeftKnee, LeftAnkle),
            leg_right: joint(RightHip, RightKnee, RightAnkle),
            shoulder_depth_diff: shoulders.map(|[l, r]| vertical_gap(&l, &r)),
            shoulder_horizontal: shoulders.map(|[l, r]| horizontal_gap(&l, &r)),
            arms_overlap,
            legs_overlap,
        }
    }

    /// Value of a metric by name
    #[must_use]
    pub fn get(&self, metric: SideMetric) -> Option<f64> {
        match metric {
            SideMetric::NeckHead => self.neck_head,
            SideMetric::ArmLeft => self.arm_left,
            SideMetric::ArmRight => self.arm_right,
            SideMetric::SpineVertical => self.spine_vertical,
            SideMetric::LegLeft => self.leg_left,
            SideMetric::LegRight => self.leg_right,
            SideMetric::ShoulderDepth => self.shoulder_depth_diff,
            SideMetric::ShoulderHorizontal => self.shoulder_horizontal,
            SideMetric::ArmsOverlap => self.arms_overlap,
            SideMetric::LegsOverlap => self.legs_overlap,
        }
    }

    /// Metrics that could not be computed
    #[must_use]
    pub fn unavailable(&self) -> Vec<SideMetric> {
        SideMetric::ALL.into_iter().filter(|m| self.get(*m).is_none()).collect()
    }
}

/// The more confident ear, or whichever one is present
fn visible_ear(frame: &LandmarkFrame) -> Option<Point2<f64>> {
    match (frame.get(LandmarkId::LeftEar), frame.get(LandmarkId::RightEar)) {
        (Some(left), Some(right)) => {
            if left.confidence > right.confidence {
                Some(left.position())
            } else {
                Some(right.position())
            }
        }
        (Some(ear), None) | (None, Some(ear)) => Some(ear.position()),
        (None, None) => None,
    }
}

/// Shoulder midpoint, or the single visible shoulder
fn neck_base(frame: &LandmarkFrame) -> Option<Point2<f64>> {
    match (frame.point(LandmarkId::LeftShoulder), frame.point(LandmarkId::RightShoulder)) {
        (Some(l), Some(r)) => Some(midpoint(&l, &r)),
        (Some(s), None) | (None, Some(s)) => Some(s),
        (None, None) => None,
    }
}

/// `|heading(neck -> ear) - 90|`. An ear straight above the neck gives 180.
fn neck_head_angle(frame: &LandmarkFrame) -> Option<f64> {
    // nose must be visible for the head to be considered tracked
    frame.point(LandmarkId::Nose)?;
    let ear = visible_ear(frame)?;
    let neck = neck_base(frame)?;
    Some((heading_degrees(&neck, &ear) - 90.0).abs())
}
