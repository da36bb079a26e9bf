use super::{points, spine_tilt};
use crate::geometry::{angle_between, midpoint, vertical_gap};
use crate::landmark::{LandmarkFrame, LandmarkId};

/// Named front-pose metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontMetric {
    ShoulderLeft,
    ShoulderRight,
    ElbowLeft,
    ElbowRight,
    SpineTilt,
    HipLeft,
    HipRight,
    ShoulderLevel,
    LegSeparation,
}

impl FrontMetric {
    pub const ALL: [FrontMetric; 9] = [
        FrontMetric::ShoulderLeft,
        FrontMetric::ShoulderRight,
        FrontMetric::ElbowLeft,
        FrontMetric::ElbowRight,
        FrontMetric::SpineTilt,
        FrontMetric::HipLeft,
        FrontMetric::HipRight,
        FrontMetric::ShoulderLevel,
        FrontMetric::LegSeparation,
    ];

    /// Landmarks the metric's formula reads
    #[must_use]
    pub fn required_landmarks(self) -> &'static [LandmarkId] {
        use LandmarkId::*;
        match self {
            FrontMetric::ShoulderLeft => &[LeftElbow, LeftShoulder, LeftHip],
            FrontMetric::ShoulderRight => &[RightElbow, RightShoulder, RightHip],
            FrontMetric::ElbowLeft => &[LeftShoulder, LeftElbow, LeftWrist],
            FrontMetric::ElbowRight => &[RightShoulder, RightElbow, RightWrist],
            FrontMetric::SpineTilt => &[LeftShoulder, RightShoulder, LeftHip, RightHip],
            FrontMetric::HipLeft => &[LeftShoulder, LeftHip, LeftKnee],
            FrontMetric::HipRight => &[RightShoulder, RightHip, RightKnee],
            FrontMetric::ShoulderLevel => &[LeftShoulder, RightShoulder],
            FrontMetric::LegSeparation => &[LeftKnee, RightKnee, LeftHip, RightHip],
        }
    }
}

/// Joint angles and alignment differences for a front-facing pose.
///
/// Angles are in degrees, `shoulder_level_diff` is in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PostureMetrics {
    /// Elbow-shoulder-hip angle, left side
    pub shoulder_left: Option<f64>,
    /// Elbow-shoulder-hip angle, right side
    pub shoulder_right: Option<f64>,
    /// Shoulder-elbow-wrist angle, left side
    pub elbow_left: Option<f64>,
    /// Shoulder-elbow-wrist angle, right side
    pub elbow_right: Option<f64>,
    /// Torso tilt from vertical
    pub spine_tilt: Option<f64>,
    /// Shoulder-hip-knee angle, left side
    pub hip_left: Option<f64>,
    /// Shoulder-hip-knee angle, right side
    pub hip_right: Option<f64>,
    /// Vertical offset between the shoulders
    pub shoulder_level_diff: Option<f64>,
    /// Angle at the hip midpoint between the two knees
    pub leg_separation: Option<f64>,
}

impl PostureMetrics {
    /// Compute all front metrics from a frame
    #[must_use]
    pub fn from_frame(frame: &LandmarkFrame) -> Self {
        use LandmarkId::*;

        let joint = |a: LandmarkId, mid: LandmarkId, b: LandmarkId| points(frame, [a, mid, b]).map(|[a, m, b]| angle_between(&a, &m, &b));

        let leg_separation = points(frame, [LeftHip, RightHip, LeftKnee, RightKnee])
            .map(|[lh, rh, lk, rk]| angle_between(&lk, &midpoint(&lh, &rh), &rk));

        Self {
            shoulder_left: joint(LeftElbow, LeftShoulder, LeftHip),
            shoulder_right: joint(RightElbow, RightShoulder, RightHip),
            elbow_left: joint(LeftShoulder, LeftElbow, LeftWrist),
            elbow_right: joint(RightShoulder, RightElbow, RightWrist),
            spine_tilt: spine_tilt(frame),
            hip_left: joint(LeftShoulder, LeftHip, LeftKnee),
            hip_right: joint(RightShoulder, RightHip, RightKnee),
            shoulder_level_diff: points(frame, [LeftShoulder, RightShoulder]).map(|[l, r]| vertical_gap(&l, &r)),
            leg_separation,
        }
    }

    /// Value of a metric by name
    #[must_use]
    pub fn get(&self, metric: FrontMetric) -> Option<f64> {
        match metric {
            FrontMetric::ShoulderLeft => self.shoulder_left,
            FrontMetric::ShoulderRight => self.shoulder_right,
            FrontMetric::ElbowLeft => self.elbow_left,
            FrontMetric::ElbowRight => self.elbow_right,
            FrontMetric::SpineTilt => self.spine_tilt,
            FrontMetric::HipLeft => self.hip_left,
            FrontMetric::HipRight => self.hip_right,
            FrontMetric::ShoulderLevel => self.shoulder_level_diff,
            FrontMetric::LegSeparation => self.leg_separation,
        }
    }

    /// Metrics that could not be computed
    #[must_use]
    pub fn unavailable(&self) -> Vec<FrontMetric> {
        FrontMetric::ALL.into_iter().filter(|m| self.get(*m).is_none()).collect()
    }
}
