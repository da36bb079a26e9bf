//! Per-frame data for a skeleton renderer.
//!
//! Purely observational: nothing here feeds back into the capture session.

use crate::{
    accuracy::{PoseAccuracy, StageAccuracy},
    capture::SessionSnapshot,
    evaluation::{FrameEvaluation, PoseStage},
    landmark::{LandmarkFrame, LandmarkId},
};
use nalgebra::Point2;

/// Skeleton segment drawn between two landmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    ShoulderLine,
    LeftUpperArm,
    RightUpperArm,
    LeftForearm,
    RightForearm,
    LeftTorso,
    RightTorso,
    HipLine,
    LeftThigh,
    RightThigh,
    LeftShin,
    RightShin,
}

impl Segment {
    pub const ALL: [Segment; 12] = [
        Segment::ShoulderLine,
        Segment::LeftUpperArm,
        Segment::RightUpperArm,
        Segment::LeftForearm,
        Segment::RightForearm,
        Segment::LeftTorso,
        Segment::RightTorso,
        Segment::HipLine,
        Segment::LeftThigh,
        Segment::RightThigh,
        Segment::LeftShin,
        Segment::RightShin,
    ];

    /// Landmarks at either end of the segment
    #[must_use]
    pub fn endpoints(self) -> (LandmarkId, LandmarkId) {
        use LandmarkId::*;
        match self {
            Segment::ShoulderLine => (LeftShoulder, RightShoulder),
            Segment::LeftUpperArm => (LeftShoulder, LeftElbow),
            Segment::RightUpperArm => (RightShoulder, RightElbow),
            Segment::LeftForearm => (LeftElbow, LeftWrist),
            Segment::RightForearm => (RightElbow, RightWrist),
            Segment::LeftTorso => (LeftShoulder, LeftHip),
            Segment::RightTorso => (RightShoulder, RightHip),
            Segment::HipLine => (LeftHip, RightHip),
            Segment::LeftThigh => (LeftHip, LeftKnee),
            Segment::RightThigh => (RightHip, RightKnee),
            Segment::LeftShin => (LeftKnee, LeftAnkle),
            Segment::RightShin => (RightKnee, RightAnkle),
        }
    }

    /// Whether the metrics governing this segment pass
    #[must_use]
    pub fn is_accurate(self, accuracy: &StageAccuracy) -> bool {
        match accuracy {
            StageAccuracy::Front(acc) => match self {
                Segment::ShoulderLine => acc.shoulder_level.passed,
                Segment::LeftUpperArm | Segment::LeftForearm => {
                    acc.shoulder_left.passed && acc.elbow_left.passed
                }
                Segment::RightUpperArm | Segment::RightForearm => {
                    acc.shoulder_right.passed && acc.elbow_right.passed
                }
                Segment::LeftTorso | Segment::RightTorso => acc.spine.passed,
                Segment::HipLine => acc.leg_separation.passed,
                Segment::LeftThigh | Segment::LeftShin => acc.hip_left.passed,
                Segment::RightThigh | Segment::RightShin => acc.hip_right.passed,
            },
            StageAccuracy::Side(acc) => match self {
                Segment::ShoulderLine | Segment::HipLine => acc.is_side_view,
                Segment::LeftUpperArm | Segment::LeftForearm => acc.arm_left.passed,
                Segment::RightUpperArm | Segment::RightForearm => acc.arm_right.passed,
                Segment::LeftTorso | Segment::RightTorso => acc.spine.passed,
                Segment::LeftThigh | Segment::LeftShin => acc.leg_left.passed,
                Segment::RightThigh | Segment::RightShin => acc.leg_right.passed,
            },
        }
    }
}

/// One drawable segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentOverlay {
    pub segment: Segment,
    pub from: Point2<f64>,
    pub to: Point2<f64>,
    pub accurate: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub stage: PoseStage,
    pub banner: &'static str,
    /// Landmarks that passed confidence filtering
    pub landmarks: Option<LandmarkFrame>,
    pub accuracy: Option<StageAccuracy>,
    pub segments: Vec<SegmentOverlay>,
    pub perfect_pose: bool,
    pub countdown: Option<u32>,
    pub counting: bool,
}

impl OverlayFrame {
    /// Build overlay data from an evaluation and the session state after it
    #[must_use]
    pub fn new(evaluation: &FrameEvaluation, snapshot: &SessionSnapshot) -> Self {
        let segments = match (&evaluation.landmarks, &evaluation.accuracy) {
            (Some(frame), Some(accuracy)) => segments(frame, accuracy),
            _ => Vec::new(),
        };

        Self {
            stage: snapshot.stage,
            banner: snapshot.stage.banner(),
            landmarks: evaluation.landmarks.clone(),
            accuracy: evaluation.accuracy,
            segments,
            perfect_pose: evaluation.accuracy.as_ref().is_some_and(|acc| acc.is_pose_accurate()),
            countdown: snapshot.countdown,
            counting: snapshot.is_counting(),
        }
    }
}

fn segments(frame: &LandmarkFrame, accuracy: &StageAccuracy) -> Vec<SegmentOverlay> {
    Segment::ALL
        .iter()
        .filter_map(|&segment| {
            let (a, b) = segment.endpoints();
            Some(SegmentOverlay {
                segment,
                from: frame.point(a)?,
                to: frame.point(b)?,
                accurate: segment.is_accurate(accuracy),
            })
        })
        .collect()
}
