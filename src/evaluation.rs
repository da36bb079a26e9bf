//! Per-frame evaluation: framing, metrics and accuracy for the active stage.

use crate::{
    accuracy::{FrontAccuracy, PoseAccuracy, ReferencePose, SideAccuracy, SideReferencePose, StageAccuracy},
    config::Config,
    framing::{FramingChecker, FramingResult},
    landmark::LandmarkFrame,
    metrics::{PostureMetrics, SidePostureMetrics},
};
use log::trace;

/// Message used whenever no complete person is in view
pub const NO_PERSON_MESSAGE: &str = "Please stand in front of camera";

/// Capture stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseStage {
    /// Facing the camera
    Front,
    /// Turned sideways
    Side,
}

impl PoseStage {
    /// Instruction banner shown for the stage
    #[must_use]
    pub fn banner(self) -> &'static str {
        match self {
            PoseStage::Front => "Front Pose: Stand facing camera",
            PoseStage::Side => "Side Pose: Turn sideways to camera",
        }
    }
}

/// Everything learned from one landmark frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEvaluation {
    /// Stage the frame was evaluated for
    pub stage: PoseStage,
    /// Landmarks that passed confidence filtering, `None` for an empty detection
    pub landmarks: Option<LandmarkFrame>,
    /// All critical joints were present
    pub person_detected: bool,
    /// Framing verdict, only when a person was detected
    pub framing: Option<FramingResult>,
    /// Metric comparison, only when a person was detected
    pub accuracy: Option<StageAccuracy>,
}

impl FrameEvaluation {
    fn no_person(stage: PoseStage, landmarks: Option<LandmarkFrame>) -> Self {
        Self {
            stage,
            landmarks,
            person_detected: false,
            framing: None,
            accuracy: None,
        }
    }

    /// Accurate and in frame
    #[must_use]
    pub fn is_pose_accurate(&self) -> bool {
        self.person_detected && self.accuracy.as_ref().is_some_and(|acc| acc.is_pose_accurate())
    }

    /// Message that must take precedence over any diagnosis
    #[must_use]
    pub fn override_message(&self) -> Option<&'static str> {
        (!self.person_detected).then_some(NO_PERSON_MESSAGE)
    }
}

/// Stateless evaluator holding the reference poses and framing box
#[derive(Debug, Clone)]
pub struct PoseEvaluator {
    front_reference: ReferencePose,
    side_reference: SideReferencePose,
    framing: FramingChecker,
    min_confidence: f32,
}

impl PoseEvaluator {
    /// Create an evaluator from configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            front_reference: config.front_reference,
            side_reference: config.side_reference,
            framing: FramingChecker::new(config.framing.target_box()),
            min_confidence: config.detection.min_confidence,
        }
    }

    /// Framing checker in use
    #[must_use]
    pub fn framing(&self) -> &FramingChecker {
        &self.framing
    }

    /// Evaluate one detection result. `None` means the detector found
    /// nothing or failed; both are treated as "no person".
    #[must_use]
    pub fn evaluate(&self, detection: Option<&LandmarkFrame>, stage: PoseStage) -> FrameEvaluation {
        let Some(raw) = detection else {
            return FrameEvaluation::no_person(stage, None);
        };

        let frame = raw.confident(self.min_confidence);
        if frame.is_empty() || !frame.is_person_fully_detected() {
            return FrameEvaluation::no_person(stage, Some(frame));
        }

        let framing = self.framing.check(&frame);
        let accuracy = match stage {
            PoseStage::Front => {
                let metrics = PostureMetrics::from_frame(&frame);
                trace!("front metrics: {metrics:?}");
                StageAccuracy::Front(FrontAccuracy::compare(&metrics, &self.front_reference, framing.in_box))
            }
            PoseStage::Side => {
                let metrics = SidePostureMetrics::from_frame(&frame);
                trace!("side metrics: {metrics:?}");
                StageAccuracy::Side(SideAccuracy::compare(&metrics, &self.side_reference, framing.in_box))
            }
        };

        FrameEvaluation {
            stage,
            landmarks: Some(frame),
            person_detected: true,
            framing: Some(framing),
            accuracy: Some(accuracy),
        }
    }
}
