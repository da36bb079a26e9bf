//! Checks that the person stands inside the target capture region.

use crate::constants::DEFAULT_BOX_MARGIN;
use crate::landmark::{LandmarkFrame, LandmarkId};
use serde::{Deserialize, Serialize};

/// Target region in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl TargetBox {
    /// Box trimmed by `margin` on every edge
    #[must_use]
    pub fn with_margin(margin: f64) -> Self {
        Self {
            left: margin,
            top: margin,
            right: 1.0 - margin,
            bottom: 1.0 - margin,
        }
    }
}

impl Default for TargetBox {
    fn default() -> Self {
        Self::with_margin(DEFAULT_BOX_MARGIN)
    }
}

/// Edge of the target box a landmark fell outside of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxViolation {
    TooHigh,
    TooLow,
    TooFarLeft,
    TooFarRight,
}

/// Diagnosis of a framing problem, one spoken message each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramingIssue {
    /// Knees visible but no feet: the person is too close
    FeetNotVisible,
    /// Feet visible but no head: the person is too far
    HeadNotVisible,
    /// Neither feet nor head visible
    NotInFrame,
    /// Landmarks beyond both the top and bottom edges
    TooTall,
    TooLow,
    TooHigh,
    /// Landmarks beyond both side edges
    TooWide,
    TooFarLeft,
    TooFarRight,
}

impl FramingIssue {
    /// Spoken instruction for this issue
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            FramingIssue::FeetNotVisible => "Move back so your feet are visible",
            FramingIssue::HeadNotVisible => "Move forward so your head is visible",
            FramingIssue::NotInFrame => "Please stand in front of camera",
            FramingIssue::TooTall => "Move back to fit in frame",
            FramingIssue::TooLow => "Move back so your feet are in frame",
            FramingIssue::TooHigh => "Move forward so your head is in frame",
            FramingIssue::TooWide => "Step back to fit in frame",
            // Mirrored preview: the person's right is the image's left
            FramingIssue::TooFarLeft => "Move to your right",
            FramingIssue::TooFarRight => "Move to your left",
        }
    }
}

/// Result of a framing check
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FramingResult {
    /// All boundary landmarks inside the box
    pub in_box: bool,
    /// Edges crossed, vertical before horizontal
    pub violations: Vec<BoxViolation>,
    /// Diagnoses in priority order; the first one is spoken
    pub issues: Vec<FramingIssue>,
}

impl FramingResult {
    fn rejected(issue: FramingIssue) -> Self {
        Self {
            in_box: false,
            violations: Vec::new(),
            issues: vec![issue],
        }
    }

    /// Highest-priority issue
    #[must_use]
    pub fn primary_issue(&self) -> Option<FramingIssue> {
        self.issues.first().copied()
    }

    /// Message for the highest-priority issue
    #[must_use]
    pub fn primary_message(&self) -> Option<&'static str> {
        self.primary_issue().map(FramingIssue::message)
    }
}

/// Landmarks tested against the target box
const BOUNDARY_LANDMARKS: [LandmarkId; 11] = [
    LandmarkId::LeftAnkle,
    LandmarkId::RightAnkle,
    LandmarkId::LeftHeel,
    LandmarkId::RightHeel,
    LandmarkId::LeftFootIndex,
    LandmarkId::RightFootIndex,
    LandmarkId::LeftWrist,
    LandmarkId::RightWrist,
    LandmarkId::Nose,
    LandmarkId::LeftShoulder,
    LandmarkId::RightShoulder,
];

/// Framing checker for a fixed target box
#[derive(Debug, Clone, Copy, Default)]
pub struct FramingChecker {
    target: TargetBox,
}

impl FramingChecker {
    /// Create a checker for the given target box
    #[must_use]
    pub fn new(target: TargetBox) -> Self {
        Self { target }
    }

    /// Target box in use
    #[must_use]
    pub fn target(&self) -> TargetBox {
        self.target
    }

    /// Check whether the person is fully and centrally framed
    #[must_use]
    pub fn check(&self, frame: &LandmarkFrame) -> FramingResult {
        // Nothing can be placed inside the box without image dimensions
        if frame.width == 0 || frame.height == 0 {
            return FramingResult::rejected(FramingIssue::NotInFrame);
        }

        let feet_visible = frame.contains_any(&LandmarkId::FEET);
        let knees_visible = frame.contains_any(&[LandmarkId::LeftKnee, LandmarkId::RightKnee]);
        let head_visible = frame.contains(LandmarkId::Nose);

        if !feet_visible && knees_visible {
            return FramingResult::rejected(FramingIssue::FeetNotVisible);
        }
        if feet_visible && !head_visible {
            return FramingResult::rejected(FramingIssue::HeadNotVisible);
        }
        if !feet_visible && !head_visible {
            return FramingResult::rejected(FramingIssue::NotInFrame);
        }

        let (mut too_high, mut too_low, mut too_left, mut too_right) = (false, false, false, false);
        for p in BOUNDARY_LANDMARKS.iter().filter_map(|id| frame.normalized(*id)) {
            too_left |= p.x < self.target.left;
            too_right |= p.x > self.target.right;
            too_high |= p.y < self.target.top;
            too_low |= p.y > self.target.bottom;
        }

        let violations: Vec<BoxViolation> = [
            (too_high, BoxViolation::TooHigh),
            (too_low, BoxViolation::TooLow),
            (too_left, BoxViolation::TooFarLeft),
            (too_right, BoxViolation::TooFarRight),
        ]
        .into_iter()
        .filter_map(|(hit, v)| hit.then_some(v))
        .collect();

        let issue = match (too_high, too_low, too_left, too_right) {
            (true, true, _, _) => Some(FramingIssue::TooTall),
            (false, true, _, _) => Some(FramingIssue::TooLow),
            (true, false, _, _) => Some(FramingIssue::TooHigh),
            (false, false, true, true) => Some(FramingIssue::TooWide),
            (false, false, true, false) => Some(FramingIssue::TooFarLeft),
            (false, false, false, true) => Some(FramingIssue::TooFarRight),
            (false, false, false, false) => None,
        };

        FramingResult {
            in_box: violations.is_empty(),
            violations,
            issues: issue.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;

    fn frame_with(points: &[(LandmarkId, f64, f64)]) -> LandmarkFrame {
        let mut frame = LandmarkFrame::new(100, 100).unwrap();
        for (id, x, y) in points {
            frame.insert(*id, Landmark::new(*x, *y, 1.0));
        }
        frame
    }

    #[test]
    fn test_knees_without_feet_is_move_back() {
        let frame = frame_with(&[
            (LandmarkId::Nose, -50.0, -50.0),
            (LandmarkId::LeftKnee, 50.0, 80.0),
        ]);
        let result = FramingChecker::default().check(&frame);
        assert!(!result.in_box);
        assert_eq!(result.primary_issue(), Some(FramingIssue::FeetNotVisible));
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_feet_without_head_is_move_forward() {
        let frame = frame_with(&[(LandmarkId::LeftAnkle, 50.0, 90.0)]);
        let result = FramingChecker::default().check(&frame);
        assert_eq!(result.primary_issue(), Some(FramingIssue::HeadNotVisible));
    }

    #[test]
    fn test_nothing_useful_visible() {
        let frame = frame_with(&[(LandmarkId::LeftWrist, 50.0, 50.0)]);
        let result = FramingChecker::default().check(&frame);
        assert_eq!(result.primary_message(), Some("Please stand in front of camera"));
    }

    #[test]
    fn test_zero_dimensions_not_in_frame() {
        let mut frame = frame_with(&[
            (LandmarkId::Nose, 5000.0, -3000.0),
            (LandmarkId::LeftAnkle, 5500.0, 9000.0),
            (LandmarkId::RightAnkle, 4500.0, 9000.0),
        ]);
        frame.width = 0;
        let result = FramingChecker::default().check(&frame);
        assert!(!result.in_box);
        assert_eq!(result.primary_issue(), Some(FramingIssue::NotInFrame));

        frame.width = 100;
        frame.height = 0;
        assert!(!FramingChecker::default().check(&frame).in_box);
    }

    #[test]
    fn test_centered_person_in_box() {
        let frame = frame_with(&[
            (LandmarkId::Nose, 50.0, 10.0),
            (LandmarkId::LeftAnkle, 55.0, 90.0),
            (LandmarkId::RightAnkle, 45.0, 90.0),
        ]);
        let result = FramingChecker::default().check(&frame);
        assert!(result.in_box);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_vertical_before_horizontal() {
        let frame = frame_with(&[
            (LandmarkId::Nose, 2.0, 10.0),
            (LandmarkId::LeftAnkle, 50.0, 98.0),
        ]);
        let result = FramingChecker::default().check(&frame);
        assert_eq!(result.violations, vec![BoxViolation::TooLow, BoxViolation::TooFarLeft]);
        assert_eq!(result.primary_issue(), Some(FramingIssue::TooLow));
    }

    #[test]
    fn test_both_sides_collapse_to_step_back() {
        let frame = frame_with(&[
            (LandmarkId::Nose, 50.0, 10.0),
            (LandmarkId::LeftWrist, 98.0, 50.0),
            (LandmarkId::RightWrist, 2.0, 50.0),
            (LandmarkId::LeftAnkle, 50.0, 90.0),
        ]);
        let result = FramingChecker::default().check(&frame);
        assert_eq!(result.primary_message(), Some("Step back to fit in frame"));
    }
}
