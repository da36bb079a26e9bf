//! Body landmarks as delivered by the external pose detector.

use crate::{Error, Result};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body joints the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkId {
    Nose,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl LandmarkId {
    /// Every joint, in declaration order
    pub const ALL: [LandmarkId; 19] = [
        LandmarkId::Nose,
        LandmarkId::LeftEar,
        LandmarkId::RightEar,
        LandmarkId::LeftShoulder,
        LandmarkId::RightShoulder,
        LandmarkId::LeftElbow,
        LandmarkId::RightElbow,
        LandmarkId::LeftWrist,
        LandmarkId::RightWrist,
        LandmarkId::LeftHip,
        LandmarkId::RightHip,
        LandmarkId::LeftKnee,
        LandmarkId::RightKnee,
        LandmarkId::LeftAnkle,
        LandmarkId::RightAnkle,
        LandmarkId::LeftHeel,
        LandmarkId::RightHeel,
        LandmarkId::LeftFootIndex,
        LandmarkId::RightFootIndex,
    ];

    /// Joints that must all be present for a person to count as detected
    pub const CRITICAL: [LandmarkId; 11] = [
        LandmarkId::Nose,
        LandmarkId::LeftShoulder,
        LandmarkId::RightShoulder,
        LandmarkId::LeftElbow,
        LandmarkId::RightElbow,
        LandmarkId::LeftWrist,
        LandmarkId::RightWrist,
        LandmarkId::LeftHip,
        LandmarkId::RightHip,
        LandmarkId::LeftKnee,
        LandmarkId::RightKnee,
    ];

    /// Ankles, heels and foot indices
    pub const FEET: [LandmarkId; 6] = [
        LandmarkId::LeftAnkle,
        LandmarkId::RightAnkle,
        LandmarkId::LeftHeel,
        LandmarkId::RightHeel,
        LandmarkId::LeftFootIndex,
        LandmarkId::RightFootIndex,
    ];

    /// Snake-case name, matching the serialized form
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            LandmarkId::Nose => "nose",
            LandmarkId::LeftEar => "left_ear",
            LandmarkId::RightEar => "right_ear",
            LandmarkId::LeftShoulder => "left_shoulder",
            LandmarkId::RightShoulder => "right_shoulder",
            LandmarkId::LeftElbow => "left_elbow",
            LandmarkId::RightElbow => "right_elbow",
            LandmarkId::LeftWrist => "left_wrist",
            LandmarkId::RightWrist => "right_wrist",
            LandmarkId::LeftHip => "left_hip",
            LandmarkId::RightHip => "right_hip",
            LandmarkId::LeftKnee => "left_knee",
            LandmarkId::RightKnee => "right_knee",
            LandmarkId::LeftAnkle => "left_ankle",
            LandmarkId::RightAnkle => "right_ankle",
            LandmarkId::LeftHeel => "left_heel",
            LandmarkId::RightHeel => "right_heel",
            LandmarkId::LeftFootIndex => "left_foot_index",
            LandmarkId::RightFootIndex => "right_foot_index",
        }
    }
}

/// A single detected joint in image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// X coordinate in pixels
    pub x: f64,
    /// Y coordinate in pixels
    pub y: f64,
    /// Detection confidence (0-1)
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

fn full_confidence() -> f32 {
    1.0
}

impl Landmark {
    /// Create a new landmark
    #[must_use]
    pub fn new(x: f64, y: f64, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// Position as a point
    #[must_use]
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// All landmarks detected in one camera frame.
///
/// Absent joints are simply not in the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Source image width in pixels
    pub width: u32,
    /// Source image height in pixels
    pub height: u32,
    /// Detected joints
    #[serde(default)]
    pub landmarks: BTreeMap<LandmarkId, Landmark>,
}

impl LandmarkFrame {
    /// Create an empty frame for an image of the given size
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero, since coordinates could
    /// not be normalized.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "Image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            landmarks: BTreeMap::new(),
        })
    }

    /// Builder-style insertion
    #[must_use]
    pub fn with(mut self, id: LandmarkId, landmark: Landmark) -> Self {
        self.landmarks.insert(id, landmark);
        self
    }

    /// Insert or replace a landmark
    pub fn insert(&mut self, id: LandmarkId, landmark: Landmark) {
        self.landmarks.insert(id, landmark);
    }

    /// Remove a landmark, returning it if it was present
    pub fn remove(&mut self, id: LandmarkId) -> Option<Landmark> {
        self.landmarks.remove(&id)
    }

    /// Look up a landmark
    #[must_use]
    pub fn get(&self, id: LandmarkId) -> Option<&Landmark> {
        self.landmarks.get(&id)
    }

    /// Position of a landmark if present
    #[must_use]
    pub fn point(&self, id: LandmarkId) -> Option<Point2<f64>> {
        self.get(id).map(Landmark::position)
    }

    /// Whether a landmark is present
    #[must_use]
    pub fn contains(&self, id: LandmarkId) -> bool {
        self.landmarks.contains_key(&id)
    }

    /// Whether any of the given landmarks is present
    #[must_use]
    pub fn contains_any(&self, ids: &[LandmarkId]) -> bool {
        ids.iter().any(|id| self.contains(*id))
    }

    /// Number of present landmarks
    #[must_use]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Whether the detector found nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Copy of this frame without landmarks below `min_confidence`
    #[must_use]
    pub fn confident(&self, min_confidence: f32) -> Self {
        Self {
            width: self.width,
            height: self.height,
            landmarks: self
                .landmarks
                .iter()
                .filter(|(_, lm)| lm.confidence >= min_confidence)
                .map(|(id, lm)| (*id, *lm))
                .collect(),
        }
    }

    /// Landmark position normalized to `[0, 1]` by the image size
    #[must_use]
    pub fn normalized(&self, id: LandmarkId) -> Option<Point2<f64>> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        self.get(id)
            .map(|lm| Point2::new(lm.x / f64::from(self.width), lm.y / f64::from(self.height)))
    }

    /// Whether every critical joint (head, arms, hips, knees) is present
    #[must_use]
    pub fn is_person_fully_detected(&self) -> bool {
        LandmarkId::CRITICAL.iter().all(|id| self.contains(*id))
    }
}
