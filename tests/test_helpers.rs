//! Helper functions and utilities for tests

#![allow(dead_code)]

use posture_capture::{
    capture::{CaptureSink, Cue, CueKind, StatusEvent, StatusKind},
    landmark::{Landmark, LandmarkFrame, LandmarkId},
    overlay::OverlayFrame,
};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

pub const IMAGE_WIDTH: u32 = 720;
pub const IMAGE_HEIGHT: u32 = 1280;

const CONFIDENCE: f32 = 0.9;

/// Shorthand for a millisecond duration
pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Build a frame from `(id, x, y)` triples at a fixed confidence
pub fn frame_from(points: &[(LandmarkId, f64, f64)]) -> LandmarkFrame {
    let mut frame = LandmarkFrame::new(IMAGE_WIDTH, IMAGE_HEIGHT).unwrap();
    for &(id, x, y) in points {
        frame.insert(id, Landmark::new(x, y, CONFIDENCE));
    }
    frame
}

/// Person facing the camera in the reference pose: arms raised 45 degrees
/// and straight, torso upright, legs 45 degrees apart, centred in frame.
pub fn front_pose_frame() -> LandmarkFrame {
    use LandmarkId::*;
    // 45 degrees down and outwards from each shoulder
    let d = std::f64::consts::FRAC_1_SQRT_2;
    frame_from(&[
        (Nose, 360.0, 200.0),
        (LeftEar, 380.0, 190.0),
        (RightEar, 340.0, 190.0),
        (LeftShoulder, 420.0, 300.0),
        (RightShoulder, 300.0, 300.0),
        (LeftElbow, 420.0 + 150.0 * d, 300.0 + 150.0 * d),
        (RightElbow, 300.0 - 150.0 * d, 300.0 + 150.0 * d),
        (LeftWrist, 420.0 + 300.0 * d, 300.0 + 300.0 * d),
        (RightWrist, 300.0 - 300.0 * d, 300.0 + 300.0 * d),
        (LeftHip, 420.0, 600.0),
        (RightHip, 300.0, 600.0),
        // tan(22.5 degrees) * 200 either side of the hip midpoint
        (LeftKnee, 442.84, 800.0),
        (RightKnee, 277.16, 800.0),
        (LeftAnkle, 480.0, 1000.0),
        (RightAnkle, 240.0, 1000.0),
        (LeftHeel, 480.0, 1030.0),
        (RightHeel, 240.0, 1030.0),
        (LeftFootIndex, 500.0, 1040.0),
        (RightFootIndex, 220.0, 1040.0),
    ])
}

/// Front-facing person with both arms hanging down
pub fn arms_down_front_frame() -> LandmarkFrame {
    use LandmarkId::*;
    front_pose_frame()
        .with(LeftElbow, Landmark::new(425.0, 450.0, CONFIDENCE))
        .with(RightElbow, Landmark::new(295.0, 450.0, CONFIDENCE))
        .with(LeftWrist, Landmark::new(430.0, 600.0, CONFIDENCE))
        .with(RightWrist, Landmark::new(290.0, 600.0, CONFIDENCE))
}

/// Person standing side-on, facing left, all joints stacked
pub fn side_pose_frame() -> LandmarkFrame {
    use LandmarkId::*;
    frame_from(&[
        (Nose, 330.0, 215.0),
        (RightEar, 362.0, 210.0),
        (LeftShoulder, 360.0, 300.0),
        (RightShoulder, 365.0, 302.0),
        (LeftElbow, 360.0, 450.0),
        (RightElbow, 365.0, 450.0),
        (LeftWrist, 360.0, 600.0),
        (RightWrist, 365.0, 600.0),
        (LeftHip, 360.0, 600.0),
        (RightHip, 365.0, 600.0),
        (LeftKnee, 360.0, 800.0),
        (RightKnee, 365.0, 800.0),
        (LeftAnkle, 360.0, 1000.0),
        (RightAnkle, 365.0, 1000.0),
        (LeftHeel, 370.0, 1030.0),
        (RightHeel, 375.0, 1030.0),
        (LeftFootIndex, 330.0, 1040.0),
        (RightFootIndex, 335.0, 1040.0),
    ])
}

/// Everything a sink was told, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Cue(Cue),
    Status(StatusKind),
    BothCaptured(u32, u32),
}

/// Sink that records every event for later assertions
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Recorded>>,
    overlays: Mutex<Vec<OverlayFrame>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::Cue(cue) => Some(cue),
                _ => None,
            })
            .collect()
    }

    pub fn cue_texts(&self, kind: CueKind) -> Vec<String> {
        self.cues().into_iter().filter(|c| c.kind == kind).map(|c| c.text).collect()
    }

    pub fn statuses(&self) -> Vec<StatusKind> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::Status(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    pub fn captures(&self) -> Vec<(u32, u32)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::BothCaptured(front, side) => Some((front, side)),
                _ => None,
            })
            .collect()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn last_overlay(&self) -> Option<OverlayFrame> {
        self.overlays.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn push(&self, event: Recorded) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

impl CaptureSink<u32> for RecordingSink {
    fn on_cue(&self, cue: &Cue) {
        self.push(Recorded::Cue(cue.clone()));
    }

    fn on_status(&self, status: &StatusEvent) {
        self.push(Recorded::Status(status.kind));
    }

    fn on_both_captured(&self, front: &u32, side: &u32) {
        self.push(Recorded::BothCaptured(*front, *side));
    }

    fn on_overlay(&self, overlay: &OverlayFrame) {
        self.overlays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(overlay.clone());
    }
}
