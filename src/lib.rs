//! Posture capture engine for guided front and side body photography.
//!
//! This library sits between an external body-landmark detector and the
//! camera, speech and UI collaborators of a capture screen:
//! - Geometry and posture metrics computed from 2D landmarks
//! - Framing checks against a normalized target box
//! - Accuracy comparison against configurable reference poses
//! - A two-stage (front, then side) capture state machine with countdown
//! - Rate-limited spoken feedback
//!
//! The per-frame pipeline is:
//! 1. Drop landmarks below the confidence threshold
//! 2. Check that a whole person is in view
//! 3. Check framing, compute metrics and compare with the stage reference
//! 4. Feed the verdict to the capture session
//!
//! # Examples
//!
//! ## Evaluating a single frame
//!
//! ```no_run
//! use posture_capture::{
//!     config::Config,
//!     evaluation::{PoseEvaluator, PoseStage},
//!     landmark::{Landmark, LandmarkFrame, LandmarkId},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let evaluator = PoseEvaluator::new(&Config::default());
//!
//! let frame = LandmarkFrame::new(720, 1280)?
//!     .with(LandmarkId::Nose, Landmark::new(360.0, 200.0, 0.98))
//!     .with(LandmarkId::LeftShoulder, Landmark::new(300.0, 320.0, 0.95));
//!
//! let evaluation = evaluator.evaluate(Some(&frame), PoseStage::Front);
//! if let Some(message) = evaluation.override_message() {
//!     println!("{message}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving a capture session
//!
//! ```no_run
//! use posture_capture::{
//!     capture::{CaptureController, CaptureSink, CaptureTimer, Cue, StatusEvent},
//!     config::Config,
//! };
//! use std::{sync::Arc, time::Instant};
//!
//! struct Speaker;
//!
//! impl CaptureSink<u64> for Speaker {
//!     fn on_cue(&self, cue: &Cue) {
//!         println!("say: {}", cue.text);
//!     }
//!     fn on_status(&self, status: &StatusEvent) {
//!         println!("status: {}", status.kind);
//!     }
//!     fn on_both_captured(&self, front: &u64, side: &u64) {
//!         println!("captured frames {front} and {side}");
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = Arc::new(CaptureController::new(&Config::default(), Arc::new(Speaker))?);
//! let _timer = CaptureTimer::spawn(Arc::clone(&controller))?;
//! controller.start();
//!
//! for frame_number in 0u64.. {
//!     // Landmarks come from the external detector
//!     let detection = None;
//!     controller.submit_frame(detection, frame_number, Instant::now());
//!     if controller.snapshot().is_complete() {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Angle and distance helpers on 2D points
pub mod geometry;

/// Body landmarks and per-frame landmark sets
pub mod landmark;

/// Posture metrics for the front and side poses
pub mod metrics;

/// Reference poses and metric comparison
pub mod accuracy;

/// Target box checks and framing diagnosis
pub mod framing;

/// Per-frame evaluation pipeline
pub mod evaluation;

/// Rate-limited corrective feedback
pub mod feedback;

/// Capture state machine, controller and timer
pub mod capture;

/// Renderer data for skeleton overlays
pub mod overlay;

/// Recorded-session replay
pub mod app;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
