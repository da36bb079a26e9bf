//! Two-stage capture orchestration.
//!
//! [`CaptureSession`] is the single-threaded state machine. [`CaptureController`]
//! wraps it behind one lock for use from a frame callback and a periodic
//! [`CaptureTimer`] at the same time.

/// Cues, status notifications and the sink trait
pub mod events;

/// Front/side capture state machine
pub mod session;

/// Thread-safe controller and countdown timer
pub mod controller;

pub use controller::{CaptureController, CaptureTimer, FrameSubmission};
pub use events::{dispatch, CaptureEvent, CaptureSink, Cue, CueKind, StatusEvent, StatusKind};
pub use session::{CapturePhase, CaptureSession, SessionSnapshot};
