use crate::overlay::OverlayFrame;

/// What a cue is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    /// Rate-limited correction
    Feedback,
    /// Sustained good pose detected, countdown started
    Locked,
    /// Countdown number
    Countdown,
    /// Countdown reached zero
    Terminal,
    /// Countdown cancelled because the pose was lost
    Cancelled,
    /// Stage change instruction
    Instruction,
    /// Both poses captured
    Complete,
}

/// Short text intended for speech synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub kind: CueKind,
    pub text: String,
}

impl Cue {
    #[must_use]
    pub fn new(kind: CueKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Discrete status notifications for UI and telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    CameraStarted,
    ReadyToCapture,
    FrontPoseCaptured,
    ReadyToCaptureSide,
    BothPosesCaptured,
}

impl StatusKind {
    /// Wire name of the status
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::CameraStarted => "camera_started",
            StatusKind::ReadyToCapture => "ready_to_capture",
            StatusKind::FrontPoseCaptured => "front_pose_captured",
            StatusKind::ReadyToCaptureSide => "ready_to_capture_side",
            StatusKind::BothPosesCaptured => "both_poses_captured",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status event with a human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusEvent {
    #[must_use]
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Output of the capture state machine
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent<I> {
    Cue(Cue),
    Status(StatusEvent),
    /// Both stages committed
    BothCaptured { front: I, side: I },
}

/// Receiver of capture output: speech, UI, downstream navigation.
///
/// Called outside the session lock but while the controller holds its
/// delivery lock; implementations may block briefly but must not call back
/// into the controller.
pub trait CaptureSink<I>: Send + Sync {
    /// A cue to speak
    fn on_cue(&self, cue: &Cue);

    /// A status notification
    fn on_status(&self, status: &StatusEvent);

    /// Both images are available
    fn on_both_captured(&self, front: &I, side: &I);

    /// Per-frame renderer data
    fn on_overlay(&self, _overlay: &OverlayFrame) {}
}

/// Deliver a batch of events to a sink, in order
pub fn dispatch<I, S: CaptureSink<I> + ?Sized>(sink: &S, events: &[CaptureEvent<I>]) {
    for event in events {
        match event {
            CaptureEvent::Cue(cue) => sink.on_cue(cue),
            CaptureEvent::Status(status) => sink.on_status(status),
            CaptureEvent::BothCaptured { front, side } => sink.on_both_captured(front, side),
        }
    }
}
