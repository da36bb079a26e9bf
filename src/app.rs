//! Replay of recorded detector output through a capture controller.
//!
//! A replay file is YAML with a list of timestamped steps. Frame steps carry
//! the detector output for one camera frame (`null` for an empty detection);
//! the step index doubles as the image handle.

use crate::{
    capture::{CaptureController, CaptureSink, Cue, FrameSubmission, StatusEvent, StatusKind},
    config::Config,
    landmark::LandmarkFrame,
    Error, Result,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// One recorded input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Detector output for one camera frame
    Frame {
        at_ms: u64,
        #[serde(default)]
        frame: Option<LandmarkFrame>,
    },
    /// Timer tick
    Tick { at_ms: u64 },
    /// Session reset
    Reset { at_ms: u64 },
}

impl ReplayStep {
    /// Milliseconds since the start of the recording
    #[must_use]
    pub fn at_ms(&self) -> u64 {
        match self {
            ReplayStep::Frame { at_ms, .. } | ReplayStep::Tick { at_ms } | ReplayStep::Reset { at_ms } => *at_ms,
        }
    }
}

/// A recorded session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplaySession {
    pub steps: Vec<ReplayStep>,
}

impl ReplaySession {
    /// Load a recorded session from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a recorded session
    pub fn from_yaml(content: &str) -> Result<Self> {
        let session: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::ReplayError(format!("Failed to parse session: {e}")))?;
        session.validate()?;
        Ok(session)
    }

    /// Check that timestamps never go backwards and frames have a size
    pub fn validate(&self) -> Result<()> {
        let mut previous = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at_ms() < previous {
                return Err(Error::ReplayError(format!(
                    "Step {index} at {} ms is earlier than the previous step at {previous} ms",
                    step.at_ms()
                )));
            }
            previous = step.at_ms();

            if let ReplayStep::Frame { frame: Some(frame), .. } = step {
                if frame.width == 0 || frame.height == 0 {
                    return Err(Error::ReplayError(format!(
                        "Step {index} has a frame with zero dimensions"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct SinkLog {
    cues: Vec<Cue>,
    statuses: Vec<StatusKind>,
    captured: Option<(usize, usize)>,
}

/// Sink that logs every event and keeps a record for the summary
#[derive(Debug, Default)]
pub struct LoggingSink {
    log: Mutex<SinkLog>,
}

impl LoggingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues received so far
    #[must_use]
    pub fn cues(&self) -> Vec<Cue> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).cues.clone()
    }

    /// Status kinds received so far
    #[must_use]
    pub fn statuses(&self) -> Vec<StatusKind> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).statuses.clone()
    }

    /// Front and side handles of the last capture-complete event
    #[must_use]
    pub fn captured(&self) -> Option<(usize, usize)> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).captured
    }
}

impl CaptureSink<usize> for LoggingSink {
    fn on_cue(&self, cue: &Cue) {
        info!("Cue ({:?}): {}", cue.kind, cue.text);
        self.log.lock().unwrap_or_else(PoisonError::into_inner).cues.push(cue.clone());
    }

    fn on_status(&self, status: &StatusEvent) {
        info!("Status {}: {}", status.kind, status.message);
        self.log.lock().unwrap_or_else(PoisonError::into_inner).statuses.push(status.kind);
    }

    fn on_both_captured(&self, front: &usize, side: &usize) {
        info!("Both poses captured: front frame {front}, side frame {side}");
        self.log.lock().unwrap_or_else(PoisonError::into_inner).captured = Some((*front, *side));
    }
}

/// Outcome of a replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySummary {
    pub frames_processed: usize,
    pub frames_dropped: u64,
    pub ticks: usize,
    pub resets: usize,
    pub cues: Vec<String>,
    pub statuses: Vec<StatusKind>,
    /// Front and side frame indices
    pub captured: Option<(usize, usize)>,
}

impl ReplaySummary {
    #[must_use]
    pub fn both_captured(&self) -> bool {
        self.captured.is_some()
    }
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Frames processed: {}", self.frames_processed)?;
        writeln!(f, "Frames dropped:   {}", self.frames_dropped)?;
        writeln!(f, "Timer ticks:      {}", self.ticks)?;
        writeln!(f, "Resets:           {}", self.resets)?;
        writeln!(f, "Cues spoken:      {}", self.cues.len())?;
        for cue in &self.cues {
            writeln!(f, "  - {cue}")?;
        }
        match self.captured {
            Some((front, side)) => write!(f, "Both poses captured: front frame {front}, side frame {side}"),
            None => write!(f, "Capture incomplete"),
        }
    }
}

/// Drives a controller from a recorded session
pub struct ReplayApp {
    config: Config,
}

impl ReplayApp {
    /// Create a replay app
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Replay every step in order, with timestamps relative to now
    pub fn run(&self, session: &ReplaySession) -> Result<ReplaySummary> {
        session.validate()?;

        let sink = Arc::new(LoggingSink::new());
        let controller = CaptureController::<usize, _>::new(&self.config, Arc::clone(&sink))?;
        let base = Instant::now();
        let mut summary = ReplaySummary::default();

        info!("Replaying {} steps", session.steps.len());
        controller.start();

        for (index, step) in session.steps.iter().enumerate() {
            let now = base + Duration::from_millis(step.at_ms());
            match step {
                ReplayStep::Frame { frame, .. } => {
                    if let FrameSubmission::Processed(overlay) = controller.submit_frame(frame.clone(), index, now) {
                        debug!(
                            "Frame {index}: stage {:?}, perfect {}, countdown {:?}",
                            overlay.stage, overlay.perfect_pose, overlay.countdown
                        );
                        summary.frames_processed += 1;
                    }
                }
                ReplayStep::Tick { .. } => {
                    controller.tick(now);
                    summary.ticks += 1;
                }
                ReplayStep::Reset { .. } => {
                    controller.reset();
                    summary.resets += 1;
                }
            }
        }

        summary.frames_dropped = controller.dropped_frames();
        summary.cues = sink.cues().into_iter().map(|cue| cue.text).collect();
        summary.statuses = sink.statuses();
        summary.captured = sink.captured();
        Ok(summary)
    }
}
