use super::events::{CaptureEvent, Cue, CueKind, StatusEvent, StatusKind};
use crate::{
    accuracy::PoseAccuracy,
    config::{CaptureConfig, Config},
    evaluation::{FrameEvaluation, PoseStage},
    feedback::FeedbackThrottler,
};
use log::{debug, info, warn};
use std::time::Instant;

const HOLD_POSITION: &str = "Hold your position";
const TERMINAL_CUE: &str = "Smile!";
const TURN_SIDEWAYS: &str = "Great! Now turn sideways. Face left and show your side to the camera";
const BOTH_CAPTURED: &str = "Perfect! Both poses captured!";

/// Progress within the current stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapturePhase {
    /// No person in view
    Searching,
    /// Person in view, pose inaccurate or out of frame
    Aligning,
    /// Accurate pose, accumulating consecutive good frames
    Holding,
    /// Countdown running
    Counting,
    /// Countdown finished, waiting to commit
    Confirming,
    /// Both images committed
    Captured,
}

#[derive(Debug, Clone, Copy)]
struct Countdown {
    value: u32,
    last_tick: Instant,
    confirming_since: Option<Instant>,
}

#[derive(Debug, Clone)]
struct PendingCue {
    due: Instant,
    cue: Cue,
}

/// Read-only view of a session for renderers and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub stage: PoseStage,
    pub phase: CapturePhase,
    pub good_frames: u32,
    /// Current countdown value while counting or confirming
    pub countdown: Option<u32>,
    pub front_captured: bool,
    pub side_captured: bool,
}

impl SessionSnapshot {
    /// Countdown running or waiting to commit
    #[must_use]
    pub fn is_counting(&self) -> bool {
        self.countdown.is_some()
    }

    /// Both stages committed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.front_captured && self.side_captured
    }
}

/// State of one two-stage capture attempt.
///
/// The session never reads the clock: every input carries its own `now`.
/// Frames and timer ticks both funnel into the same countdown step, so the
/// outcome does not depend on which of them arrives first.
#[derive(Debug)]
pub struct CaptureSession<I> {
    config: CaptureConfig,
    stage: PoseStage,
    phase: CapturePhase,
    good_frames: u32,
    countdown: Option<Countdown>,
    latest_image: Option<I>,
    front_image: Option<I>,
    side_image: Option<I>,
    pending_cue: Option<PendingCue>,
    feedback: FeedbackThrottler,
}

impl<I: Clone> CaptureSession<I> {
    /// Create a session at the start of the front stage
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.capture.clone(),
            stage: PoseStage::Front,
            phase: CapturePhase::Searching,
            good_frames: 0,
            countdown: None,
            latest_image: None,
            front_image: None,
            side_image: None,
            pending_cue: None,
            feedback: FeedbackThrottler::from_config(&config.feedback),
        }
    }

    #[must_use]
    pub fn stage(&self) -> PoseStage {
        self.stage
    }

    #[must_use]
    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    #[must_use]
    pub fn good_frames(&self) -> u32 {
        self.good_frames
    }

    #[must_use]
    pub fn front_image(&self) -> Option<&I> {
        self.front_image.as_ref()
    }

    #[must_use]
    pub fn side_image(&self) -> Option<&I> {
        self.side_image.as_ref()
    }

    /// Both images committed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.front_image.is_some() && self.side_image.is_some()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            stage: self.stage,
            phase: self.phase,
            good_frames: self.good_frames,
            countdown: self.countdown.map(|c| c.value),
            front_captured: self.front_image.is_some(),
            side_captured: self.side_image.is_some(),
        }
    }

    /// Discard all progress and return to the start of the front stage
    pub fn reset(&mut self) {
        info!("Resetting capture session");
        self.stage = PoseStage::Front;
        self.phase = CapturePhase::Searching;
        self.good_frames = 0;
        self.countdown = None;
        self.latest_image = None;
        self.front_image = None;
        self.side_image = None;
        self.pending_cue = None;
        self.feedback.reset();
    }

    /// Process one evaluated frame together with its image
    pub fn on_frame(&mut self, evaluation: &FrameEvaluation, image: I, now: Instant) -> Vec<CaptureEvent<I>> {
        let mut events = Vec::new();
        if self.is_complete() {
            return events;
        }
        if evaluation.stage != self.stage {
            debug!("Ignoring frame evaluated for {:?} during {:?}", evaluation.stage, self.stage);
            return events;
        }
        self.release_pending_cue(now, &mut events);

        if evaluation.is_pose_accurate() {
            self.latest_image = Some(image);
            if self.countdown.is_some() {
                self.advance(now, &mut events);
            } else {
                self.good_frames += 1;
                if self.good_frames >= self.config.required_good_frames {
                    self.start_countdown(now, &mut events);
                } else {
                    self.phase = CapturePhase::Holding;
                }
            }
            return events;
        }

        self.good_frames = 0;
        self.phase = if evaluation.person_detected {
            CapturePhase::Aligning
        } else {
            CapturePhase::Searching
        };

        let accuracy = evaluation.accuracy.as_ref().map(|acc| acc as &dyn PoseAccuracy);
        if let Some(message) =
            self.feedback
                .offer(now, evaluation.override_message(), evaluation.framing.as_ref(), accuracy)
        {
            events.push(CaptureEvent::Cue(Cue::new(CueKind::Feedback, message)));
        }

        if self.countdown.take().is_some() {
            info!("{:?} pose lost, countdown cancelled", self.stage);
            self.latest_image = None;
            events.push(CaptureEvent::Cue(Cue::new(CueKind::Cancelled, HOLD_POSITION)));
        }

        events
    }

    /// Periodic timer tick driving the countdown and delayed cues
    pub fn on_tick(&mut self, now: Instant) -> Vec<CaptureEvent<I>> {
        let mut events = Vec::new();
        if self.is_complete() {
            return events;
        }
        self.release_pending_cue(now, &mut events);
        self.advance(now, &mut events);
        events
    }

    fn release_pending_cue(&mut self, now: Instant, events: &mut Vec<CaptureEvent<I>>) {
        if self.pending_cue.as_ref().is_some_and(|p| now >= p.due) {
            if let Some(pending) = self.pending_cue.take() {
                events.push(CaptureEvent::Cue(pending.cue));
            }
        }
    }

    fn start_countdown(&mut self, now: Instant, events: &mut Vec<CaptureEvent<I>>) {
        info!(
            "{:?} pose held for {} frames, starting countdown",
            self.stage, self.good_frames
        );
        self.countdown = Some(Countdown {
            value: self.config.countdown_start,
            last_tick: now,
            confirming_since: None,
        });
        self.phase = CapturePhase::Counting;

        let (lock_cue, status) = match self.stage {
            PoseStage::Front => (
                "Perfect posture! Hold still",
                StatusEvent::new(StatusKind::ReadyToCapture, "Front pose ready, countdown started"),
            ),
            PoseStage::Side => (
                "Perfect! Hold still",
                StatusEvent::new(StatusKind::ReadyToCaptureSide, "Side pose ready, countdown started"),
            ),
        };
        events.push(CaptureEvent::Cue(Cue::new(CueKind::Locked, lock_cue)));
        events.push(CaptureEvent::Status(status));
    }

    fn advance(&mut self, now: Instant, events: &mut Vec<CaptureEvent<I>>) {
        let Some(countdown) = self.countdown.as_mut() else {
            return;
        };

        match countdown.confirming_since {
            None => {
                if now.saturating_duration_since(countdown.last_tick) < self.config.countdown_tick() {
                    return;
                }
                countdown.value = countdown.value.saturating_sub(1);
                countdown.last_tick = now;
                if countdown.value > 0 {
                    debug!("Countdown {}", countdown.value);
                    events.push(CaptureEvent::Cue(Cue::new(CueKind::Countdown, countdown.value.to_string())));
                } else {
                    countdown.confirming_since = Some(now);
                    self.phase = CapturePhase::Confirming;
                    events.push(CaptureEvent::Cue(Cue::new(CueKind::Terminal, TERMINAL_CUE)));
                }
            }
            Some(since) => {
                if now.saturating_duration_since(since) >= self.config.confirmation_delay() {
                    self.commit(now, events);
                }
            }
        }
    }

    fn clear_progress(&mut self) {
        self.good_frames = 0;
        self.countdown = None;
        self.latest_image = None;
    }

    fn commit(&mut self, now: Instant, events: &mut Vec<CaptureEvent<I>>) {
        let Some(image) = self.latest_image.take() else {
            warn!("Confirmation elapsed without a frame to commit, restarting stage");
            self.clear_progress();
            self.phase = CapturePhase::Aligning;
            return;
        };

        let already_captured = match self.stage {
            PoseStage::Front => self.front_image.is_some(),
            PoseStage::Side => self.side_image.is_some(),
        };
        if already_captured {
            warn!("{:?} pose already captured, discarding commit", self.stage);
            self.clear_progress();
            self.phase = CapturePhase::Aligning;
            return;
        }

        match self.stage {
            PoseStage::Front => {
                self.front_image = Some(image);
                self.clear_progress();
                info!("Front pose captured, moving to side stage");
                events.push(CaptureEvent::Status(StatusEvent::new(
                    StatusKind::FrontPoseCaptured,
                    "Front pose captured successfully",
                )));

                self.stage = PoseStage::Side;
                self.phase = CapturePhase::Searching;
                self.pending_cue = Some(PendingCue {
                    due: now + self.config.side_cue_delay(),
                    cue: Cue::new(CueKind::Instruction, TURN_SIDEWAYS),
                });
            }
            PoseStage::Side => {
                let Some(front) = self.front_image.clone() else {
                    warn!("Side commit attempted without a front image");
                    return;
                };
                self.side_image = Some(image.clone());
                self.clear_progress();
                self.phase = CapturePhase::Captured;
                info!("Side pose captured, session complete");

                events.push(CaptureEvent::Cue(Cue::new(CueKind::Complete, BOTH_CAPTURED)));
                events.push(CaptureEvent::Status(StatusEvent::new(
                    StatusKind::BothPosesCaptured,
                    "Both front and side poses captured successfully",
                )));
                events.push(CaptureEvent::BothCaptured { front, side: image });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accuracy::{FrontAccuracy, ReferencePose, StageAccuracy};
    use crate::framing::FramingResult;
    use std::time::Duration;

    fn accurate_front() -> FrameEvaluation {
        let reference = ReferencePose::default();
        FrameEvaluation {
            stage: PoseStage::Front,
            landmarks: None,
            person_detected: true,
            framing: Some(FramingResult {
                in_box: true,
                ..FramingResult::default()
            }),
            accuracy: Some(StageAccuracy::Front(FrontAccuracy::compare(
                &reference.ideal_metrics(),
                &reference,
                true,
            ))),
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_lock_after_required_frames() {
        let mut session = CaptureSession::<u32>::new(&Config::default());
        let t0 = Instant::now();

        for i in 0..9 {
            let events = session.on_frame(&accurate_front(), i, t0 + ms(u64::from(i) * 33));
            assert!(events.is_empty());
            assert_eq!(session.phase(), CapturePhase::Holding);
        }
        let events = session.on_frame(&accurate_front(), 9, t0 + ms(300));
        assert_eq!(session.phase(), CapturePhase::Counting);
        assert!(events.iter().any(|e| matches!(
            e,
            CaptureEvent::Status(StatusEvent { kind: StatusKind::ReadyToCapture, .. })
        )));
    }

    #[test]
    fn test_tick_before_interval_does_nothing() {
        let mut session = CaptureSession::<u32>::new(&Config::default());
        let t0 = Instant::now();
        for i in 0..10 {
            session.on_frame(&accurate_front(), i, t0);
        }
        assert!(session.on_tick(t0 + ms(999)).is_empty());
        assert_eq!(session.snapshot().countdown, Some(5));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = CaptureSession::<u32>::new(&Config::default());
        let t0 = Instant::now();
        for i in 0..10 {
            session.on_frame(&accurate_front(), i, t0);
        }
        session.reset();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, CapturePhase::Searching);
        assert_eq!(snapshot.stage, PoseStage::Front);
        assert_eq!(snapshot.good_frames, 0);
        assert!(!snapshot.is_counting());
        assert!(session.on_tick(t0 + ms(5000)).is_empty());
    }

    #[test]
    fn test_commit_never_overwrites_captured_stage() {
        let mut session = CaptureSession::<u32>::new(&Config::default());
        session.front_image = Some(77);
        let t0 = Instant::now();
        for i in 0..10 {
            session.on_frame(&accurate_front(), i, t0);
        }
        for i in 1..=5 {
            session.on_tick(t0 + ms(i * 1000));
        }

        let events = session.on_tick(t0 + ms(7000));
        assert!(events.is_empty());
        assert_eq!(session.front_image(), Some(&77));
        assert_eq!(session.stage(), PoseStage::Front);
        assert_eq!(session.phase(), CapturePhase::Aligning);
        assert!(!session.snapshot().is_counting());
        assert!(session.on_tick(t0 + ms(10_000)).is_empty());
    }

    #[test]
    fn test_frame_for_other_stage_ignored() {
        let mut session = CaptureSession::<u32>::new(&Config::default());
        let mut evaluation = accurate_front();
        evaluation.stage = PoseStage::Side;
        assert!(session.on_frame(&evaluation, 1, Instant::now()).is_empty());
        assert_eq!(session.good_frames(), 0);
    }
}
