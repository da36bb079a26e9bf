use super::{
    events::{dispatch, CaptureEvent, CaptureSink, StatusEvent, StatusKind},
    session::{CaptureSession, SessionSnapshot},
};
use crate::{
    config::Config,
    evaluation::PoseEvaluator,
    landmark::LandmarkFrame,
    overlay::OverlayFrame,
    Result,
};
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Outcome of handing a frame to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSubmission {
    /// Frame was evaluated; overlay data for the renderer
    Processed(OverlayFrame),
    /// Another frame was still being processed
    Dropped,
}

/// Clears the in-flight flag when the frame is done, even on panic
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Serialises frame callbacks, timer ticks and resets onto one session.
///
/// Events are produced under the session lock and delivered to the sink
/// after it is released. Delivery and reset exclude each other through a
/// second lock, taken before the session lock: a batch produced before a
/// reset is discarded, and a reset waits for a batch already being delivered.
pub struct CaptureController<I, S> {
    evaluator: PoseEvaluator,
    session: Mutex<CaptureSession<I>>,
    delivery: Mutex<()>,
    sink: Arc<S>,
    in_flight: AtomicBool,
    generation: AtomicU64,
    dropped: AtomicU64,
    timer_interval: Duration,
}

impl<I, S> CaptureController<I, S>
where
    I: Clone + Send,
    S: CaptureSink<I>,
{
    /// Create a controller from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: &Config, sink: Arc<S>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            evaluator: PoseEvaluator::new(config),
            session: Mutex::new(CaptureSession::new(config)),
            delivery: Mutex::new(()),
            sink,
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            timer_interval: config.capture.timer_interval(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, CaptureSession<I>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn delivering(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(&self, generation: u64, events: &[CaptureEvent<I>]) {
        if events.is_empty() {
            return;
        }
        let _delivering = self.delivering();
        if self.generation.load(Ordering::Acquire) != generation {
            debug!("Discarding {} events from before reset", events.len());
            return;
        }
        dispatch(self.sink.as_ref(), events);
    }

    /// Start a fresh session and announce it
    pub fn start(&self) {
        let generation = self.reset();
        info!("Camera started");
        self.deliver(
            generation,
            &[CaptureEvent::Status(StatusEvent::new(StatusKind::CameraStarted, "Camera started"))],
        );
    }

    /// Evaluate one detector result against the active stage.
    ///
    /// `detection` is `None` when the detector found nothing or failed.
    /// Frames arriving while another is being processed are dropped.
    pub fn submit_frame(&self, detection: Option<LandmarkFrame>, image: I, now: Instant) -> FrameSubmission {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("Frame dropped while another is in flight ({dropped} total)");
            return FrameSubmission::Dropped;
        }
        let _guard = InFlight(&self.in_flight);

        let (evaluation, events, snapshot, generation) = {
            let mut session = self.lock();
            let evaluation = self.evaluator.evaluate(detection.as_ref(), session.stage());
            let events = session.on_frame(&evaluation, image, now);
            (
                evaluation,
                events,
                session.snapshot(),
                self.generation.load(Ordering::Acquire),
            )
        };

        self.deliver(generation, &events);
        let overlay = OverlayFrame::new(&evaluation, &snapshot);
        self.sink.on_overlay(&overlay);
        FrameSubmission::Processed(overlay)
    }

    /// Advance countdown and delayed cues
    pub fn tick(&self, now: Instant) {
        let (events, generation) = {
            let mut session = self.lock();
            (session.on_tick(now), self.generation.load(Ordering::Acquire))
        };
        self.deliver(generation, &events);
    }

    /// Discard all progress; events not yet delivered are dropped.
    ///
    /// Blocks until a batch the sink is currently receiving has finished, so
    /// nothing from the old session reaches the sink once this returns.
    /// Returns the new generation.
    pub fn reset(&self) -> u64 {
        let _delivering = self.delivering();
        let mut session = self.lock();
        session.reset();
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Re-emit the capture-complete event if both images exist
    pub fn navigate_to_result(&self) -> bool {
        let _delivering = self.delivering();
        let images = {
            let session = self.lock();
            session
                .front_image()
                .cloned()
                .zip(session.side_image().cloned())
        };

        match images {
            Some((front, side)) => {
                info!("Navigating to result");
                self.sink.on_both_captured(&front, &side);
                true
            }
            None => {
                info!("Result requested before both poses were captured, ignoring");
                false
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    /// Frames dropped because another was in flight
    #[must_use]
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn timer_interval(&self) -> Duration {
        self.timer_interval
    }

    #[must_use]
    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }
}

/// Background thread ticking a controller at its configured interval
pub struct CaptureTimer {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CaptureTimer {
    /// Start ticking `controller`
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned
    pub fn spawn<I, S>(controller: Arc<CaptureController<I, S>>) -> Result<Self>
    where
        I: Clone + Send + 'static,
        S: CaptureSink<I> + 'static,
    {
        let interval = controller.timer_interval();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("capture-timer".to_string())
            .spawn(move || {
                while !flag.load(Ordering::Acquire) {
                    thread::park_timeout(interval);
                    if flag.load(Ordering::Acquire) {
                        break;
                    }
                    controller.tick(Instant::now());
                }
                debug!("Capture timer exiting");
            })?;

        info!("Capture timer started ({} ms interval)", interval.as_millis());
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if let Err(e) = handle.join() {
                error!("Capture timer join failed: {e:?}");
            }
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for CaptureTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
