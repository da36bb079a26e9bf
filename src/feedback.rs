//! Rate-limited selection of corrective spoken feedback.

use crate::{
    accuracy::PoseAccuracy,
    config::FeedbackConfig,
    framing::FramingResult,
};
use log::debug;
use std::time::{Duration, Instant};

/// Picks at most one corrective message per cooldown window.
///
/// Priority: caller override, then the first framing issue, then the
/// first failing accuracy check of the active stage.
#[derive(Debug, Clone)]
pub struct FeedbackThrottler {
    cooldown: Duration,
    arm_raise_deviation: f64,
    last_spoken: Option<Instant>,
}

impl FeedbackThrottler {
    /// Create a throttler with the given cooldown
    #[must_use]
    pub fn new(cooldown: Duration, arm_raise_deviation: f64) -> Self {
        Self {
            cooldown,
            arm_raise_deviation,
            last_spoken: None,
        }
    }

    /// Create a throttler from configuration
    #[must_use]
    pub fn from_config(config: &FeedbackConfig) -> Self {
        Self::new(config.cooldown(), config.arm_raise_deviation)
    }

    /// Whether a message may be spoken at `now`
    #[must_use]
    pub fn is_ready(&self, now: Instant) -> bool {
        self.last_spoken
            .map_or(true, |last| now.saturating_duration_since(last) >= self.cooldown)
    }

    /// Choose the message to speak, ignoring the cooldown
    #[must_use]
    pub fn select(
        &self,
        override_message: Option<&str>,
        framing: Option<&FramingResult>,
        accuracy: Option<&dyn PoseAccuracy>,
    ) -> Option<String> {
        if let Some(message) = override_message {
            return Some(message.to_string());
        }
        if let Some(message) = framing.filter(|f| !f.in_box).and_then(FramingResult::primary_message) {
            return Some(message.to_string());
        }
        accuracy
            .and_then(|acc| acc.correction(self.arm_raise_deviation))
            .map(str::to_string)
    }

    /// Offer a diagnostic state; returns the message to speak if the
    /// cooldown has expired and something needs saying.
    pub fn offer(
        &mut self,
        now: Instant,
        override_message: Option<&str>,
        framing: Option<&FramingResult>,
        accuracy: Option<&dyn PoseAccuracy>,
    ) -> Option<String> {
        if !self.is_ready(now) {
            return None;
        }

        let message = self.select(override_message, framing, accuracy)?;
        debug!("Voice feedback: {message}");
        self.last_spoken = Some(now);
        Some(message)
    }

    /// Forget when the last message was spoken
    pub fn reset(&mut self) {
        self.last_spoken = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accuracy::{FrontAccuracy, ReferencePose};
    use crate::framing::FramingIssue;

    fn throttler() -> FeedbackThrottler {
        FeedbackThrottler::new(Duration::from_millis(3000), 20.0)
    }

    #[test]
    fn test_override_wins() {
        let framing = FramingResult {
            in_box: false,
            violations: Vec::new(),
            issues: vec![FramingIssue::TooLow],
        };
        let message = throttler().select(Some("Please stand in front of camera"), Some(&framing), None);
        assert_eq!(message.as_deref(), Some("Please stand in front of camera"));
    }

    #[test]
    fn test_framing_before_accuracy() {
        let reference = ReferencePose::default();
        let mut metrics = reference.ideal_metrics();
        metrics.spine_tilt = Some(40.0);
        let accuracy = FrontAccuracy::compare(&metrics, &reference, false);
        let framing = FramingResult {
            in_box: false,
            violations: Vec::new(),
            issues: vec![FramingIssue::TooFarRight],
        };

        let message = throttler().select(None, Some(&framing), Some(&accuracy));
        assert_eq!(message.as_deref(), Some("Move to your left"));

        let in_box = FramingResult {
            in_box: true,
            ..FramingResult::default()
        };
        let message = throttler().select(None, Some(&in_box), Some(&accuracy));
        assert_eq!(message.as_deref(), Some("Stand up straight"));
    }

    #[test]
    fn test_cooldown() {
        let mut throttler = throttler();
        let t0 = Instant::now();

        assert!(throttler.offer(t0, Some("a"), None, None).is_some());
        assert!(throttler.offer(t0 + Duration::from_millis(2999), Some("b"), None, None).is_none());
        assert!(throttler.offer(t0 + Duration::from_millis(3000), Some("c"), None, None).is_some());
    }

    #[test]
    fn test_nothing_to_say_does_not_start_cooldown() {
        let mut throttler = throttler();
        let t0 = Instant::now();

        assert!(throttler.offer(t0, None, None, None).is_none());
        assert!(throttler.offer(t0 + Duration::from_millis(10), Some("x"), None, None).is_some());
    }
}
