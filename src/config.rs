//! Configuration management for the posture capture engine

use crate::{
    accuracy::{ReferencePose, SideReferencePose, Target},
    constants::{
        DEFAULT_ARM_RAISE_FEEDBACK_DEVIATION, DEFAULT_BOX_MARGIN, DEFAULT_CONFIRMATION_DELAY_MS,
        DEFAULT_COUNTDOWN_START, DEFAULT_COUNTDOWN_TICK_MS, DEFAULT_FEEDBACK_COOLDOWN_MS,
        DEFAULT_MIN_LANDMARK_CONFIDENCE, DEFAULT_REQUIRED_GOOD_FRAMES, DEFAULT_SIDE_CUE_DELAY_MS,
        DEFAULT_TIMER_INTERVAL_MS,
    },
    framing::TargetBox,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reference front pose
    pub front_reference: ReferencePose,

    /// Reference side pose
    pub side_reference: SideReferencePose,

    /// Target box configuration
    pub framing: FramingConfig,

    /// Capture timing
    pub capture: CaptureConfig,

    /// Spoken feedback
    pub feedback: FeedbackConfig,

    /// Landmark filtering
    pub detection: DetectionConfig,
}

/// Target box parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Fraction of the image excluded on each edge (0.0-0.5)
    pub box_margin: f64,
}

/// Countdown and commit timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Consecutive accurate frames before the countdown starts
    pub required_good_frames: u32,

    /// Countdown start value
    pub countdown_start: u32,

    /// Milliseconds between countdown decrements
    pub countdown_tick_ms: u64,

    /// Milliseconds between the terminal cue and the commit
    pub confirmation_delay_ms: u64,

    /// Milliseconds between the front commit and the "turn sideways" cue
    pub side_cue_delay_ms: u64,

    /// Period of the countdown timer
    pub timer_interval_ms: u64,
}

/// Spoken feedback parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Minimum milliseconds between corrective cues
    pub cooldown_ms: u64,

    /// Shoulder deviation (degrees) above which the arm-raise cue is used
    pub arm_raise_deviation: f64,
}

/// Landmark filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Landmarks below this confidence are treated as absent (0.0-1.0)
    pub min_confidence: f32,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            box_margin: DEFAULT_BOX_MARGIN,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            required_good_frames: DEFAULT_REQUIRED_GOOD_FRAMES,
            countdown_start: DEFAULT_COUNTDOWN_START,
            countdown_tick_ms: DEFAULT_COUNTDOWN_TICK_MS,
            confirmation_delay_ms: DEFAULT_CONFIRMATION_DELAY_MS,
            side_cue_delay_ms: DEFAULT_SIDE_CUE_DELAY_MS,
            timer_interval_ms: DEFAULT_TIMER_INTERVAL_MS,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_FEEDBACK_COOLDOWN_MS,
            arm_raise_deviation: DEFAULT_ARM_RAISE_FEEDBACK_DEVIATION,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_LANDMARK_CONFIDENCE,
        }
    }
}

impl FramingConfig {
    /// Target box described by this configuration
    #[must_use]
    pub fn target_box(&self) -> TargetBox {
        TargetBox::with_margin(self.box_margin)
    }
}

impl CaptureConfig {
    #[must_use]
    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }

    #[must_use]
    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_delay_ms)
    }

    #[must_use]
    pub fn side_cue_delay(&self) -> Duration {
        Duration::from_millis(self.side_cue_delay_ms)
    }

    #[must_use]
    pub fn timer_interval(&self) -> Duration {
        Duration::from_millis(self.timer_interval_ms)
    }
}

impl FeedbackConfig {
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

fn check_target(name: &str, target: &Target) -> Result<()> {
    if !target.tolerance.is_finite() || target.tolerance < 0.0 {
        return Err(Error::ConfigError(format!(
            "Tolerance for {name} must be a non-negative number, got {}",
            target.tolerance
        )));
    }
    if !target.target.is_finite() {
        return Err(Error::ConfigError(format!("Target for {name} must be finite")));
    }
    Ok(())
}

fn check_limit(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::ConfigError(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let front = &self.front_reference;
        check_target("shoulder_left", &front.shoulder_left)?;
        check_target("shoulder_right", &front.shoulder_right)?;
        check_target("elbow_left", &front.elbow_left)?;
        check_target("elbow_right", &front.elbow_right)?;
        check_limit("Spine tolerance", front.spine_tolerance)?;
        check_target("hip_left", &front.hip_left)?;
        check_target("hip_right", &front.hip_right)?;
        check_target("shoulder_level", &front.shoulder_level)?;
        check_target("leg_separation", &front.leg_separation)?;

        let side = &self.side_reference;
        check_target("neck_head", &side.neck_head)?;
        check_target("arm", &side.arm)?;
        check_target("spine", &side.spine)?;
        check_target("leg", &side.leg)?;
        check_target("shoulder_depth", &side.shoulder_depth)?;
        check_limit("Shoulder horizontal limit", side.shoulder_horizontal_max)?;
        check_limit("Arms overlap limit", side.arms_overlap_max)?;
        check_limit("Legs overlap limit", side.legs_overlap_max)?;

        if !(0.0..0.5).contains(&self.framing.box_margin) {
            return Err(Error::ConfigError(
                "Box margin must be in [0.0, 0.5)".to_string(),
            ));
        }

        if self.capture.required_good_frames == 0 {
            return Err(Error::ConfigError(
                "Required good frames must be greater than 0".to_string(),
            ));
        }
        if self.capture.countdown_start == 0 {
            return Err(Error::ConfigError(
                "Countdown start must be greater than 0".to_string(),
            ));
        }
        if self.capture.timer_interval_ms == 0 {
            return Err(Error::ConfigError(
                "Timer interval must be greater than 0".to_string(),
            ));
        }

        check_limit("Arm raise feedback deviation", self.feedback.arm_raise_deviation)?;

        if !(0.0..=1.0).contains(&self.detection.min_confidence) {
            return Err(Error::ConfigError(
                "Minimum confidence must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Posture Capture Configuration

# Reference front pose (angles in degrees, shoulder level in pixels)
front_reference:
  shoulder_left: { target: 45.0, tolerance: 15.0 }
  shoulder_right: { target: 45.0, tolerance: 15.0 }
  elbow_left: { target: 180.0, tolerance: 20.0 }
  elbow_right: { target: 180.0, tolerance: 20.0 }
  spine_tolerance: 10.0
  hip_left: { target: 180.0, tolerance: 15.0 }
  hip_right: { target: 180.0, tolerance: 15.0 }
  shoulder_level: { target: 0.0, tolerance: 30.0 }
  leg_separation: { target: 45.0, tolerance: 15.0 }

# Reference side pose
side_reference:
  neck_head: { target: 180.0, tolerance: 15.0 }
  arm: { target: 180.0, tolerance: 20.0 }
  spine: { target: 0.0, tolerance: 15.0 }
  leg: { target: 180.0, tolerance: 15.0 }
  shoulder_depth: { target: 0.0, tolerance: 30.0 }
  shoulder_horizontal_max: 100.0
  arms_overlap_max: 120.0
  legs_overlap_max: 120.0

# Target box
framing:
  box_margin: 0.05

# Countdown and commit timing
capture:
  required_good_frames: 10
  countdown_start: 5
  countdown_tick_ms: 1000
  confirmation_delay_ms: 2000
  side_cue_delay_ms: 1500
  timer_interval_ms: 100

# Spoken feedback
feedback:
  cooldown_ms: 3000
  arm_raise_deviation: 20.0

# Landmark filtering
detection:
  min_confidence: 0.5
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.front_reference, defaults.front_reference);
        assert_eq!(parsed.side_reference, defaults.side_reference);
        assert_eq!(parsed.capture.required_good_frames, defaults.capture.required_good_frames);
        assert_eq!(parsed.feedback.cooldown_ms, defaults.feedback.cooldown_ms);
        assert!((parsed.framing.box_margin - defaults.framing.box_margin).abs() < 1e-12);
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let parsed = Config::from_yaml("capture:\n  countdown_start: 3\n").unwrap();
        assert_eq!(parsed.capture.countdown_start, 3);
        assert_eq!(parsed.capture.required_good_frames, DEFAULT_REQUIRED_GOOD_FRAMES);
        assert_eq!(parsed.front_reference, ReferencePose::default());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let mut config = Config::default();
        config.front_reference.elbow_left.tolerance = -1.0;
        assert!(config.validate().is_err());
    }
}
