//! Constants used throughout the library

/// Consecutive accurate frames needed before the countdown starts
pub const DEFAULT_REQUIRED_GOOD_FRAMES: u32 = 10;

/// Countdown start value
pub const DEFAULT_COUNTDOWN_START: u32 = 5;

/// Time between countdown decrements
pub const DEFAULT_COUNTDOWN_TICK_MS: u64 = 1000;

/// Delay between the terminal cue and the commit
pub const DEFAULT_CONFIRMATION_DELAY_MS: u64 = 2000;

/// Delay before the "turn sideways" cue after the front commit
pub const DEFAULT_SIDE_CUE_DELAY_MS: u64 = 1500;

/// Period of the countdown timer thread
pub const DEFAULT_TIMER_INTERVAL_MS: u64 = 100;

/// Minimum time between two corrective cues
pub const DEFAULT_FEEDBACK_COOLDOWN_MS: u64 = 3000;

/// Shoulder deviation above which the arm-raise cue is spoken
pub const DEFAULT_ARM_RAISE_FEEDBACK_DEVIATION: f64 = 20.0;

/// Fraction of the image trimmed from each edge to form the target box
pub const DEFAULT_BOX_MARGIN: f64 = 0.05;

/// Landmarks below this confidence are treated as absent
pub const DEFAULT_MIN_LANDMARK_CONFIDENCE: f32 = 0.5;

/// Side view: maximum horizontal distance between shoulders (pixels)
pub const DEFAULT_SHOULDER_HORIZONTAL_MAX_PX: f64 = 100.0;

/// Side view: maximum mean horizontal spread of elbows and wrists (pixels)
pub const DEFAULT_ARMS_OVERLAP_MAX_PX: f64 = 120.0;

/// Side view: maximum mean horizontal spread of knees and ankles (pixels)
pub const DEFAULT_LEGS_OVERLAP_MAX_PX: f64 = 120.0;
