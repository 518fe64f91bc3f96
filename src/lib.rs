//! MoodPop: affect-adaptive bubble-pop game core
//!
//! Two engines with real structure: a hysteresis classifier that turns
//! noisy facial-expression scores into one stable emotion, and a per-frame
//! bubble simulation whose speed/size parameters that emotion drives.

pub mod core;
pub mod types;

// =============================================================================
// SIGNAL SMOOTHING
// =============================================================================

/// EMA factor applied when a sample arrives (fast-adapting)
pub const ALPHA_SAMPLE: f64 = 0.75;

/// EMA factor for decay toward rest when no face is detected (slow)
pub const ALPHA_DECAY: f64 = 0.3;

/// Guard against division by zero when normalizing shares
pub const SHARE_EPSILON: f64 = 1e-6;

// =============================================================================
// CLASSIFIER THRESHOLDS
// =============================================================================

/// Neutral keeps the floor while its share stays at or above this
pub const NEUTRAL_OFF: f64 = 0.40;

/// A non-neutral emotion holds while its share stays at or above this
pub const EMOTION_OFF: f64 = 0.33;

/// Neutral takes over when it is the largest share and at or above this
pub const NEUTRAL_ON: f64 = 0.58;

/// Minimum top share for a margin-based switch
pub const EMOTION_ON: f64 = 0.40;

/// Top share must lead second place by this much to switch
pub const SWITCH_MARGIN: f64 = 0.05;

/// Raw (non-normalized) smoothed values that force a switch outright
pub const OVERRIDE_HAPPY: f64 = 0.42;
pub const OVERRIDE_SAD: f64 = 0.38;
pub const OVERRIDE_ANGRY: f64 = 0.40;

/// Minimum time between non-override switches (milliseconds)
/// Long enough to kill oscillation near thresholds, short enough to track
/// a real change of expression
pub const SWITCH_COOLDOWN_MS: u64 = 2200;

// =============================================================================
// DIFFICULTY MAPPING
// =============================================================================

/// Fixed speed multiplier in classic mode
pub const SPEED_CLASSIC: f64 = 0.75;

/// Fixed speed multiplier in challenge mode
pub const SPEED_CHALLENGE: f64 = 1.3;

/// Bio-mode speed multipliers per emotion (angry/neutral stay at 1.0)
pub const SPEED_HAPPY: f64 = 1.3;
pub const SPEED_SAD: f64 = 0.8;

/// Bio-mode multiplier is clamped to this band before use
pub const BIO_SPEED_MIN: f64 = 0.5;
pub const BIO_SPEED_MAX: f64 = 1.6;

/// Angry inflates bubble size by up to this fraction (continuous, raw-driven)
pub const ANGRY_SIZE_GAIN: f64 = 0.35;

/// Per-entity speed never drops below this after all scaling, in any mode
pub const SPEED_FLOOR: f64 = 0.9;

/// Absolute per-entity speed cap
pub const SPEED_CAP: f64 = 3.0;

// =============================================================================
// SIMULATION
// =============================================================================

/// Random heading jitter per tick (degrees, plus/minus)
pub const HEADING_JITTER_DEG: f64 = 0.35;

/// Extra heading perturbation on boundary reflection (degrees, plus/minus)
pub const BOUNCE_JITTER_DEG: f64 = 1.5;

/// Effective speed below this counts as stuck
pub const STUCK_SPEED: f64 = 0.15;

/// Consecutive stuck ticks before a forced recovery
pub const STUCK_TICKS: u32 = 18;

// =============================================================================
// SPAWNER
// =============================================================================

/// Bubble diameter range at spawn (pixels)
pub const MIN_DIAM: f64 = 30.0;
pub const MAX_DIAM: f64 = 70.0;

/// Base speed range at spawn (pixels per tick)
pub const MIN_SPEED: f64 = 0.6;
pub const MAX_SPEED: f64 = 2.2;

/// Probability of a trick bubble in challenge mode
pub const TRICK_PROBABILITY: f64 = 0.22;

/// How far a bio-mode spawn is pulled toward the gaze hint (0..1)
pub const GAZE_PULL: f64 = 0.6;

/// Headings within this of perfectly horizontal get kicked away (radians)
pub const HORIZONTAL_EPSILON_RAD: f64 = 0.2;

/// Kick applied to near-horizontal spawn headings (degrees)
pub const HORIZONTAL_KICK_DEG: f64 = 45.0;

// =============================================================================
// SESSION
// =============================================================================

/// Default run length (seconds)
pub const DEFAULT_DURATION_SECS: u64 = 60;

/// Default live bubble count
pub const DEFAULT_BUBBLES: usize = 12;

/// Extra hit radius granted to touch input (pixels)
pub const TOUCH_HIT_PAD: f64 = 12.0;

/// Nominal frame interval when driving the loop headlessly (milliseconds)
pub const FRAME_MS: u64 = 16;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
