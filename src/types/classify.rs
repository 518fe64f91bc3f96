//! Classifier output and reason codes
//!
//! The decision ladder is surfaced as one coded reason per call so the
//! hysteresis/override/cooldown precedence stays observable and testable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::{Emotion, EmotionShares};

/// Output structure for each classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyOutput {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Emotion in force after this call
    pub emotion: Emotion,
    /// Normalized shares the decision saw
    pub shares: EmotionShares,
    /// Did this call change the active emotion?
    pub switched: bool,
    /// Which ladder rule decided
    pub reason: ClassifyReason,
}

impl ClassifyOutput {
    /// Create new output
    pub fn new(
        emotion: Emotion,
        shares: EmotionShares,
        switched: bool,
        reason: ClassifyReason,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            emotion,
            shares,
            switched,
            reason,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = self.emotion.color_code();
        let reset = Emotion::color_reset();
        let emoji = self.emotion.emoji();

        format!(
            "{}{} {} | h={:.2} s={:.2} a={:.2} n={:.2} | {}{}",
            color,
            emoji,
            self.emotion,
            self.shares.happy,
            self.shares.sad,
            self.shares.angry,
            self.shares.neutral,
            self.reason.code(),
            reset
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "emotion={} | h={:.2} s={:.2} a={:.2} n={:.2} | reason={}",
            self.emotion,
            self.shares.happy,
            self.shares.sad,
            self.shares.angry,
            self.shares.neutral,
            self.reason.code()
        )
    }
}

/// Reason codes for every classifier decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ClassifyReason {
    // =========================================================================
    // E1xx: Holds
    // =========================================================================
    /// Neutral held, its share still at or above NEUTRAL_OFF
    E101_HOLD_NEUTRAL,
    /// Current emotion held, its share still at or above EMOTION_OFF
    E102_HOLD_CURRENT,
    /// No rule fired, signal too weak or ambiguous
    E103_HOLD_AMBIGUOUS,

    // =========================================================================
    // E2xx: Switches
    // =========================================================================
    /// Neutral took over as the dominant share
    E201_STRONG_NEUTRAL,
    /// Raw smoothed value forced the switch past margin and cooldown
    E202_RAW_OVERRIDE,
    /// Top emotion won on share threshold plus margin
    E203_MARGIN_SWITCH,
    /// Fell back to neutral on its OFF threshold
    E204_NEUTRAL_FALLBACK,

    // =========================================================================
    // E3xx: Suppressions
    // =========================================================================
    /// A qualifying switch was blocked by the cooldown window
    E301_COOLDOWN_SUPPRESSED,
}

impl ClassifyReason {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::E101_HOLD_NEUTRAL => "E101_HOLD_NEUTRAL",
            Self::E102_HOLD_CURRENT => "E102_HOLD_CURRENT",
            Self::E103_HOLD_AMBIGUOUS => "E103_HOLD_AMBIGUOUS",
            Self::E201_STRONG_NEUTRAL => "E201_STRONG_NEUTRAL",
            Self::E202_RAW_OVERRIDE => "E202_RAW_OVERRIDE",
            Self::E203_MARGIN_SWITCH => "E203_MARGIN_SWITCH",
            Self::E204_NEUTRAL_FALLBACK => "E204_NEUTRAL_FALLBACK",
            Self::E301_COOLDOWN_SUPPRESSED => "E301_COOLDOWN_SUPPRESSED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::E101_HOLD_NEUTRAL => "Neutral held above its OFF threshold",
            Self::E102_HOLD_CURRENT => "Current emotion held above its OFF threshold",
            Self::E103_HOLD_AMBIGUOUS => "Weak signal, previous emotion kept",
            Self::E201_STRONG_NEUTRAL => "Neutral dominant, switched to neutral",
            Self::E202_RAW_OVERRIDE => "Raw value override, switched immediately",
            Self::E203_MARGIN_SWITCH => "Top emotion won by margin",
            Self::E204_NEUTRAL_FALLBACK => "Fell back to neutral",
            Self::E301_COOLDOWN_SUPPRESSED => "Switch suppressed by cooldown",
        }
    }

    /// Did this reason keep the previous emotion?
    pub fn is_hold(&self) -> bool {
        matches!(
            self,
            Self::E101_HOLD_NEUTRAL
                | Self::E102_HOLD_CURRENT
                | Self::E103_HOLD_AMBIGUOUS
                | Self::E301_COOLDOWN_SUPPRESSED
        )
    }
}

impl std::fmt::Display for ClassifyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
