//! Emotion label definitions

use serde::{Deserialize, Serialize};

/// The four emotions the classifier can settle on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// Positive expression dominates
    Happy,
    /// Negative/low expression dominates
    Sad,
    /// Angry expression dominates
    Angry,
    /// Rest state, also the fallback on weak or missing signal
    Neutral,
}

impl Emotion {
    /// The three emotions that compete via the margin rule
    pub const ACTIVE: [Emotion; 3] = [Emotion::Happy, Emotion::Sad, Emotion::Angry];

    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            Emotion::Happy => "\x1b[33m",   // Yellow
            Emotion::Sad => "\x1b[34m",     // Blue
            Emotion::Angry => "\x1b[31m",   // Red
            Emotion::Neutral => "\x1b[90m", // Gray
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Get emoji for emotion
    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Happy => "😊",
            Emotion::Sad => "😢",
            Emotion::Angry => "😠",
            Emotion::Neutral => "😐",
        }
    }
}

impl Default for Emotion {
    fn default() -> Self {
        Emotion::Neutral
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Emotion::Happy => "HAPPY",
            Emotion::Sad => "SAD",
            Emotion::Angry => "ANGRY",
            Emotion::Neutral => "NEUTRAL",
        };
        write!(f, "{}", name)
    }
}
