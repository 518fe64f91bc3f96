//! Game mode definitions

use serde::{Deserialize, Serialize};

/// How difficulty is driven for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Slow fixed speed, no tricks
    Classic,
    /// Fast fixed speed, ~22% trick bubbles
    Challenge,
    /// Speed and size track the classified emotion
    Bio,
}

impl GameMode {
    /// Do pops in this mode gaze-bias the replacement spawn?
    pub fn uses_gaze(&self) -> bool {
        matches!(self, GameMode::Bio)
    }

    /// Can this mode produce trick bubbles?
    pub fn has_tricks(&self) -> bool {
        matches!(self, GameMode::Challenge)
    }
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::Classic
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameMode::Classic => "classic",
            GameMode::Challenge => "challenge",
            GameMode::Bio => "bio",
        };
        write!(f, "{}", name)
    }
}
