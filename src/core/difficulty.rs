//! Difficulty mapper: (mode, emotion) → multipliers
//!
//! Pure lookup, no state. The bio-mode angry size boost deliberately uses
//! the *raw* smoothed angry value, not its normalized share: the decision
//! layer and the size boost are driven by different views of the signal
//! and can diverge (high neutral can block the switch to angry while raw
//! angry still inflates bubbles).

use crate::types::{Difficulty, Emotion, GameMode};
use crate::{
    ANGRY_SIZE_GAIN, BIO_SPEED_MAX, BIO_SPEED_MIN, SPEED_CHALLENGE, SPEED_CLASSIC, SPEED_HAPPY,
    SPEED_SAD,
};

/// Multipliers for one tick
///
/// `angry_raw` is the smoothed (non-normalized) angry value; only bio mode
/// reads it.
pub fn difficulty_for(mode: GameMode, emotion: Emotion, angry_raw: f64) -> Difficulty {
    match mode {
        GameMode::Classic => Difficulty::new(SPEED_CLASSIC, 1.0),
        GameMode::Challenge => Difficulty::new(SPEED_CHALLENGE, 1.0),
        GameMode::Bio => {
            let speed = match emotion {
                Emotion::Happy => SPEED_HAPPY,
                Emotion::Sad => SPEED_SAD,
                Emotion::Angry | Emotion::Neutral => 1.0,
            };
            let angry = if angry_raw.is_finite() {
                angry_raw.clamp(0.0, 1.0)
            } else {
                0.0
            };
            Difficulty::new(
                speed.clamp(BIO_SPEED_MIN, BIO_SPEED_MAX),
                1.0 + ANGRY_SIZE_GAIN * angry,
            )
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
