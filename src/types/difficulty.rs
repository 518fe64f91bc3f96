//! Difficulty multipliers produced by the (mode, emotion) mapper

use serde::{Deserialize, Serialize};
use crate::{SPEED_CAP, SPEED_FLOOR};

/// Per-tick scaling applied to every bubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Applied to each bubble's immutable base speed
    pub speed_multiplier: f64,
    /// Applied to each bubble's diameter when computing effective radius
    pub size_multiplier: f64,
}

impl Difficulty {
    pub fn new(speed_multiplier: f64, size_multiplier: f64) -> Self {
        Self {
            speed_multiplier,
            size_multiplier,
        }
    }

    /// Final per-entity speed: base times multiplier, then the uniform
    /// floor and absolute cap
    pub fn final_speed(&self, base_speed: f64) -> f64 {
        let scaled = if base_speed.is_finite() {
            base_speed * self.speed_multiplier
        } else {
            SPEED_FLOOR
        };
        scaled.clamp(SPEED_FLOOR, SPEED_CAP)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_applies() {
        let d = Difficulty::new(0.5, 1.0);
        assert_eq!(d.final_speed(1.0), SPEED_FLOOR);
    }

    #[test]
    fn test_cap_applies() {
        let d = Difficulty::new(2.0, 1.0);
        assert_eq!(d.final_speed(10.0), SPEED_CAP);
    }

    #[test]
    fn test_midrange_passes_through() {
        let d = Difficulty::new(1.3, 1.0);
        assert!((d.final_speed(1.0) - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_base_degrades_to_floor() {
        let d = Difficulty::new(1.0, 1.0);
        assert_eq!(d.final_speed(f64::NAN), SPEED_FLOOR);
    }
}
