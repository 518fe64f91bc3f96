//! Spawner: randomized bubble creation
//!
//! Geometry and velocity are sampled uniformly; near-horizontal headings
//! get kicked away so bubbles never slide along an edge indefinitely.
//! In bio mode spawns are pulled toward the player's gaze hint.

use rand::Rng;
use crate::types::{normalize_deg, Bubble, BubbleKind, GameMode, PlayArea, Point};
use crate::{
    GAZE_PULL, HORIZONTAL_EPSILON_RAD, HORIZONTAL_KICK_DEG, MAX_DIAM, MAX_SPEED, MIN_DIAM,
    MIN_SPEED, TRICK_PROBABILITY,
};

/// Fill palette for normal bubbles
const TINTS: [&str; 6] = [
    "#ff5c8a", "#5cc9ff", "#ffd166", "#8affc1", "#c65cff", "#ff9e5c",
];

/// Trick bubbles get one fixed, slightly-off tint
const TRICK_TINT: &str = "#4a4a5e";

/// Bubble factory; randomness is injected so tests can seed it
#[derive(Debug, Default)]
pub struct Spawner;

impl Spawner {
    /// Create new spawner
    pub fn new() -> Self {
        Self
    }

    /// Create one bubble inside the current play area
    pub fn spawn<R: Rng>(
        &self,
        rng: &mut R,
        mode: GameMode,
        area: &PlayArea,
        gaze: Option<Point>,
    ) -> Bubble {
        let diameter = rng.gen_range(MIN_DIAM..=MAX_DIAM);
        let radius = diameter / 2.0;

        let heading = corrected_heading(rng.gen_range(0.0..360.0), rng);
        let base_speed = rng.gen_range(MIN_SPEED..=MAX_SPEED);

        // Uniform position, then an optional pull toward the gaze point
        let mut x = rng.gen_range(area.left + radius..=(area.right - radius).max(area.left + radius));
        let mut y = rng.gen_range(
            area.top_safe + radius..=(area.bottom - radius).max(area.top_safe + radius),
        );
        if mode.uses_gaze() {
            if let Some(hint) = gaze {
                let target = area.denormalize(hint);
                x += GAZE_PULL * (target.x - x);
                y += GAZE_PULL * (target.y - y);
            }
        }
        let (x, y) = area.clamp_inside(x, y, radius);

        let kind = if mode.has_tricks() && rng.gen::<f64>() < TRICK_PROBABILITY {
            BubbleKind::Trick
        } else {
            BubbleKind::Normal
        };
        let tint = match kind {
            BubbleKind::Normal => TINTS[rng.gen_range(0..TINTS.len())],
            BubbleKind::Trick => TRICK_TINT,
        };

        Bubble::new(x, y, diameter, heading, base_speed, tint, kind)
    }
}

/// Kick headings that travel almost exactly left/right
///
/// A bubble whose heading sits within HORIZONTAL_EPSILON_RAD of 0° or 180°
/// bounces between the side walls forever; 45° of kick breaks that.
fn corrected_heading<R: Rng>(heading: f64, rng: &mut R) -> f64 {
    let rad = heading.to_radians();
    let two_pi = std::f64::consts::TAU;
    let to_horizontal = [0.0, std::f64::consts::PI, two_pi]
        .iter()
        .map(|h| (rad - h).abs())
        .fold(f64::INFINITY, f64::min);

    if to_horizontal < HORIZONTAL_EPSILON_RAD {
        let sign = if rng.gen::<bool>() { 1.0 } else { -1.0 };
        normalize_deg(heading + sign * HORIZONTAL_KICK_DEG)
    } else {
        heading
    }
}

// =============================================================================
// TESTS
// =============================================================================
