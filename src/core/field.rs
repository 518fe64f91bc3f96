//! Bubble field: per-tick entity simulation
//!
//! One tick per rendered frame. Every tick re-reads the play area and the
//! difficulty multipliers, so layout changes and stale emotion state are
//! reconciled on the spot instead of cached. No entity update can error;
//! anything non-finite is rebuilt in place.

use rand::Rng;
use crate::core::difficulty::difficulty_for;
use crate::types::{normalize_deg, Bubble, BubbleKind, Difficulty, Emotion, GameMode, PlayArea, Point};
use crate::{
    BOUNCE_JITTER_DEG, HEADING_JITTER_DEG, SPEED_CAP, SPEED_FLOOR, STUCK_SPEED, STUCK_TICKS,
    TOUCH_HIT_PAD,
};

/// How far a recovered bubble is pushed off a boundary it touches
const RECOVERY_NUDGE: f64 = 4.0;

/// Owns the live bubble collection
#[derive(Debug, Default)]
pub struct BubbleField {
    bubbles: Vec<Bubble>,
    /// Multipliers from the most recent tick; hit tests reuse them
    difficulty: Difficulty,
}

impl BubbleField {
    /// Empty field
    pub fn new() -> Self {
        Self {
            bubbles: Vec::new(),
            difficulty: Difficulty::default(),
        }
    }

    /// Field seeded with an existing collection (tests, restarts)
    pub fn from_bubbles(bubbles: Vec<Bubble>) -> Self {
        Self {
            bubbles,
            difficulty: Difficulty::default(),
        }
    }

    /// Advance every bubble one frame
    pub fn tick<R: Rng>(
        &mut self,
        rng: &mut R,
        area: &PlayArea,
        mode: GameMode,
        emotion: Emotion,
        angry_raw: f64,
    ) {
        let difficulty = difficulty_for(mode, emotion, angry_raw);
        self.difficulty = difficulty;

        for bubble in &mut self.bubbles {
            step_bubble(bubble, rng, area, difficulty);
        }
    }

    /// First bubble containing the point, in iteration order
    pub fn hit_test(&self, point: Point, touch: bool) -> Option<usize> {
        let pad = if touch { TOUCH_HIT_PAD } else { 0.0 };
        self.bubbles
            .iter()
            .position(|b| b.contains(point, self.difficulty.size_multiplier, pad))
    }

    /// Swap one slot for a fresh spawn
    pub fn replace(&mut self, index: usize, bubble: Bubble) {
        if index < self.bubbles.len() {
            self.bubbles[index] = bubble;
        }
    }

    /// Drop everything and install a new collection
    pub fn reset(&mut self, bubbles: Vec<Bubble>) {
        self.bubbles = bubbles;
        self.difficulty = Difficulty::default();
    }

    /// Live bubbles, read-only (the rendering sink's view)
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Multipliers from the most recent tick
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }
}

/// One bubble, one frame
fn step_bubble<R: Rng>(bubble: &mut Bubble, rng: &mut R, area: &PlayArea, difficulty: Difficulty) {
    // Tiny heading jitter keeps trajectories from looking machine-straight
    bubble.heading = normalize_deg(
        bubble.heading + rng.gen_range(-HEADING_JITTER_DEG..=HEADING_JITTER_DEG),
    );

    let radius = bubble.radius(difficulty.size_multiplier);
    bubble.speed = difficulty.final_speed(bubble.base_speed);

    let (old_x, old_y) = (bubble.x, bubble.y);
    let rad = bubble.heading.to_radians();
    bubble.x += bubble.speed * rad.cos();
    bubble.y += bubble.speed * rad.sin();

    reflect(bubble, rng, area, radius);

    // Stuck watch: wedged bubbles barely displace even though their speed
    // field reads healthy
    let moved = ((bubble.x - old_x).powi(2) + (bubble.y - old_y).powi(2)).sqrt();
    if moved < STUCK_SPEED {
        bubble.stuck_frames += 1;
        if bubble.stuck_frames > STUCK_TICKS {
            recover(bubble, rng, area, radius);
        }
    } else {
        bubble.stuck_frames = 0;
    }

    // A malformed entity degrades to a safe rebuild, never a broken tick
    if !(bubble.x.is_finite()
        && bubble.y.is_finite()
        && bubble.heading.is_finite()
        && bubble.speed.is_finite())
    {
        let cx = area.left + area.width() / 2.0;
        let cy = area.top_safe + area.height() / 2.0;
        *bubble = Bubble::new(
            cx,
            cy,
            bubble.diameter,
            rng.gen_range(0.0..360.0),
            bubble.base_speed,
            bubble.tint.clone(),
            bubble.kind,
        );
    }
}

/// Mirror the heading off any boundary the bubble crossed this frame
fn reflect<R: Rng>(bubble: &mut Bubble, rng: &mut R, area: &PlayArea, radius: f64) {
    let mut bounced = false;

    if bubble.x - radius < area.left || bubble.x + radius > area.right {
        bubble.heading = normalize_deg(180.0 - bubble.heading);
        bounced = true;
    }
    if bubble.y - radius < area.top_safe || bubble.y + radius > area.bottom {
        bubble.heading = normalize_deg(360.0 - bubble.heading);
        bounced = true;
    }

    if bounced {
        // Perturbation breaks perfectly periodic bouncing and keeps
        // entities from falling into symmetric lockstep
        bubble.heading = normalize_deg(
            bubble.heading + rng.gen_range(-BOUNCE_JITTER_DEG..=BOUNCE_JITTER_DEG),
        );
        let (x, y) = area.clamp_inside(bubble.x, bubble.y, radius);
        bubble.x = x;
        bubble.y = y;
    }
}

/// Forced escape for a wedged bubble
fn recover<R: Rng>(bubble: &mut Bubble, rng: &mut R, area: &PlayArea, radius: f64) {
    bubble.heading = rng.gen_range(0.0..360.0);
    bubble.speed = (SPEED_FLOOR * 1.5).min(SPEED_CAP);

    // Push off whichever boundary it is resting on
    if bubble.x - radius <= area.left {
        bubble.x += RECOVERY_NUDGE;
    }
    if bubble.x + radius >= area.right {
        bubble.x -= RECOVERY_NUDGE;
    }
    if bubble.y - radius <= area.top_safe {
        bubble.y += RECOVERY_NUDGE;
    }
    if bubble.y + radius >= area.bottom {
        bubble.y -= RECOVERY_NUDGE;
    }
    let (x, y) = area.clamp_inside(bubble.x, bubble.y, radius);
    bubble.x = x;
    bubble.y = y;

    bubble.stuck_frames = 0;
}

// =============================================================================
// TESTS
// =============================================================================
