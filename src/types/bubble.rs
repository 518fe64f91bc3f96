//! Bubble entity and play-area geometry
//!
//! Invariant: a `Bubble` is only built through [`Bubble::new`], which
//! defaults every non-finite field. Per-tick code can then assume valid
//! kinematics instead of re-checking each read.

use serde::{Deserialize, Serialize};
use crate::{MAX_DIAM, MAX_SPEED, MIN_DIAM, MIN_SPEED};

/// A point in play-area coordinates (or, for gaze hints, normalized [0,1]²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Scoring behavior of a bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleKind {
    /// +1 on pop
    Normal,
    /// -1 on pop, floored at 0 (challenge mode only)
    Trick,
}

/// One live bubble entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub x: f64,
    pub y: f64,
    /// Base diameter at spawn, pixels
    pub diameter: f64,
    /// Direction of travel, degrees in [0, 360)
    pub heading: f64,
    /// Effective speed after the last tick's difficulty scaling
    pub speed: f64,
    /// Immutable spawn speed; multipliers always apply to this, never to
    /// `speed`, so scaling cannot compound tick over tick
    pub base_speed: f64,
    /// Fill color, cosmetic only
    pub tint: String,
    pub kind: BubbleKind,
    /// Per-entity scale knob on top of the mode/emotion size multiplier
    pub hit_scale: f64,
    /// Consecutive ticks spent below the stuck-speed threshold
    #[serde(default)]
    pub stuck_frames: u32,
}

impl Bubble {
    /// Validating constructor: every non-finite or out-of-range field is
    /// replaced before the entity enters the collection.
    pub fn new(
        x: f64,
        y: f64,
        diameter: f64,
        heading: f64,
        base_speed: f64,
        tint: impl Into<String>,
        kind: BubbleKind,
    ) -> Self {
        let base_speed = finite_or(base_speed, MIN_SPEED).clamp(MIN_SPEED, MAX_SPEED);
        Self {
            x: finite_or(x, 0.0),
            y: finite_or(y, 0.0),
            diameter: finite_or(diameter, MIN_DIAM).clamp(MIN_DIAM, MAX_DIAM),
            heading: normalize_deg(finite_or(heading, 90.0)),
            speed: base_speed,
            base_speed,
            tint: tint.into(),
            kind,
            hit_scale: 1.0,
            stuck_frames: 0,
        }
    }

    /// Effective radius under the current size multiplier
    pub fn radius(&self, size_multiplier: f64) -> f64 {
        let m = finite_or(size_multiplier, 1.0).max(0.0);
        self.diameter * self.hit_scale * m / 2.0
    }

    /// Does this bubble contain the point, with an optional hit pad?
    pub fn contains(&self, point: Point, size_multiplier: f64, pad: f64) -> bool {
        let r = self.radius(size_multiplier) + pad.max(0.0);
        let dx = self.x - point.x;
        let dy = self.y - point.y;
        dx * dx + dy * dy <= r * r
    }
}

/// The safe play area: viewport minus reserved UI chrome
///
/// `top_safe` moves when the chrome resizes, so callers pass the current
/// bounds into every tick rather than caching them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub left: f64,
    pub right: f64,
    /// Top edge of the playable region, below the UI chrome
    pub top_safe: f64,
    pub bottom: f64,
}

impl PlayArea {
    pub fn new(left: f64, right: f64, top_safe: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top_safe,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        (self.right - self.left).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top_safe).max(0.0)
    }

    /// Clamp a point so a bubble of the given radius sits fully inside
    pub fn clamp_inside(&self, x: f64, y: f64, radius: f64) -> (f64, f64) {
        let r = radius.max(0.0);
        (
            x.clamp(self.left + r, (self.right - r).max(self.left + r)),
            y.clamp(self.top_safe + r, (self.bottom - r).max(self.top_safe + r)),
        )
    }

    /// Map a normalized [0,1]² point (e.g. a gaze hint) into the area
    pub fn denormalize(&self, p: Point) -> Point {
        Point::new(
            self.left + p.x.clamp(0.0, 1.0) * self.width(),
            self.top_safe + p.y.clamp(0.0, 1.0) * self.height(),
        )
    }
}

impl Default for PlayArea {
    fn default() -> Self {
        // Phone-ish portrait viewport with 80px of chrome
        Self::new(0.0, 480.0, 80.0, 800.0)
    }
}

/// Normalize an angle in degrees to [0, 360)
pub fn normalize_deg(deg: f64) -> f64 {
    let d = deg % 360.0;
    if d < 0.0 {
        d + 360.0
    } else {
        d
    }
}

fn finite_or(v: f64, default: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        default
    }
}

// =============================================================================
// TESTS
// =============================================================================
