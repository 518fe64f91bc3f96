//! Session state for one run

use std::time::Instant;
use serde::{Deserialize, Serialize};

/// Score and timing for a single run
///
/// `score` can fall on trick pops but never below zero; `elapsed_ms` is
/// derived from the injected clock, never decremented. Once `is_over`
/// fires the state is terminal until an explicit restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    /// Wall start of this run (not serialized)
    #[serde(skip)]
    pub started: Option<Instant>,
    pub elapsed_ms: u64,
    pub is_over: bool,
    /// Pops that scored
    pub normal_pops: u32,
    /// Trick pops that penalized
    pub trick_pops: u32,
}

impl SessionState {
    /// Fresh state starting at `now`
    pub fn start(now: Instant) -> Self {
        Self {
            score: 0,
            started: Some(now),
            elapsed_ms: 0,
            is_over: false,
            normal_pops: 0,
            trick_pops: 0,
        }
    }

    /// Recompute elapsed from the clock; monotonic because Instant is
    pub fn update_elapsed(&mut self, now: Instant) {
        if let Some(started) = self.started {
            self.elapsed_ms = now.duration_since(started).as_millis() as u64;
        }
    }

    /// +1 for a normal pop
    pub fn award(&mut self) {
        self.score += 1;
        self.normal_pops += 1;
    }

    /// -1 for a trick pop, floored at zero
    pub fn penalize(&mut self) {
        self.score = self.score.saturating_sub(1);
        self.trick_pops += 1;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::start(Instant::now())
    }
}

// =============================================================================
// TESTS
// =============================================================================
