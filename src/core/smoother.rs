//! Signal smoother: EMA of raw expression scores
//!
//! Fast-adapting when samples arrive, slow decay toward the rest vector
//! (full neutral) when the face is lost. A missing sample is a normal
//! input, never an error.

use crate::types::{EmotionShares, ExpressionSample, SmoothedState};
use crate::{ALPHA_DECAY, ALPHA_SAMPLE};

/// Holds the smoothed state vector across a session
#[derive(Debug)]
pub struct SignalSmoother {
    state: SmoothedState,
    // Running share sums for the end-of-run aggregate
    share_totals: [f64; 4],
    updates: u64,
}

impl Default for SignalSmoother {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSmoother {
    /// Create a smoother at rest
    pub fn new() -> Self {
        Self {
            state: SmoothedState::rest(),
            share_totals: [0.0; 4],
            updates: 0,
        }
    }

    /// Fold one sample (or its absence) into the state vector
    pub fn update(&mut self, raw: Option<&ExpressionSample>) -> SmoothedState {
        match raw {
            Some(sample) => {
                let sample = sample.clone().sanitized();
                self.state.happy = ema(self.state.happy, sample.happy, ALPHA_SAMPLE);
                self.state.sad = ema(self.state.sad, sample.sad, ALPHA_SAMPLE);
                self.state.angry = ema(self.state.angry, sample.angry, ALPHA_SAMPLE);
                self.state.neutral =
                    ema(self.state.neutral, sample.neutral_or_derived(), ALPHA_SAMPLE);
            }
            None => {
                // No face: bleed the actives toward 0 and neutral toward 1
                self.state.happy = ema(self.state.happy, 0.0, ALPHA_DECAY);
                self.state.sad = ema(self.state.sad, 0.0, ALPHA_DECAY);
                self.state.angry = ema(self.state.angry, 0.0, ALPHA_DECAY);
                self.state.neutral = ema(self.state.neutral, 1.0, ALPHA_DECAY);
            }
        }

        let shares = self.state.shares();
        self.share_totals[0] += shares.happy;
        self.share_totals[1] += shares.sad;
        self.share_totals[2] += shares.angry;
        self.share_totals[3] += shares.neutral;
        self.updates += 1;

        self.state
    }

    /// Current state without updating
    pub fn state(&self) -> SmoothedState {
        self.state
    }

    /// Shares averaged over every update so far (rest shares before any)
    pub fn average_shares(&self) -> EmotionShares {
        if self.updates == 0 {
            return SmoothedState::rest().shares();
        }
        let n = self.updates as f64;
        EmotionShares {
            happy: self.share_totals[0] / n,
            sad: self.share_totals[1] / n,
            angry: self.share_totals[2] / n,
            neutral: self.share_totals[3] / n,
        }
    }

    /// Number of updates folded in
    pub fn update_count(&self) -> u64 {
        self.updates
    }

    /// Back to rest, aggregates cleared
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Recursive exponential moving average
fn ema(prev: f64, sample: f64, alpha: f64) -> f64 {
    alpha * sample + (1.0 - alpha) * prev
}

// =============================================================================
// TESTS
// =============================================================================
