//! Expression sample and smoothed signal structures

use serde::{Deserialize, Serialize};
use crate::types::Emotion;
use crate::SHARE_EPSILON;

/// One raw expression reading from the external detection pipeline
///
/// Scores are per-category confidences in [0,1]. The extra categories
/// (disgusted/fearful/surprised) are accepted for wire compatibility but
/// play no part in classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionSample {
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    /// Derived from the other three when the provider omits it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neutral: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disgusted: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fearful: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surprised: Option<f64>,
}

impl ExpressionSample {
    /// Create a sample from the three decision categories
    pub fn new(happy: f64, sad: f64, angry: f64) -> Self {
        Self {
            happy,
            sad,
            angry,
            neutral: None,
            disgusted: None,
            fearful: None,
            surprised: None,
        }
    }

    /// Neutral score, derived as `max(0, 1 - (happy+sad+angry))` when absent
    pub fn neutral_or_derived(&self) -> f64 {
        self.neutral
            .unwrap_or_else(|| (1.0 - (self.happy + self.sad + self.angry)).max(0.0))
    }

    /// Replace non-finite or out-of-range scores with safe values
    pub fn sanitized(mut self) -> Self {
        self.happy = clamp01(self.happy);
        self.sad = clamp01(self.sad);
        self.angry = clamp01(self.angry);
        self.neutral = self.neutral.map(clamp01);
        self
    }
}

/// Exponential moving averages of the four decision categories
///
/// Survives across samples for the session lifetime; each value stays in
/// [0,1] because the EMA of values in [0,1] cannot leave the range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmoothedState {
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub neutral: f64,
}

impl SmoothedState {
    /// Rest vector: full neutral, nothing else
    pub fn rest() -> Self {
        Self {
            happy: 0.0,
            sad: 0.0,
            angry: 0.0,
            neutral: 1.0,
        }
    }

    /// Raw smoothed value for one category
    pub fn raw(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Happy => self.happy,
            Emotion::Sad => self.sad,
            Emotion::Angry => self.angry,
            Emotion::Neutral => self.neutral,
        }
    }

    /// Normalized shares over the four categories
    pub fn shares(&self) -> EmotionShares {
        let sum = self.happy + self.sad + self.angry + self.neutral + SHARE_EPSILON;
        EmotionShares {
            happy: self.happy / sum,
            sad: self.sad / sum,
            angry: self.angry / sum,
            neutral: self.neutral / sum,
        }
    }
}

impl Default for SmoothedState {
    fn default() -> Self {
        Self::rest()
    }
}

/// Probability-like normalization of a SmoothedState
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmotionShares {
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub neutral: f64,
}

impl EmotionShares {
    /// Share for one category
    pub fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Happy => self.happy,
            Emotion::Sad => self.sad,
            Emotion::Angry => self.angry,
            Emotion::Neutral => self.neutral,
        }
    }

    /// Non-neutral emotions ranked by share, highest first
    pub fn ranked_active(&self) -> [(Emotion, f64); 3] {
        let mut ranked = [
            (Emotion::Happy, self.happy),
            (Emotion::Sad, self.sad),
            (Emotion::Angry, self.angry),
        ];
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Is neutral the single largest share of all four?
    pub fn neutral_is_largest(&self) -> bool {
        self.neutral >= self.happy && self.neutral >= self.sad && self.neutral >= self.angry
    }
}

fn clamp01(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_neutral() {
        let sample = ExpressionSample::new(0.2, 0.1, 0.1);
        assert!((sample.neutral_or_derived() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_derived_neutral_floors_at_zero() {
        let sample = ExpressionSample::new(0.8, 0.5, 0.4);
        assert_eq!(sample.neutral_or_derived(), 0.0);
    }

    #[test]
    fn test_explicit_neutral_wins() {
        let mut sample = ExpressionSample::new(0.2, 0.1, 0.1);
        sample.neutral = Some(0.9);
        assert_eq!(sample.neutral_or_derived(), 0.9);
    }

    #[test]
    fn test_sanitize_non_finite() {
        let sample = ExpressionSample::new(f64::NAN, -0.5, 2.0).sanitized();
        assert_eq!(sample.happy, 0.0);
        assert_eq!(sample.sad, 0.0);
        assert_eq!(sample.angry, 1.0);
    }

    #[test]
    fn test_shares_sum_to_one() {
        let state = SmoothedState {
            happy: 0.3,
            sad: 0.2,
            angry: 0.1,
            neutral: 0.4,
        };
        let shares = state.shares();
        let sum = shares.happy + shares.sad + shares.angry + shares.neutral;
        assert!((sum - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_shares_zero_state_no_panic() {
        let state = SmoothedState {
            happy: 0.0,
            sad: 0.0,
            angry: 0.0,
            neutral: 0.0,
        };
        let shares = state.shares();
        assert!(shares.happy.is_finite());
    }

    #[test]
    fn test_ranked_active_order() {
        let shares = EmotionShares {
            happy: 0.1,
            sad: 0.5,
            angry: 0.2,
            neutral: 0.2,
        };
        let ranked = shares.ranked_active();
        assert_eq!(ranked[0].0, Emotion::Sad);
        assert_eq!(ranked[1].0, Emotion::Angry);
        assert_eq!(ranked[2].0, Emotion::Happy);
    }
}
