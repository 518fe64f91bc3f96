//! Emotion classifier: hysteresis state machine over smoothed shares
//!
//! Decision ladder, first rule wins:
//! 1. Hold: current emotion still above its OFF threshold
//! 2. Strong neutral: neutral dominant and above NEUTRAL_ON
//! 3. Raw override: one smoothed value past its per-category threshold
//! 4. Margin: top active share above ON and leading by SWITCH_MARGIN
//! 5. Neutral fallback: neutral share above NEUTRAL_OFF
//! 6. Hold previous (ambiguous signal)
//!
//! Entering a state takes a stronger signal than keeping it, so the label
//! cannot flicker near a threshold. Non-override switches are blocked for
//! SWITCH_COOLDOWN_MS after any switch; holds never refresh that window.

use std::time::Instant;
use crate::types::{ClassifyOutput, ClassifyReason, Emotion, SmoothedState};
use crate::{
    EMOTION_OFF, EMOTION_ON, NEUTRAL_OFF, NEUTRAL_ON, OVERRIDE_ANGRY, OVERRIDE_HAPPY,
    OVERRIDE_SAD, SWITCH_COOLDOWN_MS, SWITCH_MARGIN,
};

/// What a ladder rule decided before cooldown is applied
enum Decision {
    Hold(ClassifyReason),
    Switch(Emotion, ClassifyReason),
    /// Switch that ignores the cooldown window
    ForceSwitch(Emotion, ClassifyReason),
}

/// Hysteresis classifier engine
#[derive(Debug)]
pub struct EmotionClassifier {
    /// Currently-classified emotion
    current: Emotion,
    /// When the last switch happened
    last_switch: Option<Instant>,
    /// Number of switches this session
    switch_count: u64,
}

impl Default for EmotionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EmotionClassifier {
    /// Create a new classifier at neutral
    pub fn new() -> Self {
        Self {
            current: Emotion::Neutral,
            last_switch: None,
            switch_count: 0,
        }
    }

    /// Classify the smoothed state at `now`. Total: always yields exactly
    /// one of the four emotions, degrading to "hold previous" on ambiguity.
    pub fn classify(&mut self, state: &SmoothedState, now: Instant) -> ClassifyOutput {
        let shares = state.shares();

        let decision = self.decide(state);

        let (emotion, switched, reason) = match decision {
            Decision::Hold(reason) => (self.current, false, reason),
            Decision::Switch(candidate, reason) => {
                if candidate == self.current {
                    (self.current, false, reason)
                } else if self.in_cooldown(now) {
                    (self.current, false, ClassifyReason::E301_COOLDOWN_SUPPRESSED)
                } else {
                    (candidate, true, reason)
                }
            }
            Decision::ForceSwitch(candidate, reason) => {
                if candidate == self.current {
                    (self.current, false, reason)
                } else {
                    (candidate, true, reason)
                }
            }
        };

        if switched {
            self.current = emotion;
            self.last_switch = Some(now);
            self.switch_count += 1;
        }

        ClassifyOutput::new(emotion, shares, switched, reason)
    }

    /// Run the ladder without touching state
    fn decide(&self, state: &SmoothedState) -> Decision {
        let shares = state.shares();

        // 1. Hold check: leaving costs more than entering
        if self.current == Emotion::Neutral {
            if shares.neutral >= NEUTRAL_OFF {
                return Decision::Hold(ClassifyReason::E101_HOLD_NEUTRAL);
            }
        } else if shares.get(self.current) >= EMOTION_OFF {
            return Decision::Hold(ClassifyReason::E102_HOLD_CURRENT);
        }

        // 2. Strong neutral: dominant and decisively high
        if shares.neutral_is_largest() && shares.neutral >= NEUTRAL_ON {
            return Decision::Switch(Emotion::Neutral, ClassifyReason::E201_STRONG_NEUTRAL);
        }

        // 3. Raw force override: the non-normalized value alone is proof
        // enough, regardless of how much neutral dilutes the shares
        if let Some(forced) = self.raw_override(state) {
            return Decision::ForceSwitch(forced, ClassifyReason::E202_RAW_OVERRIDE);
        }

        // 4. Normal margin decision over the three actives
        let ranked = shares.ranked_active();
        let (top, top_share) = ranked[0];
        let (_, second_share) = ranked[1];
        if top_share >= EMOTION_ON && top_share - second_share >= SWITCH_MARGIN {
            return Decision::Switch(top, ClassifyReason::E203_MARGIN_SWITCH);
        }

        // 5. Fallback to neutral
        if shares.neutral >= NEUTRAL_OFF {
            return Decision::Switch(Emotion::Neutral, ClassifyReason::E204_NEUTRAL_FALLBACK);
        }

        // 6. Ambiguous: keep what we have
        Decision::Hold(ClassifyReason::E103_HOLD_AMBIGUOUS)
    }

    /// Strongest non-current category past its raw override threshold
    fn raw_override(&self, state: &SmoothedState) -> Option<Emotion> {
        let candidates = [
            (Emotion::Happy, OVERRIDE_HAPPY),
            (Emotion::Sad, OVERRIDE_SAD),
            (Emotion::Angry, OVERRIDE_ANGRY),
        ];

        candidates
            .into_iter()
            .filter(|(emotion, threshold)| {
                *emotion != self.current && state.raw(*emotion) >= *threshold
            })
            .max_by(|a, b| {
                state
                    .raw(a.0)
                    .partial_cmp(&state.raw(b.0))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(emotion, _)| emotion)
    }

    /// Is a non-override switch currently blocked?
    fn in_cooldown(&self, now: Instant) -> bool {
        self.last_switch
            .map(|t| now.saturating_duration_since(t).as_millis() < SWITCH_COOLDOWN_MS as u128)
            .unwrap_or(false)
    }

    /// Currently-classified emotion
    pub fn current(&self) -> Emotion {
        self.current
    }

    /// Number of switches this session
    pub fn switch_count(&self) -> u64 {
        self.switch_count
    }

    /// Reset to neutral (session/mode restart)
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn state(happy: f64, sad: f64, angry: f64, neutral: f64) -> SmoothedState {
        SmoothedState {
            happy,
            sad,
            angry,
            neutral,
        }
    }

    #[test]
    fn test_initial_emotion_is_neutral() {
        let classifier = EmotionClassifier::new();
        assert_eq!(classifier.current(), Emotion::Neutral);
    }

    #[test]
    fn test_neutral_holds_above_off() {
        let mut classifier = EmotionClassifier::new();
        let output = classifier.classify(&state(0.25, 0.15, 0.15, 0.45), Instant::now());
        assert_eq!(output.emotion, Emotion::Neutral);
        assert_eq!(output.reason, ClassifyReason::E101_HOLD_NEUTRAL);
        assert!(!output.switched);
    }

    #[test]
    fn test_margin_switch() {
        let mut classifier = EmotionClassifier::new();
        // neutral share low, happy leads second place by well over the margin
        let output = classifier.classify(&state(0.3, 0.1, 0.05, 0.2), Instant::now());
        assert_eq!(output.emotion, Emotion::Happy);
        assert_eq!(output.reason, ClassifyReason::E203_MARGIN_SWITCH);
        assert!(output.switched);
    }

    #[test]
    fn test_margin_requires_lead() {
        let mut classifier = EmotionClassifier::new();
        // top two actives nearly tied: no switch even though both are high
        let output = classifier.classify(&state(0.30, 0.29, 0.05, 0.2), Instant::now());
        assert_eq!(output.emotion, Emotion::Neutral);
        assert!(!output.switched);
    }

    #[test]
    fn test_hysteresis_hold_then_release() {
        let mut classifier = EmotionClassifier::new();
        let t0 = Instant::now();

        // Strong sad → active
        classifier.classify(&state(0.05, 0.6, 0.05, 0.1), t0);
        assert_eq!(classifier.current(), Emotion::Sad);

        // Drifted down to share 0.34: still held above OFF (0.33)
        let t1 = t0 + Duration::from_secs(3);
        let output = classifier.classify(&state(0.33, 0.34, 0.0, 0.33), t1);
        assert_eq!(output.emotion, Emotion::Sad);
        assert_eq!(output.reason, ClassifyReason::E102_HOLD_CURRENT);

        // Share 0.32 with neutral past its OFF: sad finally released
        let t2 = t0 + Duration::from_secs(6);
        let output = classifier.classify(&state(0.12, 0.32, 0.12, 0.44), t2);
        assert_eq!(output.emotion, Emotion::Neutral);
        assert_eq!(output.reason, ClassifyReason::E204_NEUTRAL_FALLBACK);
    }

    #[test]
    fn test_strong_neutral_takes_over() {
        let mut classifier = EmotionClassifier::new();
        let t0 = Instant::now();

        classifier.classify(&state(0.6, 0.05, 0.05, 0.1), t0);
        assert_eq!(classifier.current(), Emotion::Happy);

        // Happy collapsed, neutral dominant at 0.60 share
        let t1 = t0 + Duration::from_secs(3);
        let output = classifier.classify(&state(0.15, 0.1, 0.05, 0.45), t1);
        assert_eq!(output.emotion, Emotion::Neutral);
        assert_eq!(output.reason, ClassifyReason::E201_STRONG_NEUTRAL);
    }

    #[test]
    fn test_cooldown_suppresses_second_switch() {
        let mut classifier = EmotionClassifier::new();
        let t0 = Instant::now();

        classifier.classify(&state(0.3, 0.1, 0.05, 0.2), t0);
        assert_eq!(classifier.current(), Emotion::Happy);

        // Qualifying sad switch only 1s later: suppressed. Raw sad stays
        // under its override threshold so only the margin rule is in play.
        let t1 = t0 + Duration::from_millis(1000);
        let output = classifier.classify(&state(0.05, 0.35, 0.1, 0.1), t1);
        assert_eq!(output.emotion, Emotion::Happy);
        assert_eq!(output.reason, ClassifyReason::E301_COOLDOWN_SUPPRESSED);

        // Same signal after the window: goes through
        let t2 = t0 + Duration::from_millis(2300);
        let output = classifier.classify(&state(0.05, 0.35, 0.1, 0.1), t2);
        assert_eq!(output.emotion, Emotion::Sad);
        assert!(output.switched);
    }

    #[test]
    fn test_raw_override_beats_cooldown() {
        let mut classifier = EmotionClassifier::new();
        let t0 = Instant::now();

        classifier.classify(&state(0.3, 0.1, 0.05, 0.2), t0);
        assert_eq!(classifier.current(), Emotion::Happy);

        // Inside the cooldown window, but raw angry is past 0.40
        let t1 = t0 + Duration::from_millis(500);
        let output = classifier.classify(&state(0.1, 0.1, 0.45, 0.8), t1);
        assert_eq!(output.emotion, Emotion::Angry);
        assert_eq!(output.reason, ClassifyReason::E202_RAW_OVERRIDE);
    }

    #[test]
    fn test_raw_override_despite_neutral_dilution() {
        let mut classifier = EmotionClassifier::new();
        // Sad's share is diluted below the margin threshold, but its raw
        // smoothed value alone clears the override bar
        let output = classifier.classify(&state(0.1, 0.40, 0.1, 0.30), Instant::now());
        assert_eq!(output.emotion, Emotion::Sad);
        assert_eq!(output.reason, ClassifyReason::E202_RAW_OVERRIDE);
    }

    #[test]
    fn test_ambiguous_holds_previous() {
        let mut classifier = EmotionClassifier::new();
        let t0 = Instant::now();

        classifier.classify(&state(0.6, 0.05, 0.05, 0.1), t0);
        assert_eq!(classifier.current(), Emotion::Happy);

        // Everything flat: no rule fires, happy survives by default
        let t1 = t0 + Duration::from_secs(3);
        let output = classifier.classify(&state(0.3, 0.3, 0.3, 0.3), t1);
        assert_eq!(output.emotion, Emotion::Happy);
        assert_eq!(output.reason, ClassifyReason::E103_HOLD_AMBIGUOUS);
    }

    #[test]
    fn test_always_returns_a_label() {
        let mut classifier = EmotionClassifier::new();
        let mut t = Instant::now();
        // Sweep a grid of near-normalized states; classify must stay total
        for h in 0..5 {
            for s in 0..5 {
                for a in 0..5 {
                    let (h, s, a) = (h as f64 * 0.25, s as f64 * 0.25, a as f64 * 0.25);
                    let n = (1.0 - h - s - a).max(0.0);
                    t += Duration::from_millis(100);
                    let output = classifier.classify(&state(h, s, a, n), t);
                    assert!(matches!(
                        output.emotion,
                        Emotion::Happy | Emotion::Sad | Emotion::Angry | Emotion::Neutral
                    ));
                }
            }
        }
    }

    #[test]
    fn test_hold_never_refreshes_cooldown() {
        let mut classifier = EmotionClassifier::new();
        let t0 = Instant::now();

        classifier.classify(&state(0.3, 0.1, 0.05, 0.2), t0);
        assert_eq!(classifier.current(), Emotion::Happy);

        // A pile of holds inside the window must not extend it
        for i in 1..20 {
            classifier.classify(&state(0.5, 0.1, 0.05, 0.2), t0 + Duration::from_millis(i * 100));
        }

        let t1 = t0 + Duration::from_millis(2300);
        let output = classifier.classify(&state(0.05, 0.35, 0.1, 0.1), t1);
        assert_eq!(output.emotion, Emotion::Sad);
    }

    #[test]
    fn test_reset() {
        let mut classifier = EmotionClassifier::new();
        classifier.classify(&state(0.6, 0.05, 0.05, 0.1), Instant::now());
        assert_eq!(classifier.current(), Emotion::Happy);

        classifier.reset();
        assert_eq!(classifier.current(), Emotion::Neutral);
        assert_eq!(classifier.switch_count(), 0);
    }
}
