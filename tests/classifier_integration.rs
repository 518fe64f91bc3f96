//! Integration tests for the signal path: sample → smoother → classifier

use moodpop::core::{EmotionClassifier, SignalSmoother};
use moodpop::types::{ClassifyReason, Emotion, ExpressionSample};
use moodpop::SWITCH_COOLDOWN_MS;
use std::time::{Duration, Instant};

/// Test the full signal path produces a valid output
#[test]
fn test_full_signal_path() {
    let mut smoother = SignalSmoother::new();
    let mut classifier = EmotionClassifier::new();

    let sample = ExpressionSample::new(0.6, 0.1, 0.1);
    let state = smoother.update(Some(&sample));
    let output = classifier.classify(&state, Instant::now());

    assert!(!output.reason.code().is_empty());
    let shares = [
        output.shares.happy,
        output.shares.sad,
        output.shares.angry,
        output.shares.neutral,
    ];
    let total: f64 = shares.iter().sum();
    assert!((total - 1.0).abs() < 1e-6, "shares should sum to 1, got {}", total);
}

/// Sustained happy input wins over the initial neutral floor
#[test]
fn test_progression_to_happy() {
    let mut smoother = SignalSmoother::new();
    let mut classifier = EmotionClassifier::new();
    let start = Instant::now();

    let sample = ExpressionSample::new(0.85, 0.05, 0.02);
    let mut emotion = Emotion::Neutral;
    for i in 0..6 {
        let state = smoother.update(Some(&sample));
        let now = start + Duration::from_millis(i * 200);
        emotion = classifier.classify(&state, now).emotion;
    }

    assert_eq!(emotion, Emotion::Happy);
}

/// A single noisy frame cannot dethrone an established emotion
#[test]
fn test_noise_spike_does_not_flip() {
    let mut smoother = SignalSmoother::new();
    let mut classifier = EmotionClassifier::new();
    let start = Instant::now();

    let happy = ExpressionSample::new(0.85, 0.05, 0.02);
    for i in 0..6 {
        let state = smoother.update(Some(&happy));
        classifier.classify(&state, start + Duration::from_millis(i * 200));
    }
    assert_eq!(classifier.current(), Emotion::Happy);

    // One angry spike; smoothed happy still clears the hold floor
    let spike = ExpressionSample::new(0.30, 0.05, 0.36);
    let state = smoother.update(Some(&spike));
    let output = classifier.classify(&state, start + Duration::from_millis(1400));

    assert_eq!(output.emotion, Emotion::Happy);
    assert!(output.reason.is_hold());
}

/// Losing the face decays the smoothed state back to neutral
#[test]
fn test_missing_face_returns_to_neutral() {
    let mut smoother = SignalSmoother::new();
    let mut classifier = EmotionClassifier::new();
    let start = Instant::now();

    let sad = ExpressionSample::new(0.05, 0.8, 0.02);
    for i in 0..6 {
        let state = smoother.update(Some(&sad));
        classifier.classify(&state, start + Duration::from_millis(i * 200));
    }
    assert_eq!(classifier.current(), Emotion::Sad);

    // Decay runs at alpha 0.3, so neutral needs a stretch of empty cycles
    let mut emotion = Emotion::Sad;
    for i in 0..30 {
        let state = smoother.update(None);
        let now = start + Duration::from_millis(1200 + SWITCH_COOLDOWN_MS + i * 200);
        emotion = classifier.classify(&state, now).emotion;
    }

    assert_eq!(emotion, Emotion::Neutral);
}

/// Two qualifying switches inside the cooldown window: second is suppressed
#[test]
fn test_cooldown_across_pipeline() {
    let mut smoother = SignalSmoother::new();
    let mut classifier = EmotionClassifier::new();
    let start = Instant::now();

    let happy = ExpressionSample::new(0.85, 0.02, 0.02);
    for i in 0..6 {
        let state = smoother.update(Some(&happy));
        classifier.classify(&state, start + Duration::from_millis(i * 200));
    }
    assert_eq!(classifier.current(), Emotion::Happy);

    // Modest sad input: qualifies by share margin but stays under the
    // raw-override threshold because happy residue dilutes the EMA
    let mut sad = ExpressionSample::new(0.02, 0.34, 0.02);
    sad.neutral = Some(0.05);
    let mut last = None;
    for i in 0..4 {
        let state = smoother.update(Some(&sad));
        let now = start + Duration::from_millis(1300 + i * 200);
        last = Some(classifier.classify(&state, now));
    }

    let output = last.expect("classified");
    assert_eq!(output.emotion, Emotion::Happy);
    assert_eq!(output.reason, ClassifyReason::E301_COOLDOWN_SUPPRESSED);

    // After the window the same pressure goes through
    let state = smoother.update(Some(&sad));
    let now = start + Duration::from_millis(1200 + SWITCH_COOLDOWN_MS + 100);
    let output = classifier.classify(&state, now);
    assert_eq!(output.emotion, Emotion::Sad);
    assert!(output.switched);
}

/// Raw-force override punches through the cooldown window
#[test]
fn test_override_across_pipeline() {
    let mut smoother = SignalSmoother::new();
    let mut classifier = EmotionClassifier::new();
    let start = Instant::now();

    let happy = ExpressionSample::new(0.85, 0.02, 0.02);
    for i in 0..6 {
        let state = smoother.update(Some(&happy));
        classifier.classify(&state, start + Duration::from_millis(i * 200));
    }
    assert_eq!(classifier.current(), Emotion::Happy);

    // Full-strength anger drives the raw channel past its override threshold
    // well inside the cooldown window
    let angry = ExpressionSample::new(0.02, 0.02, 0.98);
    let mut output = None;
    for i in 0..4 {
        let state = smoother.update(Some(&angry));
        let now = start + Duration::from_millis(1300 + i * 100);
        let result = classifier.classify(&state, now);
        if result.switched {
            output = Some(result);
            break;
        }
    }

    let output = output.expect("override should fire inside the window");
    assert_eq!(output.emotion, Emotion::Angry);
    assert_eq!(output.reason, ClassifyReason::E202_RAW_OVERRIDE);
}

/// Average shares accumulate across the whole run
#[test]
fn test_average_shares_accumulate() {
    let mut smoother = SignalSmoother::new();

    for _ in 0..10 {
        smoother.update(Some(&ExpressionSample::new(0.8, 0.05, 0.05)));
    }
    for _ in 0..10 {
        smoother.update(None);
    }

    assert_eq!(smoother.update_count(), 20);
    let avg = smoother.average_shares();
    assert!(avg.happy > avg.sad);
    assert!(avg.happy > avg.angry);
    let total = avg.happy + avg.sad + avg.angry + avg.neutral;
    assert!((total - 1.0).abs() < 1e-6);
}
