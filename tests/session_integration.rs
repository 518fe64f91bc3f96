//! End-to-end tests: scripted runs over a synthetic clock, reports included

use moodpop::core::{
    load_and_verify_report, save_report, verify_report, GameSession, ReportWriter,
};
use moodpop::types::{ExpressionSample, GameMode, PlayArea, Point, ReportReason};
use moodpop::FRAME_MS;
use std::time::{Duration, Instant};

fn frame(n: u64) -> Duration {
    Duration::from_millis(n * FRAME_MS)
}

/// Drive a full scripted run to completion and return the session
fn run_scripted(mode: GameMode, duration_secs: u64, seed: u64) -> GameSession {
    let area = PlayArea::default();
    let start = Instant::now();
    let mut session = GameSession::new(mode, duration_secs, 12, Some(seed), start, &area);

    let total_ticks = duration_secs * 1000 / FRAME_MS + 2;
    for tick in 0..total_ticks {
        let now = start + frame(tick);

        if tick % 60 == 0 {
            let sample = ExpressionSample::new(0.7, 0.05, 0.05);
            session.ingest_sample(Some(&sample), now);
        }

        session.tick(now, &area);

        if tick % 45 == 20 {
            if let Some(target) = session.bubbles().first().map(|b| Point::new(b.x, b.y)) {
                session.pop_at(target, false, &area);
            }
        }

        if session.is_over() {
            break;
        }
    }
    session
}

/// A run ends exactly at its configured duration and stays ended
#[test]
fn test_run_ends_on_time() {
    let area = PlayArea::default();
    let start = Instant::now();
    let mut session = GameSession::new(GameMode::Classic, 10, 12, Some(1), start, &area);

    // One frame before the deadline: still live
    session.tick(start + Duration::from_millis(9_990), &area);
    assert!(!session.is_over());

    session.tick(start + Duration::from_millis(10_001), &area);
    assert!(session.is_over());

    // Further ticks and pops are no-ops
    let score_at_end = session.state().score;
    session.tick(start + Duration::from_millis(20_000), &area);
    let target = Point::new(session.bubbles()[0].x, session.bubbles()[0].y);
    assert!(session.pop_at(target, false, &area).is_none());
    assert_eq!(session.state().score, score_at_end);
}

/// Scoring bookkeeping stays consistent across a whole run
#[test]
fn test_scripted_run_scoring() {
    let session = run_scripted(GameMode::Classic, 15, 3);

    assert!(session.is_over());
    let state = session.state();
    assert!(state.normal_pops > 0, "the aim-at-first-bubble script should land hits");
    assert_eq!(state.trick_pops, 0, "classic mode spawns no tricks");
    assert_eq!(state.score, state.normal_pops);
    assert_eq!(session.bubbles().len(), 12, "popped slots are refilled");
}

/// Trick pops in challenge mode subtract but never push the score negative
#[test]
fn test_challenge_run_score_never_negative() {
    let session = run_scripted(GameMode::Challenge, 15, 4);

    let state = session.state();
    assert!(state.score <= state.normal_pops);
    // Each trick deduction floors at zero, so the final score can only
    // sit at or above the naive subtraction
    assert!(state.score >= state.normal_pops.saturating_sub(state.trick_pops));
}

/// Same seed, same script: identical outcome
#[test]
fn test_seeded_runs_are_reproducible() {
    let a = run_scripted(GameMode::Challenge, 10, 99);
    let b = run_scripted(GameMode::Challenge, 10, 99);

    assert_eq!(a.state().score, b.state().score);
    assert_eq!(a.state().normal_pops, b.state().normal_pops);
    assert_eq!(a.state().trick_pops, b.state().trick_pops);
    for (x, y) in a.bubbles().iter().zip(b.bubbles()) {
        assert_eq!(x.x, y.x);
        assert_eq!(x.y, y.y);
    }
}

/// Restart wipes score, timer and aggregates, and revives the run
#[test]
fn test_restart_revives_run() {
    let mut session = run_scripted(GameMode::Classic, 10, 5);
    assert!(session.is_over());
    assert!(session.sample_count() > 0);

    let area = PlayArea::default();
    let restart_at = Instant::now();
    session.restart(restart_at, &area);

    assert!(!session.is_over());
    assert_eq!(session.state().score, 0);
    assert_eq!(session.state().elapsed_ms, 0);
    assert_eq!(session.sample_count(), 0);
    assert_eq!(session.bubbles().len(), 12);

    // And it plays again
    session.tick(restart_at + frame(1), &area);
    assert!(!session.is_over());
}

/// No report before the run is over
#[test]
fn test_report_requires_finished_run() {
    let area = PlayArea::default();
    let session = GameSession::new(GameMode::Classic, 60, 12, Some(8), Instant::now(), &area);

    let result = ReportWriter::new().generate(&session);
    assert!(result.report.is_none());
    assert_eq!(result.reason, ReportReason::P401_RUN_NOT_OVER);
}

/// Finished run: report generates, verifies, and survives a disk round trip
#[test]
fn test_report_round_trip() {
    let session = run_scripted(GameMode::Classic, 10, 6);

    let result = ReportWriter::new().generate(&session);
    let report = result.report.expect("finished run should produce a report");
    assert_eq!(result.reason, ReportReason::P400_REPORT_GENERATED);
    assert!(verify_report(&report));
    assert_eq!(report.score, session.state().score);
    assert_eq!(report.mode, GameMode::Classic);
    assert!(report.sample_count > 0);

    let dir = std::env::temp_dir().join("moodpop_report_test");
    let dir = dir.to_string_lossy().to_string();
    let path = save_report(&report, &dir).expect("save should succeed");

    let loaded = load_and_verify_report(&path).expect("load should succeed");
    assert_eq!(loaded.id, report.id);
    assert_eq!(loaded.score, report.score);
    assert_eq!(loaded.digest, report.digest);

    let _ = std::fs::remove_file(&path);
}

/// Tampered reports fail verification
#[test]
fn test_tampered_report_rejected() {
    let session = run_scripted(GameMode::Classic, 10, 7);
    let mut report = ReportWriter::new()
        .generate(&session)
        .report
        .expect("report");

    report.score += 100;
    assert!(!verify_report(&report));
}
