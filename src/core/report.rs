//! Run report generation and persistence
//!
//! Invariant: a report is only generated for a finished run. The digest
//! covers the payload fields, so the backend boundary can detect a report
//! that was edited after generation.

use sha2::{Digest, Sha256};
use crate::core::GameSession;
use crate::types::{EmotionShares, GameMode, ReportReason, ReportResult, RunReport};

/// Report generator
#[derive(Debug, Default)]
pub struct ReportWriter;

impl ReportWriter {
    /// Create new writer
    pub fn new() -> Self {
        Self
    }

    /// Generate the end-of-run report for a finished session
    pub fn generate(&self, session: &GameSession) -> ReportResult {
        if !session.is_over() {
            return ReportResult::failure(ReportReason::P401_RUN_NOT_OVER);
        }

        let state = session.state();
        let timestamp_unix = chrono::Utc::now().timestamp();
        let shares = session.average_shares();

        let digest = payload_digest(
            timestamp_unix,
            session.mode(),
            session.duration_secs(),
            state.score,
            state.normal_pops,
            state.trick_pops,
            &shares,
            session.sample_count(),
        );

        let id = format!(
            "run_{}_{:08x}",
            chrono::Utc::now().format("%Y%m%d_%H%M%S"),
            u32::from_be_bytes(digest[0..4].try_into().unwrap_or([0; 4]))
        );

        ReportResult::success(RunReport {
            id,
            timestamp_unix,
            mode: session.mode(),
            duration_secs: session.duration_secs(),
            score: state.score,
            normal_pops: state.normal_pops,
            trick_pops: state.trick_pops,
            emotion_shares: shares,
            sample_count: session.sample_count(),
            digest,
        })
    }
}

/// Recompute the digest and compare against the stored one
pub fn verify_report(report: &RunReport) -> bool {
    let expected = payload_digest(
        report.timestamp_unix,
        report.mode,
        report.duration_secs,
        report.score,
        report.normal_pops,
        report.trick_pops,
        &report.emotion_shares,
        report.sample_count,
    );
    expected == report.digest
}

/// Save report as JSON to `dir`
pub fn save_report(report: &RunReport, dir: &str) -> Result<String, ReportReason> {
    let filename = format!("{}/{}.json", dir, report.id);

    let json = serde_json::to_string_pretty(report)
        .map_err(|_| ReportReason::P402_REPORT_SERIALIZE_ERROR)?;

    std::fs::create_dir_all(dir).map_err(|_| ReportReason::P403_REPORT_STORAGE_ERROR)?;

    std::fs::write(&filename, json).map_err(|_| ReportReason::P403_REPORT_STORAGE_ERROR)?;

    Ok(filename)
}

/// Load report from a JSON file
pub fn load_report(path: &str) -> Result<RunReport, ReportReason> {
    let json =
        std::fs::read_to_string(path).map_err(|_| ReportReason::P403_REPORT_STORAGE_ERROR)?;

    serde_json::from_str(&json).map_err(|_| ReportReason::P402_REPORT_SERIALIZE_ERROR)
}

/// Load report and check its digest still matches the payload
pub fn load_and_verify_report(path: &str) -> Result<RunReport, ReportReason> {
    let report = load_report(path)?;
    if !verify_report(&report) {
        return Err(ReportReason::P404_REPORT_DIGEST_MISMATCH);
    }
    Ok(report)
}

#[allow(clippy::too_many_arguments)]
fn payload_digest(
    timestamp_unix: i64,
    mode: GameMode,
    duration_secs: u64,
    score: u32,
    normal_pops: u32,
    trick_pops: u32,
    shares: &EmotionShares,
    sample_count: u64,
) -> [u8; 32] {
    // Fixed-precision rendering keeps the digest stable across platforms
    let payload = format!(
        "{}|{}|{}|{}|{}|{}|{:.6}|{:.6}|{:.6}|{:.6}|{}",
        timestamp_unix,
        mode,
        duration_secs,
        score,
        normal_pops,
        trick_pops,
        shares.happy,
        shares.sad,
        shares.angry,
        shares.neutral,
        sample_count,
    );

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use crate::types::PlayArea;

    fn finished_session() -> GameSession {
        let t0 = Instant::now();
        let area = PlayArea::default();
        let mut session = GameSession::new(GameMode::Classic, 5, 6, Some(2), t0, &area);
        session.tick(t0 + Duration::from_secs(6), &area);
        assert!(session.is_over());
        session
    }

    #[test]
    fn test_no_report_while_running() {
        let t0 = Instant::now();
        let area = PlayArea::default();
        let session = GameSession::new(GameMode::Classic, 30, 6, Some(2), t0, &area);

        let result = ReportWriter::new().generate(&session);
        assert!(result.report.is_none());
        assert_eq!(result.reason, ReportReason::P401_RUN_NOT_OVER);
    }

    #[test]
    fn test_report_for_finished_run() {
        let session = finished_session();
        let result = ReportWriter::new().generate(&session);
        let report = result.report.expect("report");

        assert_eq!(report.mode, GameMode::Classic);
        assert_eq!(report.duration_secs, 5);
        assert_eq!(report.score, 0);
        assert!(report.id.starts_with("run_"));
        assert!(verify_report(&report));
    }

    #[test]
    fn test_tampered_report_fails_verification() {
        let session = finished_session();
        let mut report = ReportWriter::new()
            .generate(&session)
            .report
            .expect("report");

        report.score += 100;
        assert!(!verify_report(&report));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let session = finished_session();
        let report = ReportWriter::new()
            .generate(&session)
            .report
            .expect("report");

        let dir = std::env::temp_dir().join("moodpop_report_tests");
        let dir = dir.to_string_lossy().to_string();
        let path = save_report(&report, &dir).expect("save");

        let loaded = load_and_verify_report(&path).expect("load");
        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.digest, report.digest);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_report("/nonexistent/report.json").unwrap_err();
        assert_eq!(err, ReportReason::P403_REPORT_STORAGE_ERROR);
    }
}
