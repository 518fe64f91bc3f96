//! End-of-run report types
//!
//! A report is the fire-and-forget summary handed to the backend boundary:
//! score, duration, mode and the aggregated emotion shares of the run,
//! linked to its own payload by a sha256 digest.

use serde::{Deserialize, Serialize};
use crate::types::{EmotionShares, GameMode};

/// Summary of one finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// `run_<date>_<suffix>` identifier
    pub id: String,
    /// Unix timestamp of generation
    pub timestamp_unix: i64,
    pub mode: GameMode,
    /// Configured run length, seconds
    pub duration_secs: u64,
    pub score: u32,
    pub normal_pops: u32,
    pub trick_pops: u32,
    /// Emotion shares averaged over every classification of the run
    pub emotion_shares: EmotionShares,
    /// Number of classifications aggregated
    pub sample_count: u64,
    /// sha256 over the payload fields, for tamper-evidence at the boundary
    pub digest: [u8; 32],
}

/// Result of report generation
#[derive(Debug, Clone)]
pub struct ReportResult {
    pub report: Option<RunReport>,
    pub reason: ReportReason,
}

impl ReportResult {
    /// Create a successful result
    pub fn success(report: RunReport) -> Self {
        Self {
            report: Some(report),
            reason: ReportReason::P400_REPORT_GENERATED,
        }
    }

    /// Create a failed result
    pub fn failure(reason: ReportReason) -> Self {
        Self {
            report: None,
            reason,
        }
    }
}

/// Reason codes for report generation and persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReportReason {
    /// Report generated
    P400_REPORT_GENERATED,
    /// Run is still in progress, no report yet
    P401_RUN_NOT_OVER,
    /// Serialization failed
    P402_REPORT_SERIALIZE_ERROR,
    /// Filesystem write/read failed
    P403_REPORT_STORAGE_ERROR,
    /// Loaded report digest does not match its payload
    P404_REPORT_DIGEST_MISMATCH,
}

impl ReportReason {
    /// Get reason code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::P400_REPORT_GENERATED => "P400_REPORT_GENERATED",
            Self::P401_RUN_NOT_OVER => "P401_RUN_NOT_OVER",
            Self::P402_REPORT_SERIALIZE_ERROR => "P402_REPORT_SERIALIZE_ERROR",
            Self::P403_REPORT_STORAGE_ERROR => "P403_REPORT_STORAGE_ERROR",
            Self::P404_REPORT_DIGEST_MISMATCH => "P404_REPORT_DIGEST_MISMATCH",
        }
    }

    /// Get human description
    pub fn description(&self) -> &'static str {
        match self {
            Self::P400_REPORT_GENERATED => "Report generated",
            Self::P401_RUN_NOT_OVER => "Run not over yet",
            Self::P402_REPORT_SERIALIZE_ERROR => "Could not serialize report",
            Self::P403_REPORT_STORAGE_ERROR => "Could not read/write report",
            Self::P404_REPORT_DIGEST_MISMATCH => "Digest mismatch",
        }
    }
}

impl std::fmt::Display for ReportReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
