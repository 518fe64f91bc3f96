//! Core types for MoodPop

mod bubble;
mod classify;
mod difficulty;
mod emotion;
mod mode;
mod report;
mod sample;
mod session;

pub use bubble::{normalize_deg, Bubble, BubbleKind, PlayArea, Point};
pub use classify::{ClassifyOutput, ClassifyReason};
pub use difficulty::Difficulty;
pub use emotion::Emotion;
pub use mode::GameMode;
pub use report::{ReportReason, ReportResult, RunReport};
pub use sample::{EmotionShares, ExpressionSample, SmoothedState};
pub use session::SessionState;
