//! Core engines for moodpop

pub mod smoother;
pub mod classifier;
pub mod difficulty;
pub mod spawner;
pub mod field;
pub mod session;
pub mod report;
pub mod api;

pub use smoother::SignalSmoother;
pub use classifier::EmotionClassifier;
pub use difficulty::difficulty_for;
pub use spawner::Spawner;
pub use field::BubbleField;
pub use session::{GameSession, PopOutcome};
pub use report::{ReportWriter, save_report, load_report, load_and_verify_report, verify_report};
pub use api::{create_router, run_server};
