//! Game session: score, timer and tick orchestration
//!
//! Two decoupled cadences feed one session: `ingest_sample` runs at the
//! expression-sampling interval (roughly once a second), `tick` runs once
//! per rendered frame. A tick never waits for a sample; it reads whatever
//! emotion state is current, stale or not.

use std::time::{Duration, Instant};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::{BubbleField, EmotionClassifier, SignalSmoother, Spawner};
use crate::types::{
    Bubble, BubbleKind, ClassifyOutput, Emotion, EmotionShares, ExpressionSample, GameMode,
    PlayArea, Point, SessionState, SmoothedState,
};
use crate::{DEFAULT_BUBBLES, DEFAULT_DURATION_SECS};

/// What a pop attempt resolved to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopOutcome {
    pub kind: BubbleKind,
    /// Score after the pop
    pub score: u32,
}

/// One running (or finished) game
#[derive(Debug)]
pub struct GameSession {
    mode: GameMode,
    duration: Duration,
    bubble_count: usize,
    state: SessionState,
    field: BubbleField,
    smoother: SignalSmoother,
    classifier: EmotionClassifier,
    spawner: Spawner,
    rng: StdRng,
    /// Latest gaze hint, normalized [0,1]²
    gaze: Option<Point>,
}

impl GameSession {
    /// Start a session at `now` with a full bubble collection
    pub fn new(
        mode: GameMode,
        duration_secs: u64,
        bubble_count: usize,
        seed: Option<u64>,
        now: Instant,
        area: &PlayArea,
    ) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let spawner = Spawner::new();
        let bubbles = spawn_all(&spawner, &mut rng, mode, area, None, bubble_count);

        Self {
            mode,
            duration: Duration::from_secs(duration_secs),
            bubble_count,
            state: SessionState::start(now),
            field: BubbleField::from_bubbles(bubbles),
            smoother: SignalSmoother::new(),
            classifier: EmotionClassifier::new(),
            spawner,
            rng,
            gaze: None,
        }
    }

    /// Session with the default duration and bubble count
    pub fn with_defaults(mode: GameMode, now: Instant, area: &PlayArea) -> Self {
        Self::new(mode, DEFAULT_DURATION_SECS, DEFAULT_BUBBLES, None, now, area)
    }

    /// Sampling-cadence path: smooth the sample (or its absence), then
    /// re-classify. Safe to call while a tick is between frames.
    pub fn ingest_sample(
        &mut self,
        raw: Option<&ExpressionSample>,
        now: Instant,
    ) -> ClassifyOutput {
        let smoothed = self.smoother.update(raw);
        self.classifier.classify(&smoothed, now)
    }

    /// Update the gaze hint used for bio-mode spawn placement
    pub fn set_gaze(&mut self, gaze: Option<Point>) {
        self.gaze = gaze;
    }

    /// Frame-cadence path: advance the clock and, while running, the field
    ///
    /// The over transition fires exactly once, at the first tick where
    /// elapsed reaches the configured duration; after that ticks no-op.
    pub fn tick(&mut self, now: Instant, area: &PlayArea) {
        if self.state.is_over {
            return;
        }

        self.state.update_elapsed(now);
        if self.state.elapsed_ms >= self.duration.as_millis() as u64 {
            self.state.is_over = true;
            return;
        }

        let emotion = self.classifier.current();
        let angry_raw = self.smoother.state().angry;
        self.field
            .tick(&mut self.rng, area, self.mode, emotion, angry_raw);
    }

    /// Resolve a pointer/touch hit. Ignored once the run is over; a miss
    /// returns None.
    pub fn pop_at(
        &mut self,
        point: Point,
        touch: bool,
        area: &PlayArea,
    ) -> Option<PopOutcome> {
        if self.state.is_over {
            return None;
        }

        let index = self.field.hit_test(point, touch)?;
        let kind = self.field.bubbles()[index].kind;
        match kind {
            BubbleKind::Normal => self.state.award(),
            BubbleKind::Trick => self.state.penalize(),
        }

        // The popped slot refills immediately, gaze-biased in bio mode
        let replacement = self
            .spawner
            .spawn(&mut self.rng, self.mode, area, self.gaze);
        self.field.replace(index, replacement);

        Some(PopOutcome {
            kind,
            score: self.state.score,
        })
    }

    /// Explicit restart: fresh state, fresh collection, classifier and
    /// smoother back to neutral rest
    pub fn restart(&mut self, now: Instant, area: &PlayArea) {
        self.state = SessionState::start(now);
        self.smoother.reset();
        self.classifier.reset();
        let bubbles = spawn_all(
            &self.spawner,
            &mut self.rng,
            self.mode,
            area,
            None,
            self.bubble_count,
        );
        self.field.reset(bubbles);
    }

    // Accessors (the rendering sink and report generator read these)

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration.as_secs()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn bubbles(&self) -> &[Bubble] {
        self.field.bubbles()
    }

    pub fn emotion(&self) -> Emotion {
        self.classifier.current()
    }

    pub fn smoothed(&self) -> SmoothedState {
        self.smoother.state()
    }

    /// Emotion shares averaged over the whole run so far
    pub fn average_shares(&self) -> EmotionShares {
        self.smoother.average_shares()
    }

    pub fn sample_count(&self) -> u64 {
        self.smoother.update_count()
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over
    }

    /// End-of-run report; fails with a coded reason while still running
    pub fn finish_report(&self) -> crate::types::ReportResult {
        crate::core::ReportWriter::new().generate(self)
    }
}

/// Build a full collection
fn spawn_all<R: Rng>(
    spawner: &Spawner,
    rng: &mut R,
    mode: GameMode,
    area: &PlayArea,
    gaze: Option<Point>,
    count: usize,
) -> Vec<Bubble> {
    (0..count).map(|_| spawner.spawn(rng, mode, area, gaze)).collect()
}

// =============================================================================
// TESTS
// =============================================================================
