//! Host-facing game session
//!
//! Wraps the simulation for a frame-driven host: queues triggers between
//! frames, owns the seeded RNG and the best-score store, and hands back a
//! plain-data snapshot each frame for drawing.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::best_score::BestScore;
use crate::platform::KeyValueStore;
use crate::sim::{Actor, Field, GameState, Obstacle, RunState, TickInput, TickReport, tick};
use crate::tuning::{Mode, Tuning};

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub mode: Mode,
    pub run: RunState,
    pub field: Field,
    pub actor: Actor,
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub best: u32,
    pub frame: u64,
}

/// Result of one host frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub report: TickReport,
    pub render: RenderSnapshot,
}

/// One player's game on one device
pub struct Session {
    state: GameState,
    rng: Pcg32,
    field: Field,
    pending: TickInput,
    best: BestScore,
    store: Box<dyn KeyValueStore>,
}

impl Session {
    /// Open a session; the best score is read from `store` here and only here
    pub fn new(mode: Mode, field: Field, seed: u64, store: Box<dyn KeyValueStore>) -> Self {
        Self::with_tuning(mode, Tuning::for_mode(mode), field, seed, store)
    }

    pub fn with_tuning(
        mode: Mode,
        tuning: Tuning,
        field: Field,
        seed: u64,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let best = BestScore::load(store.as_ref());
        log::info!("Session opened ({}, seed {})", mode.as_str(), seed);
        Self {
            state: GameState::with_tuning(mode, tuning, field, best.value),
            rng: Pcg32::seed_from_u64(seed),
            field,
            pending: TickInput::default(),
            best,
            store,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn best_score(&self) -> u32 {
        self.best.value
    }

    /// Queue a trigger for the next frame. Repeats before that frame collapse.
    pub fn trigger(&mut self) {
        if !self.state.is_ended() {
            self.pending.trigger = true;
        }
    }

    /// False once the run has ended; the host stops requesting frames
    pub fn is_ticking(&self) -> bool {
        !self.state.is_ended()
    }

    /// Run one simulation step against the current viewport
    pub fn frame(&mut self, field: Field) -> Frame {
        self.field = field;
        let input = std::mem::take(&mut self.pending);
        let report = tick(&mut self.state, &input, field, &mut self.rng);

        if let Some(best) = report.new_best() {
            if self.best.record(best) {
                self.best.save(self.store.as_mut());
            }
        }

        Frame {
            report,
            render: self.snapshot(),
        }
    }

    /// Plain-data view of the current world
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            mode: self.state.mode,
            run: self.state.run,
            field: self.field,
            actor: self.state.actor,
            obstacles: self.state.obstacles.clone(),
            score: self.state.score,
            best: self.state.best_score,
            frame: self.state.frame,
        }
    }

    /// Back to NotStarted with everything but the best score cleared
    pub fn reset(&mut self) {
        self.state.reset(self.field);
        self.pending = TickInput::default();
        log::info!("Session reset (best {})", self.best.value);
    }

    /// Switch mode; always starts over
    pub fn set_mode(&mut self, mode: Mode, tuning: Tuning) {
        let best = self.state.best_score;
        self.state = GameState::with_tuning(mode, tuning, self.field, best);
        self.pending = TickInput::default();
        log::info!("Mode set to {}", mode.as_str());
    }
}
