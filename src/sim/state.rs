//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here as plain data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::{Mode, Tuning};

/// Visible play area in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT)
    }
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Height of the ground band at the bottom of the field
    #[inline]
    pub fn ground_height(&self) -> f32 {
        self.height * GROUND_FRACTION
    }

    /// Top edge of the ground band
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - self.ground_height()
    }

    /// Where the actor waits before a run starts
    pub fn actor_start(&self) -> Vec2 {
        Vec2::new(self.width * ACTOR_START_X_FRACTION, self.height / 2.0)
    }
}

/// Coarse lifecycle of one play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    /// Waiting for the first trigger
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended (terminal until reset)
    Ended,
}

/// The player-controlled body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// Vertical velocity (positive = down)
    pub vel: f32,
    pub width: f32,
    pub height: f32,
    /// Added to `vel` every tick
    pub gravity: f32,
    /// Velocity a trigger sets
    pub impulse: f32,
}

impl Actor {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: 0.0,
            width: ACTOR_WIDTH,
            height: ACTOR_HEIGHT,
            gravity: tuning.gravity,
            impulse: tuning.impulse,
        }
    }

    /// One step of gravity: velocity first, then position
    #[inline]
    pub fn integrate(&mut self) {
        self.vel += self.gravity;
        self.pos.y += self.vel;
    }

    /// Overwrite velocity with the upward impulse
    #[inline]
    pub fn flap(&mut self) {
        self.vel = self.impulse;
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Shape tag for events and statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    GapPair,
    Spike,
    Floating,
}

/// An obstacle scrolling right to left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    /// Two barriers: one from the ceiling down to `gap_top`, one from
    /// `gap_bottom` down to the floor
    GapPair {
        x: f32,
        width: f32,
        gap_top: f32,
        gap_bottom: f32,
        /// Set once the actor is past it; scores exactly once
        passed: bool,
    },
    /// Upward triangle with its apex at (`x + width / 2`, `y`)
    Spike { x: f32, y: f32, width: f32, height: f32 },
    /// Circle inscribed in the `size` square at (`x`, `y`)
    Floating { x: f32, y: f32, size: f32 },
}

impl Obstacle {
    pub fn kind(&self) -> ObstacleKind {
        match self {
            Obstacle::GapPair { .. } => ObstacleKind::GapPair,
            Obstacle::Spike { .. } => ObstacleKind::Spike,
            Obstacle::Floating { .. } => ObstacleKind::Floating,
        }
    }

    /// Left edge
    pub fn x(&self) -> f32 {
        match *self {
            Obstacle::GapPair { x, .. } | Obstacle::Spike { x, .. } | Obstacle::Floating { x, .. } => x,
        }
    }

    pub fn width(&self) -> f32 {
        match *self {
            Obstacle::GapPair { width, .. } | Obstacle::Spike { width, .. } => width,
            Obstacle::Floating { size, .. } => size,
        }
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x() + self.width()
    }

    /// Shift left by `dx` pixels
    pub fn scroll_left(&mut self, dx: f32) {
        match self {
            Obstacle::GapPair { x, .. } | Obstacle::Spike { x, .. } | Obstacle::Floating { x, .. } => {
                *x -= dx
            }
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionCause {
    GapPair,
    Spike,
    Floating,
    Ground,
    Ceiling,
}

impl From<ObstacleKind> for CollisionCause {
    fn from(kind: ObstacleKind) -> Self {
        match kind {
            ObstacleKind::GapPair => CollisionCause::GapPair,
            ObstacleKind::Spike => CollisionCause::Spike,
            ObstacleKind::Floating => CollisionCause::Floating,
        }
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// First trigger moved the run from NotStarted to Running
    Started,
    /// A trigger applied the impulse
    Flapped,
    Spawned(ObstacleKind),
    Scored { score: u32, best: u32 },
    NewBest(u32),
    Collided(CollisionCause),
    GameOver { score: u32, best: u32 },
}

/// Complete world state (deterministic given the RNG passed to `tick`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub mode: Mode,
    pub tuning: Tuning,
    pub run: RunState,
    pub actor: Actor,
    /// Live obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Ticks simulated while running
    pub frame: u64,
    pub score: u32,
    /// Highest score ever seen, including previous sessions
    pub best_score: u32,
}

impl GameState {
    /// Fresh state for `mode`, actor at the start position of `field`
    pub fn new(mode: Mode, field: Field, best_score: u32) -> Self {
        Self::with_tuning(mode, Tuning::for_mode(mode), field, best_score)
    }

    pub fn with_tuning(mode: Mode, tuning: Tuning, field: Field, best_score: u32) -> Self {
        let actor = Actor::new(field.actor_start(), &tuning);
        Self {
            mode,
            tuning,
            run: RunState::NotStarted,
            actor,
            obstacles: Vec::new(),
            frame: 0,
            score: 0,
            best_score,
        }
    }

    /// Back to NotStarted; best score survives
    pub fn reset(&mut self, field: Field) {
        self.run = RunState::NotStarted;
        self.actor = Actor::new(field.actor_start(), &self.tuning);
        self.obstacles.clear();
        self.frame = 0;
        self.score = 0;
    }

    /// Keep the waiting actor on its start mark when the field resizes
    pub fn follow_start_position(&mut self, field: Field) {
        if self.run == RunState::NotStarted {
            self.actor.pos = field.actor_start();
        }
    }

    pub fn is_running(&self) -> bool {
        self.run == RunState::Running
    }

    pub fn is_ended(&self) -> bool {
        self.run == RunState::Ended
    }
}
