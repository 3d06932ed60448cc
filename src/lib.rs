//! Flappy Feather - A two-mode flappy arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, run state)
//! - `tuning`: Data-driven game balance per mode
//! - `session`: Host-facing loop adapter (trigger queue, score/render sinks)
//! - `fx`: Visual-only particles, trail and flash
//! - `platform`: Browser/native storage abstraction
//! - `best_score`: Persisted best score

pub mod autopilot;
pub mod best_score;
pub mod fx;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use best_score::BestScore;
pub use session::{Frame, RenderSnapshot, Session};
pub use settings::Settings;
pub use tuning::{Mode, Pacing, Tuning};

/// Game configuration constants shared by every mode
pub mod consts {
    /// Actor bounding box
    pub const ACTOR_WIDTH: f32 = 34.0;
    pub const ACTOR_HEIGHT: f32 = 24.0;

    /// Actor start position as a fraction of the field width
    pub const ACTOR_START_X_FRACTION: f32 = 0.15;

    /// Ground band height as a fraction of the field height
    pub const GROUND_FRACTION: f32 = 0.13;

    /// Obstacles are dropped once their right edge is this far past the left edge
    pub const OFFSCREEN_MARGIN: f32 = 20.0;

    /// Field used before the host reports a real viewport
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;
}
