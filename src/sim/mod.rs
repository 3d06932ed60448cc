//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per host frame, no wall-clock time
//! - RNG passed in explicitly, never created here
//! - Stable iteration order (obstacles oldest first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{bounds_hit, first_obstacle_hit, obstacle_hit};
pub use spawn::spawn_obstacle;
pub use state::{
    Actor, CollisionCause, Field, GameEvent, GameState, Obstacle, ObstacleKind, RunState,
};
pub use tick::{TickInput, TickReport, apply_trigger, tick};
