//! Data-driven game balance
//!
//! Every number the simulation uses to pace a run lives here, one table per
//! mode. Derived values (spawn cadence, scroll speed) are computed from the
//! field on every call so a resized viewport takes effect on the next tick.

use serde::{Deserialize, Serialize};

use crate::sim::Field;

/// Gameplay/visual variant chosen on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Mode A: slow clouds, wide gaps
    #[default]
    Calm,
    /// Mode B: neon trail, tighter gaps, flash on death
    Arcade,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Calm => "Calm",
            Mode::Arcade => "Arcade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "calm" | "a" => Some(Mode::Calm),
            "arcade" | "b" => Some(Mode::Arcade),
            _ => None,
        }
    }
}

/// Which width drives difficulty
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Pacing {
    /// Cadence and speed follow the live viewport width (wider = harder)
    #[default]
    Viewport,
    /// Cadence and speed follow a fixed logical width regardless of viewport
    Logical { width: f32 },
}

/// Relative weights of the three obstacle shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeWeights {
    pub gap_pair: f32,
    pub spike: f32,
    pub floating: f32,
}

impl ShapeWeights {
    pub fn total(&self) -> f32 {
        self.gap_pair + self.spike + self.floating
    }
}

/// Balance table for one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Added to velocity every tick (pixels/tick²)
    pub gravity: f32,
    /// Velocity a trigger sets (negative = up)
    pub impulse: f32,

    /// spawn interval = max(min, floor(base - width / divisor)) ticks
    pub spawn_interval_base: f32,
    pub spawn_interval_divisor: f32,
    pub min_spawn_interval: u64,

    /// scroll speed = max(min, width / divisor) pixels/tick
    pub scroll_speed_divisor: f32,
    pub min_scroll_speed: f32,

    pub weights: ShapeWeights,

    /// Gap height range as fractions of the field height
    pub gap_min_fraction: f32,
    pub gap_max_fraction: f32,
    /// Gap-pair width as a fraction of the field width
    pub gap_pair_width_fraction: f32,

    pub spike_width: f32,
    pub spike_height: f32,

    pub floating_size: f32,
    /// Floating hazard top lands in [offset, offset + span * height)
    pub floating_y_offset: f32,
    pub floating_y_span_fraction: f32,

    pub pacing: Pacing,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::for_mode(Mode::Calm)
    }
}

impl Tuning {
    pub fn for_mode(mode: Mode) -> Self {
        let calm = Self {
            gravity: 0.25,
            impulse: -5.0,
            spawn_interval_base: 90.0,
            spawn_interval_divisor: 150.0,
            min_spawn_interval: 20,
            scroll_speed_divisor: 400.0,
            min_scroll_speed: 3.0,
            weights: ShapeWeights {
                gap_pair: 0.60,
                spike: 0.25,
                floating: 0.15,
            },
            gap_min_fraction: 0.22,
            gap_max_fraction: 0.27,
            gap_pair_width_fraction: 0.08,
            spike_width: 30.0,
            spike_height: 50.0,
            floating_size: 30.0,
            floating_y_offset: 50.0,
            floating_y_span_fraction: 0.6,
            pacing: Pacing::Viewport,
        };

        match mode {
            Mode::Calm => calm,
            Mode::Arcade => Self {
                gap_min_fraction: 0.20,
                gap_max_fraction: 0.25,
                floating_size: 34.0,
                ..calm
            },
        }
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Width that difficulty is derived from
    fn pacing_width(&self, field: Field) -> f32 {
        match self.pacing {
            Pacing::Viewport => field.width,
            Pacing::Logical { width } => width,
        }
    }

    /// Ticks between spawns (never below `min_spawn_interval`, never zero)
    pub fn spawn_interval(&self, field: Field) -> u64 {
        let raw = (self.spawn_interval_base - self.pacing_width(field) / self.spawn_interval_divisor)
            .floor();
        let min = self.min_spawn_interval.max(1);
        if raw.is_finite() && raw > min as f32 {
            raw as u64
        } else {
            min
        }
    }

    /// Leftward obstacle speed in pixels per tick
    pub fn scroll_speed(&self, field: Field) -> f32 {
        (self.pacing_width(field) / self.scroll_speed_divisor).max(self.min_scroll_speed)
    }
}
