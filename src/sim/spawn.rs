//! Obstacle generation
//!
//! Shapes are drawn from the mode's weight table, sizes uniformly from its
//! ranges. The RNG is always passed in so tests can pin every draw.

use rand::Rng;

use super::state::{Field, Obstacle, ObstacleKind};
use crate::tuning::Tuning;

/// Uniform in [lo, hi), collapsing to `lo` for empty or degenerate ranges
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo && (hi - lo).is_finite() {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

/// Pick a shape from the weight table
pub fn roll_kind<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> ObstacleKind {
    let weights = tuning.weights;
    let total = weights.total();
    if total <= 0.0 {
        return ObstacleKind::GapPair;
    }

    let roll = rng.random::<f32>() * total;
    if roll < weights.gap_pair {
        ObstacleKind::GapPair
    } else if roll < weights.gap_pair + weights.spike {
        ObstacleKind::Spike
    } else {
        ObstacleKind::Floating
    }
}

/// Build one obstacle of `kind` just past the right edge of the field
pub fn build_obstacle<R: Rng + ?Sized>(
    rng: &mut R,
    kind: ObstacleKind,
    field: Field,
    tuning: &Tuning,
) -> Obstacle {
    let x = field.width;
    let h = field.height;

    match kind {
        ObstacleKind::GapPair => {
            let gap = h * uniform(rng, tuning.gap_min_fraction, tuning.gap_max_fraction);
            let gap_top = uniform(rng, 0.0, h - gap - field.ground_height());
            Obstacle::GapPair {
                x,
                width: field.width * tuning.gap_pair_width_fraction,
                gap_top,
                gap_bottom: gap_top + gap,
                passed: false,
            }
        }
        ObstacleKind::Spike => Obstacle::Spike {
            x,
            y: field.ground_y() - tuning.spike_height,
            width: tuning.spike_width,
            height: tuning.spike_height,
        },
        ObstacleKind::Floating => {
            let offset = tuning.floating_y_offset;
            let y = uniform(rng, offset, offset + h * tuning.floating_y_span_fraction);
            Obstacle::Floating {
                x,
                y,
                size: tuning.floating_size,
            }
        }
    }
}

/// Roll a shape and build it
pub fn spawn_obstacle<R: Rng + ?Sized>(rng: &mut R, field: Field, tuning: &Tuning) -> Obstacle {
    let kind = roll_kind(rng, tuning);
    build_obstacle(rng, kind, field, tuning)
}
