//! Idle/demo player
//!
//! Decides each tick whether to trigger. Aims the actor's center a little
//! below the middle of the next gap and flaps whenever gravity would carry
//! it past that line. Dodges spikes and floating hazards close ahead.

use crate::sim::{Field, GameState, Obstacle};

/// How far ahead (pixels past the actor's right edge) hazards are considered
const LOOKAHEAD: f32 = 150.0;
/// Aim this far below a gap's center; a flap rises about 50px
const GAP_BIAS: f32 = 25.0;
/// Clearance kept above spike tips and around hazards
const CLEARANCE: f32 = 10.0;

/// Line the actor's center should hover just above
pub fn target_y(state: &GameState, field: Field) -> f32 {
    let actor = &state.actor;
    let half_height = actor.height / 2.0;

    let mut target = state
        .obstacles
        .iter()
        .find_map(|obstacle| match *obstacle {
            Obstacle::GapPair {
                gap_top,
                gap_bottom,
                passed: false,
                ..
            } if obstacle.right() >= actor.left() => Some((gap_top + gap_bottom) / 2.0 + GAP_BIAS),
            _ => None,
        })
        .unwrap_or(field.ground_y() / 2.0);

    for obstacle in &state.obstacles {
        let ahead = obstacle.x() - actor.right();
        if obstacle.right() < actor.left() || ahead > LOOKAHEAD {
            continue;
        }
        match *obstacle {
            Obstacle::Spike { y, .. } => {
                target = target.min(y - half_height - CLEARANCE);
            }
            Obstacle::Floating { y, size, .. } => {
                let radius = size / 2.0;
                let hazard_y = y + radius;
                let reach = radius + actor.width / 2.0 + CLEARANCE;
                if (target - hazard_y).abs() < reach {
                    // Pass on whichever side has more room
                    target = if hazard_y > field.ground_y() / 2.0 {
                        hazard_y - reach
                    } else {
                        hazard_y + reach + GAP_BIAS
                    };
                }
            }
            Obstacle::GapPair { .. } => {}
        }
    }

    target.clamp(actor.height, (field.ground_y() - actor.height).max(actor.height))
}

/// True if the autopilot would flap this tick
pub fn should_trigger(state: &GameState, field: Field) -> bool {
    let actor = &state.actor;
    let next_center = actor.center().y + actor.vel + actor.gravity;
    actor.vel >= 0.0 && next_center > target_y(state, field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{RunState, TickInput, tick};
    use crate::tuning::Mode;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> Field {
        Field::new(800.0, 600.0)
    }

    #[test]
    fn test_aims_below_gap_center() {
        let mut state = GameState::new(Mode::Calm, field(), 0);
        state.obstacles.push(Obstacle::GapPair {
            x: 400.0,
            width: 64.0,
            gap_top: 200.0,
            gap_bottom: 340.0,
            passed: false,
        });
        assert_eq!(target_y(&state, field()), 295.0);
    }

    #[test]
    fn test_rising_actor_never_triggers() {
        let mut state = GameState::new(Mode::Calm, field(), 0);
        state.actor.vel = -2.0;
        state.actor.pos.y = 500.0;
        assert!(!should_trigger(&state, field()));
    }

    #[test]
    fn test_decision_is_pure() {
        let mut state = GameState::new(Mode::Arcade, field(), 0);
        state.actor.vel = 1.0;
        let first = should_trigger(&state, field());
        for _ in 0..5 {
            assert_eq!(should_trigger(&state, field()), first);
        }
    }

    #[test]
    fn test_clears_a_gap_pair() {
        let mut rng = Pcg32::seed_from_u64(77);
        let mut state = GameState::new(Mode::Calm, field(), 0);
        state.run = RunState::Running;
        state.obstacles.push(Obstacle::GapPair {
            x: 400.0,
            width: 64.0,
            gap_top: 200.0,
            gap_bottom: 340.0,
            passed: false,
        });

        for _ in 0..130 {
            let input = TickInput {
                trigger: should_trigger(&state, field()),
            };
            tick(&mut state, &input, field(), &mut rng);
            assert_eq!(state.run, RunState::Running);
        }
        assert_eq!(state.score, 1);
    }
}
