//! Per-frame simulation tick
//!
//! Core game loop that advances the world by one step. The host calls this
//! once per animation frame with the current field and its RNG.

use rand::Rng;

use super::collision::{bounds_hit, first_obstacle_hit};
use super::spawn::spawn_obstacle;
use super::state::{CollisionCause, Field, GameEvent, GameState, Obstacle, RunState};
use crate::consts::OFFSCREEN_MARGIN;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (press/tap/click/space). Starts the run if it hasn't started.
    pub trigger: bool,
}

/// What one tick did, for the score and render sinks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Events in the order they happened
    pub events: Vec<GameEvent>,
    pub run: RunState,
    pub score: u32,
    pub best: u32,
}

impl TickReport {
    /// Points scored during this tick
    pub fn score_delta(&self) -> u32 {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::Scored { .. }))
            .count() as u32
    }

    /// New best score reached during this tick, if any
    pub fn new_best(&self) -> Option<u32> {
        self.events.iter().rev().find_map(|e| match e {
            GameEvent::NewBest(best) => Some(*best),
            _ => None,
        })
    }
}

/// Apply a trigger. NotStarted starts the run; Ended ignores it.
pub fn apply_trigger(state: &mut GameState, events: &mut Vec<GameEvent>) {
    match state.run {
        RunState::Ended => {}
        RunState::NotStarted => {
            state.run = RunState::Running;
            log::info!("Run started ({})", state.mode.as_str());
            events.push(GameEvent::Started);
            state.actor.flap();
            events.push(GameEvent::Flapped);
        }
        RunState::Running => {
            state.actor.flap();
            events.push(GameEvent::Flapped);
        }
    }
}

/// Move the run to Ended. A second call in the same run does nothing.
fn end_run(state: &mut GameState, cause: CollisionCause, events: &mut Vec<GameEvent>) {
    if state.run != RunState::Running {
        return;
    }
    state.run = RunState::Ended;
    events.push(GameEvent::Collided(cause));
    events.push(GameEvent::GameOver {
        score: state.score,
        best: state.best_score,
    });
    log::info!(
        "Game over ({:?}) at frame {}: score {}, best {}",
        cause,
        state.frame,
        state.score,
        state.best_score
    );
}

/// Mark gap-pairs the actor has cleared and award their points
fn award_passes(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let actor_left = state.actor.left();
    for obstacle in &mut state.obstacles {
        let Obstacle::GapPair { x, width, passed, .. } = obstacle else {
            continue;
        };
        if *passed || *x + *width >= actor_left {
            continue;
        }

        *passed = true;
        state.score += 1;
        let new_best = state.score > state.best_score;
        if new_best {
            state.best_score = state.score;
        }
        events.push(GameEvent::Scored {
            score: state.score,
            best: state.best_score,
        });
        if new_best {
            events.push(GameEvent::NewBest(state.best_score));
        }
        log::debug!("Scored {} (best {})", state.score, state.best_score);
    }
}

/// Advance the game state by one step
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    field: Field,
    rng: &mut R,
) -> TickReport {
    let mut events = Vec::new();

    if state.run != RunState::Ended {
        state.follow_start_position(field);

        if input.trigger {
            apply_trigger(state, &mut events);
        }

        if state.run == RunState::Running {
            step(state, field, rng, &mut events);
        }
    }

    TickReport {
        events,
        run: state.run,
        score: state.score,
        best: state.best_score,
    }
}

/// One running step: physics, spawn, scroll, collide, score, cull, bounds
fn step<R: Rng + ?Sized>(
    state: &mut GameState,
    field: Field,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    state.actor.integrate();
    state.frame += 1;

    // Derived every tick so viewport changes apply immediately
    let interval = state.tuning.spawn_interval(field);
    if state.frame % interval == 0 {
        let obstacle = spawn_obstacle(rng, field, &state.tuning);
        log::debug!("Frame {}: spawned {:?}", state.frame, obstacle.kind());
        events.push(GameEvent::Spawned(obstacle.kind()));
        state.obstacles.push(obstacle);
    }

    let speed = state.tuning.scroll_speed(field);
    for obstacle in &mut state.obstacles {
        obstacle.scroll_left(speed);
    }

    if let Some(cause) = first_obstacle_hit(&state.actor, &state.obstacles) {
        end_run(state, cause, events);
    }

    if state.run == RunState::Running {
        award_passes(state, events);
    }

    state
        .obstacles
        .retain(|obstacle| obstacle.right() >= -OFFSCREEN_MARGIN);

    if let Some(cause) = bounds_hit(&state.actor, field) {
        end_run(state, cause, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;
    use crate::tuning::Mode;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> Field {
        Field::new(800.0, 600.0)
    }

    fn running_state() -> GameState {
        let mut state = GameState::new(Mode::Calm, field(), 0);
        state.run = RunState::Running;
        state
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn flap() -> TickInput {
        TickInput { trigger: true }
    }

    #[test]
    fn test_first_trigger_starts_run_with_impulse() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = GameState::new(Mode::Calm, field(), 0);

        // No trigger: nothing moves
        let report = tick(&mut state, &idle(), field(), &mut rng);
        assert_eq!(report.run, RunState::NotStarted);
        assert!(report.events.is_empty());
        assert_eq!(state.frame, 0);

        let report = tick(&mut state, &flap(), field(), &mut rng);
        assert_eq!(state.run, RunState::Running);
        assert_eq!(&report.events[..2], &[GameEvent::Started, GameEvent::Flapped]);
        // Impulse applied before this tick's gravity
        assert_eq!(state.actor.vel, -5.0 + 0.25);
    }

    #[test]
    fn test_trigger_overwrites_fall_speed() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running_state();
        state.actor.vel = 9.0;

        let mut events = Vec::new();
        apply_trigger(&mut state, &mut events);
        assert_eq!(state.actor.vel, -5.0);
        assert_eq!(events, vec![GameEvent::Flapped]);

        state.actor.vel = -3.0;
        tick(&mut state, &flap(), field(), &mut rng);
        assert_eq!(state.actor.vel, -5.0 + 0.25);
    }

    #[test]
    fn test_gap_pair_scores_exactly_once() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running_state();
        let actor_left = state.actor.left();
        // Right edge one pixel ahead of the actor; one 3px scroll puts it behind
        state.obstacles.push(Obstacle::GapPair {
            x: actor_left - 64.0 + 1.0,
            width: 64.0,
            gap_top: 180.0,
            gap_bottom: 330.0,
            passed: false,
        });

        let report = tick(&mut state, &idle(), field(), &mut rng);
        assert_eq!(report.score_delta(), 1);
        assert_eq!(state.score, 1);
        assert_eq!(state.best_score, 1);
        assert_eq!(report.new_best(), Some(1));
        assert!(matches!(state.obstacles[0], Obstacle::GapPair { passed: true, .. }));

        for _ in 0..5 {
            let report = tick(&mut state, &flap(), field(), &mut rng);
            assert_eq!(report.score_delta(), 0);
        }
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_gap_pair_not_yet_behind_actor_does_not_score() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running_state();
        let actor_left = state.actor.left();
        state.obstacles.push(Obstacle::GapPair {
            x: actor_left - 64.0 + 3.0,
            width: 64.0,
            gap_top: 180.0,
            gap_bottom: 330.0,
            passed: false,
        });
        // Right edge lands exactly on the actor's left edge
        tick(&mut state, &idle(), field(), &mut rng);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_spikes_and_hazards_never_score() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running_state();
        state.obstacles.push(Obstacle::Spike { x: 60.0, y: 472.0, width: 30.0, height: 50.0 });
        state.obstacles.push(Obstacle::Floating { x: 40.0, y: 60.0, size: 30.0 });
        tick(&mut state, &idle(), field(), &mut rng);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_offscreen_obstacles_are_culled() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running_state();
        // After a 3px scroll: right edges at -20.5 and -19.5
        state.obstacles.push(Obstacle::Floating { x: -47.5, y: 60.0, size: 30.0 });
        state.obstacles.push(Obstacle::Floating { x: -46.5, y: 60.0, size: 30.0 });

        tick(&mut state, &idle(), field(), &mut rng);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].right(), -19.5);
    }

    #[test]
    fn test_falls_to_ground_without_input() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running_state();
        let mut ticks = 0;
        let mut last = TickReport::default();
        while state.run == RunState::Running && ticks < 200 {
            last = tick(&mut state, &idle(), field(), &mut rng);
            ticks += 1;
        }
        assert_eq!(state.run, RunState::Ended);
        assert!(last.events.contains(&GameEvent::Collided(CollisionCause::Ground)));
        assert!(ticks <= 45, "took {} ticks", ticks);
    }

    #[test]
    fn test_terminal_collision_handled_once() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running_state();
        state.score = 4;
        state.best_score = 9;
        // Above the ceiling, inside a pipe's top barrier and touching a hazard
        state.actor.pos = Vec2::new(120.0, -10.0);
        state.obstacles.push(Obstacle::GapPair {
            x: 100.0,
            width: 64.0,
            gap_top: 180.0,
            gap_bottom: 330.0,
            passed: false,
        });
        state.obstacles.push(Obstacle::Floating { x: 125.0, y: -20.0, size: 30.0 });

        let report = tick(&mut state, &idle(), field(), &mut rng);
        let game_overs = report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        let collisions = report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Collided(_)))
            .count();
        assert_eq!(game_overs, 1);
        assert_eq!(collisions, 1);
        assert!(report.events.contains(&GameEvent::Collided(CollisionCause::GapPair)));
        assert!(report.events.contains(&GameEvent::GameOver { score: 4, best: 9 }));
        assert_eq!(state.score, 4);
    }

    #[test]
    fn test_ended_state_is_frozen() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = running_state();
        state.run = RunState::Ended;
        state.obstacles.push(Obstacle::Floating { x: 300.0, y: 60.0, size: 30.0 });
        let before = (state.actor, state.obstacles.clone(), state.frame);

        let report = tick(&mut state, &flap(), field(), &mut rng);
        assert!(report.events.is_empty());
        assert_eq!(report.run, RunState::Ended);
        assert_eq!((state.actor, state.obstacles.clone(), state.frame), before);
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = running_state();
        state.score = 5;
        state.best_score = 5;
        while state.run == RunState::Running {
            tick(&mut state, &idle(), field(), &mut rng);
        }

        state.reset(field());
        assert_eq!(state.run, RunState::NotStarted);
        assert_eq!(state.score, 0);
        assert_eq!(state.best_score, 5);
        assert!(state.obstacles.is_empty());
        assert!(state.actor.pos.abs_diff_eq(field().actor_start(), 1e-4));

        tick(&mut state, &flap(), field(), &mut rng);
        assert_eq!(state.run, RunState::Running);
    }

    #[test]
    fn test_spawns_on_interval() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut state = running_state();
        let interval = state.tuning.spawn_interval(field());
        assert_eq!(interval, 84);

        let mut spawned_at = Vec::new();
        for _ in 0..(interval * 2) {
            // Keep the actor hovering mid-field
            let input = TickInput {
                trigger: state.actor.pos.y > 300.0,
            };
            // Clear obstacles so collisions never end the run
            state.obstacles.clear();
            let report = tick(&mut state, &input, field(), &mut rng);
            if report
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Spawned(_)))
            {
                spawned_at.push(state.frame);
            }
        }
        assert_eq!(spawned_at, vec![interval, interval * 2]);
    }

    #[test]
    fn test_new_obstacle_enters_at_right_edge() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = running_state();
        state.frame = state.tuning.spawn_interval(field()) - 1;
        let report = tick(&mut state, &idle(), field(), &mut rng);
        assert!(report.events.iter().any(|e| matches!(e, GameEvent::Spawned(_))));
        let obstacle = state.obstacles.last().expect("spawned");
        // Spawned at the edge, then scrolled once
        assert_eq!(obstacle.x(), 800.0 - 3.0);
    }

    #[test]
    fn test_resizing_between_ticks_is_tolerated() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut state = GameState::new(Mode::Arcade, field(), 0);
        let fields = [
            Field::new(800.0, 600.0),
            Field::new(320.0, 640.0),
            Field::new(2560.0, 1440.0),
            Field::new(0.0, 0.0),
            Field::new(1.0, 1.0),
        ];
        for (i, f) in fields.iter().cycle().take(500).enumerate() {
            let input = TickInput { trigger: i % 7 == 0 };
            tick(&mut state, &input, *f, &mut rng);
            if state.run == RunState::Ended {
                state.reset(*f);
            }
        }
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);
        let mut state1 = GameState::new(Mode::Calm, field(), 0);
        let mut state2 = GameState::new(Mode::Calm, field(), 0);

        for i in 0..600u32 {
            let input = TickInput {
                trigger: i % 19 == 0 || state1.actor.pos.y > 350.0,
            };
            let r1 = tick(&mut state1, &input, field(), &mut rng1);
            let r2 = tick(&mut state2, &input, field(), &mut rng2);
            assert_eq!(r1, r2);
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.actor, state2.actor);
        assert_eq!(state1.obstacles, state2.obstacles);
        assert_eq!(state1.score, state2.score);
    }

    #[test]
    fn test_spawned_kinds_are_reported() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut state = running_state();
        let mut kinds = Vec::new();
        for _ in 0..(84 * 40) {
            state.actor.pos.y = 250.0;
            state.actor.vel = 0.0;
            state.obstacles.clear();
            let report = tick(&mut state, &idle(), field(), &mut rng);
            for event in report.events {
                if let GameEvent::Spawned(kind) = event {
                    kinds.push(kind);
                }
            }
        }
        assert_eq!(kinds.len(), 40);
        assert!(kinds.contains(&ObstacleKind::GapPair));
    }

    proptest! {
        #[test]
        fn prop_running_tick_integrates_gravity(y in 100.0f32..400.0, vel in -5.0f32..5.0) {
            let mut rng = Pcg32::seed_from_u64(0);
            let mut state = running_state();
            state.actor.pos.y = y;
            state.actor.vel = vel;

            tick(&mut state, &idle(), field(), &mut rng);
            let expected_vel = vel + 0.25;
            prop_assert_eq!(state.actor.vel, expected_vel);
            prop_assert_eq!(state.actor.pos.y, y + expected_vel);
            prop_assert_eq!(state.run, RunState::Running);
        }
    }

    /// Autopilot-driven runs until `games` have ended; returns each run's score
    fn play_autopilot_games(
        state: &mut GameState,
        rng: &mut Pcg32,
        games: usize,
        max_ticks: u32,
    ) -> Vec<u32> {
        let mut scores = Vec::new();
        let mut max_seen = state.best_score;
        let mut prev_best = state.best_score;

        for _ in 0..max_ticks {
            let input = TickInput {
                trigger: crate::autopilot::should_trigger(state, field()),
            };
            let report = tick(state, &input, field(), rng);
            max_seen = max_seen.max(report.score);
            assert!(report.best >= prev_best);
            assert_eq!(report.best, max_seen);
            prev_best = report.best;

            if state.run == RunState::Ended {
                scores.push(state.score);
                if scores.len() == games {
                    break;
                }
                state.reset(field());
            }
        }
        scores
    }

    #[test]
    fn test_best_tracks_max_across_scoring_runs() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut state = GameState::new(Mode::Calm, field(), 0);
        let scores = play_autopilot_games(&mut state, &mut rng, 5, 200_000);

        assert_eq!(scores.len(), 5);
        assert!(scores.iter().filter(|&&s| s > 0).count() >= 2, "{:?}", scores);
        let max = scores.iter().copied().max().unwrap_or(0);
        assert!(scores.iter().any(|&s| s < max), "{:?}", scores);
        assert_eq!(state.best_score, max);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_best_score_is_max_of_observed_scores(seed in any::<u64>(), best in 0u32..3) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = GameState::new(Mode::Calm, field(), best);
            let scores = play_autopilot_games(&mut state, &mut rng, 3, 20_000);

            let max_scored = scores.iter().copied().chain([state.score]).max().unwrap_or(0);
            // Only runs that actually beat the starting best say anything here
            prop_assume!(max_scored > best);
            prop_assert_eq!(state.best_score, max_scored);
        }
    }
}
