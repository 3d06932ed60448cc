//! Visual-only effects: particles, actor trail, screen flash
//!
//! Driven by tick events, never read by the simulation. Has its own RNG so
//! cosmetic randomness can't shift gameplay draws.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{CollisionCause, GameEvent, GameState, TickReport};
use crate::tuning::Mode;

/// Particles per burst
pub const SCORE_BURST: usize = 15;
pub const OBSTACLE_CRASH_BURST: usize = 25;
pub const BOUNDS_CRASH_BURST: usize = 30;

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 20;
const TRAIL_LIFE: u32 = 18;
const TRAIL_FADE: f32 = 0.92;

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: f32,
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
}

impl Particle {
    /// Opacity for drawing (fades over the last 40 frames)
    pub fn alpha(&self) -> f32 {
        (self.life / 40.0).clamp(0.0, 1.0)
    }
}

/// Trail point behind the actor
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
    pub life: u32,
}

/// Effects state for one session
#[derive(Debug, Clone)]
pub struct Effects {
    pub particles: Vec<Particle>,
    /// Oldest first
    pub trail: Vec<TrailPoint>,
    /// Full-screen flash intensity (0-1)
    pub flash: f32,
    rng: Pcg32,
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            trail: Vec::with_capacity(TRAIL_LENGTH),
            flash: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.trail.clear();
        self.flash = 0.0;
    }

    /// Accent color for a mode
    pub fn accent(mode: Mode) -> u32 {
        match mode {
            Mode::Calm => 0xFFD700,
            Mode::Arcade => 0x00FFFF,
        }
    }

    /// React to one tick's events and advance everything by a frame
    pub fn apply(&mut self, report: &TickReport, state: &GameState, settings: &Settings) {
        let center = state.actor.center();
        let color = Self::accent(state.mode);

        for event in &report.events {
            match event {
                GameEvent::Flapped if settings.effective_trail() => self.push_trail(center),
                GameEvent::Scored { .. } if settings.particles => {
                    self.burst(center, SCORE_BURST, color)
                }
                GameEvent::Collided(cause) => {
                    if settings.particles {
                        let count = match cause {
                            CollisionCause::Ground | CollisionCause::Ceiling => BOUNDS_CRASH_BURST,
                            _ => OBSTACLE_CRASH_BURST,
                        };
                        self.burst(center, count, color);
                    }
                    if settings.effective_flash() {
                        self.flash = 1.0;
                    }
                }
                _ => {}
            }
        }

        if state.is_running() && settings.effective_trail() {
            self.push_trail(center);
        }

        self.update();
    }

    /// Spawn `count` particles at `pos`
    pub fn burst(&mut self, pos: Vec2, count: usize, color: u32) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 3.0,
                (self.rng.random::<f32>() - 1.5) * 3.0,
            );
            self.particles.push(Particle {
                pos,
                vel,
                life: 25.0 + self.rng.random::<f32>() * 15.0,
                size: 2.0 + self.rng.random::<f32>() * 3.0,
                color,
            });
        }
    }

    fn push_trail(&mut self, pos: Vec2) {
        self.trail.push(TrailPoint {
            pos,
            alpha: 0.6,
            life: TRAIL_LIFE,
        });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
    }

    /// Advance one frame
    pub fn update(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.life -= 1.0;
        }
        self.particles.retain(|p| p.life > 0.0);

        for point in self.trail.iter_mut() {
            point.alpha *= TRAIL_FADE;
            point.life = point.life.saturating_sub(1);
        }
        self.trail.retain(|t| t.life > 0);

        self.flash *= 0.85;
        if self.flash < 0.01 {
            self.flash = 0.0;
        }
    }
}
