//! Session state and core simulation types
//!
//! Everything a single game owns lives in [`Session`]; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::obstacle::{BarrierRole, Obstacle};
use crate::config::Config;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for a start request
    Idle,
    /// Counting down to a run
    Countdown,
    /// Active gameplay
    Running,
    /// Run ended, waiting for play again
    Over,
}

/// Vertical boundary of the play area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Ceiling,
    Floor,
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GameOverCause {
    Boundary { edge: Edge },
    Obstacle { id: u32, role: BarrierRole },
}

/// Outbound notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    BodyMoved { y: f32, tilt: f32 },
    ObstacleSpawned { id: u32, top_height: f32, bottom_height: f32, x: f32 },
    ObstacleMoved { id: u32, x: f32 },
    ObstacleRemoved { id: u32 },
    ScoreChanged { score: u32 },
    CountdownTick { remaining: u32 },
    SessionStateChanged { phase: SessionPhase },
    GameOver { final_score: u32, cause: GameOverCause },
}

/// The falling body. Only `y` and `vel` change during a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    /// Vertical velocity, positive = downward
    pub vel: f32,
    pub radius: f32,
}

impl Body {
    /// Body centered vertically in an area of `area_height`
    pub fn new(config: &Config, area_height: f32) -> Self {
        Self {
            x: config.body_x,
            y: area_height / 2.0,
            vel: 0.0,
            radius: config.body_radius,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y - self.radius
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.radius
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x - self.radius
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.radius
    }
}

/// Complete per-game state
#[derive(Debug, Clone)]
pub struct Session {
    pub phase: SessionPhase,
    pub score: u32,
    pub body: Body,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub difficulty: Difficulty,
    /// Countdown steps left before the run starts
    pub countdown: u32,
    /// Milliseconds accumulated since the last spawn
    pub since_spawn_ms: f32,
    pub area_height: f32,
    pub area_width: f32,
    /// Seed the session RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    /// Events not yet drained by the presentation layer
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl Session {
    /// Create an idle session with the given seed
    pub fn new(config: &Config, seed: u64) -> Self {
        let (area_height, area_width) =
            crate::clamp_viewport(config.area_height, config.area_width);
        Self {
            phase: SessionPhase::Idle,
            score: 0,
            body: Body::new(config, area_height),
            obstacles: Vec::new(),
            difficulty: Difficulty::initial(config),
            countdown: 0,
            since_spawn_ms: config.spawn_interval_ms,
            area_height,
            area_width,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Change phase and announce it
    pub fn set_phase(&mut self, phase: SessionPhase) {
        if self.phase != phase {
            log::info!("Session {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.emit(GameEvent::SessionStateChanged { phase });
        }
    }

    /// Reset everything a run owns: score, body, obstacles and difficulty.
    ///
    /// Area dimensions, the RNG stream and pending events are kept.
    pub fn reset(&mut self, config: &Config) {
        for obstacle in std::mem::take(&mut self.obstacles) {
            self.emit(GameEvent::ObstacleRemoved { id: obstacle.id });
        }
        if self.score != 0 {
            self.score = 0;
            self.emit(GameEvent::ScoreChanged { score: 0 });
        }
        self.body = Body::new(config, self.area_height);
        self.difficulty = Difficulty::initial(config);
        self.since_spawn_ms = self.difficulty.spawn_interval_ms;
        self.countdown = 0;
        let tilt = super::physics::tilt(self.body.vel, config);
        self.emit(GameEvent::BodyMoved {
            y: self.body.y,
            tilt,
        });
    }

    /// Apply a new viewport size, keeping the body inside the playable band
    pub fn resize(&mut self, height: f32, width: f32) {
        let (height, width) = crate::clamp_viewport(height, width);
        if height != self.area_height || width != self.area_width {
            log::debug!(
                "Play area {}x{} -> {}x{}",
                self.area_width,
                self.area_height,
                width,
                height
            );
        }
        self.area_height = height;
        self.area_width = width;
        if self.phase == SessionPhase::Running {
            let max_y = (height - self.body.radius).max(self.body.radius);
            self.body.y = self.body.y.clamp(self.body.radius, max_y);
        } else {
            self.body.y = height / 2.0;
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
