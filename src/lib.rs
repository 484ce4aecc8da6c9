//! si-orange - a gravity-and-flap arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (physics, obstacles, collisions, scoring, difficulty)
//! - `game`: Session state machine (Idle -> Countdown -> Running -> Over)
//! - `platform`: Scheduler boundary (manual stepping, browser frame loop)
//! - `config`: Data-driven tuning with per-variant presets
//!
//! The presentation layer is not part of this crate. It feeds inputs into
//! [`Game`] and renders the [`GameEvent`]s drained from it.

pub mod config;
pub mod game;
pub mod platform;
pub mod sim;

pub use config::{Config, ConfigError, TimeScaling, Variant};
pub use game::Game;
pub use platform::{FrameToken, ManualScheduler, Scheduler, TimerToken};
pub use sim::{GameEvent, SessionPhase};

/// Default tuning constants (the "classic" variant)
pub mod consts {
    /// Nominal frame length the physics constants are tuned against (60 Hz)
    pub const TARGET_FRAME_MS: f32 = 16.67;
    /// Longest elapsed time a single tick may integrate
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Play area defaults
    pub const AREA_HEIGHT: f32 = 400.0;
    pub const AREA_WIDTH: f32 = 800.0;
    /// Smallest play area a resize can produce
    pub const MIN_AREA_HEIGHT: f32 = 100.0;
    pub const MIN_AREA_WIDTH: f32 = 100.0;

    /// Body defaults - the body sits at a fixed column, only y moves
    pub const BODY_X: f32 = 100.0;
    pub const BODY_RADIUS: f32 = 20.0;

    /// Velocity gained per nominal frame (positive = downward)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity a flap overwrites to (negative = upward)
    pub const FLAP_VELOCITY: f32 = -8.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 80.0;
    pub const PIPE_SPEED: f32 = 3.0;
    /// Gap center band as fractions of area height
    pub const GAP_BAND_MIN: f32 = 0.2;
    pub const GAP_BAND_MAX: f32 = 0.5;

    /// Starting difficulty
    pub const SPAWN_INTERVAL_MS: f32 = 1500.0;
    pub const GAP_SIZE: f32 = 150.0;

    /// Difficulty ratchet: every SCORE_STEP points, tighten by these steps
    pub const SCORE_STEP: u32 = 5;
    pub const SPAWN_INTERVAL_STEP_MS: f32 = 50.0;
    pub const GAP_SIZE_STEP: f32 = 5.0;
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 1000.0;
    pub const MIN_GAP_SIZE: f32 = 100.0;

    /// Countdown before a run (3, 2, 1, go)
    pub const COUNTDOWN_FROM: u32 = 3;
    pub const COUNTDOWN_STEP_MS: u32 = 1000;

    /// Tilt in degrees per unit of velocity, and its limits
    pub const TILT_FACTOR: f32 = 4.0;
    pub const TILT_MIN: f32 = -30.0;
    pub const TILT_MAX: f32 = 90.0;
}

/// Clamp a reported viewport to the smallest area the game can run in.
///
/// Negative, zero and non-finite dimensions collapse to the minimum.
#[inline]
pub fn clamp_viewport(height: f32, width: f32) -> (f32, f32) {
    fn floor_at(value: f32, min: f32) -> f32 {
        if value.is_finite() { value.max(min) } else { min }
    }
    (
        floor_at(height, consts::MIN_AREA_HEIGHT),
        floor_at(width, consts::MIN_AREA_WIDTH),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_viewport() {
        assert_eq!(clamp_viewport(600.0, 900.0), (600.0, 900.0));
        assert_eq!(
            clamp_viewport(-5.0, 0.0),
            (consts::MIN_AREA_HEIGHT, consts::MIN_AREA_WIDTH)
        );
        assert_eq!(
            clamp_viewport(f32::NAN, f32::INFINITY),
            (consts::MIN_AREA_HEIGHT, consts::MIN_AREA_WIDTH)
        );
    }
}
