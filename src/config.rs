//! Game tuning and variant presets
//!
//! Every constant the simulation reads lives here. Configs round-trip through
//! JSON and missing fields fall back to the classic defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// How a quantity scales with the elapsed time of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScaling {
    /// Same step every tick, regardless of frame length
    Fixed,
    /// Step scaled by elapsed / target frame length
    DeltaTime,
}

impl TimeScaling {
    /// Multiplier applied to per-frame quantities for a tick of `elapsed_ms`
    pub fn factor(&self, elapsed_ms: f32, target_frame_ms: f32) -> f32 {
        match self {
            TimeScaling::Fixed => 1.0,
            TimeScaling::DeltaTime => elapsed_ms / target_frame_ms,
        }
    }
}

/// Known tuning variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Low gap band, no launch boost, tick-based pipes
    #[default]
    Classic,
    /// Centered gap band, upward launch boost, time-scaled pipes
    Relaxed,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Relaxed => "Relaxed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "relaxed" => Some(Variant::Relaxed),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Play area ===
    /// Initial area height (replaced by the first viewport report)
    pub area_height: f32,
    /// Initial area width (pipes spawn at this x)
    pub area_width: f32,

    // === Body ===
    /// Fixed horizontal position of the body center
    pub body_x: f32,
    /// Hitbox radius
    pub body_radius: f32,
    /// Downward acceleration per nominal frame
    pub gravity: f32,
    /// Velocity a flap overwrites to
    pub flap_velocity: f32,
    /// Velocity the body starts a run with (0 = drop, negative = boost)
    pub initial_velocity: f32,

    // === Pipes ===
    pub pipe_width: f32,
    /// Distance a pipe scrolls per tick (or per nominal frame when time-scaled)
    pub pipe_speed: f32,
    /// Lowest gap center, as a fraction of area height
    pub gap_band_min: f32,
    /// Highest gap center, as a fraction of area height
    pub gap_band_max: f32,

    // === Difficulty ===
    pub spawn_interval_ms: f32,
    pub gap_size: f32,
    /// Tighten difficulty every time score hits a multiple of this
    pub score_step: u32,
    pub spawn_interval_step_ms: f32,
    pub gap_size_step: f32,
    pub min_spawn_interval_ms: f32,
    pub min_gap_size: f32,

    // === Timing ===
    pub target_frame_ms: f32,
    /// Elapsed time per tick is clamped to this
    pub max_frame_ms: f32,
    pub physics_time_scaling: TimeScaling,
    pub obstacle_time_scaling: TimeScaling,
    pub countdown_from: u32,
    pub countdown_step_ms: u32,

    // === Input ===
    /// A flap before the run starts skips straight to Running
    pub flap_starts_game: bool,

    // === Presentation hints ===
    pub tilt_factor: f32,
    pub tilt_min: f32,
    pub tilt_max: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            area_height: AREA_HEIGHT,
            area_width: AREA_WIDTH,

            body_x: BODY_X,
            body_radius: BODY_RADIUS,
            gravity: GRAVITY,
            flap_velocity: FLAP_VELOCITY,
            initial_velocity: 0.0,

            pipe_width: PIPE_WIDTH,
            pipe_speed: PIPE_SPEED,
            gap_band_min: GAP_BAND_MIN,
            gap_band_max: GAP_BAND_MAX,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            gap_size: GAP_SIZE,
            score_step: SCORE_STEP,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            gap_size_step: GAP_SIZE_STEP,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            min_gap_size: MIN_GAP_SIZE,

            target_frame_ms: TARGET_FRAME_MS,
            max_frame_ms: MAX_FRAME_MS,
            physics_time_scaling: TimeScaling::DeltaTime,
            obstacle_time_scaling: TimeScaling::Fixed,
            countdown_from: COUNTDOWN_FROM,
            countdown_step_ms: COUNTDOWN_STEP_MS,

            flap_starts_game: false,

            tilt_factor: TILT_FACTOR,
            tilt_min: TILT_MIN,
            tilt_max: TILT_MAX,
        }
    }
}

impl Config {
    /// Create the config for a tuning variant
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self::default(),
            Variant::Relaxed => Self {
                initial_velocity: -4.0,
                gap_band_min: 0.3,
                gap_band_max: 0.7,
                obstacle_time_scaling: TimeScaling::DeltaTime,
                ..Self::default()
            },
        }
    }

    /// Parse a (possibly partial) JSON config and sanitize it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Apply the fields present in a JSON object on top of this config
    pub fn overlay_json(self, json: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(self)?;
        if let Some(fields) = merged.as_object_mut() {
            fields.extend(overrides);
        }
        let config: Config = serde_json::from_value(merged)?;
        Ok(config.sanitized())
    }

    /// Load a JSON config file over this config
    pub fn overlay_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        self.overlay_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Repair values the simulation cannot run with.
    ///
    /// Nothing here fails: out-of-range values are pulled back to the nearest
    /// usable one so the game always has something to render.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 { value } else { fallback }
        };
        let non_negative = |value: f32| if value.is_finite() { value.max(0.0) } else { 0.0 };

        (self.area_height, self.area_width) =
            crate::clamp_viewport(self.area_height, self.area_width);
        self.body_radius = positive(self.body_radius, defaults.body_radius);
        self.body_x = non_negative(self.body_x);
        if !self.gravity.is_finite() {
            self.gravity = defaults.gravity;
        }
        if !self.flap_velocity.is_finite() {
            self.flap_velocity = defaults.flap_velocity;
        }
        if !self.initial_velocity.is_finite() {
            self.initial_velocity = 0.0;
        }

        self.pipe_width = positive(self.pipe_width, defaults.pipe_width);
        self.pipe_speed = positive(self.pipe_speed, defaults.pipe_speed);
        self.gap_band_min = non_negative(self.gap_band_min).min(1.0);
        self.gap_band_max = non_negative(self.gap_band_max).min(1.0);
        if self.gap_band_min > self.gap_band_max {
            std::mem::swap(&mut self.gap_band_min, &mut self.gap_band_max);
        }

        self.min_spawn_interval_ms =
            positive(self.min_spawn_interval_ms, defaults.min_spawn_interval_ms);
        self.min_gap_size = positive(self.min_gap_size, defaults.min_gap_size);
        self.spawn_interval_ms = positive(self.spawn_interval_ms, defaults.spawn_interval_ms)
            .max(self.min_spawn_interval_ms);
        self.gap_size = positive(self.gap_size, defaults.gap_size).max(self.min_gap_size);
        self.score_step = self.score_step.max(1);
        self.spawn_interval_step_ms = non_negative(self.spawn_interval_step_ms);
        self.gap_size_step = non_negative(self.gap_size_step);

        self.target_frame_ms = positive(self.target_frame_ms, defaults.target_frame_ms);
        self.max_frame_ms = positive(self.max_frame_ms, defaults.max_frame_ms);
        self.countdown_step_ms = self.countdown_step_ms.max(1);

        if !self.tilt_factor.is_finite() {
            self.tilt_factor = defaults.tilt_factor;
        }
        if !self.tilt_min.is_finite() {
            self.tilt_min = defaults.tilt_min;
        }
        if !self.tilt_max.is_finite() {
            self.tilt_max = defaults.tilt_max;
        }
        if self.tilt_min > self.tilt_max {
            std::mem::swap(&mut self.tilt_min, &mut self.tilt_max);
        }
        self
    }
}
