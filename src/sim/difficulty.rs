//! Score-driven difficulty ratchet
//!
//! Spawn interval and gap size only ever shrink during a run, one step every
//! `score_step` points, and never below their floors.

use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub spawn_interval_ms: f32,
    pub gap_size: f32,
}

impl Difficulty {
    /// Starting values for a fresh run
    pub fn initial(config: &Config) -> Self {
        Self {
            spawn_interval_ms: config.spawn_interval_ms,
            gap_size: config.gap_size,
        }
    }
}

/// Difficulty after the score has just become `score`
pub fn on_score_increment(score: u32, current: Difficulty, config: &Config) -> Difficulty {
    let step = config.score_step.max(1);
    if score == 0 || score % step != 0 {
        return current;
    }

    let next = Difficulty {
        spawn_interval_ms: (current.spawn_interval_ms - config.spawn_interval_step_ms)
            .max(config.min_spawn_interval_ms)
            .min(current.spawn_interval_ms),
        gap_size: (current.gap_size - config.gap_size_step)
            .max(config.min_gap_size)
            .min(current.gap_size),
    };
    if next != current {
        log::info!(
            "Difficulty up at score {}: spawn every {}ms, gap {}",
            score,
            next.spawn_interval_ms,
            next.gap_size
        );
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_multiples_tighten() {
        let config = Config::default();
        let start = Difficulty::initial(&config);
        for score in [1, 2, 3, 4, 6, 9] {
            assert_eq!(on_score_increment(score, start, &config), start);
        }
        let next = on_score_increment(5, start, &config);
        assert_eq!(next.spawn_interval_ms, 1450.0);
        assert_eq!(next.gap_size, 145.0);
    }

    #[test]
    fn test_floors_hold() {
        let config = Config::default();
        let mut difficulty = Difficulty::initial(&config);
        for score in 1..=1000 {
            difficulty = on_score_increment(score, difficulty, &config);
        }
        assert_eq!(difficulty.spawn_interval_ms, config.min_spawn_interval_ms);
        assert_eq!(difficulty.gap_size, config.min_gap_size);
    }

    #[test]
    fn test_never_raises_values_below_floor() {
        // A run that started under the floor must not be pushed back up
        let config = Config::default();
        let current = Difficulty {
            spawn_interval_ms: 900.0,
            gap_size: 90.0,
        };
        assert_eq!(on_score_increment(10, current, &config), current);
    }
}
