//! Gated obstacle pairs and their generator

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::Config;

/// Which half of a pair a barrier is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarrierRole {
    Top,
    Bottom,
}

impl BarrierRole {
    /// The one barrier per pair that counts toward score
    #[inline]
    pub fn scores(&self) -> bool {
        matches!(self, BarrierRole::Top)
    }
}

/// One rectangle of an obstacle pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barrier {
    pub obstacle_id: u32,
    pub role: BarrierRole,
    pub rect: Rect,
}

/// A top/bottom barrier pair sharing one horizontal slot.
///
/// Gap geometry is fixed at spawn; only `x` and `passed` change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub gap_center: f32,
    pub gap_size: f32,
    pub top_height: f32,
    pub bottom_height: f32,
    pub passed: bool,
}

impl Obstacle {
    /// Build a pair around a gap. The gap is shrunk to fit the area and its
    /// center pulled inward so neither barrier has negative height.
    pub fn new(id: u32, x: f32, width: f32, area_height: f32, gap_center: f32, gap_size: f32) -> Self {
        let gap_size = gap_size.clamp(0.0, area_height);
        let half = gap_size / 2.0;
        let gap_center = gap_center.clamp(half, area_height - half);
        let top_height = gap_center - half;
        let bottom_height = area_height - top_height - gap_size;
        Self {
            id,
            x,
            width,
            gap_center,
            gap_size,
            top_height,
            bottom_height,
            passed: false,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Height of the area this pair was built for
    #[inline]
    pub fn area_height(&self) -> f32 {
        self.top_height + self.gap_size + self.bottom_height
    }

    /// Both barriers, top first
    pub fn barriers(&self) -> [Barrier; 2] {
        let area_height = self.area_height();
        [
            Barrier {
                obstacle_id: self.id,
                role: BarrierRole::Top,
                rect: Rect::new(
                    Vec2::new(self.x, 0.0),
                    Vec2::new(self.right(), self.top_height),
                ),
            },
            Barrier {
                obstacle_id: self.id,
                role: BarrierRole::Bottom,
                rect: Rect::new(
                    Vec2::new(self.x, area_height - self.bottom_height),
                    Vec2::new(self.right(), area_height),
                ),
            },
        ]
    }
}

/// Spawn a pair just off the right edge with a random gap center.
///
/// The center is uniform over `[gap_band_min, gap_band_max]` of the area height.
pub fn spawn<R: Rng>(
    rng: &mut R,
    id: u32,
    area_height: f32,
    area_width: f32,
    gap_size: f32,
    config: &Config,
) -> Obstacle {
    let min_center = area_height * config.gap_band_min;
    let max_center = (area_height * config.gap_band_max).max(min_center);
    let gap_center = rng.random_range(min_center..=max_center);

    Obstacle::new(id, area_width, config.pipe_width, area_height, gap_center, gap_size)
}
