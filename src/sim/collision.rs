//! Collision detection between the body and obstacle pairs
//!
//! The body is a circle but the pipe test uses its bounding box. That is
//! slightly unforgiving at the gap corners; [`circle_rect_overlap`] is the
//! exact predicate if a caller needs it.

use glam::Vec2;

use super::obstacle::{BarrierRole, Obstacle};
use super::state::Body;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Bounding box of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self {
            min: center - Vec2::splat(radius),
            max: center + Vec2::splat(radius),
        }
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        intervals_overlap(self.min.x, self.max.x, other.min.x, other.max.x)
            && intervals_overlap(self.min.y, self.max.y, other.min.y, other.max.y)
    }
}

/// Open-interval overlap of `[a_min, a_max]` and `[b_min, b_max]`
#[inline]
pub fn intervals_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_max > b_min && a_min < b_max
}

/// Exact circle vs rectangle test
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = center.clamp(rect.min, rect.max);
    center.distance_squared(closest) < radius * radius
}

/// A body/barrier contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub obstacle_id: u32,
    pub role: BarrierRole,
}

/// Find the first barrier the body overlaps, scanning in spawn order.
///
/// Each pair is tested against its own barrier rects, so the gap a pair was
/// spawned with stays put if the viewport changes afterwards. Floor and
/// ceiling are not handled here; the physics clamp reports those.
pub fn check(body: &Body, obstacles: &[Obstacle]) -> Option<Hit> {
    let bounds = Rect::around_circle(body.center(), body.radius);
    obstacles
        .iter()
        .flat_map(Obstacle::barriers)
        .find(|barrier| bounds.overlaps(&barrier.rect))
        .map(|barrier| Hit {
            obstacle_id: barrier.obstacle_id,
            role: barrier.role,
        })
}
