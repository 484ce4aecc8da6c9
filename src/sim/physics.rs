//! Vertical body physics
//!
//! Gravity accumulates into velocity, velocity into position. A flap does not
//! add to velocity, it replaces it, which caps the climb rate no matter how
//! fast the player taps.

use super::state::{Body, Edge};
use crate::config::Config;

/// Overwrite velocity with the flap velocity
#[inline]
pub fn flap(body: &mut Body, config: &Config) {
    body.vel = config.flap_velocity;
}

/// Advance the body by one tick.
///
/// `dt_factor` is the tick length in nominal frames. Returns the edge that was
/// hit if the body had to be clamped back into `[radius, area_height - radius]`.
/// Velocity is zeroed on a clamp.
pub fn integrate(
    body: &mut Body,
    config: &Config,
    dt_factor: f32,
    impulse: bool,
    area_height: f32,
) -> Option<Edge> {
    if impulse {
        flap(body, config);
    }

    body.vel += config.gravity * dt_factor;
    body.y += body.vel * dt_factor;

    let min_y = body.radius;
    let max_y = (area_height - body.radius).max(min_y);
    if body.y < min_y {
        body.y = min_y;
        body.vel = 0.0;
        Some(Edge::Ceiling)
    } else if body.y > max_y {
        body.y = max_y;
        body.vel = 0.0;
        Some(Edge::Floor)
    } else {
        None
    }
}

/// Presentation tilt in degrees (nose down when falling)
#[inline]
pub fn tilt(vel: f32, config: &Config) -> f32 {
    (vel * config.tilt_factor).clamp(config.tilt_min, config.tilt_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(y: f32, vel: f32) -> Body {
        Body {
            x: 100.0,
            y,
            vel,
            radius: 20.0,
        }
    }

    #[test]
    fn test_gravity_accumulates() {
        let config = Config::default();
        let mut body = body_at(200.0, 0.0);

        assert_eq!(integrate(&mut body, &config, 1.0, false, 400.0), None);
        assert!((body.vel - 0.5).abs() < 1e-6);
        assert!((body.y - 200.5).abs() < 1e-6);

        assert_eq!(integrate(&mut body, &config, 2.0, false, 400.0), None);
        assert!((body.vel - 1.5).abs() < 1e-6);
        assert!((body.y - 203.5).abs() < 1e-6);
    }

    #[test]
    fn test_flap_overwrites_velocity() {
        let config = Config::default();
        for start in [-20.0, -8.0, 0.0, 3.5, 40.0] {
            let mut body = body_at(200.0, start);
            flap(&mut body, &config);
            assert_eq!(body.vel, config.flap_velocity);
            flap(&mut body, &config);
            assert_eq!(body.vel, config.flap_velocity);
        }
    }

    #[test]
    fn test_impulse_applies_before_gravity() {
        let config = Config::default();
        let mut body = body_at(200.0, 6.0);
        integrate(&mut body, &config, 1.0, true, 400.0);
        assert!((body.vel - (config.flap_velocity + config.gravity)).abs() < 1e-6);
        assert!(body.y < 200.0);
    }

    #[test]
    fn test_floor_clamp() {
        let config = Config::default();
        let mut body = body_at(378.0, 5.0);
        assert_eq!(integrate(&mut body, &config, 1.0, false, 400.0), Some(Edge::Floor));
        assert_eq!(body.y, 380.0);
        assert_eq!(body.vel, 0.0);
    }

    #[test]
    fn test_ceiling_clamp() {
        let config = Config::default();
        let mut body = body_at(22.0, 0.0);
        assert_eq!(integrate(&mut body, &config, 1.0, true, 400.0), Some(Edge::Ceiling));
        assert_eq!(body.y, 20.0);
        assert_eq!(body.vel, 0.0);
    }

    #[test]
    fn test_free_fall_until_floor() {
        let config = Config::default();
        let mut body = body_at(200.0, 0.0);
        let mut last_y = body.y;
        let mut hit = None;
        for _ in 0..60 {
            hit = integrate(&mut body, &config, 1.0, false, 400.0);
            if hit.is_some() {
                break;
            }
            assert!(body.y > last_y);
            last_y = body.y;
        }
        assert_eq!(hit, Some(Edge::Floor));
        assert_eq!(body.y, 380.0);
    }

    #[test]
    fn test_tilt_limits() {
        let config = Config::default();
        assert_eq!(tilt(0.0, &config), 0.0);
        assert_eq!(tilt(-8.0, &config), -30.0);
        assert_eq!(tilt(5.0, &config), 20.0);
        assert_eq!(tilt(40.0, &config), 90.0);
    }
}
