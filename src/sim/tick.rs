//! One simulation tick
//!
//! Order matters and is fixed: integrate, boundary, collide, spawn, advance,
//! score, cull. Moving any step changes what happens when the body and a pipe
//! edge meet on the same tick.

use super::collision;
use super::difficulty;
use super::obstacle;
use super::physics;
use super::state::{GameEvent, GameOverCause, Session, SessionPhase};
use crate::config::Config;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Flap queued since the previous tick
    pub flap: bool,
}

/// What the caller should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running, schedule the next tick
    Continue,
    /// The run ended this tick
    Over(GameOverCause),
    /// Session was not running; nothing happened
    Idle,
}

/// Advance a running session by `elapsed_ms`
pub fn tick(session: &mut Session, config: &Config, input: &TickInput, elapsed_ms: f32) -> TickOutcome {
    if session.phase != SessionPhase::Running {
        return TickOutcome::Idle;
    }
    let elapsed_ms = elapsed_ms.clamp(0.0, config.max_frame_ms);

    // 1. Physics
    let dt_factor = config
        .physics_time_scaling
        .factor(elapsed_ms, config.target_frame_ms);
    let edge = physics::integrate(
        &mut session.body,
        config,
        dt_factor,
        input.flap,
        session.area_height,
    );
    let tilt = physics::tilt(session.body.vel, config);
    session.emit(GameEvent::BodyMoved {
        y: session.body.y,
        tilt,
    });

    // 2. Floor / ceiling
    if let Some(edge) = edge {
        return end_run(session, GameOverCause::Boundary { edge });
    }

    // 3. Pipes
    if let Some(hit) = collision::check(&session.body, &session.obstacles) {
        return end_run(
            session,
            GameOverCause::Obstacle {
                id: hit.obstacle_id,
                role: hit.role,
            },
        );
    }

    // 4. Spawn
    session.since_spawn_ms += elapsed_ms;
    if session.since_spawn_ms > session.difficulty.spawn_interval_ms {
        let id = session.next_obstacle_id();
        let pair = obstacle::spawn(
            &mut session.rng,
            id,
            session.area_height,
            session.area_width,
            session.difficulty.gap_size,
            config,
        );
        log::debug!(
            "Spawned obstacle {} gap center {:.1} size {:.1}",
            pair.id,
            pair.gap_center,
            pair.gap_size
        );
        session.emit(GameEvent::ObstacleSpawned {
            id: pair.id,
            top_height: pair.top_height,
            bottom_height: pair.bottom_height,
            x: pair.x,
        });
        session.obstacles.push(pair);
        session.since_spawn_ms = 0.0;
    }

    // 5-7. Advance, score, cull
    let step = config.pipe_speed
        * config
            .obstacle_time_scaling
            .factor(elapsed_ms, config.target_frame_ms);
    advance_obstacles(session, config, step);

    TickOutcome::Continue
}

/// Scroll every pipe left by `step`, score the ones the body has cleared and
/// drop the ones that left the screen
fn advance_obstacles(session: &mut Session, config: &Config, step: f32) {
    let score_line = session.body.x - config.pipe_width / 2.0;
    let mut events = Vec::with_capacity(session.obstacles.len() + 2);

    for pair in &mut session.obstacles {
        pair.x -= step;
        events.push(GameEvent::ObstacleMoved {
            id: pair.id,
            x: pair.x,
        });

        let scoring = pair
            .barriers()
            .iter()
            .any(|barrier| barrier.role.scores() && barrier.rect.min.x < score_line);
        if !pair.passed && scoring {
            pair.passed = true;
            session.score += 1;
            log::debug!("Cleared obstacle {}, score {}", pair.id, session.score);
            events.push(GameEvent::ScoreChanged {
                score: session.score,
            });
            session.difficulty =
                difficulty::on_score_increment(session.score, session.difficulty, config);
        }
    }

    session.obstacles.retain(|pair| {
        let keep = pair.x >= -pair.width;
        if !keep {
            events.push(GameEvent::ObstacleRemoved { id: pair.id });
        }
        keep
    });

    session.events.extend(events);
}

fn end_run(session: &mut Session, cause: GameOverCause) -> TickOutcome {
    log::info!("Game over: {:?}, final score {}", cause, session.score);
    session.set_phase(SessionPhase::Over);
    session.emit(GameEvent::GameOver {
        final_score: session.score,
        cause,
    });
    TickOutcome::Over(cause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{BarrierRole, Obstacle};
    use crate::sim::state::Edge;

    const FRAME: f32 = crate::consts::TARGET_FRAME_MS;

    fn running_session(config: &Config) -> Session {
        let mut session = Session::new(config, 12345);
        session.phase = SessionPhase::Running;
        session
    }

    #[test]
    fn test_tick_outside_running_is_noop() {
        let config = Config::default();
        let mut session = Session::new(&config, 1);
        assert_eq!(tick(&mut session, &config, &TickInput::default(), FRAME), TickOutcome::Idle);
        assert_eq!(session.body.y, 200.0);
        assert!(session.events.is_empty());
    }

    #[test]
    fn test_free_fall_ends_on_floor() {
        let config = Config::default();
        let mut session = running_session(&config);
        let mut last_y = session.body.y;
        let mut outcome = TickOutcome::Continue;

        for _ in 0..60 {
            outcome = tick(&mut session, &config, &TickInput::default(), FRAME);
            if outcome != TickOutcome::Continue {
                break;
            }
            assert!(session.body.y > last_y);
            last_y = session.body.y;
        }

        assert_eq!(
            outcome,
            TickOutcome::Over(GameOverCause::Boundary { edge: Edge::Floor })
        );
        assert_eq!(session.body.y, 380.0);
        assert_eq!(session.phase, SessionPhase::Over);
        assert!(session.events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver { final_score: 0, .. }
        )));
    }

    #[test]
    fn test_first_tick_spawns_immediately() {
        let config = Config::default();
        let mut session = running_session(&config);
        tick(&mut session, &config, &TickInput::default(), FRAME);
        assert_eq!(session.obstacles.len(), 1);
        assert_eq!(session.obstacles[0].x, config.area_width - config.pipe_speed);

        tick(&mut session, &config, &TickInput::default(), FRAME);
        assert_eq!(session.obstacles.len(), 1);
    }

    #[test]
    fn test_spawn_follows_interval() {
        let config = Config::default();
        let mut session = running_session(&config);
        session.since_spawn_ms = 0.0;
        let input = TickInput { flap: false };
        // 90 ticks of 16.67ms is just past 1500ms; keep the body aloft meanwhile
        let mut spawned_at = None;
        for i in 0..100 {
            session.body.y = 200.0;
            session.body.vel = 0.0;
            tick(&mut session, &config, &input, FRAME);
            if !session.obstacles.is_empty() {
                spawned_at = Some(i);
                break;
            }
        }
        assert_eq!(spawned_at, Some(89));
    }

    #[test]
    fn test_score_once_per_pair() {
        let config = Config::default();
        let mut session = running_session(&config);
        session.since_spawn_ms = f32::NEG_INFINITY;
        session.obstacles.push(Obstacle::new(9, 62.0, 80.0, 400.0, 200.0, 150.0));

        // 62 -> 59 crosses the line at 60
        tick(&mut session, &config, &TickInput::default(), FRAME);
        assert_eq!(session.score, 1);
        assert!(session.obstacles[0].passed);

        for _ in 0..5 {
            session.body.y = 200.0;
            session.body.vel = 0.0;
            tick(&mut session, &config, &TickInput::default(), FRAME);
        }
        assert_eq!(session.score, 1);
        let score_events = session
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ScoreChanged { .. }))
            .count();
        assert_eq!(score_events, 1);
    }

    #[test]
    fn test_not_scored_at_line() {
        let config = Config::default();
        let mut session = running_session(&config);
        session.since_spawn_ms = f32::NEG_INFINITY;
        session.obstacles.push(Obstacle::new(3, 63.0, 80.0, 400.0, 200.0, 150.0));
        tick(&mut session, &config, &TickInput::default(), FRAME);
        assert_eq!(session.obstacles[0].x, 60.0);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_collision_ends_run() {
        let config = Config::default();
        let mut session = running_session(&config);
        session.body.y = 60.0;
        session.obstacles.push(Obstacle::new(5, 90.0, 80.0, 400.0, 200.0, 150.0));
        let outcome = tick(&mut session, &config, &TickInput::default(), FRAME);
        assert_eq!(
            outcome,
            TickOutcome::Over(GameOverCause::Obstacle {
                id: 5,
                role: BarrierRole::Top
            })
        );
        // Obstacles do not move on the tick that ends the run
        assert_eq!(session.obstacles[0].x, 90.0);
    }

    #[test]
    fn test_offscreen_pipes_removed() {
        let config = Config::default();
        let mut session = running_session(&config);
        session.since_spawn_ms = f32::NEG_INFINITY;
        let mut pair = Obstacle::new(2, -79.0, 80.0, 400.0, 200.0, 150.0);
        pair.passed = true;
        session.obstacles.push(pair);
        tick(&mut session, &config, &TickInput::default(), FRAME);
        assert!(session.obstacles.is_empty());
        assert!(session.events.contains(&GameEvent::ObstacleRemoved { id: 2 }));
    }

    #[test]
    fn test_resize_keeps_live_pair_gap() {
        let config = Config::default();
        let mut session = running_session(&config);
        session.since_spawn_ms = f32::NEG_INFINITY;
        // Gap 125..275 in the 400 tall area it was spawned in
        session.obstacles.push(Obstacle::new(1, 90.0, 80.0, 400.0, 200.0, 150.0));
        session.resize(300.0, 400.0);
        assert_eq!(session.area_height, 300.0);

        session.body.y = 200.0;
        session.body.vel = -config.gravity;
        let outcome = tick(&mut session, &config, &TickInput::default(), FRAME);
        assert_eq!(outcome, TickOutcome::Continue);
        assert_eq!(session.body.y, 200.0);
        assert_eq!(session.obstacles[0].top_height, 125.0);
        assert_eq!(session.obstacles[0].bottom_height, 125.0);
    }

    #[test]
    fn test_fixed_pipe_speed_ignores_frame_length() {
        let config = Config::default();
        let mut session = running_session(&config);
        session.since_spawn_ms = f32::NEG_INFINITY;
        session.obstacles.push(Obstacle::new(1, 500.0, 80.0, 400.0, 200.0, 150.0));
        tick(&mut session, &config, &TickInput::default(), FRAME * 3.0);
        assert_eq!(session.obstacles[0].x, 497.0);
    }

    #[test]
    fn test_delta_time_pipe_speed() {
        let config = Config {
            obstacle_time_scaling: crate::config::TimeScaling::DeltaTime,
            ..Config::default()
        };
        let mut session = running_session(&config);
        session.since_spawn_ms = f32::NEG_INFINITY;
        session.obstacles.push(Obstacle::new(1, 500.0, 80.0, 400.0, 200.0, 150.0));
        tick(&mut session, &config, &TickInput::default(), FRAME * 2.0);
        assert!((session.obstacles[0].x - 494.0).abs() < 1e-3);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let config = Config::default();
        let mut session = running_session(&config);
        tick(&mut session, &config, &TickInput::default(), 10_000.0);
        let factor = config.max_frame_ms / config.target_frame_ms;
        assert!((session.body.vel - config.gravity * factor).abs() < 1e-4);
    }

    #[test]
    fn test_difficulty_tightens_on_fifth_point() {
        let config = Config::default();
        let mut session = running_session(&config);
        session.since_spawn_ms = f32::NEG_INFINITY;
        session.score = 4;
        session.obstacles.push(Obstacle::new(1, 61.0, 80.0, 400.0, 200.0, 150.0));
        tick(&mut session, &config, &TickInput::default(), FRAME);
        assert_eq!(session.score, 5);
        assert_eq!(session.difficulty.gap_size, 145.0);
        assert_eq!(session.difficulty.spawn_interval_ms, 1450.0);
    }
}
