//! Simulation core
//!
//! Renderer-agnostic: all state lives in [`Session`] and every visible change
//! is reported as a [`GameEvent`].

pub mod collision;
pub mod difficulty;
pub mod obstacle;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Hit, Rect, check, circle_rect_overlap, intervals_overlap};
pub use difficulty::{Difficulty, on_score_increment};
pub use obstacle::{Barrier, BarrierRole, Obstacle, spawn};
pub use physics::{flap, integrate, tilt};
pub use state::{Body, Edge, GameEvent, GameOverCause, Session, SessionPhase};
pub use tick::{TickInput, TickOutcome, tick};
