//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, no hidden clocks (wall time comes in via `TickInput`)
//! - Injected randomness only
//! - Stable iteration order (row-major bricks, balls and power-ups by id)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod flow;
pub mod powerup;
pub mod rect;
pub mod rng;
pub mod state;
pub mod tick;
pub mod timers;

pub use rect::{Penetration, Rect, Side};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use state::{
    Ball, Brick, BrickColor, GameEvent, GamePhase, GameState, Paddle, PowerUp, PowerUpKind, Shake,
    VisualEffects,
};
pub use tick::{TickInput, TickOutcome, tick};
pub use timers::{Deferred, Timers};
