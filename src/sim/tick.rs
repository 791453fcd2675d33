//! Per-frame simulation tick
//!
//! One call advances the session by one display frame. The pipeline is a
//! fixed sequence of passes; the first pass that ends the ball set or the
//! session short-circuits the rest.

use super::state::{GamePhase, GameState};
use super::{collision, flow, powerup, timers};

/// Logical input sampled for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement intent: -1 left, +1 right, 0 idle
    pub direction: f32,
    /// Absolute pointer position for the paddle midpoint, if it moved
    pub pointer_x: Option<f32>,
    /// Host wall-clock time (ms), used to schedule deferred effects
    pub now_ms: f64,
}

/// How a tick ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still PLAYING; schedule the next tick
    Continue,
    /// Ball set lost with lives remaining (now LIFE_LOST)
    LifeLost,
    /// Session ended (now GAME_OVER or WIN)
    Terminal,
}

/// Advance the session by one tick.
///
/// Outside of PLAYING this is a no-op that reports `Continue`; callers gate
/// on the phase before scheduling the next frame.
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    if state.phase != GamePhase::Playing {
        log::trace!("tick ignored in {}", state.phase.as_str());
        return TickOutcome::Continue;
    }
    state.time_ticks += 1;

    move_paddle(state, input);
    collision::integrate(&mut state.balls);

    collision::resolve_walls(state);
    if state.balls.is_empty() {
        return flow::lose_ball_set(state, input.now_ms);
    }

    if collision::resolve_paddle(state) > 0 {
        timers::pulse_paddle(state, input.now_ms);
    }

    if collision::resolve_bricks(state) > 0 {
        timers::flash_collision(state, input.now_ms);
    }
    if state.bricks_remaining() == 0 {
        return flow::win(state);
    }

    powerup::advance(state);
    powerup::collect(state, input.now_ms);

    TickOutcome::Continue
}

fn move_paddle(state: &mut GameState, input: &TickInput) {
    let play_width = state.tuning.play_width;
    if let Some(x) = input.pointer_x {
        state.paddle.place_center(x, play_width);
    }
    let direction = input.direction.clamp(-1.0, 1.0);
    if direction != 0.0 {
        state
            .paddle
            .move_by(direction * state.tuning.paddle_speed, play_width);
    }
}
