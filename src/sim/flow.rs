//! Game flow state machine
//!
//! ```text
//! START ─┐            ┌──────── primary ────────┐
//!        ├─ primary ─▶ PLAYING ◀──── primary ─── PAUSED
//! LIFE_LOST ┘          │  ▲ └─ primary ─▶ PAUSED
//!                      │  └─ (all balls drained, lives left) ─▶ LIFE_LOST
//!                      ├─ (all balls drained, no lives) ─▶ GAME_OVER ─ primary ─▶ START
//!                      └─ (last brick destroyed) ──────▶ WIN ─────── primary ─▶ START
//! ```
//!
//! Scheduler side effects are not performed here; hosts derive them from
//! the resulting phase.

use super::state::{GameEvent, GamePhase, GameState, VisualEffects};
use super::tick::TickOutcome;
use super::timers;

/// Handle the single primary action input. Returns the resulting phase.
pub fn primary_action(state: &mut GameState) -> GamePhase {
    match state.phase {
        GamePhase::Start | GamePhase::LifeLost => start_playing(state),
        GamePhase::Playing => pause(state),
        GamePhase::Paused => resume(state),
        GamePhase::GameOver | GamePhase::Win => full_reset(state),
    }
    state.phase
}

/// Launch the staged ball (START or LIFE_LOST -> PLAYING)
pub fn start_playing(state: &mut GameState) {
    if matches!(state.phase, GamePhase::Start | GamePhase::LifeLost) {
        state.set_phase(GamePhase::Playing);
    }
}

pub fn pause(state: &mut GameState) {
    if state.phase == GamePhase::Playing {
        state.set_phase(GamePhase::Paused);
    }
}

pub fn resume(state: &mut GameState) {
    if state.phase == GamePhase::Paused {
        state.set_phase(GamePhase::Playing);
    }
}

/// Start a fresh session: new grid, score and lives, a staged ball, no power-ups.
///
/// Bumps the epoch so deferred events from the previous session are ignored.
pub fn full_reset(state: &mut GameState) {
    log::info!("Full reset (epoch {} -> {})", state.epoch, state.epoch + 1);
    state.epoch += 1;
    state.score = 0;
    state.lives = state.tuning.starting_lives;
    state.powerups.clear();
    state.effects = VisualEffects::default();

    let width = state.tuning.paddle_width;
    state.paddle.width = width;
    state.center_paddle();

    state.build_bricks();
    state.stage_ball();
    state.set_phase(GamePhase::Start);
}

/// The last ball in flight drained: lose a life, then either stage a new
/// ball (LIFE_LOST) or end the session (GAME_OVER)
pub fn lose_ball_set(state: &mut GameState, now_ms: f64) -> TickOutcome {
    state.lives = state.lives.saturating_sub(1);
    timers::shake_hard(state, now_ms);

    if state.lives == 0 {
        state.record_high_score();
        let final_score = state.score;
        log::info!("Game over, final score {}", final_score);
        state.emit(GameEvent::GameOver { final_score });
        state.set_phase(GamePhase::GameOver);
        TickOutcome::Terminal
    } else {
        state.center_paddle();
        state.stage_ball();
        let lives_left = state.lives;
        log::info!("Life lost, {} remaining", lives_left);
        state.emit(GameEvent::LifeLost { lives_left });
        state.set_phase(GamePhase::LifeLost);
        TickOutcome::LifeLost
    }
}

/// Every brick is gone: add the remaining-lives bonus and end the session
pub fn win(state: &mut GameState) -> TickOutcome {
    if state.phase == GamePhase::Win {
        return TickOutcome::Terminal;
    }
    let bonus = u64::from(state.lives) * state.tuning.life_bonus;
    state.score = state.score.saturating_add(bonus);
    finish_win(state);
    TickOutcome::Terminal
}

/// Debug escape: clear every brick and win immediately with the current score
pub fn force_win(state: &mut GameState) {
    log::info!("Debug: clearing all bricks");
    for brick in state.bricks.iter_mut() {
        brick.alive = false;
    }
    if state.phase != GamePhase::Win {
        finish_win(state);
    }
}

/// Debug escape: full reset from any phase
pub fn force_reset(state: &mut GameState) {
    log::info!("Debug: manual restart");
    full_reset(state);
}

fn finish_win(state: &mut GameState) {
    state.record_high_score();
    let final_score = state.score;
    log::info!("Win, final score {}", final_score);
    state.emit(GameEvent::Win { final_score });
    state.set_phase(GamePhase::Win);
}
