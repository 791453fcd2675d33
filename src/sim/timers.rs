//! Deferred, wall-clock driven events
//!
//! Effects that outlive a tick (big paddle revert, visual pulses) are queued
//! here with the session epoch current at scheduling time. A full reset bumps
//! the epoch, so anything queued before it becomes a no-op when it fires.

use super::state::{GameState, Shake};

/// Duration of the paddle pulse after a paddle hit (ms)
pub const PADDLE_PULSE_MS: f64 = 150.0;
/// Duration of the flash and soft shake after a brick hit (ms)
pub const COLLISION_FLASH_MS: f64 = 250.0;
/// Duration of the hard shake after losing a ball set (ms)
pub const HARD_SHAKE_MS: f64 = 600.0;

/// Action to run when a deferred event comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Restore normal paddle width, if `token` is still the latest big-paddle catch
    RevertBigPaddle { token: u32 },
    EndPaddlePulse,
    EndCollisionFlash,
    /// Stop the screen shake, if `token` is still the latest shake
    EndShake { token: u32 },
}

#[derive(Debug, Clone)]
struct Scheduled {
    due_ms: f64,
    epoch: u64,
    seq: u64,
    action: Deferred,
}

/// Queue of pending deferred events
#[derive(Debug, Default)]
pub struct Timers {
    queue: Vec<Scheduled>,
    next_seq: u64,
}

impl Timers {
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, epoch: u64, action: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            due_ms: now_ms + delay_ms,
            epoch,
            seq,
            action,
        });
    }

    /// Remove and return every event due at `now_ms`, oldest first
    pub fn take_due(&mut self, now_ms: f64) -> Vec<(u64, Deferred)> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|s| s.due_ms <= now_ms);
        self.queue = pending;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| (s.epoch, s.action)).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Fire every due event against `state`. Returns how many were applied
/// (stale events are dropped and not counted).
pub fn run_due(state: &mut GameState, now_ms: f64) -> usize {
    let due = state.timers.take_due(now_ms);
    let mut applied = 0;
    for (epoch, action) in due {
        if epoch != state.epoch {
            log::debug!("Dropping stale {:?} from epoch {} (now {})", action, epoch, state.epoch);
            continue;
        }
        if apply(state, action) {
            applied += 1;
        }
    }
    applied
}

fn apply(state: &mut GameState, action: Deferred) -> bool {
    match action {
        Deferred::RevertBigPaddle { token } => {
            if token != state.big_paddle_token {
                // Superseded by a later catch
                return false;
            }
            let width = state.tuning.paddle_width;
            state.paddle.set_width_centered(width, state.tuning.play_width);
            log::debug!("Big paddle expired");
        }
        Deferred::EndPaddlePulse => state.effects.paddle_pulse = false,
        Deferred::EndCollisionFlash => state.effects.collision_flash = false,
        Deferred::EndShake { token } => {
            if token != state.shake_token {
                return false;
            }
            state.effects.shake = None;
        }
    }
    true
}

/// Turn on the paddle pulse and queue its end
pub fn pulse_paddle(state: &mut GameState, now_ms: f64) {
    state.effects.paddle_pulse = true;
    let epoch = state.epoch;
    state
        .timers
        .schedule(now_ms, PADDLE_PULSE_MS, epoch, Deferred::EndPaddlePulse);
}

/// Turn on the collision flash with a soft shake and queue their end.
///
/// A running hard shake is left alone, along with its end.
pub fn flash_collision(state: &mut GameState, now_ms: f64) {
    state.effects.collision_flash = true;
    let epoch = state.epoch;
    state
        .timers
        .schedule(now_ms, COLLISION_FLASH_MS, epoch, Deferred::EndCollisionFlash);
    if state.effects.shake != Some(Shake::Hard) {
        start_shake(state, Shake::Soft, now_ms, COLLISION_FLASH_MS);
    }
}

/// Hard shake for a lost ball set
pub fn shake_hard(state: &mut GameState, now_ms: f64) {
    start_shake(state, Shake::Hard, now_ms, HARD_SHAKE_MS);
}

fn start_shake(state: &mut GameState, shake: Shake, now_ms: f64, duration_ms: f64) {
    state.effects.shake = Some(shake);
    state.shake_token = state.shake_token.wrapping_add(1);
    let token = state.shake_token;
    let epoch = state.epoch;
    state
        .timers
        .schedule(now_ms, duration_ms, epoch, Deferred::EndShake { token });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRandom;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(Tuning::default(), Box::new(ScriptedRandom::new([])))
    }

    #[test]
    fn test_take_due_orders_by_time_then_insertion() {
        let mut timers = Timers::default();
        timers.schedule(0.0, 300.0, 0, Deferred::EndShake { token: 0 });
        timers.schedule(0.0, 100.0, 0, Deferred::EndPaddlePulse);
        timers.schedule(0.0, 100.0, 0, Deferred::EndCollisionFlash);

        assert!(timers.take_due(50.0).is_empty());
        let due = timers.take_due(150.0);
        assert_eq!(
            due,
            vec![(0, Deferred::EndPaddlePulse), (0, Deferred::EndCollisionFlash)]
        );
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_pulse_clears_after_duration() {
        let mut state = state();
        pulse_paddle(&mut state, 1000.0);
        assert!(state.effects.paddle_pulse);

        run_due(&mut state, 1100.0);
        assert!(state.effects.paddle_pulse);
        run_due(&mut state, 1000.0 + PADDLE_PULSE_MS);
        assert!(!state.effects.paddle_pulse);
    }

    #[test]
    fn test_stale_epoch_is_ignored() {
        let mut state = state();
        state.big_paddle_token = 1;
        let epoch = state.epoch;
        state
            .timers
            .schedule(0.0, 10.0, epoch, Deferred::RevertBigPaddle { token: 1 });
        state.paddle.width = 160.0;

        // A reset happened in between
        state.epoch += 1;
        assert_eq!(run_due(&mut state, 20.0), 0);
        assert_eq!(state.paddle.width, 160.0);
        assert!(state.timers.is_empty());
    }

    #[test]
    fn test_superseded_revert_is_ignored() {
        let mut state = state();
        state.paddle.set_width_centered(160.0, 800.0);
        state.big_paddle_token = 2;
        state.timers.schedule(0.0, 10.0, 0, Deferred::RevertBigPaddle { token: 1 });
        state.timers.schedule(0.0, 50.0, 0, Deferred::RevertBigPaddle { token: 2 });

        assert_eq!(run_due(&mut state, 20.0), 0);
        assert_eq!(state.paddle.width, 160.0);
        assert_eq!(run_due(&mut state, 60.0), 1);
        assert_eq!(state.paddle.width, 100.0);
    }

    #[test]
    fn test_soft_flash_does_not_downgrade_hard_shake() {
        let mut state = state();
        shake_hard(&mut state, 0.0);
        flash_collision(&mut state, 0.0);
        assert_eq!(state.effects.shake, Some(Shake::Hard));
        assert!(state.effects.collision_flash);
    }

    #[test]
    fn test_soft_shake_end_leaves_later_hard_shake() {
        let mut state = state();
        flash_collision(&mut state, 0.0);
        shake_hard(&mut state, 100.0);

        run_due(&mut state, 260.0);
        assert_eq!(state.effects.shake, Some(Shake::Hard));
        assert!(!state.effects.collision_flash);

        run_due(&mut state, 100.0 + HARD_SHAKE_MS);
        assert_eq!(state.effects.shake, None);
    }

    #[test]
    fn test_back_to_back_flashes_extend_soft_shake() {
        let mut state = state();
        flash_collision(&mut state, 0.0);
        flash_collision(&mut state, 100.0);

        run_due(&mut state, COLLISION_FLASH_MS + 10.0);
        assert_eq!(state.effects.shake, Some(Shake::Soft));
        run_due(&mut state, 100.0 + COLLISION_FLASH_MS);
        assert_eq!(state.effects.shake, None);
    }
}
