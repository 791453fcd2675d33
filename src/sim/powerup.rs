//! Power-up spawn, fall, catch and effects

use glam::Vec2;

use super::state::{Ball, GameEvent, GameState, PowerUp, PowerUpKind, launch_velocity};
use super::timers::Deferred;

static ALL_KINDS: [PowerUpKind; 3] = [
    PowerUpKind::BigPaddle,
    PowerUpKind::MultiBall,
    PowerUpKind::ExtraLife,
];

/// Kinds eligible for a spawn; extra life is dropped once lives are capped
pub fn eligible_kinds(extra_life_allowed: bool) -> &'static [PowerUpKind] {
    if extra_life_allowed {
        &ALL_KINDS
    } else {
        &ALL_KINDS[..2]
    }
}

/// Map one uniform sample to a spawn decision.
///
/// Samples below `chance` spawn; the position of the sample inside
/// `[0, chance)` picks the kind uniformly from the eligible set.
pub fn choose_kind(sample: f32, chance: f32, extra_life_allowed: bool) -> Option<PowerUpKind> {
    if chance <= 0.0 || sample >= chance {
        return None;
    }
    let kinds = eligible_kinds(extra_life_allowed);
    let idx = ((sample / chance) * kinds.len() as f32) as usize;
    Some(kinds[idx.min(kinds.len() - 1)])
}

/// Roll for a power-up after a brick is destroyed
pub fn roll_spawn(state: &mut GameState) -> Option<PowerUpKind> {
    let sample = state.sample();
    let extra_life_allowed = state.lives < state.tuning.lives_cap;
    choose_kind(sample, state.tuning.powerup_chance, extra_life_allowed)
}

/// Drop a power-up centered on `center`
pub fn spawn(state: &mut GameState, kind: PowerUpKind, center: Vec2) {
    let size = Vec2::splat(state.tuning.powerup_size);
    let id = state.next_entity_id();
    state.powerups.push(PowerUp {
        id,
        kind,
        pos: center - size / 2.0,
        size,
    });
    log::debug!("Power-up {:?} spawned at ({:.0}, {:.0})", kind, center.x, center.y);
    state.emit(GameEvent::PowerUpSpawned { kind });
}

/// Move every falling power-up down one tick
pub fn advance(state: &mut GameState) {
    let speed = state.tuning.powerup_fall_speed;
    for powerup in state.powerups.iter_mut() {
        powerup.pos.y += speed;
    }
}

/// Consume power-ups touching the paddle and discard those past the bottom edge.
///
/// Effects of caught power-ups are applied in spawn order. Returns the kinds caught.
pub fn collect(state: &mut GameState, now_ms: f64) -> Vec<PowerUpKind> {
    let paddle = state.paddle.rect();
    let floor = state.tuning.play_height;

    let mut caught = Vec::new();
    state.powerups.retain(|powerup| {
        if powerup.rect().touches(&paddle) {
            caught.push(powerup.kind);
            false
        } else {
            powerup.pos.y < floor
        }
    });

    for &kind in &caught {
        apply(state, kind, now_ms);
    }
    caught
}

/// Apply one caught power-up
pub fn apply(state: &mut GameState, kind: PowerUpKind, now_ms: f64) {
    log::debug!("Power-up {:?} caught", kind);
    match kind {
        PowerUpKind::BigPaddle => {
            let width = state.tuning.big_paddle_width;
            state.paddle.set_width_centered(width, state.tuning.play_width);
            state.big_paddle_token = state.big_paddle_token.wrapping_add(1);

            let token = state.big_paddle_token;
            let epoch = state.epoch;
            let duration = state.tuning.big_paddle_ms;
            state
                .timers
                .schedule(now_ms, duration, epoch, Deferred::RevertBigPaddle { token });
        }
        PowerUpKind::MultiBall => spawn_extra_balls(state, 2),
        PowerUpKind::ExtraLife => {
            state.lives = state.lives.saturating_add(1).min(state.tuning.lives_cap);
        }
    }
    state.emit(GameEvent::PowerUpCaught { kind });
}

/// Launch `count` new balls from the first ball in flight
fn spawn_extra_balls(state: &mut GameState, count: usize) {
    let Some(origin) = state.balls.first().map(|b| b.pos) else {
        log::debug!("Multi-ball with no ball in flight");
        return;
    };

    let spread = state.tuning.multi_ball_spread_deg.to_radians();
    let speed = state.tuning.ball_speed;
    let size = state.tuning.ball_size;
    for _ in 0..count {
        let angle = (state.sample() * 2.0 - 1.0) * spread;
        let id = state.next_entity_id();
        state
            .balls
            .push(Ball::new(id, origin, launch_velocity(speed, angle), size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{RandomSource, ScriptedRandom, SeededRandom};
    use crate::sim::timers;
    use crate::tuning::Tuning;

    fn state(samples: &[f32]) -> GameState {
        // First sample is consumed by the initial serve
        let mut script = vec![0.5];
        script.extend_from_slice(samples);
        GameState::new(Tuning::default(), Box::new(ScriptedRandom::new(script)))
    }

    /// Put a power-up right on top of the paddle
    fn drop_on_paddle(state: &mut GameState, kind: PowerUpKind) {
        let center = state.paddle.rect().center();
        spawn(state, kind, center);
    }

    #[test]
    fn test_choose_kind_threshold() {
        assert_eq!(choose_kind(0.2, 0.2, true), None);
        assert_eq!(choose_kind(0.95, 0.2, true), None);
        assert_eq!(choose_kind(0.0, 0.2, true), Some(PowerUpKind::BigPaddle));
        assert_eq!(choose_kind(0.1, 0.2, true), Some(PowerUpKind::MultiBall));
        assert_eq!(choose_kind(0.19, 0.2, true), Some(PowerUpKind::ExtraLife));
        assert_eq!(choose_kind(0.19, 0.2, false), Some(PowerUpKind::MultiBall));
        assert_eq!(choose_kind(0.0, 0.0, true), None);
    }

    #[test]
    fn test_extra_life_never_offered_at_cap() {
        let mut rng = SeededRandom::new(3);
        for _ in 0..10_000 {
            let kind = choose_kind(rng.next_unit(), 0.2, false);
            assert_ne!(kind, Some(PowerUpKind::ExtraLife));
        }
        assert!(!eligible_kinds(false).contains(&PowerUpKind::ExtraLife));
    }

    #[test]
    fn test_spawn_rate_is_about_one_in_five() {
        let mut state = GameState::with_seed(Tuning::default(), 2024);
        let trials = 20_000;
        let spawned = (0..trials).filter(|_| roll_spawn(&mut state).is_some()).count();
        let rate = spawned as f32 / trials as f32;
        assert!((rate - 0.2).abs() < 0.02, "rate {}", rate);
    }

    #[test]
    fn test_falling_and_dropping_off_bottom() {
        let mut state = state(&[]);
        spawn(&mut state, PowerUpKind::ExtraLife, Vec2::new(20.0, 595.0));
        advance(&mut state);
        assert!((state.powerups[0].pos.y - (585.0 + 2.5)).abs() < 1e-4);

        for _ in 0..10 {
            advance(&mut state);
        }
        let caught = collect(&mut state, 0.0);
        assert!(caught.is_empty());
        assert!(state.powerups.is_empty());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_extra_life_caps() {
        let mut state = state(&[]);
        drop_on_paddle(&mut state, PowerUpKind::ExtraLife);
        assert_eq!(collect(&mut state, 0.0), vec![PowerUpKind::ExtraLife]);
        assert_eq!(state.lives, 4);

        state.lives = 5;
        drop_on_paddle(&mut state, PowerUpKind::ExtraLife);
        assert_eq!(collect(&mut state, 0.0).len(), 1);
        assert_eq!(state.lives, 5);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_multi_ball_adds_two_upward_balls() {
        let mut state = state(&[0.0, 1.0]);
        state.balls[0].vel = Vec2::new(1.0, -4.0);
        drop_on_paddle(&mut state, PowerUpKind::MultiBall);
        collect(&mut state, 0.0);

        assert_eq!(state.balls.len(), 3);
        let origin = state.balls[0].pos;
        for ball in &state.balls {
            assert!(ball.vel.y < 0.0);
            assert_eq!(ball.pos, origin);
        }
        // Script 0.0 -> -45 degrees
        assert!((state.balls[1].vel.x + 4.5 * 45f32.to_radians().sin()).abs() < 1e-4);
    }

    #[test]
    fn test_multi_ball_without_balls_is_noop() {
        let mut state = state(&[]);
        state.balls.clear();
        apply(&mut state, PowerUpKind::MultiBall, 0.0);
        assert!(state.balls.is_empty());
    }

    #[test]
    fn test_big_paddle_reverts_after_duration() {
        let mut state = state(&[]);
        let mid = state.paddle.center_x();
        drop_on_paddle(&mut state, PowerUpKind::BigPaddle);
        collect(&mut state, 1000.0);
        assert_eq!(state.paddle.width, 160.0);
        assert!((state.paddle.center_x() - mid).abs() < 1e-4);

        timers::run_due(&mut state, 5999.0);
        assert_eq!(state.paddle.width, 160.0);
        timers::run_due(&mut state, 6000.0);
        assert_eq!(state.paddle.width, 100.0);
        assert!((state.paddle.center_x() - mid).abs() < 1e-4);
    }

    #[test]
    fn test_second_big_paddle_extends_duration() {
        let mut state = state(&[]);
        apply(&mut state, PowerUpKind::BigPaddle, 0.0);
        apply(&mut state, PowerUpKind::BigPaddle, 3000.0);

        timers::run_due(&mut state, 5000.0);
        assert_eq!(state.paddle.width, 160.0);
        timers::run_due(&mut state, 8000.0);
        assert_eq!(state.paddle.width, 100.0);
    }
}
