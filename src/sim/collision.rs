//! Collision detection and response
//!
//! Runs once per tick after motion integration, always in the order
//! walls -> paddle -> bricks. Response is minimum-penetration push-out on
//! axis-aligned boxes; fast balls can tunnel, which is accepted.

use glam::Vec2;

use super::powerup;
use super::rect::Side;
use super::state::{Ball, GameEvent, GameState};

/// Advance every ball by its velocity
pub fn integrate(balls: &mut [Ball]) {
    for ball in balls {
        ball.pos += ball.vel;
    }
}

/// Reflect a ball off the side walls and the ceiling.
///
/// Returns true if any wall was hit.
pub fn bounce_off_walls(ball: &mut Ball, play_width: f32, ceiling: f32) -> bool {
    let mut hit = false;

    if ball.pos.x <= 0.0 {
        ball.pos.x = 0.0;
        ball.vel.x = -ball.vel.x;
        hit = true;
    } else if ball.pos.x + ball.size.x >= play_width {
        ball.pos.x = play_width - ball.size.x;
        ball.vel.x = -ball.vel.x;
        hit = true;
    }

    if ball.pos.y <= ceiling {
        ball.pos.y = ceiling;
        ball.vel.y = -ball.vel.y;
        hit = true;
    }

    hit
}

/// Wall pass: bounce every ball, then drain the ones past the bottom edge.
///
/// Returns the number of balls drained.
pub fn resolve_walls(state: &mut GameState) -> usize {
    let play_width = state.tuning.play_width;
    let ceiling = state.tuning.hud_height;
    let floor = state.tuning.play_height;

    let mut bounces = 0;
    for ball in state.balls.iter_mut() {
        if bounce_off_walls(ball, play_width, ceiling) {
            bounces += 1;
        }
    }

    let mut drained = Vec::new();
    state.balls.retain(|ball| {
        if ball.rect().bottom() >= floor {
            drained.push(ball.id);
            false
        } else {
            true
        }
    });

    for _ in 0..bounces {
        state.emit(GameEvent::WallHit);
    }
    for &id in &drained {
        log::debug!("Ball {} drained", id);
        state.emit(GameEvent::BallDrained { id });
    }
    drained.len()
}

/// Horizontal hit position on the paddle: 0 = left edge, 1 = right edge
pub fn hit_offset(ball_center_x: f32, paddle_left: f32, paddle_width: f32) -> f32 {
    ((ball_center_x - paddle_left) / paddle_width).clamp(0.0, 1.0)
}

/// Outgoing velocity after a paddle hit at `offset`.
///
/// The angle from vertical sweeps linearly from `-max_angle` at the left edge
/// to `+max_angle` at the right edge. Speed is taken from the incoming
/// velocity; the horizontal component is scaled by `boost`.
pub fn paddle_bounce(vel: Vec2, offset: f32, max_angle: f32, boost: f32) -> Vec2 {
    let angle = (offset - 0.5) * 2.0 * max_angle;
    let speed = vel.length();
    Vec2::new(speed * angle.sin() * boost, -(speed * angle.cos()).abs())
}

/// Paddle pass: deflect every descending ball touching the paddle.
///
/// Returns the number of balls deflected.
pub fn resolve_paddle(state: &mut GameState) -> usize {
    let paddle = state.paddle.rect();
    let max_angle = state.tuning.paddle_max_bounce_deg.to_radians();
    let boost = state.tuning.paddle_edge_boost;

    let mut hits = 0;
    for ball in state.balls.iter_mut() {
        if ball.vel.y > 0.0 && ball.rect().touches(&paddle) {
            let offset = hit_offset(ball.center().x, paddle.left(), paddle.w);
            ball.vel = paddle_bounce(ball.vel, offset, max_angle, boost);
            hits += 1;
        }
    }

    for _ in 0..hits {
        state.emit(GameEvent::PaddleHit);
    }
    hits
}

/// Push a ball out of an obstacle through `side` and point its velocity away
pub fn push_out(ball: &mut Ball, side: Side, depth: f32) {
    match side {
        Side::Left => {
            ball.pos.x -= depth;
            ball.vel.x = -ball.vel.x.abs();
        }
        Side::Right => {
            ball.pos.x += depth;
            ball.vel.x = ball.vel.x.abs();
        }
        Side::Top => {
            ball.pos.y -= depth;
            ball.vel.y = -ball.vel.y.abs();
        }
        Side::Bottom => {
            ball.pos.y += depth;
            ball.vel.y = ball.vel.y.abs();
        }
    }
}

/// Brick pass: each ball destroys at most the first alive brick it overlaps
/// (row-major order), scoring points and rolling for a power-up.
///
/// Returns the number of bricks destroyed.
pub fn resolve_bricks(state: &mut GameState) -> usize {
    let mut destroyed = Vec::new();

    for ball in state.balls.iter_mut() {
        let ball_rect = ball.rect();
        let Some(brick) = state
            .bricks
            .iter_mut()
            .find(|b| b.alive && ball_rect.overlaps(&b.rect))
        else {
            continue;
        };

        let (side, depth) = ball_rect.penetration(&brick.rect).min_side();
        push_out(ball, side, depth);
        brick.alive = false;
        destroyed.push((brick.row, brick.col, brick.rect.center()));
    }

    let points = state.tuning.brick_points;
    for &(row, col, center) in &destroyed {
        state.score = state.score.saturating_add(points);
        log::debug!("Brick ({}, {}) destroyed, score {}", row, col, state.score);
        state.emit(GameEvent::BrickDestroyed { row, col });

        if let Some(kind) = powerup::roll_spawn(state) {
            powerup::spawn(state, kind, center);
        }
    }
    destroyed.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRandom;
    use crate::sim::state::PowerUpKind;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_4;

    /// Session with a single ball and a script that never spawns power-ups
    fn state_with_ball(pos: Vec2, vel: Vec2) -> GameState {
        let mut state = GameState::new(
            Tuning::default(),
            Box::new(ScriptedRandom::new([]).with_fallback(0.99)),
        );
        state.balls[0].pos = pos;
        state.balls[0].vel = vel;
        state
    }

    #[test]
    fn test_left_wall_clamps_and_reflects() {
        let mut ball = Ball::new(1, Vec2::new(-3.0, 300.0), Vec2::new(-4.0, 2.0), 12.0);
        assert!(bounce_off_walls(&mut ball, 800.0, 48.0));
        assert_eq!(ball.pos.x, 0.0);
        assert_eq!(ball.vel, Vec2::new(4.0, 2.0));
    }

    #[test]
    fn test_right_wall_clamps_and_reflects() {
        let mut ball = Ball::new(1, Vec2::new(795.0, 300.0), Vec2::new(4.0, 2.0), 12.0);
        assert!(bounce_off_walls(&mut ball, 800.0, 48.0));
        assert_eq!(ball.pos.x, 788.0);
        assert_eq!(ball.vel.x, -4.0);
    }

    #[test]
    fn test_ceiling_is_below_hud_band() {
        let mut ball = Ball::new(1, Vec2::new(300.0, 40.0), Vec2::new(1.0, -4.0), 12.0);
        assert!(bounce_off_walls(&mut ball, 800.0, 48.0));
        assert_eq!(ball.pos.y, 48.0);
        assert_eq!(ball.vel.y, 4.0);
    }

    #[test]
    fn test_bottom_drains_instead_of_bouncing() {
        let mut state = state_with_ball(Vec2::new(300.0, 590.0), Vec2::new(0.0, 4.0));
        assert_eq!(resolve_walls(&mut state), 1);
        assert!(state.balls.is_empty());
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::BallDrained { .. })));
    }

    #[test]
    fn test_paddle_bounce_reference_angles() {
        let max = 45f32.to_radians();
        let incoming = Vec2::new(0.0, 4.5);

        let left = paddle_bounce(incoming, 0.0, max, 1.5);
        assert!((left.x + 4.5 * 1.5 * FRAC_PI_4.sin()).abs() < 1e-4);
        assert!(left.y < 0.0);

        let middle = paddle_bounce(incoming, 0.5, max, 1.5);
        assert!(middle.x.abs() < 1e-5);
        assert!((middle.y + 4.5).abs() < 1e-4);

        let right = paddle_bounce(incoming, 1.0, max, 1.5);
        assert!((right.x - 4.5 * 1.5 * FRAC_PI_4.sin()).abs() < 1e-4);
        assert!(right.y < 0.0);
    }

    #[test]
    fn test_paddle_ignores_rising_ball() {
        let mut state = state_with_ball(Vec2::ZERO, Vec2::new(0.0, -4.0));
        let paddle = state.paddle.rect();
        state.balls[0].pos = Vec2::new(paddle.center().x - 6.0, paddle.top() - 6.0);
        assert_eq!(resolve_paddle(&mut state), 0);
        assert_eq!(state.balls[0].vel, Vec2::new(0.0, -4.0));
    }

    #[test]
    fn test_paddle_left_edge_hit() {
        let mut state = state_with_ball(Vec2::ZERO, Vec2::new(0.0, 4.5));
        let paddle = state.paddle.rect();
        // Ball center right on the paddle's left edge
        state.balls[0].pos = Vec2::new(paddle.left() - 6.0, paddle.top() - 6.0);

        assert_eq!(resolve_paddle(&mut state), 1);
        let vel = state.balls[0].vel;
        assert!((vel.x + 4.5 * 1.5 * FRAC_PI_4.sin()).abs() < 1e-4);
        assert!(vel.y < 0.0);
    }

    #[test]
    fn test_brick_hit_from_below() {
        let mut state = state_with_ball(Vec2::ZERO, Vec2::new(1.0, -4.0));
        let brick = state.bricks[0].rect;
        state.balls[0].pos = Vec2::new(brick.center().x - 6.0, brick.bottom() - 5.0);

        assert_eq!(resolve_bricks(&mut state), 1);
        let ball = &state.balls[0];
        assert!((ball.pos.y - brick.bottom()).abs() < 1e-4);
        assert_eq!(ball.vel, Vec2::new(1.0, 4.0));
        assert!(!state.bricks[0].alive);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_one_brick_per_ball_per_tick() {
        let mut state = state_with_ball(Vec2::ZERO, Vec2::new(0.0, -4.0));
        // Straddle the gap between two adjacent bricks in row 0
        let a = state.bricks[0].rect;
        let b = state.bricks[1].rect;
        let gap_mid = (a.right() + b.left()) / 2.0;
        state.balls[0].size = Vec2::new(20.0, 12.0);
        state.balls[0].pos = Vec2::new(gap_mid - 10.0, a.bottom() - 5.0);

        assert_eq!(resolve_bricks(&mut state), 1);
        assert!(!state.bricks[0].alive);
        assert!(state.bricks[1].alive);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_two_balls_same_brick_destroy_it_once() {
        let mut state = state_with_ball(Vec2::ZERO, Vec2::new(0.0, -4.0));
        let brick = state.bricks[0].rect;
        let pos = Vec2::new(brick.center().x - 6.0, brick.bottom() - 5.0);
        state.balls[0].pos = pos;
        let id = state.next_entity_id();
        state.balls.push(Ball::new(id, pos, Vec2::new(0.0, -4.0), 12.0));

        assert_eq!(resolve_bricks(&mut state), 1);
        assert_eq!(state.score, 10);
        // Second ball found no alive brick and kept its velocity
        assert_eq!(state.balls[1].vel, Vec2::new(0.0, -4.0));
    }

    /// Ball overlapping brick 0 from below, with `samples` feeding the spawn roll
    fn state_under_first_brick(samples: &[f32]) -> GameState {
        let mut state = state_with_ball(Vec2::ZERO, Vec2::new(0.0, -4.5));
        let brick = state.bricks[0].rect;
        state.balls[0].pos = Vec2::new(brick.center().x - 6.0, brick.bottom() - 5.0);
        state.set_random_source(Box::new(
            ScriptedRandom::new(samples.iter().copied()).with_fallback(0.99),
        ));
        state
    }

    #[test]
    fn test_low_roll_spawns_powerup_at_brick_center() {
        let mut state = state_under_first_brick(&[0.1]);
        let center = state.bricks[0].rect.center();

        assert_eq!(resolve_bricks(&mut state), 1);
        assert_eq!(state.powerups.len(), 1);
        let powerup = &state.powerups[0];
        assert_eq!(powerup.kind, PowerUpKind::MultiBall);
        assert!((powerup.rect().center() - center).length() < 1e-4);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::PowerUpSpawned { kind: PowerUpKind::MultiBall })));
    }

    #[test]
    fn test_capped_lives_never_spawn_extra_life() {
        // 0.19 would pick extra life with all three kinds eligible
        let mut state = state_under_first_brick(&[0.19]);
        state.lives = state.tuning.lives_cap;

        assert_eq!(resolve_bricks(&mut state), 1);
        assert_eq!(state.powerups.len(), 1);
        assert_ne!(state.powerups[0].kind, PowerUpKind::ExtraLife);
    }

    #[test]
    fn test_high_roll_spawns_nothing() {
        let mut state = state_under_first_brick(&[0.5]);
        assert_eq!(resolve_bricks(&mut state), 1);
        assert!(state.powerups.is_empty());
        assert!(!state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::PowerUpSpawned { .. })));
    }

    proptest! {
        #[test]
        fn prop_integration_adds_velocity(
            x in 0.0f32..800.0, y in 48.0f32..600.0,
            vx in -10.0f32..10.0, vy in -10.0f32..10.0,
        ) {
            let mut balls = vec![Ball::new(1, Vec2::new(x, y), Vec2::new(vx, vy), 12.0)];
            integrate(&mut balls);
            prop_assert_eq!(balls[0].pos, Vec2::new(x, y) + Vec2::new(vx, vy));
        }

        #[test]
        fn prop_walls_keep_ball_in_bounds(
            x in -50.0f32..850.0, y in 0.0f32..600.0,
            vx in -10.0f32..10.0, vy in -10.0f32..10.0,
        ) {
            let mut ball = Ball::new(1, Vec2::new(x, y), Vec2::new(vx, vy), 12.0);
            let before = ball.vel;
            bounce_off_walls(&mut ball, 800.0, 48.0);

            prop_assert!(ball.pos.x >= 0.0 && ball.pos.x <= 788.0);
            prop_assert!(ball.pos.y >= 48.0);
            prop_assert_eq!(ball.vel.x.abs(), before.x.abs());
            prop_assert_eq!(ball.vel.y.abs(), before.y.abs());
            if x <= 0.0 || x + 12.0 >= 800.0 {
                prop_assert_eq!(ball.vel.x, -before.x);
            }
            if y <= 48.0 {
                prop_assert_eq!(ball.vel.y, -before.y);
            }
        }

        #[test]
        fn prop_paddle_bounce_is_upward_and_monotonic(
            vx in -10.0f32..10.0, vy in 0.5f32..10.0,
            a in 0.0f32..=1.0, b in 0.0f32..=1.0,
        ) {
            let max = 45f32.to_radians();
            let vel = Vec2::new(vx, vy);
            let out_a = paddle_bounce(vel, a, max, 1.5);
            let out_b = paddle_bounce(vel, b, max, 1.5);

            prop_assert!(out_a.y < 0.0);
            if a < b {
                prop_assert!(out_a.x <= out_b.x);
            }
        }

        #[test]
        fn prop_brick_response_uses_single_axis(
            dx in -10.0f32..90.0, dy in -10.0f32..20.0,
            vx in -5.0f32..5.0, vy in -5.0f32..5.0,
        ) {
            let mut state = state_with_ball(Vec2::ZERO, Vec2::new(vx, vy));
            let brick = state.bricks[0].rect;
            let start = Vec2::new(brick.left() + dx - 6.0, brick.top() + dy - 6.0);
            state.balls[0].pos = start;

            let hits = resolve_bricks(&mut state);
            prop_assert!(hits <= 1);

            let moved = state.balls[0].pos - start;
            if hits == 1 {
                prop_assert!(moved.x == 0.0 || moved.y == 0.0);
                prop_assert_eq!(state.score, 10);
            } else {
                prop_assert_eq!(moved, Vec2::ZERO);
                prop_assert_eq!(state.score, 0);
            }
        }
    }
}
