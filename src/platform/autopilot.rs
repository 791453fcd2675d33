//! Autopilot demo driver
//!
//! Plays the game through the same logical inputs a human would produce.
//! Used by the native binary and by soak tests.

use std::cmp::Ordering;

use serde::Serialize;

use super::headless::{FRAME_MS, HeadlessHost};
use super::input::LogicalInput;
use crate::game::Game;
use crate::sim::{Ball, GamePhase, GameState};

/// Summary of one driven session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub high_score: u64,
    pub bricks_destroyed: usize,
    pub frames: u64,
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Horizontal look-ahead (ticks of ball travel)
    pub lead_ticks: f32,
    /// Amplitude of the aim wobble as a fraction of paddle width
    pub wobble: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            lead_ticks: 8.0,
            wobble: 0.35,
        }
    }
}

impl Autopilot {
    /// Inputs for the coming frame
    pub fn decide(&self, state: &GameState) -> Vec<LogicalInput> {
        match state.phase {
            GamePhase::Start | GamePhase::LifeLost => vec![LogicalInput::Primary],
            GamePhase::Playing => self
                .target_x(state)
                .map(LogicalInput::Pointer)
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Play `game` on `host` until the session ends or `max_frames` ticks ran
    pub fn drive(
        &self,
        game: &mut Game,
        host: &mut HeadlessHost,
        max_frames: u64,
    ) -> SessionReport {
        let mut frames = 0;
        while frames < max_frames && !game.state().phase.is_terminal() {
            for input in self.decide(game.state()) {
                game.handle(input, host);
            }
            match host.next_frame() {
                Some((handle, now)) => {
                    if game.on_frame(handle, now, host).is_some() {
                        frames += 1;
                    }
                }
                None => {
                    // Waiting phase with nothing to press
                    if game.state().phase != GamePhase::Start
                        && game.state().phase != GamePhase::LifeLost
                    {
                        break;
                    }
                    host.advance(FRAME_MS);
                    game.poll_timers(host.now_ms());
                }
            }
        }

        let state = game.state();
        SessionReport {
            phase: state.phase,
            score: state.score,
            lives: state.lives,
            high_score: state.high_score,
            bricks_destroyed: state.bricks_destroyed(),
            frames,
        }
    }

    fn target_x(&self, state: &GameState) -> Option<f32> {
        // Most dangerous ball: the lowest one still coming down
        let threat = state
            .balls
            .iter()
            .filter(|b| b.vel.y > 0.0)
            .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(Ordering::Equal));

        let safe = threat.is_none_or(|b| b.pos.y < state.tuning.play_height * 0.4);
        if safe {
            let paddle_x = state.paddle.center_x();
            let pickup = state.powerups.iter().min_by(|a, b| {
                let da = (a.rect().center().x - paddle_x).abs();
                let db = (b.rect().center().x - paddle_x).abs();
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            });
            if let Some(p) = pickup {
                return Some(p.rect().center().x);
            }
        }

        let ball = threat.or_else(|| state.balls.first())?;
        Some(self.aim_at(ball, state))
    }

    fn aim_at(&self, ball: &Ball, state: &GameState) -> f32 {
        // Oscillating offset so rallies don't settle into a loop
        let t = state.time_ticks as f32 * 0.01;
        let offset = (t.sin() * 0.7 + (t * 0.7).sin() * 0.3) * self.wobble * state.paddle.width;
        let lead = ball.center().x + ball.vel.x * self.lead_ticks;
        lead.clamp(0.0, state.tuning.play_width) + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PowerUpKind, ScriptedRandom, flow, powerup};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(Tuning::default(), Box::new(ScriptedRandom::new([0.5])))
    }

    #[test]
    fn test_launches_from_waiting_phases() {
        let pilot = Autopilot::default();
        let state = state();
        assert_eq!(pilot.decide(&state), vec![LogicalInput::Primary]);
    }

    #[test]
    fn test_nothing_while_paused_or_terminal() {
        let pilot = Autopilot::default();
        let mut state = state();
        flow::primary_action(&mut state);
        flow::pause(&mut state);
        assert!(pilot.decide(&state).is_empty());
        flow::force_win(&mut state);
        assert!(pilot.decide(&state).is_empty());
    }

    #[test]
    fn test_tracks_descending_ball() {
        let pilot = Autopilot {
            wobble: 0.0,
            ..Default::default()
        };
        let mut state = state();
        flow::primary_action(&mut state);
        state.balls[0].pos = Vec2::new(600.0, 450.0);
        state.balls[0].vel = Vec2::new(0.0, 4.5);

        let inputs = pilot.decide(&state);
        assert_eq!(inputs, vec![LogicalInput::Pointer(606.0)]);
    }

    #[test]
    fn test_driven_session_keeps_one_frame_in_flight() {
        let pilot = Autopilot::default();
        let mut game = Game::headless(Tuning::default(), 7);
        let mut host = HeadlessHost::new();

        // Drive in short slices and check the scheduler between them
        let mut total = 0;
        for _ in 0..200 {
            let report = pilot.drive(&mut game, &mut host, 25);
            total += report.frames;
            let playing = game.state().phase == GamePhase::Playing;
            assert!(host.in_flight() <= 1);
            assert_eq!(host.in_flight() == 1, playing);
            if report.phase.is_terminal() {
                break;
            }
        }
        assert!(total > 0);
        let state = game.state();
        assert!(state.lives <= state.tuning.lives_cap);
        assert_eq!(state.score % 10, 0);
    }

    #[test]
    fn test_grabs_powerup_when_safe() {
        let pilot = Autopilot::default();
        let mut state = state();
        flow::primary_action(&mut state);
        state.balls[0].vel = Vec2::new(1.0, -4.0);
        powerup::spawn(&mut state, PowerUpKind::ExtraLife, Vec2::new(90.0, 300.0));

        let inputs = pilot.decide(&state);
        assert_eq!(inputs, vec![LogicalInput::Pointer(90.0)]);
    }
}
