//! Game state and core simulation types
//!
//! One owned `GameState` holds every entity and counter of a session; each
//! subsystem borrows it for the duration of a call.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::rng::{RandomSource, SeededRandom};
use super::timers::Timers;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball staged above the paddle, waiting for launch
    Start,
    /// Simulation running
    Playing,
    /// Simulation frozen, resumable
    Paused,
    /// Ball set lost with lives remaining, waiting for acknowledgement
    LifeLost,
    /// Lives exhausted
    GameOver,
    /// All bricks cleared
    Win,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "START",
            GamePhase::Playing => "PLAYING",
            GamePhase::Paused => "PAUSED",
            GamePhase::LifeLost => "LIFE_LOST",
            GamePhase::GameOver => "GAME_OVER",
            GamePhase::Win => "WIN",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Win)
    }
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub size: Vec2,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, size: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            size: Vec2::splat(size),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed for the session)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    pub fn new(tuning: &Tuning) -> Self {
        let mut paddle = Self {
            x: 0.0,
            y: tuning.paddle_y(),
            width: tuning.paddle_width,
            height: tuning.paddle_height,
        };
        paddle.center_in(tuning.play_width);
        paddle
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center the paddle horizontally in the play area
    pub fn center_in(&mut self, play_width: f32) {
        self.x = (play_width - self.width) / 2.0;
    }

    /// Shift by `dx`, clamped to the play area
    pub fn move_by(&mut self, dx: f32, play_width: f32) {
        self.x += dx;
        self.clamp_to(play_width);
    }

    /// Place the paddle's midpoint at `center_x`, clamped to the play area
    pub fn place_center(&mut self, center_x: f32, play_width: f32) {
        self.x = center_x - self.width / 2.0;
        self.clamp_to(play_width);
    }

    /// Change width keeping the current midpoint, clamped to the play area
    pub fn set_width_centered(&mut self, width: f32, play_width: f32) {
        let mid = self.center_x();
        self.width = width.min(play_width);
        self.place_center(mid, play_width);
    }

    fn clamp_to(&mut self, play_width: f32) {
        self.x = self.x.clamp(0.0, (play_width - self.width).max(0.0));
    }
}

/// Row-derived brick colour tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickColor {
    Red,
    Yellow,
    Green,
    Cyan,
}

impl BrickColor {
    pub fn for_row(row: u32) -> Self {
        match row % 4 {
            0 => BrickColor::Red,
            1 => BrickColor::Yellow,
            2 => BrickColor::Green,
            _ => BrickColor::Cyan,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            BrickColor::Red => "#ef4444",
            BrickColor::Yellow => "#eab308",
            BrickColor::Green => "#22c55e",
            BrickColor::Cyan => "#22d3ee",
        }
    }
}

/// A brick in the fixed grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub row: u32,
    pub col: u32,
    pub alive: bool,
    pub rect: Rect,
    pub color: BrickColor,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    BigPaddle,
    MultiBall,
    ExtraLife,
}

impl PowerUpKind {
    /// Glyph the presentation layer draws on the capsule
    pub fn symbol(&self) -> &'static str {
        match self {
            PowerUpKind::BigPaddle => "↔",
            PowerUpKind::MultiBall => "●●",
            PowerUpKind::ExtraLife => "♥",
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Screen shake strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shake {
    Soft,
    Hard,
}

/// Presentation-only effects; never read by the simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualEffects {
    pub paddle_pulse: bool,
    pub collision_flash: bool,
    pub shake: Option<Shake>,
}

/// Things that happened during a call into the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    WallHit,
    PaddleHit,
    BrickDestroyed { row: u32, col: u32 },
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpCaught { kind: PowerUpKind },
    BallDrained { id: u32 },
    LifeLost { lives_left: u8 },
    GameOver { final_score: u64 },
    Win { final_score: u64 },
    NewHighScore { score: u64 },
}

/// Complete session state
#[derive(Debug)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Best score seen, seeded from the persistence collaborator
    pub high_score: u64,
    pub paddle: Paddle,
    /// Balls in flight (ordered by id)
    pub balls: Vec<Ball>,
    /// Row-major brick grid
    pub bricks: Vec<Brick>,
    /// Falling power-ups (ordered by id)
    pub powerups: Vec<PowerUp>,
    pub effects: VisualEffects,
    pub timers: Timers,
    /// Incremented on every full reset; stale deferred events compare against it
    pub epoch: u64,
    /// Incremented on every big-paddle catch so only the latest revert applies
    pub big_paddle_token: u32,
    /// Incremented on every shake so only the latest shake's end applies
    pub shake_token: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Box<dyn RandomSource>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session in the START phase with a fresh grid and a staged ball
    pub fn new(tuning: Tuning, rng: Box<dyn RandomSource>) -> Self {
        let tuning = tuning.sanitized();
        let mut state = Self {
            phase: GamePhase::Start,
            score: 0,
            lives: tuning.starting_lives,
            high_score: 0,
            paddle: Paddle::new(&tuning),
            balls: Vec::new(),
            bricks: Vec::new(),
            powerups: Vec::new(),
            effects: VisualEffects::default(),
            timers: Timers::default(),
            epoch: 0,
            big_paddle_token: 0,
            shake_token: 0,
            time_ticks: 0,
            rng,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };

        state.build_bricks();
        state.stage_ball();
        state
    }

    /// Create a session driven by a seeded PCG stream
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::new(tuning, Box::new(SeededRandom::new(seed)))
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Draw a uniform sample in `[0, 1)`
    pub fn sample(&mut self) -> f32 {
        self.rng.next_unit()
    }

    /// Replace the random source (tests, replays)
    pub fn set_random_source(&mut self, rng: Box<dyn RandomSource>) {
        self.rng = rng;
    }

    /// Rebuild the full brick grid, all alive
    pub fn build_bricks(&mut self) {
        let t = &self.tuning;
        let width = t.brick_width();
        log::debug!("Building {}x{} brick grid", t.brick_rows, t.brick_cols);

        self.bricks = (0..t.brick_rows)
            .flat_map(|row| (0..t.brick_cols).map(move |col| (row, col)))
            .map(|(row, col)| Brick {
                row,
                col,
                alive: true,
                rect: Rect::new(
                    t.brick_side_margin + col as f32 * (width + t.brick_gap),
                    t.brick_top + row as f32 * (t.brick_height + t.brick_gap),
                    width,
                    t.brick_height,
                ),
                color: BrickColor::for_row(row),
            })
            .collect();
    }

    /// Replace all balls with one ball resting above the paddle center,
    /// carrying a random upward serve velocity
    pub fn stage_ball(&mut self) {
        let size = self.tuning.ball_size;
        let pos = Vec2::new(
            self.paddle.center_x() - size / 2.0,
            self.paddle.y - size - 4.0,
        );

        let max_angle = self.tuning.serve_max_angle_deg.to_radians();
        let angle = (self.sample() * 2.0 - 1.0) * max_angle;
        let vel = launch_velocity(self.tuning.ball_speed, angle);

        let id = self.next_entity_id();
        self.balls.clear();
        self.balls.push(Ball::new(id, pos, vel, size));
        log::debug!(
            "Ball staged at ({:.1}, {:.1}) vel ({:.2}, {:.2})",
            pos.x,
            pos.y,
            vel.x,
            vel.y
        );
    }

    pub fn center_paddle(&mut self) {
        self.paddle.center_in(self.tuning.play_width);
    }

    pub fn bricks_remaining(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    pub fn bricks_destroyed(&self) -> usize {
        self.bricks.len() - self.bricks_remaining()
    }

    /// Move to `to`, recording the transition
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {} -> {}", from.as_str(), to.as_str());
        self.phase = to;
        self.emit(GameEvent::PhaseChanged { from, to });
    }

    /// Raise the high score if the running score beats it
    pub fn record_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            log::info!("New high score {}", self.score);
            self.emit(GameEvent::NewHighScore { score: self.score });
            true
        } else {
            false
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Upward velocity of magnitude `speed` at `angle` radians from vertical
pub fn launch_velocity(speed: f32, angle: f32) -> Vec2 {
    Vec2::new(speed * angle.sin(), -(speed * angle.cos()).abs())
}
