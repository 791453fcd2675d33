//! Data-driven game balance
//!
//! Every geometric and balance constant the simulation reads lives here so a
//! host can ship a JSON override without recompiling. Units are pixels and
//! pixels-per-tick unless noted otherwise.

use serde::{Deserialize, Serialize};

/// Simulation geometry and balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play area ===
    pub play_width: f32,
    pub play_height: f32,
    /// Reserved band at the top of the play area; acts as the ceiling
    pub hud_height: f32,

    // === Bricks ===
    pub brick_rows: u32,
    pub brick_cols: u32,
    pub brick_height: f32,
    pub brick_gap: f32,
    /// Y coordinate of the first brick row
    pub brick_top: f32,
    pub brick_side_margin: f32,
    pub brick_points: u64,

    // === Paddle ===
    pub paddle_width: f32,
    pub big_paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between the paddle's bottom edge and the bottom of the play area
    pub paddle_bottom_margin: f32,
    pub paddle_speed: f32,
    /// Multiplier applied to horizontal speed on paddle bounces
    pub paddle_edge_boost: f32,
    /// Maximum bounce angle from vertical (degrees)
    pub paddle_max_bounce_deg: f32,

    // === Ball ===
    pub ball_size: f32,
    pub ball_speed: f32,
    /// Maximum serve angle from vertical (degrees)
    pub serve_max_angle_deg: f32,

    // === Lives ===
    pub starting_lives: u8,
    pub lives_cap: u8,
    /// Points awarded per remaining life on a win
    pub life_bonus: u64,

    // === Power-ups ===
    pub powerup_chance: f32,
    pub powerup_fall_speed: f32,
    pub powerup_size: f32,
    /// Wall-clock duration of the big paddle effect (ms)
    pub big_paddle_ms: f64,
    /// Maximum launch angle from vertical for multi-ball spawns (degrees)
    pub multi_ball_spread_deg: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            play_width: 800.0,
            play_height: 600.0,
            hud_height: 48.0,

            brick_rows: 4,
            brick_cols: 8,
            brick_height: 20.0,
            brick_gap: 8.0,
            brick_top: 80.0,
            brick_side_margin: 16.0,
            brick_points: 10,

            paddle_width: 100.0,
            big_paddle_width: 160.0,
            paddle_height: 12.0,
            paddle_bottom_margin: 32.0,
            paddle_speed: 6.0,
            paddle_edge_boost: 1.5,
            paddle_max_bounce_deg: 45.0,

            ball_size: 12.0,
            ball_speed: 4.5,
            serve_max_angle_deg: 30.0,

            starting_lives: 3,
            lives_cap: 5,
            life_bonus: 50,

            powerup_chance: 0.2,
            powerup_fall_speed: 2.5,
            powerup_size: 20.0,
            big_paddle_ms: 5000.0,
            multi_ball_spread_deg: 45.0,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp every field into a range the simulation can honor
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        self.play_width = positive_or(self.play_width, defaults.play_width);
        self.play_height = positive_or(self.play_height, defaults.play_height);
        self.hud_height = self.hud_height.clamp(0.0, self.play_height / 2.0);

        self.brick_height = positive_or(self.brick_height, defaults.brick_height);
        self.brick_gap = self.brick_gap.max(0.0);
        self.brick_side_margin = self.brick_side_margin.clamp(0.0, self.play_width / 4.0);
        self.brick_top = self.brick_top.max(self.hud_height);

        self.paddle_width =
            positive_or(self.paddle_width, defaults.paddle_width).min(self.play_width);
        self.big_paddle_width = self.big_paddle_width.clamp(self.paddle_width, self.play_width);
        self.paddle_height = positive_or(self.paddle_height, defaults.paddle_height);
        self.paddle_bottom_margin = self.paddle_bottom_margin.max(0.0);
        self.paddle_speed = self.paddle_speed.max(0.0);
        self.paddle_edge_boost = positive_or(self.paddle_edge_boost, defaults.paddle_edge_boost);
        self.paddle_max_bounce_deg = self.paddle_max_bounce_deg.clamp(0.0, 89.0);

        // Rows must fit above the paddle; columns need at least a pixel each
        let pitch = self.brick_height + self.brick_gap;
        let max_rows = ((self.paddle_y() - self.brick_top + self.brick_gap) / pitch).floor();
        let usable = self.play_width - 2.0 * self.brick_side_margin + self.brick_gap;
        let max_cols = (usable / (1.0 + self.brick_gap)).floor();
        self.brick_rows = self.brick_rows.clamp(1, max_rows.max(1.0) as u32);
        self.brick_cols = self.brick_cols.clamp(1, max_cols.max(1.0) as u32);

        self.ball_size = positive_or(self.ball_size, defaults.ball_size);
        self.ball_speed = positive_or(self.ball_speed, defaults.ball_speed);
        self.serve_max_angle_deg = self.serve_max_angle_deg.clamp(0.0, 89.0);

        self.lives_cap = self.lives_cap.max(1);
        self.starting_lives = self.starting_lives.clamp(1, self.lives_cap);

        self.powerup_chance = self.powerup_chance.clamp(0.0, 1.0);
        self.powerup_fall_speed = self.powerup_fall_speed.max(0.0);
        self.powerup_size = positive_or(self.powerup_size, defaults.powerup_size);
        self.big_paddle_ms = self.big_paddle_ms.max(0.0);
        self.multi_ball_spread_deg = self.multi_ball_spread_deg.clamp(0.0, 89.0);

        self
    }

    /// Total number of bricks in a fresh grid
    pub fn brick_count(&self) -> usize {
        self.brick_rows as usize * self.brick_cols as usize
    }

    /// Width of one brick so that the grid fills the play area between margins
    pub fn brick_width(&self) -> f32 {
        let cols = self.brick_cols as f32;
        let usable = self.play_width - 2.0 * self.brick_side_margin - (cols - 1.0) * self.brick_gap;
        (usable / cols).max(1.0)
    }

    /// Y coordinate of the paddle's top edge
    pub fn paddle_y(&self) -> f32 {
        self.play_height - self.paddle_bottom_margin - self.paddle_height
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 { value } else { fallback }
}
