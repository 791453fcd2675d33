//! Brick Breaker - a paddle-and-ball arcade simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state machine, physics, collisions, power-ups)
//! - `scheduler`: One tick per display frame while playing
//! - `game`: Façade wiring a session to its collaborators
//! - `platform`: Frame hosts, logical input, autopilot
//! - `audio`, `highscores`, `ui`: Sound, persistence and presentation seams
//! - `tuning`: Data-driven geometry and balance

pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::Game;
pub use highscores::HighScoreStore;
pub use scheduler::{FrameHandle, FrameHost, FrameScheduler};
pub use settings::Settings;
pub use tuning::Tuning;
