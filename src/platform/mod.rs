//! Platform abstraction layer
//!
//! Host-side glue around the simulation:
//! - Frame delivery (headless queue natively, `requestAnimationFrame` on web)
//! - Logical input mapping
//! - Autopilot demo driver

pub mod autopilot;
pub mod headless;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use autopilot::Autopilot;
pub use headless::HeadlessHost;
pub use input::{InputState, LogicalInput};
