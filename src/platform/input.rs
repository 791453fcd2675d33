//! Logical input
//!
//! Raw key, pointer and button events are mapped by the host into these
//! already-debounced intents. Held directions persist across ticks; the
//! pointer position is consumed by the next tick.

use crate::sim::TickInput;

/// A debounced, host-independent input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicalInput {
    /// Left held (true) or released (false)
    MoveLeft(bool),
    MoveRight(bool),
    /// Pointer moved to this play-area x coordinate
    Pointer(f32),
    /// The single primary action (launch, pause, resume, restart)
    Primary,
    /// Dedicated restart affordance
    Restart,
    /// Click on the overlay card
    OverlayClick,
    /// Pointer entered a button (UI feedback only)
    ButtonHover,
    /// The page lost focus; held keys are dropped and play pauses
    FocusLost,
    DebugForceWin,
    DebugForceReset,
}

/// Accumulated held/pointer input between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub pointer_x: Option<f32>,
}

impl InputState {
    /// Keyboard direction: -1, 0 or +1
    pub fn direction(&self) -> f32 {
        let mut dir = 0.0;
        if self.left {
            dir -= 1.0;
        }
        if self.right {
            dir += 1.0;
        }
        dir
    }

    /// Snapshot for one tick; the pointer sample is consumed
    pub fn take_tick_input(&mut self, now_ms: f64) -> TickInput {
        TickInput {
            direction: self.direction(),
            pointer_x: self.pointer_x.take(),
            now_ms,
        }
    }

    /// Drop held keys and any pending pointer sample
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sums_held_keys() {
        let mut input = InputState::default();
        assert_eq!(input.direction(), 0.0);
        input.left = true;
        assert_eq!(input.direction(), -1.0);
        input.right = true;
        assert_eq!(input.direction(), 0.0);
        input.left = false;
        assert_eq!(input.direction(), 1.0);
    }

    #[test]
    fn test_pointer_consumed_once() {
        let mut input = InputState {
            right: true,
            pointer_x: Some(120.0),
            ..Default::default()
        };
        let first = input.take_tick_input(16.0);
        assert_eq!(first.pointer_x, Some(120.0));
        assert_eq!(first.direction, 1.0);
        assert_eq!(first.now_ms, 16.0);

        let second = input.take_tick_input(32.0);
        assert_eq!(second.pointer_x, None);
        assert_eq!(second.direction, 1.0);
    }

    #[test]
    fn test_clear_drops_held_keys_and_pointer() {
        let mut input = InputState {
            left: true,
            right: true,
            pointer_x: Some(40.0),
        };
        input.clear();
        assert_eq!(input.direction(), 0.0);
        assert_eq!(input.take_tick_input(0.0).pointer_x, None);
    }
}
