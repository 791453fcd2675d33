//! Headless frame host
//!
//! Stands in for the browser's animation-frame loop in native runs and tests.
//! Frames are delivered in request order with a fixed 60 Hz clock.

use std::collections::VecDeque;

use crate::scheduler::{FrameHandle, FrameHost};

/// Display refresh interval (ms)
pub const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Default)]
pub struct HeadlessHost {
    queue: VecDeque<FrameHandle>,
    next_handle: u64,
    now_ms: f64,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver the oldest requested frame, advancing the clock one refresh
    pub fn next_frame(&mut self) -> Option<(FrameHandle, f64)> {
        let handle = self.queue.pop_front()?;
        self.now_ms += FRAME_MS;
        Some((handle, self.now_ms))
    }

    /// Let wall time pass without a frame (e.g. while paused)
    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms.max(0.0);
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Frames requested and not yet delivered or cancelled
    pub fn in_flight(&self) -> usize {
        self.queue.len()
    }
}

impl FrameHost for HeadlessHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_handle += 1;
        let handle = FrameHandle(self.next_handle);
        self.queue.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.retain(|h| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_delivered_in_order_with_clock() {
        let mut host = HeadlessHost::new();
        let a = host.request_frame();
        let b = host.request_frame();
        assert_eq!(host.in_flight(), 2);

        let (first, t1) = host.next_frame().unwrap();
        let (second, t2) = host.next_frame().unwrap();
        assert_eq!((first, second), (a, b));
        assert!((t2 - t1 - FRAME_MS).abs() < 1e-9);
        assert!(host.next_frame().is_none());
    }

    #[test]
    fn test_cancelled_frame_never_delivered() {
        let mut host = HeadlessHost::new();
        let a = host.request_frame();
        let b = host.request_frame();
        host.cancel_frame(a);
        host.cancel_frame(a);
        assert_eq!(host.in_flight(), 1);
        assert_eq!(host.next_frame().map(|(h, _)| h), Some(b));
        assert!(host.next_frame().is_none());
    }
}
