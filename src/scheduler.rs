//! Frame scheduler
//!
//! Keeps at most one display-frame callback in flight while the session is
//! PLAYING and none otherwise. The host owns the actual run-loop
//! (`requestAnimationFrame` in the browser, a queue in headless runs); the
//! scheduler only decides when to request or cancel.

use crate::sim::GamePhase;

/// Opaque identifier of a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host run-loop able to deliver one callback per display refresh
pub trait FrameHost {
    /// Request a callback on the next display frame
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancel a previously requested frame; unknown handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: Option<FrameHandle>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure exactly one frame is pending
    pub fn start(&mut self, host: &mut dyn FrameHost) {
        if self.pending.is_none() {
            let handle = host.request_frame();
            log::trace!("frame {:?} requested", handle);
            self.pending = Some(handle);
        }
    }

    /// Cancel the pending frame, if any
    pub fn stop(&mut self, host: &mut dyn FrameHost) {
        if let Some(handle) = self.pending.take() {
            log::trace!("frame {:?} cancelled", handle);
            host.cancel_frame(handle);
        }
    }

    /// Bring the scheduler in line with the session phase
    pub fn sync(&mut self, phase: GamePhase, host: &mut dyn FrameHost) {
        if phase == GamePhase::Playing {
            self.start(host);
        } else {
            self.stop(host);
        }
    }

    /// Consume a delivered frame. Returns false for a frame that is not the
    /// pending one (cancelled or superseded), which must not tick.
    pub fn accept(&mut self, handle: FrameHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            log::debug!("Dropping stale frame {:?}", handle);
            false
        }
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }
}
