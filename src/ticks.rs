//! Frame scheduling.
//!
//! A [`TickSource`] is the frame-callback primitive the animation driver
//! schedules itself with. Each request yields a [`FrameRequest`] handle; the
//! host later fires that handle back into the driver, or the driver cancels
//! it on teardown. Requests are one-shot.
//!
//! [`ManualTicks`] is the deterministic stepper: nothing fires until the
//! caller pops a request.

use std::collections::VecDeque;

/// Handle for one scheduled frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Something that can schedule frame callbacks.
pub trait TickSource {
    /// Schedule one frame callback.
    fn request_frame(&mut self) -> FrameRequest;

    /// Drop a scheduled callback. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);

    /// Callbacks scheduled but not yet fired or cancelled.
    fn pending_frames(&self) -> usize;
}

/// A tick source driven by hand.
#[derive(Debug, Default)]
pub struct ManualTicks {
    next_id: u64,
    pending: VecDeque<FrameRequest>,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest pending request, marking it fired.
    pub fn pop(&mut self) -> Option<FrameRequest> {
        self.pending.pop_front()
    }

    /// Whether `request` is still waiting to fire.
    pub fn is_pending(&self, request: FrameRequest) -> bool {
        self.pending.contains(&request)
    }
}

impl TickSource for ManualTicks {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id);
        self.next_id += 1;
        self.pending.push_back(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.pending.retain(|r| *r != request);
    }

    fn pending_frames(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_fire_in_order() {
        let mut ticks = ManualTicks::new();
        let a = ticks.request_frame();
        let b = ticks.request_frame();
        assert_ne!(a, b);
        assert_eq!(ticks.pending_frames(), 2);

        assert_eq!(ticks.pop(), Some(a));
        assert_eq!(ticks.pop(), Some(b));
        assert_eq!(ticks.pop(), None);
    }

    #[test]
    fn test_cancel_removes_only_that_request() {
        let mut ticks = ManualTicks::new();
        let a = ticks.request_frame();
        let b = ticks.request_frame();
        ticks.cancel_frame(a);

        assert!(!ticks.is_pending(a));
        assert!(ticks.is_pending(b));
        assert_eq!(ticks.pending_frames(), 1);

        // Cancelling twice is harmless.
        ticks.cancel_frame(a);
        assert_eq!(ticks.pending_frames(), 1);
    }
}
