//! Frame scheduling with explicit cancellation.
//!
//! The host asks the [`FrameScheduler`] for permission before running each
//! frame. Once its [`CancelToken`] is cancelled, from the canvas or from any
//! clone held elsewhere, no further frame is granted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Default)]
pub struct FrameScheduler {
    token: CancelToken,
    granted: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that can stop this scheduler.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Grant the next frame, or refuse it once cancelled.
    pub fn request_frame(&mut self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.granted += 1;
        true
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Frames granted so far.
    pub fn frames_granted(&self) -> u64 {
        self.granted
    }
}
