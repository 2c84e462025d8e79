//! Caller-side cancellation for a run.
//!
//! The aggregator checks the token before starting each item. Once set, no
//! new item starts; items already in flight run to their terminal state, and
//! items never started are recorded as `ItemError::Cancelled`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable abort token shared between the caller and `run_batch`.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    abort: Arc<AtomicBool>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop starting new items.
    pub fn request_abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }
}
