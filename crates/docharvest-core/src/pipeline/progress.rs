//! Progress reporting for a run.
//!
//! `run_batch` sends one snapshot after each item reaches a terminal state,
//! in completion order.

/// Snapshot sent after an item terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunProgress {
    /// Items that reached a terminal state so far.
    pub completed: usize,
    pub total: usize,
    /// URL of the item that just terminated.
    pub current_url: String,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunProgress {
    /// Fraction complete in [0.0, 1.0]. An empty run counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }

    pub fn is_last(&self) -> bool {
        self.completed >= self.total
    }
}
