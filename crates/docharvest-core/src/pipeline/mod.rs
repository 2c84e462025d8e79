//! Run aggregation: drives every input item through
//! resolve → fetch → name → archive on a bounded worker pool, collects
//! outcomes in input order, and reports progress after each item.

mod control;
mod item;
mod progress;
mod run;

pub use control::RunControl;
pub use item::ItemState;
pub use progress::RunProgress;
pub use run::{run_batch, RunOptions};

#[cfg(test)]
mod tests;
