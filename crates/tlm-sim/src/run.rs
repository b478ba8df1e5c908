//! Run control: abort handle and step reports.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Cloneable flag that asks a running `step_range` to halt at the next step
/// boundary. Safe to trigger from any thread.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every requested step ran.
    Completed,
    /// The abort handle fired.
    Aborted,
    /// A component raised a fatal diagnostic.
    Stopped { reason: String },
}

/// Result of `System::step_range`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub requested_steps: u64,
    pub completed_steps: u64,
    /// Steps completed since initialize.
    pub total_steps: u64,
    /// Simulation time after the last completed step (s).
    pub time: f64,
    pub outcome: RunOutcome,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }
}
