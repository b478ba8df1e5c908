//! Run configuration.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// How components inside one batch are executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// In schedule order on the calling thread.
    #[default]
    Sequential,
    /// On a rayon pool built for the run.
    Parallel,
}

/// Settings for one run, fixed at initialize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed step (s).
    pub timestep: f64,
    /// Time at initialize (s).
    pub start_time: f64,
    pub concurrency: ConcurrencyMode,
    /// Worker threads for parallel runs; `None` lets rayon decide.
    pub thread_pool_size: Option<usize>,
    /// Record probes every N-th step.
    pub log_every: u64,
    /// Samples kept per probe, including the initial one.
    pub log_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timestep: 1e-3,
            start_time: 0.0,
            concurrency: ConcurrencyMode::Sequential,
            thread_pool_size: None,
            log_every: 1,
            log_capacity: 10_000,
        }
    }
}

impl SimConfig {
    pub fn new(timestep: f64) -> Self {
        Self {
            timestep,
            ..Self::default()
        }
    }

    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.concurrency = ConcurrencyMode::Sequential;
        self
    }

    /// Parallel batches on `threads` workers (`None` = rayon default).
    pub fn parallel(mut self, threads: Option<usize>) -> Self {
        self.concurrency = ConcurrencyMode::Parallel;
        self.thread_pool_size = threads;
        self
    }

    pub fn with_log_every(mut self, every: u64) -> Self {
        self.log_every = every;
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.timestep.is_finite() && self.timestep > 0.0) {
            return Err(SimError::InvalidConfig {
                what: "timestep must be positive and finite",
            });
        }
        if !self.start_time.is_finite() {
            return Err(SimError::InvalidConfig {
                what: "start_time must be finite",
            });
        }
        if self.log_every == 0 {
            return Err(SimError::InvalidConfig {
                what: "log_every must be at least 1",
            });
        }
        if self.thread_pool_size == Some(0) {
            return Err(SimError::InvalidConfig {
                what: "thread_pool_size must be at least 1",
            });
        }
        Ok(())
    }
}
