//! Fixed-step co-simulation of transmission-line component networks.
//!
//! A [`System`] owns the component graph and drives the run lifecycle:
//! edit, `initialize`, step, `finalize`. Each step executes signal
//! components level by level, then every C component, then every Q
//! component; the components within one batch are independent and may run
//! on a rayon pool.

pub mod config;
pub mod error;
pub mod log;
pub mod recorder;
pub mod run;
pub mod scheduler;
pub mod system;

pub use config::{ConcurrencyMode, SimConfig};
pub use error::{SimError, SimResult};
pub use log::DiagnosticLog;
pub use recorder::Recorder;
pub use run::{AbortHandle, RunOutcome, RunReport};
pub use scheduler::{Batch, Schedule};
pub use system::System;
