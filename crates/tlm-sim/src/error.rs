//! Error types for building and running a system.

use thiserror::Error;
use tlm_components::ComponentError;
use tlm_core::{ProbeId, TlmError};
use tlm_graph::GraphError;

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    Core(#[from] TlmError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: &'static str },

    #[error("Unknown component '{name}'")]
    UnknownComponent { name: String },

    #[error("Component name '{name}' is already in use")]
    DuplicateName { name: String },

    #[error("System is not initialized")]
    NotInitialized,

    #[error("Cannot {what} while a run is in progress")]
    RunInProgress { what: &'static str },

    #[error("Initialization of '{component}' failed: {message}")]
    InitializationFailed { component: String, message: String },

    #[error("Simulation stopped: {reason}")]
    Stopped { reason: String },

    #[error("Unknown probe {probe}")]
    UnknownProbe { probe: ProbeId },

    #[error("Thread pool: {message}")]
    ThreadPool { message: String },
}

pub type SimResult<T> = Result<T, SimError>;
