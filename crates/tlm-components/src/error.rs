//! Error types for component construction and parameter access.

use thiserror::Error;
use tlm_core::TlmError;

/// Errors raised by the component catalog and parameter interface.
///
/// Runtime faults inside a step are not errors; they are reported as
/// diagnostics and may request a stop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Unknown component type '{name}'")]
    UnknownType { name: String },

    #[error("Component type '{name}' is already registered")]
    DuplicateType { name: String },

    #[error("Component '{component}' has no parameter '{name}'")]
    UnknownParameter { component: String, name: String },

    #[error("Parameter '{name}' of '{component}' is an output and cannot be set")]
    ReadOnlyParameter { component: String, name: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Core(#[from] TlmError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;
