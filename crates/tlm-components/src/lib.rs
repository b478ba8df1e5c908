//! Component models for transmission-line simulation.
//!
//! Every model implements [`Behavior`]: it declares ports and parameters in
//! `configure`, seeds its state in `initialize` and advances one step at a
//! time through a [`SimContext`]. The built-in catalog is the closed
//! [`ComponentModel`] enum; [`ComponentRegistry`] maps type names to it.
//!
//! ```
//! use tlm_components::ComponentRegistry;
//!
//! let registry = ComponentRegistry::with_standard_library();
//! let mut mass = registry.create("TranslationalMass", "m1").unwrap();
//! mass.set_parameter("m", 20.0).unwrap();
//! assert_eq!(mass.parameter("m").unwrap().value, 20.0);
//! ```

pub mod behavior;
pub mod component;
pub mod configure;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod hydraulic;
pub mod mechanical;
pub mod model;
pub mod parameter;
pub mod registry;
pub mod signal;

#[cfg(test)]
pub(crate) mod testing;

pub use behavior::Behavior;
pub use component::{Component, Lifecycle};
pub use configure::{Configurator, PortIdx};
pub use context::{Clock, SimContext};
pub use diagnostics::{Diagnostic, DiagnosticSink, NullSink, Severity};
pub use error::{ComponentError, ComponentResult};
pub use model::ComponentModel;
pub use parameter::{ParamIdx, Parameter, ParameterKind, ParameterSet};
pub use registry::{ComponentRegistry, RegistryEntry};
