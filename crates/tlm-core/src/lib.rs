//! tlm-core: shared foundation for the tlmflow kernel.
//!
//! Contains:
//! - units (uom SI types, constructors and the `Unit` tag for parameters)
//! - numeric (Real, tolerances, finite checks, limiting helpers)
//! - ids (compact ids for nodes, components and probes)
//! - error (shared error type)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{TlmError, TlmResult};
pub use ids::*;
pub use numeric::*;
pub use units::{SiQuantity, Unit};
