//! Local numerical primitives used inside component step functions.
//!
//! Every primitive is discretised for a fixed timestep given at construction.
//! A non-positive timestep, or integrating state that was never seeded, is a
//! programming error and panics.

pub mod error;
pub mod friction;
pub mod integrator;
pub mod transfer_function;

pub use error::{NumericError, NumericResult};
pub use friction::DoubleIntegratorWithDampingAndCoulombFriction;
pub use integrator::{DoubleIntegratorWithDamping, TrapezoidIntegrator};
pub use transfer_function::FirstOrderTransferFunction;
