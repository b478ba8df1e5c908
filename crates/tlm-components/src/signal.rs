//! Signal blocks and sensors.
//!
//! Signal components run before the physical batches, in dependency order,
//! and see the node values published by the previous step.

mod arithmetic;
mod filter;
mod sensor;
mod sources;

pub use arithmetic::{Add, Gain, Subtract};
pub use filter::FirstOrderFilter;
pub use sensor::NodeSensor;
pub use sources::{Constant, Sine, Step};
