//! Hydraulics.
//!
//! Flow at a port is positive out of the Q component and into the C
//! component that shares the node. Pressure follows `p = c + Zc·q`.

mod orifice;
mod sources;
mod volume;

pub use orifice::LaminarOrifice;
pub use sources::{FlowSource, PressureSource};
pub use volume::HydraulicVolume;
