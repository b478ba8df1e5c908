//! Translational mechanics.
//!
//! A Q component reports at each port the velocity and position of that port
//! moving outward, so a body travelling in `+x` has velocity `v` at P2 and
//! `-v` at P1. The force at a port is `f = c + Zc·v`, with `c` and `Zc`
//! supplied by the neighbouring C component.

mod anchor;
mod mass;
mod multiport_mass;
mod sources;
mod spring;
mod wall;

pub use anchor::FixedAnchor;
pub use mass::TranslationalMass;
pub use multiport_mass::MultiPortTranslationalMass;
pub use sources::{ForceSource, VelocitySource};
pub use spring::TranslationalSpring;
pub use wall::FreeLengthWall;
