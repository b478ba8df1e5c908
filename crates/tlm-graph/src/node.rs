//! Node types and their slot tables.
//!
//! A node type fixes the number, order and meaning of the `f64` slots every
//! node of that type carries. Components address slots by the index
//! constants in [`mechanical`], [`hydraulic`] and [`signal`].

use core::fmt;

use tlm_core::Unit;

/// Physical domain of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Mechanical,
    Hydraulic,
    Signal,
}

/// Static description of one slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotInfo {
    pub name: &'static str,
    pub unit: Unit,
    pub default: f64,
}

pub mod mechanical {
    pub const FORCE: usize = 0;
    pub const VELOCITY: usize = 1;
    pub const POSITION: usize = 2;
    pub const WAVE_VARIABLE: usize = 3;
    pub const CHAR_IMPEDANCE: usize = 4;
    pub const EQUIVALENT_MASS: usize = 5;
}

pub mod hydraulic {
    pub const FLOW: usize = 0;
    pub const PRESSURE: usize = 1;
    pub const WAVE_VARIABLE: usize = 2;
    pub const CHAR_IMPEDANCE: usize = 3;
}

pub mod signal {
    pub const VALUE: usize = 0;
}

const MECHANICAL_SLOTS: [SlotInfo; 6] = [
    SlotInfo {
        name: "Force",
        unit: Unit::Newton,
        default: 0.0,
    },
    SlotInfo {
        name: "Velocity",
        unit: Unit::MeterPerSecond,
        default: 0.0,
    },
    SlotInfo {
        name: "Position",
        unit: Unit::Meter,
        default: 0.0,
    },
    SlotInfo {
        name: "WaveVariable",
        unit: Unit::Newton,
        default: 0.0,
    },
    SlotInfo {
        name: "CharImpedance",
        unit: Unit::NewtonSecondPerMeter,
        default: 0.0,
    },
    SlotInfo {
        name: "EquivalentMass",
        unit: Unit::Kilogram,
        default: 1.0,
    },
];

const HYDRAULIC_SLOTS: [SlotInfo; 4] = [
    SlotInfo {
        name: "Flow",
        unit: Unit::CubicMeterPerSecond,
        default: 0.0,
    },
    SlotInfo {
        name: "Pressure",
        unit: Unit::Pascal,
        default: 1e5,
    },
    SlotInfo {
        name: "WaveVariable",
        unit: Unit::Pascal,
        default: 1e5,
    },
    SlotInfo {
        name: "CharImpedance",
        unit: Unit::PascalSecondPerCubicMeter,
        default: 0.0,
    },
];

const SIGNAL_SLOTS: [SlotInfo; 1] = [SlotInfo {
    name: "Value",
    unit: Unit::Dimensionless,
    default: 0.0,
}];

impl NodeType {
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Mechanical => "Mechanical",
            NodeType::Hydraulic => "Hydraulic",
            NodeType::Signal => "Signal",
        }
    }

    pub fn slots(self) -> &'static [SlotInfo] {
        match self {
            NodeType::Mechanical => &MECHANICAL_SLOTS,
            NodeType::Hydraulic => &HYDRAULIC_SLOTS,
            NodeType::Signal => &SIGNAL_SLOTS,
        }
    }

    #[inline]
    pub fn slot_count(self) -> usize {
        self.slots().len()
    }

    /// Look up a slot index by its exact name.
    pub fn slot_index(self, name: &str) -> Option<usize> {
        self.slots().iter().position(|s| s.name == name)
    }

    /// Default value of `slot`, or 0.0 for an out-of-range index.
    #[inline]
    pub fn default_value(self, slot: usize) -> f64 {
        self.slots().get(slot).map_or(0.0, |s| s.default)
    }

    /// Power nodes carry a wave variable and characteristic impedance.
    pub fn is_power(self) -> bool {
        !matches!(self, NodeType::Signal)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_constants_match_tables() {
        let mech = NodeType::Mechanical;
        assert_eq!(mech.slot_index("Force"), Some(mechanical::FORCE));
        assert_eq!(mech.slot_index("Velocity"), Some(mechanical::VELOCITY));
        assert_eq!(mech.slot_index("Position"), Some(mechanical::POSITION));
        assert_eq!(
            mech.slot_index("WaveVariable"),
            Some(mechanical::WAVE_VARIABLE)
        );
        assert_eq!(
            mech.slot_index("CharImpedance"),
            Some(mechanical::CHAR_IMPEDANCE)
        );
        assert_eq!(
            mech.slot_index("EquivalentMass"),
            Some(mechanical::EQUIVALENT_MASS)
        );

        let hyd = NodeType::Hydraulic;
        assert_eq!(hyd.slot_index("Flow"), Some(hydraulic::FLOW));
        assert_eq!(hyd.slot_index("Pressure"), Some(hydraulic::PRESSURE));
        assert_eq!(hyd.slot_index("WaveVariable"), Some(hydraulic::WAVE_VARIABLE));
        assert_eq!(
            hyd.slot_index("CharImpedance"),
            Some(hydraulic::CHAR_IMPEDANCE)
        );

        assert_eq!(NodeType::Signal.slot_index("Value"), Some(signal::VALUE));
    }

    #[test]
    fn slot_lookup_is_case_sensitive() {
        assert_eq!(NodeType::Mechanical.slot_index("force"), None);
    }

    #[test]
    fn defaults() {
        assert_eq!(
            NodeType::Mechanical.default_value(mechanical::EQUIVALENT_MASS),
            1.0
        );
        assert_eq!(NodeType::Hydraulic.default_value(hydraulic::PRESSURE), 1e5);
        assert_eq!(NodeType::Signal.default_value(99), 0.0);
        assert!(!NodeType::Signal.is_power());
    }
}
