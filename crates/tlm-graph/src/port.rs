//! Port declarations and resolved bindings.

use core::fmt;

use tlm_core::{CompId, NodeId};

use crate::node::NodeType;

/// Scheduling role of a component.
///
/// C components write the wave variable and characteristic impedance of their
/// power nodes; Q components read them and write the physical variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Signal,
    C,
    Q,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Signal => "Signal",
            Role::C => "C",
            Role::Q => "Q",
        })
    }
}

/// How a port exchanges data with its node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Bidirectional physical exchange.
    Power,
    /// Reads a node without writing it.
    Read,
    /// Writes the value of a signal node.
    Write,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PortKind::Power => "power",
            PortKind::Read => "read",
            PortKind::Write => "write",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionPolicy {
    Required,
    Optional,
}

/// Declaration of one port of a component type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortSpec {
    pub name: &'static str,
    pub node_type: NodeType,
    pub kind: PortKind,
    pub policy: ConnectionPolicy,
    /// A multi-port accepts any number of connections, one node each.
    pub multi: bool,
    pub description: &'static str,
}

impl PortSpec {
    /// Required power port.
    pub fn power(name: &'static str, node_type: NodeType) -> Self {
        Self {
            name,
            node_type,
            kind: PortKind::Power,
            policy: ConnectionPolicy::Required,
            multi: false,
            description: "",
        }
    }

    /// Required read port.
    pub fn read(name: &'static str, node_type: NodeType) -> Self {
        Self {
            name,
            node_type,
            kind: PortKind::Read,
            policy: ConnectionPolicy::Required,
            multi: false,
            description: "",
        }
    }

    /// Optional signal write port.
    pub fn write(name: &'static str) -> Self {
        Self {
            name,
            node_type: NodeType::Signal,
            kind: PortKind::Write,
            policy: ConnectionPolicy::Optional,
            multi: false,
            description: "",
        }
    }

    pub fn optional(mut self) -> Self {
        self.policy = ConnectionPolicy::Optional;
        self
    }

    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn is_required(&self) -> bool {
        self.policy == ConnectionPolicy::Required
    }
}

/// Address of a port: owning component and position in its port list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortRef {
    pub comp: CompId,
    pub index: usize,
}

impl PortRef {
    pub fn new(comp: CompId, index: usize) -> Self {
        Self { comp, index }
    }
}

/// Resolved node list of a port, handed to the component at initialize.
///
/// A plain port has zero or one node; a multi-port has one per connection in
/// connection order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortBinding {
    pub node_type: NodeType,
    pub nodes: Vec<NodeId>,
}

impl PortBinding {
    pub fn unbound(node_type: NodeType) -> Self {
        Self {
            node_type,
            nodes: Vec::new(),
        }
    }

    #[inline]
    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        !self.nodes.is_empty()
    }
}
