//! Graph-specific error types.

use tlm_core::{CompId, NodeId};

use crate::node::NodeType;
use crate::port::{PortKind, Role};

/// Graph construction and validation errors.
///
/// Ports are reported as `component.port` labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// No component registered under this id.
    UnknownComponent { comp: CompId },

    /// A component with this id is already registered.
    DuplicateComponent { comp: CompId },

    /// The component has no port with this name.
    UnknownPort { component: String, port: String },

    /// The node type has no slot with this name.
    UnknownSlot { node_type: NodeType, slot: String },

    /// A port cannot be connected to itself.
    SelfConnection { port: String },

    /// The two ports already share a node.
    AlreadyConnected { a: String, b: String },

    /// There is no connection between the two ports.
    NotConnected { a: String, b: String },

    /// The ports carry different node types.
    NodeTypeMismatch {
        a: String,
        a_type: NodeType,
        b: String,
        b_type: NodeType,
    },

    /// The port kinds cannot share a node (write-write, power-write).
    KindMismatch {
        a: String,
        a_kind: PortKind,
        b: String,
        b_kind: PortKind,
    },

    /// Two power ports of the same role would share a node.
    RoleConflict {
        role: Role,
        first: String,
        second: String,
    },

    /// Two write ports would share a signal node.
    MultipleWriters { first: String, second: String },

    /// A required port has no connection.
    UnconnectedRequiredPort { component: String, port: String },

    /// Signal components depend on each other in a cycle.
    AlgebraicLoop { components: Vec<String> },

    /// A multi-port connection index is out of range.
    ConnectionIndexOob {
        port: String,
        index: usize,
        len: usize,
    },

    /// A node id was expected to be live.
    StaleNode { node: NodeId },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::UnknownComponent { comp } => {
                write!(f, "Component {} does not exist", comp)
            }
            GraphError::DuplicateComponent { comp } => {
                write!(f, "Component {} is already registered", comp)
            }
            GraphError::UnknownPort { component, port } => {
                write!(f, "Component '{}' has no port '{}'", component, port)
            }
            GraphError::UnknownSlot { node_type, slot } => {
                write!(f, "{} nodes have no slot '{}'", node_type, slot)
            }
            GraphError::SelfConnection { port } => {
                write!(f, "Port {} cannot be connected to itself", port)
            }
            GraphError::AlreadyConnected { a, b } => {
                write!(f, "Ports {} and {} are already connected", a, b)
            }
            GraphError::NotConnected { a, b } => {
                write!(f, "Ports {} and {} are not connected", a, b)
            }
            GraphError::NodeTypeMismatch {
                a,
                a_type,
                b,
                b_type,
            } => {
                write!(
                    f,
                    "Cannot connect {} ({}) to {} ({}): node types differ",
                    a, a_type, b, b_type
                )
            }
            GraphError::KindMismatch {
                a,
                a_kind,
                b,
                b_kind,
            } => {
                write!(
                    f,
                    "Cannot connect {} port {} to {} port {}",
                    a_kind, a, b_kind, b
                )
            }
            GraphError::RoleConflict {
                role,
                first,
                second,
            } => {
                write!(
                    f,
                    "Power ports {} and {} are both {}-type and cannot share a node",
                    first, second, role
                )
            }
            GraphError::MultipleWriters { first, second } => {
                write!(
                    f,
                    "Signal node would have two writers: {} and {}",
                    first, second
                )
            }
            GraphError::UnconnectedRequiredPort { component, port } => {
                write!(
                    f,
                    "Required port '{}' of component '{}' is not connected",
                    port, component
                )
            }
            GraphError::AlgebraicLoop { components } => {
                write!(
                    f,
                    "Algebraic loop between signal components: {}",
                    components.join(", ")
                )
            }
            GraphError::ConnectionIndexOob { port, index, len } => {
                write!(
                    f,
                    "Port {} has {} connections, index {} is out of range",
                    port, len, index
                )
            }
            GraphError::StaleNode { node } => {
                write!(f, "Node {} is not live", node)
            }
        }
    }
}

impl std::error::Error for GraphError {}
