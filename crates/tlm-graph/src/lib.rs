//! tlm-graph: node, port and connection layer for tlmflow.
//!
//! Provides:
//! - Node types with fixed slot tables
//! - The node arena (slot storage shared by connected ports)
//! - Port declarations, roles and resolved bindings
//! - The connection graph with merge/split and validation
//!
//! # Example
//!
//! ```
//! use tlm_core::CompId;
//! use tlm_graph::{Graph, NodeType, PortSpec, Role};
//!
//! let mut graph = Graph::new();
//! let spring = CompId::from_index(0);
//! let mass = CompId::from_index(1);
//! graph
//!     .add_component(spring, "spring", Role::C, vec![PortSpec::power("P1", NodeType::Mechanical)])
//!     .unwrap();
//! graph
//!     .add_component(mass, "mass", Role::Q, vec![PortSpec::power("P1", NodeType::Mechanical)])
//!     .unwrap();
//!
//! let a = graph.port_ref(spring, "P1").unwrap();
//! let b = graph.port_ref(mass, "P1").unwrap();
//! let node = graph.connect(a, b).unwrap();
//!
//! assert_eq!(graph.arena().node_type(node), Some(NodeType::Mechanical));
//! assert!(graph.check_required_ports().is_ok());
//! ```

pub mod arena;
pub mod error;
pub mod graph;
pub mod node;
pub mod port;
pub(crate) mod validate;

pub use arena::{NodeArena, NodeSnapshot, SlotCell};
pub use error::GraphError;
pub use graph::{Connection, Graph};
pub use node::{NodeType, SlotInfo, hydraulic, mechanical, signal};
pub use port::{ConnectionPolicy, PortBinding, PortKind, PortRef, PortSpec, Role};
