//! Port/connection graph over the node arena.
//!
//! The graph owns the port declarations of every component, the list of
//! connections and the arena holding node slots. Connecting two ports either
//! creates a node, joins one port to the other's node or merges two nodes.
//! Disconnecting re-partitions the ports of the affected node.

use std::collections::{BTreeMap, HashMap};

use tlm_core::{CompId, NodeId};

use crate::arena::NodeArena;
use crate::error::GraphError;
use crate::node::NodeType;
use crate::port::{PortBinding, PortKind, PortRef, PortSpec, Role};
use crate::validate::{self, Member};

#[derive(Debug, Clone)]
struct PortEntry {
    spec: PortSpec,
    nodes: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct ComponentPorts {
    name: String,
    role: Role,
    ports: Vec<PortEntry>,
}

/// A connection between two ports through one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub a: PortRef,
    pub b: PortRef,
    pub node: NodeId,
}

impl Connection {
    pub fn involves(&self, comp: CompId) -> bool {
        self.a.comp == comp || self.b.comp == comp
    }

    fn joins(&self, x: PortRef, y: PortRef) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

#[derive(Debug, Default)]
pub struct Graph {
    arena: NodeArena,
    components: BTreeMap<CompId, ComponentPorts>,
    connections: Vec<Connection>,
    members: HashMap<NodeId, Vec<PortRef>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Register the ports of a component.
    pub fn add_component(
        &mut self,
        comp: CompId,
        name: impl Into<String>,
        role: Role,
        specs: Vec<PortSpec>,
    ) -> Result<(), GraphError> {
        if self.components.contains_key(&comp) {
            return Err(GraphError::DuplicateComponent { comp });
        }
        let ports = specs
            .into_iter()
            .map(|spec| PortEntry {
                spec,
                nodes: Vec::new(),
            })
            .collect();
        self.components.insert(
            comp,
            ComponentPorts {
                name: name.into(),
                role,
                ports,
            },
        );
        Ok(())
    }

    /// Disconnect every port of a component and forget it.
    pub fn remove_component(&mut self, comp: CompId) -> Result<(), GraphError> {
        if !self.components.contains_key(&comp) {
            return Err(GraphError::UnknownComponent { comp });
        }
        while let Some(c) = self.connections.iter().find(|c| c.involves(comp)).copied() {
            self.disconnect(c.a, c.b)?;
        }
        self.components.remove(&comp);
        Ok(())
    }

    pub fn contains_component(&self, comp: CompId) -> bool {
        self.components.contains_key(&comp)
    }

    pub fn component_name(&self, comp: CompId) -> Result<&str, GraphError> {
        Ok(&self.component(comp)?.name)
    }

    pub fn role(&self, comp: CompId) -> Result<Role, GraphError> {
        Ok(self.component(comp)?.role)
    }

    /// Resolve a port by name.
    pub fn port_ref(&self, comp: CompId, port: &str) -> Result<PortRef, GraphError> {
        let c = self.component(comp)?;
        c.ports
            .iter()
            .position(|p| p.spec.name == port)
            .map(|index| PortRef::new(comp, index))
            .ok_or_else(|| GraphError::UnknownPort {
                component: c.name.clone(),
                port: port.to_string(),
            })
    }

    pub fn spec(&self, port: PortRef) -> Result<&PortSpec, GraphError> {
        Ok(&self.entry(port)?.spec)
    }

    /// Nodes bound to a port, in connection order.
    pub fn port_nodes(&self, port: PortRef) -> Result<&[NodeId], GraphError> {
        Ok(&self.entry(port)?.nodes)
    }

    /// Node of connection `index` on a port.
    pub fn port_node(&self, port: PortRef, index: usize) -> Result<NodeId, GraphError> {
        let nodes = self.port_nodes(port)?;
        nodes
            .get(index)
            .copied()
            .ok_or_else(|| GraphError::ConnectionIndexOob {
                port: self.label(port),
                index,
                len: nodes.len(),
            })
    }

    /// Ports sharing a node.
    pub fn node_members(&self, node: NodeId) -> &[PortRef] {
        self.members.get(&node).map_or(&[], Vec::as_slice)
    }

    /// `component.port` label used in messages.
    pub fn label(&self, port: PortRef) -> String {
        match self.components.get(&port.comp) {
            Some(c) => match c.ports.get(port.index) {
                Some(p) => format!("{}.{}", c.name, p.spec.name),
                None => format!("{}.#{}", c.name, port.index),
            },
            None => format!("{}.#{}", port.comp, port.index),
        }
    }

    fn component(&self, comp: CompId) -> Result<&ComponentPorts, GraphError> {
        self.components
            .get(&comp)
            .ok_or(GraphError::UnknownComponent { comp })
    }

    fn entry(&self, port: PortRef) -> Result<&PortEntry, GraphError> {
        let c = self.component(port.comp)?;
        c.ports.get(port.index).ok_or_else(|| GraphError::UnknownPort {
            component: c.name.clone(),
            port: format!("#{}", port.index),
        })
    }

    fn entry_mut(&mut self, port: PortRef) -> Option<&mut PortEntry> {
        self.components
            .get_mut(&port.comp)
            .and_then(|c| c.ports.get_mut(port.index))
    }

    /// Node a port would share when joined: plain ports reuse theirs,
    /// multi-ports always take a fresh one.
    fn joinable_node(entry: &PortEntry) -> Option<NodeId> {
        if entry.spec.multi {
            None
        } else {
            entry.nodes.first().copied()
        }
    }

    /// Connect two ports and return the node they share.
    pub fn connect(&mut self, a: PortRef, b: PortRef) -> Result<NodeId, GraphError> {
        if a == b {
            return Err(GraphError::SelfConnection {
                port: self.label(a),
            });
        }
        let ea = self.entry(a)?;
        let eb = self.entry(b)?;

        if ea.nodes.iter().any(|n| eb.nodes.contains(n)) {
            return Err(GraphError::AlreadyConnected {
                a: self.label(a),
                b: self.label(b),
            });
        }
        if ea.spec.node_type != eb.spec.node_type {
            return Err(GraphError::NodeTypeMismatch {
                a: self.label(a),
                a_type: ea.spec.node_type,
                b: self.label(b),
                b_type: eb.spec.node_type,
            });
        }
        if !validate::kinds_compatible(ea.spec.kind, eb.spec.kind) {
            return Err(GraphError::KindMismatch {
                a: self.label(a),
                a_kind: ea.spec.kind,
                b: self.label(b),
                b_kind: eb.spec.kind,
            });
        }

        let node_type = ea.spec.node_type;
        let a_node = Self::joinable_node(ea);
        let b_node = Self::joinable_node(eb);

        let mut prospective: Vec<PortRef> = Vec::new();
        for (port, node) in [(a, a_node), (b, b_node)] {
            match node {
                Some(n) => prospective.extend_from_slice(self.node_members(n)),
                None => prospective.push(port),
            }
        }
        self.check_members(&prospective)?;

        let node = match (a_node, b_node) {
            (None, None) => {
                let n = self.arena.allocate(node_type);
                self.bind(a, n);
                self.bind(b, n);
                self.members.insert(n, vec![a, b]);
                n
            }
            (Some(n), None) => {
                self.bind(b, n);
                self.members.entry(n).or_default().push(b);
                n
            }
            (None, Some(n)) => {
                self.bind(a, n);
                self.members.entry(n).or_default().push(a);
                n
            }
            (Some(na), Some(nb)) => {
                self.merge(nb, na);
                na
            }
        };

        self.connections.push(Connection { a, b, node });
        Ok(node)
    }

    fn check_members(&self, ports: &[PortRef]) -> Result<(), GraphError> {
        let labels: Vec<String> = ports.iter().map(|p| self.label(*p)).collect();
        let mut members = Vec::with_capacity(ports.len());
        for (port, label) in ports.iter().zip(&labels) {
            members.push(Member {
                label,
                kind: self.entry(*port)?.spec.kind,
                role: self.component(port.comp)?.role,
            });
        }
        validate::check_membership(&members)
    }

    fn bind(&mut self, port: PortRef, node: NodeId) {
        if let Some(e) = self.entry_mut(port) {
            e.nodes.push(node);
        }
    }

    fn rebind(&mut self, port: PortRef, from: NodeId, to: Option<NodeId>) {
        if let Some(e) = self.entry_mut(port) {
            match to {
                Some(to) => {
                    for n in e.nodes.iter_mut().filter(|n| **n == from) {
                        *n = to;
                    }
                }
                None => e.nodes.retain(|n| *n != from),
            }
        }
    }

    /// Move every member of `from` onto `into` and release `from`.
    fn merge(&mut self, from: NodeId, into: NodeId) {
        let moved = self.members.remove(&from).unwrap_or_default();
        for p in &moved {
            self.rebind(*p, from, Some(into));
        }
        self.members.entry(into).or_default().extend(moved);
        for c in self.connections.iter_mut().filter(|c| c.node == from) {
            c.node = into;
        }
        self.arena.release(from);
    }

    /// Remove the connection between two ports.
    ///
    /// The ports of the affected node are regrouped by the connections that
    /// remain; the first group keeps the node, further groups get copies of
    /// it and lone ports become unbound.
    pub fn disconnect(&mut self, a: PortRef, b: PortRef) -> Result<(), GraphError> {
        let pos = self
            .connections
            .iter()
            .position(|c| c.joins(a, b))
            .ok_or_else(|| GraphError::NotConnected {
                a: self.label(a),
                b: self.label(b),
            })?;
        let node = self.connections.remove(pos).node;
        let members = self.members.remove(&node).unwrap_or_default();

        // Union-find over the node's ports using the surviving connections.
        let mut parent: Vec<usize> = (0..members.len()).collect();
        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }
        for c in self.connections.iter().filter(|c| c.node == node) {
            let ia = members.iter().position(|p| *p == c.a);
            let ib = members.iter().position(|p| *p == c.b);
            if let (Some(ia), Some(ib)) = (ia, ib) {
                let (ra, rb) = (find(&mut parent, ia), find(&mut parent, ib));
                if ra != rb {
                    parent[rb] = ra;
                }
            }
        }

        let mut groups: Vec<(usize, Vec<PortRef>)> = Vec::new();
        for (i, port) in members.iter().enumerate() {
            let root = find(&mut parent, i);
            match groups.iter_mut().find(|(r, _)| *r == root) {
                Some((_, g)) => g.push(*port),
                None => groups.push((root, vec![*port])),
            }
        }

        let mut kept = false;
        for (_, group) in groups {
            if group.len() < 2 {
                for p in &group {
                    self.rebind(*p, node, None);
                }
                continue;
            }
            let target = if kept {
                self.arena
                    .allocate_copy(node)
                    .ok_or(GraphError::StaleNode { node })?
            } else {
                kept = true;
                node
            };
            if target != node {
                for p in &group {
                    self.rebind(*p, node, Some(target));
                }
                for c in self
                    .connections
                    .iter_mut()
                    .filter(|c| c.node == node && group.contains(&c.a))
                {
                    c.node = target;
                }
            }
            self.members.insert(target, group);
        }
        if !kept {
            self.arena.release(node);
        }
        Ok(())
    }

    /// Resolved bindings of every port of a component, in declaration order.
    pub fn bindings(&self, comp: CompId) -> Result<Vec<PortBinding>, GraphError> {
        Ok(self
            .component(comp)?
            .ports
            .iter()
            .map(|p| PortBinding {
                node_type: p.spec.node_type,
                nodes: p.nodes.clone(),
            })
            .collect())
    }

    /// Fail on the first required port without a connection.
    pub fn check_required_ports(&self) -> Result<(), GraphError> {
        for c in self.components.values() {
            for p in &c.ports {
                if p.spec.is_required() && p.nodes.is_empty() {
                    return Err(GraphError::UnconnectedRequiredPort {
                        component: c.name.clone(),
                        port: p.spec.name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Writer -> reader edges between signal components sharing a signal node.
    ///
    /// Sorted and deduplicated so schedules built from them are deterministic.
    pub fn signal_dependencies(&self) -> Vec<(CompId, CompId)> {
        let mut edges = Vec::new();
        for (node, ports) in &self.members {
            if self.arena.node_type(*node) != Some(NodeType::Signal) {
                continue;
            }
            let tagged: Vec<(PortRef, PortKind)> = ports
                .iter()
                .filter(|p| {
                    self.components
                        .get(&p.comp)
                        .is_some_and(|c| c.role == Role::Signal)
                })
                .filter_map(|p| self.entry(*p).ok().map(|e| (*p, e.spec.kind)))
                .collect();
            for (w, _) in tagged.iter().filter(|(_, k)| *k == PortKind::Write) {
                for (r, _) in tagged.iter().filter(|(_, k)| *k == PortKind::Read) {
                    edges.push((w.comp, r.comp));
                }
            }
        }
        edges.sort();
        edges.dedup();
        edges
    }

    /// Resolve a slot name against the node type of a port.
    pub fn slot_index(&self, port: PortRef, slot: &str) -> Result<usize, GraphError> {
        let node_type = self.spec(port)?.node_type;
        node_type
            .slot_index(slot)
            .ok_or_else(|| GraphError::UnknownSlot {
                node_type,
                slot: slot.to_string(),
            })
    }
}
