//! Node storage.
//!
//! Nodes live in an arena indexed by [`NodeId`]; a slot is addressed by
//! `(NodeId, slot index)`. Each slot is an atomic cell holding the bits of an
//! `f64`, so components running concurrently in one batch can read and write
//! their own slots through a shared `&NodeArena`. Batches are separated by a
//! full barrier, which is what orders writes against later reads, so relaxed
//! loads and stores are sufficient.

use std::sync::atomic::{AtomicU64, Ordering};

use tlm_core::NodeId;

use crate::node::NodeType;

/// One `f64` slot.
#[derive(Debug)]
pub struct SlotCell(AtomicU64);

impl SlotCell {
    fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    #[inline]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

#[derive(Debug)]
struct NodeData {
    node_type: NodeType,
    slots: Box<[SlotCell]>,
}

impl NodeData {
    fn with_defaults(node_type: NodeType) -> Self {
        let slots = node_type
            .slots()
            .iter()
            .map(|s| SlotCell::new(s.default))
            .collect();
        Self { node_type, slots }
    }
}

/// Slot values of every live node, taken with [`NodeArena::snapshot`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeSnapshot {
    nodes: Vec<(NodeId, NodeType, Vec<f64>)>,
}

impl NodeSnapshot {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Arena of live nodes. Released ids are reused by later allocations.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Option<NodeData>>,
    free: Vec<NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node with the type's default slot values.
    pub fn allocate(&mut self, node_type: NodeType) -> NodeId {
        self.insert(NodeData::with_defaults(node_type))
    }

    /// Allocate a node of the same type as `source`, carrying its values.
    pub fn allocate_copy(&mut self, source: NodeId) -> Option<NodeId> {
        let src = self.data(source)?;
        let data = NodeData {
            node_type: src.node_type,
            slots: src.slots.iter().map(|c| SlotCell::new(c.get())).collect(),
        };
        Some(self.insert(data))
    }

    fn insert(&mut self, data: NodeData) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.slot()] = Some(data);
                id
            }
            None => {
                let id = NodeId::from_index(self.nodes.len() as u32);
                self.nodes.push(Some(data));
                id
            }
        }
    }

    /// Release a node. Returns false if it was not live.
    pub fn release(&mut self, id: NodeId) -> bool {
        match self.nodes.get_mut(id.slot()) {
            Some(entry @ Some(_)) => {
                *entry = None;
                self.free.push(id);
                true
            }
            _ => false,
        }
    }

    #[inline]
    fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.slot()).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.data(id).is_some()
    }

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.data(id).map(|d| d.node_type)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all live nodes in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_some())
            .map(|(i, _)| NodeId::from_index(i as u32))
    }

    #[inline]
    pub fn value(&self, id: NodeId, slot: usize) -> Option<f64> {
        self.data(id)?.slots.get(slot).map(SlotCell::get)
    }

    /// Write a slot. Returns false if the node or slot does not exist.
    #[inline]
    pub fn set_value(&self, id: NodeId, slot: usize, value: f64) -> bool {
        match self.data(id).and_then(|d| d.slots.get(slot)) {
            Some(cell) => {
                cell.set(value);
                true
            }
            None => false,
        }
    }

    /// Snapshot of every slot of a node.
    pub fn values(&self, id: NodeId) -> Option<Vec<f64>> {
        self.data(id)
            .map(|d| d.slots.iter().map(SlotCell::get).collect())
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| {
                let d = n.as_ref()?;
                let values = d.slots.iter().map(SlotCell::get).collect();
                Some((NodeId::from_index(i as u32), d.node_type, values))
            })
            .collect();
        NodeSnapshot { nodes }
    }

    /// Write back a snapshot. Nodes released since, or reused with another
    /// type, are skipped; returns how many nodes were restored.
    pub fn restore(&self, snapshot: &NodeSnapshot) -> usize {
        let mut restored = 0;
        for (id, node_type, values) in &snapshot.nodes {
            let Some(d) = self.data(*id).filter(|d| d.node_type == *node_type) else {
                continue;
            };
            for (cell, v) in d.slots.iter().zip(values) {
                cell.set(*v);
            }
            restored += 1;
        }
        restored
    }

    /// Restore a node's slots to its type's defaults.
    pub fn reset(&self, id: NodeId) {
        if let Some(d) = self.data(id) {
            for (cell, info) in d.slots.iter().zip(d.node_type.slots()) {
                cell.set(info.default);
            }
        }
    }
}
