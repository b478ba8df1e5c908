//! Probe recording.

use tlm_core::{CompId, NodeId, ProbeId};
use tlm_graph::{Graph, GraphError, NodeArena, PortRef};

#[derive(Debug, Clone)]
struct Probe {
    port: PortRef,
    slot: usize,
    /// Cleared when the owning component is removed.
    live: bool,
    node: Option<NodeId>,
    samples: Vec<f64>,
}

/// Samples node slots into buffers sized at initialize.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    probes: Vec<Probe>,
    times: Vec<f64>,
    capacity: usize,
}

impl Recorder {
    pub fn add(&mut self, port: PortRef, slot: usize) -> ProbeId {
        self.probes.push(Probe {
            port,
            slot,
            live: true,
            node: None,
            samples: Vec::new(),
        });
        ProbeId::from_index((self.probes.len() - 1) as u32)
    }

    /// Retire the probes of a removed component; other ids stay valid.
    pub fn forget_component(&mut self, comp: CompId) {
        for p in self.probes.iter_mut().filter(|p| p.port.comp == comp) {
            p.live = false;
            p.node = None;
            p.samples = Vec::new();
        }
    }

    /// Resolve probe nodes and reserve sample buffers.
    pub fn prepare(&mut self, graph: &Graph, capacity: usize) -> Result<(), GraphError> {
        self.capacity = capacity;
        self.times = Vec::with_capacity(capacity);
        for p in self.probes.iter_mut().filter(|p| p.live) {
            p.samples = Vec::with_capacity(capacity);
            p.node = Some(graph.port_node(p.port, 0)?);
        }
        Ok(())
    }

    /// Record every live probe. Returns false once the buffers are full.
    pub fn sample(&mut self, arena: &NodeArena, time: f64) -> bool {
        if self.times.len() >= self.capacity {
            return false;
        }
        self.times.push(time);
        for p in &mut self.probes {
            if let Some(node) = p.node {
                p.samples.push(arena.value(node, p.slot).unwrap_or(f64::NAN));
            }
        }
        true
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn trace(&self, probe: ProbeId) -> Option<&[f64]> {
        self.probes
            .get(probe.slot())
            .filter(|p| p.live)
            .map(|p| p.samples.as_slice())
    }
}
