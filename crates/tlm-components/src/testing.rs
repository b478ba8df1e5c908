//! Single-component harness for unit tests.

use std::sync::Mutex;

use tlm_core::NodeId;
use tlm_graph::NodeArena;

use crate::component::Component;
use crate::context::Clock;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::model::ComponentModel;

#[derive(Default)]
pub(crate) struct RecordingSink {
    records: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.records.lock().unwrap().push(diagnostic);
    }
}

/// One component with a private node on every required port. Tests play the
/// part of the neighbours by writing slots directly.
pub(crate) struct Harness {
    pub arena: NodeArena,
    pub component: Component,
    pub sink: RecordingSink,
    pub clock: Clock,
}

impl Harness {
    pub fn new(model: ComponentModel, timestep: f64) -> Self {
        Self::with_multi(model, timestep, &[])
    }

    /// `multi` gives the connection count of named multi-ports; others get one.
    pub fn with_multi(model: ComponentModel, timestep: f64, multi: &[(&str, usize)]) -> Self {
        let mut component = Component::new("uut", model);
        let mut arena = NodeArena::new();
        let bindings = component
            .port_specs()
            .iter()
            .map(|spec| {
                let count = multi
                    .iter()
                    .find(|(n, _)| *n == spec.name)
                    .map_or(usize::from(spec.is_required()), |(_, c)| *c);
                let mut b = tlm_graph::PortBinding::unbound(spec.node_type);
                b.nodes = (0..count).map(|_| arena.allocate(spec.node_type)).collect();
                b
            })
            .collect();
        component.bind(bindings).unwrap();
        Self {
            arena,
            component,
            sink: RecordingSink::default(),
            clock: Clock::new(0.0, timestep, 0),
        }
    }

    /// Bind a node to an optional port (input or output variable).
    pub fn connect_optional(&mut self, port: &str) -> NodeId {
        let idx = self.component.port_index(port).unwrap();
        let mut bindings = self.component.bindings().to_vec();
        let node = self.arena.allocate(bindings[idx].node_type);
        bindings[idx].nodes.push(node);
        self.component.bind(bindings).unwrap();
        node
    }

    pub fn node_at(&self, port: &str, index: usize) -> NodeId {
        let idx = self.component.port_index(port).unwrap();
        self.component.bindings()[idx].nodes[index]
    }

    pub fn set(&self, port: &str, slot: usize, value: f64) {
        self.set_at(port, 0, slot, value);
    }

    pub fn get(&self, port: &str, slot: usize) -> f64 {
        self.get_at(port, 0, slot)
    }

    pub fn set_at(&self, port: &str, index: usize, slot: usize, value: f64) {
        assert!(self.arena.set_value(self.node_at(port, index), slot, value));
    }

    pub fn get_at(&self, port: &str, index: usize, slot: usize) -> f64 {
        self.arena.value(self.node_at(port, index), slot).unwrap()
    }

    pub fn set_param(&mut self, name: &str, value: f64) {
        self.component.set_parameter(name, value).unwrap();
    }

    pub fn initialize(&mut self) {
        self.clock = Clock::new(0.0, self.clock.timestep, 0);
        self.component.initialize(&self.arena, self.clock, &self.sink);
    }

    pub fn step(&mut self) {
        self.clock = Clock::new(
            (self.clock.step + 1) as f64 * self.clock.timestep,
            self.clock.timestep,
            self.clock.step,
        );
        self.component.simulate(&self.arena, self.clock, &self.sink);
        self.clock.step += 1;
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.sink.records.lock().unwrap().clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}
