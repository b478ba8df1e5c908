//! Per-call view a component gets of its nodes, parameters and clock.

use tlm_graph::{NodeArena, PortBinding, signal};

use crate::configure::PortIdx;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Severity};
use crate::parameter::{ParamIdx, ParameterKind, ParameterSet};

/// Simulation clock as seen by a component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clock {
    /// Time at the end of the step being computed.
    pub time: f64,
    pub timestep: f64,
    /// Steps completed before this one.
    pub step: u64,
}

impl Clock {
    pub fn new(time: f64, timestep: f64, step: u64) -> Self {
        Self {
            time,
            timestep,
            step,
        }
    }
}

/// Access to the nodes bound to one component.
///
/// Writes go through shared atomic slots; the schedule guarantees a component
/// only writes the slots its role owns while others in the batch do the same.
pub struct SimContext<'a> {
    component: &'a str,
    nodes: &'a NodeArena,
    ports: &'a [PortBinding],
    params: &'a ParameterSet,
    clock: Clock,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> SimContext<'a> {
    pub fn new(
        component: &'a str,
        nodes: &'a NodeArena,
        ports: &'a [PortBinding],
        params: &'a ParameterSet,
        clock: Clock,
        sink: &'a dyn DiagnosticSink,
    ) -> Self {
        Self {
            component,
            nodes,
            ports,
            params,
            clock,
            sink,
        }
    }

    pub fn component(&self) -> &str {
        self.component
    }

    /// Slot of the first node of a port, or the slot default when open.
    #[inline]
    pub fn read(&self, port: PortIdx, slot: usize) -> f64 {
        self.read_at(port, 0, slot)
    }

    #[inline]
    pub fn write(&self, port: PortIdx, slot: usize, value: f64) {
        self.write_at(port, 0, slot, value);
    }

    /// Number of nodes bound to a port.
    #[inline]
    pub fn connection_count(&self, port: PortIdx) -> usize {
        self.ports.get(port.0).map_or(0, |b| b.nodes.len())
    }

    #[inline]
    pub fn is_connected(&self, port: PortIdx) -> bool {
        self.connection_count(port) > 0
    }

    /// Slot of the `index`th node of a multi-port.
    #[inline]
    pub fn read_at(&self, port: PortIdx, index: usize, slot: usize) -> f64 {
        let Some(binding) = self.ports.get(port.0) else {
            return 0.0;
        };
        binding
            .nodes
            .get(index)
            .and_then(|n| self.nodes.value(*n, slot))
            .unwrap_or_else(|| binding.node_type.default_value(slot))
    }

    /// Writes to an open port are dropped.
    #[inline]
    pub fn write_at(&self, port: PortIdx, index: usize, slot: usize, value: f64) {
        if let Some(node) = self.ports.get(port.0).and_then(|b| b.nodes.get(index)) {
            self.nodes.set_value(*node, slot, value);
        }
    }

    /// Current value of a constant or input variable.
    #[inline]
    pub fn value(&self, param: ParamIdx) -> f64 {
        match self.params.get(param) {
            Some(p) => match p.kind {
                ParameterKind::Input { port } if self.is_connected(PortIdx(port)) => {
                    self.read(PortIdx(port), signal::VALUE)
                }
                _ => p.value,
            },
            None => 0.0,
        }
    }

    /// Publish an output variable on its signal port.
    #[inline]
    pub fn set_output(&self, param: ParamIdx, value: f64) {
        if let Some(p) = self.params.get(param)
            && let ParameterKind::Output { port } = p.kind
        {
            self.write(PortIdx(port), signal::VALUE, value);
        }
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.clock.time
    }

    #[inline]
    pub fn timestep(&self) -> f64 {
        self.clock.timestep
    }

    #[inline]
    pub fn step(&self) -> u64 {
        self.clock.step
    }

    fn emit(&self, severity: Severity, message: String) {
        self.sink.emit(Diagnostic {
            severity,
            component: self.component.to_string(),
            step: self.clock.step,
            time: self.clock.time,
            message,
        });
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.emit(Severity::Debug, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(Severity::Info, message.into());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(Severity::Warning, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(Severity::Error, message.into());
    }

    /// Raise a fatal diagnostic; the run halts at the next step boundary.
    pub fn stop_simulation(&self, message: impl Into<String>) {
        self.emit(Severity::Fatal, message.into());
    }
}
