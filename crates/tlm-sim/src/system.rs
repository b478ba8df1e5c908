//! The simulated system: graph, components and run lifecycle.

use std::collections::HashMap;

use rayon::prelude::*;
use tlm_components::{Clock, Component, ComponentRegistry, Diagnostic};
use tlm_core::{CompId, NodeId, ProbeId, SiQuantity, ensure_finite};
use tlm_graph::{Graph, GraphError, NodeArena, NodeSnapshot, PortRef, Role};

use crate::config::{ConcurrencyMode, SimConfig};
use crate::error::{SimError, SimResult};
use crate::log::DiagnosticLog;
use crate::recorder::Recorder;
use crate::run::{AbortHandle, RunOutcome, RunReport};
use crate::scheduler::{Batch, Schedule};

#[derive(Debug)]
struct Entry {
    id: CompId,
    component: Component,
}

/// A network of components advanced in fixed steps.
///
/// The graph can be edited until `initialize`; afterwards only parameters
/// and node values may change, until `finalize` makes it editable again.
/// Node values set before a run are its start values: after `finalize` the
/// end-of-run values stay readable until the next edit or `initialize`,
/// which puts the start values back.
///
/// ```
/// use tlm_sim::System;
///
/// let mut sys = System::new();
/// let force = sys.add_component("ForceSource", "push").unwrap();
/// let mass = sys.add_component("TranslationalMass", "body").unwrap();
/// let wall = sys.add_component("FixedAnchor", "wall").unwrap();
/// sys.connect(force, "P1", mass, "P1").unwrap();
/// sys.connect(mass, "P2", wall, "P1").unwrap();
/// sys.set_parameter(force, "F", 50.0).unwrap();
///
/// sys.initialize(1e-3, 0.0).unwrap();
/// let report = sys.step_range(100).unwrap();
/// assert!(report.is_complete());
/// assert!(sys.node_value(mass, "P2", "Velocity").unwrap() > 0.0);
/// sys.finalize().unwrap();
/// ```
#[derive(Debug)]
pub struct System {
    registry: ComponentRegistry,
    graph: Graph,
    entries: Vec<Entry>,
    positions: HashMap<CompId, usize>,
    names: HashMap<String, CompId>,
    next_id: u32,
    batches: Vec<Batch>,
    config: SimConfig,
    running: bool,
    time: f64,
    steps: u64,
    log: DiagnosticLog,
    abort: AbortHandle,
    pool: Option<rayon::ThreadPool>,
    recorder: Recorder,
    start_values: Option<NodeSnapshot>,
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

impl System {
    /// Empty system using the built-in component catalog.
    pub fn new() -> Self {
        Self::with_registry(ComponentRegistry::with_standard_library())
    }

    pub fn with_registry(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            graph: Graph::new(),
            entries: Vec::new(),
            positions: HashMap::new(),
            names: HashMap::new(),
            next_id: 0,
            batches: Vec::new(),
            config: SimConfig::default(),
            running: false,
            time: 0.0,
            steps: 0,
            log: DiagnosticLog::new(),
            abort: AbortHandle::default(),
            pool: None,
            recorder: Recorder::default(),
            start_values: None,
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    fn ensure_editable(&self, what: &'static str) -> SimResult<()> {
        if self.running {
            return Err(SimError::RunInProgress { what });
        }
        Ok(())
    }

    fn ensure_running(&self) -> SimResult<()> {
        if !self.running {
            return Err(SimError::NotInitialized);
        }
        Ok(())
    }

    /// Put back the node values the last run started from.
    fn restore_start_values(&mut self) {
        if self.running {
            return;
        }
        if let Some(start) = self.start_values.take() {
            let restored = self.graph.arena().restore(&start);
            tracing::debug!(nodes = restored, "restored start values");
        }
    }

    fn reindex(&mut self) {
        self.positions = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id, i))
            .collect();
    }

    // ---- graph editing ----

    pub fn add_component(&mut self, type_name: &str, name: &str) -> SimResult<CompId> {
        self.ensure_editable("add a component")?;
        if name.is_empty() {
            return Err(SimError::InvalidArg {
                what: "component name must not be empty",
            });
        }
        if self.names.contains_key(name) {
            return Err(SimError::DuplicateName {
                name: name.to_string(),
            });
        }
        let component = self.registry.create(type_name, name)?;
        let id = CompId::from_index(self.next_id);
        self.graph.add_component(
            id,
            name,
            component.role(),
            component.port_specs().to_vec(),
        )?;
        self.next_id += 1;
        self.names.insert(name.to_string(), id);
        self.positions.insert(id, self.entries.len());
        self.entries.push(Entry { id, component });
        tracing::debug!(component = name, type_name, "added component");
        Ok(id)
    }

    /// Disconnect every port of a component and remove it.
    pub fn remove_component(&mut self, comp: CompId) -> SimResult<()> {
        self.ensure_editable("remove a component")?;
        self.restore_start_values();
        let pos = *self
            .positions
            .get(&comp)
            .ok_or(GraphError::UnknownComponent { comp })?;
        self.graph.remove_component(comp)?;
        let entry = self.entries.remove(pos);
        self.names.remove(entry.component.name());
        self.recorder.forget_component(comp);
        self.reindex();
        tracing::debug!(component = entry.component.name(), "removed component");
        Ok(())
    }

    fn port(&self, comp: CompId, port: &str) -> SimResult<PortRef> {
        Ok(self.graph.port_ref(comp, port)?)
    }

    /// Connect two ports, returning the node they now share.
    pub fn connect(
        &mut self,
        a: CompId,
        port_a: &str,
        b: CompId,
        port_b: &str,
    ) -> SimResult<NodeId> {
        self.ensure_editable("connect ports")?;
        self.restore_start_values();
        let (pa, pb) = (self.port(a, port_a)?, self.port(b, port_b)?);
        Ok(self.graph.connect(pa, pb)?)
    }

    pub fn disconnect(&mut self, a: CompId, port_a: &str, b: CompId, port_b: &str) -> SimResult<()> {
        self.ensure_editable("disconnect ports")?;
        self.restore_start_values();
        let (pa, pb) = (self.port(a, port_a)?, self.port(b, port_b)?);
        Ok(self.graph.disconnect(pa, pb)?)
    }

    pub fn component_id(&self, name: &str) -> SimResult<CompId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| SimError::UnknownComponent {
                name: name.to_string(),
            })
    }

    /// Instance names in creation order.
    pub fn component_names(&self) -> Vec<&str> {
        let mut named: Vec<(CompId, &str)> = self
            .entries
            .iter()
            .map(|e| (e.id, e.component.name()))
            .collect();
        named.sort_by_key(|(id, _)| *id);
        named.into_iter().map(|(_, n)| n).collect()
    }

    pub fn component(&self, comp: CompId) -> SimResult<&Component> {
        self.positions
            .get(&comp)
            .and_then(|i| self.entries.get(*i))
            .map(|e| &e.component)
            .ok_or_else(|| GraphError::UnknownComponent { comp }.into())
    }

    fn component_mut(&mut self, comp: CompId) -> SimResult<&mut Component> {
        self.positions
            .get(&comp)
            .and_then(|i| self.entries.get_mut(*i))
            .map(|e| &mut e.component)
            .ok_or_else(|| GraphError::UnknownComponent { comp }.into())
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    // ---- lifecycle ----

    /// Initialize with the current configuration and the given clock.
    pub fn initialize(&mut self, timestep: f64, start_time: f64) -> SimResult<()> {
        let mut config = self.config.clone();
        config.timestep = timestep;
        config.start_time = start_time;
        self.initialize_with(config)
    }

    /// Validate the graph, build the schedule and initialize every component
    /// in schedule order. Fails without starting a run if a component raises
    /// a fatal diagnostic.
    pub fn initialize_with(&mut self, config: SimConfig) -> SimResult<()> {
        self.ensure_editable("initialize")?;
        config.validate()?;
        self.graph.check_required_ports()?;

        let schedule = {
            let listing: Vec<(CompId, Role, &str)> = self
                .entries
                .iter()
                .map(|e| (e.id, e.component.role(), e.component.name()))
                .collect();
            Schedule::build(&listing, &self.graph.signal_dependencies())?
        };
        let rank: HashMap<CompId, usize> = schedule
            .order
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        self.entries
            .sort_by_key(|e| rank.get(&e.id).copied().unwrap_or(usize::MAX));
        self.reindex();
        for e in &mut self.entries {
            e.component.bind(self.graph.bindings(e.id)?)?;
        }
        self.recorder.prepare(&self.graph, config.log_capacity)?;

        self.pool = match config.concurrency {
            ConcurrencyMode::Sequential => None,
            ConcurrencyMode::Parallel => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.thread_pool_size.unwrap_or(0))
                    .build()
                    .map_err(|e| SimError::ThreadPool {
                        message: e.to_string(),
                    })?,
            ),
        };
        tracing::debug!(
            batches = schedule.batches.len(),
            concurrency = ?config.concurrency,
            "schedule built"
        );

        self.restore_start_values();
        self.start_values = Some(self.graph.arena().snapshot());
        self.log.reset();
        self.abort.reset();
        self.time = config.start_time;
        self.steps = 0;
        let clock = Clock::new(config.start_time, config.timestep, 0);
        let nodes = self.graph.arena();
        for e in &mut self.entries {
            e.component.initialize(nodes, clock, &self.log);
        }
        if let Some(fatal) = self.log.first_fatal() {
            self.pool = None;
            return Err(SimError::InitializationFailed {
                component: fatal.component,
                message: fatal.message,
            });
        }

        self.batches = schedule.batches;
        self.config = config;
        self.running = true;
        self.recorder.sample(nodes, self.time);
        tracing::info!(
            components = self.entries.len(),
            timestep = self.config.timestep,
            start_time = self.config.start_time,
            "system initialized"
        );
        Ok(())
    }

    fn stop_reason(&self) -> String {
        self.log
            .first_fatal()
            .map(|d| format!("{}: {}", d.component, d.message))
            .unwrap_or_else(|| "stop requested".to_string())
    }

    /// Advance every component by one step.
    pub fn step_all(&mut self) -> SimResult<()> {
        self.ensure_running()?;
        if self.log.stop_requested() {
            return Err(SimError::Stopped {
                reason: self.stop_reason(),
            });
        }
        self.advance();
        Ok(())
    }

    /// Advance up to `steps` steps, halting early on abort or a stop request.
    pub fn step_range(&mut self, steps: u64) -> SimResult<RunReport> {
        self.ensure_running()?;
        let mut completed = 0;
        let mut outcome = RunOutcome::Completed;
        while completed < steps {
            if self.abort.is_aborted() {
                outcome = RunOutcome::Aborted;
                break;
            }
            if self.log.stop_requested() {
                break;
            }
            self.advance();
            completed += 1;
        }
        if outcome == RunOutcome::Completed && self.log.stop_requested() {
            outcome = RunOutcome::Stopped {
                reason: self.stop_reason(),
            };
        }
        tracing::debug!(requested = steps, completed, outcome = ?outcome, "step range done");
        Ok(RunReport {
            requested_steps: steps,
            completed_steps: completed,
            total_steps: self.steps,
            time: self.time,
            outcome,
        })
    }

    fn advance(&mut self) {
        let dt = self.config.timestep;
        let next = self.steps + 1;
        // Computed from the step count so long runs do not drift.
        let time = self.config.start_time + next as f64 * dt;
        let clock = Clock::new(time, dt, self.steps);
        let nodes = self.graph.arena();
        let log = &self.log;

        for batch in &self.batches {
            let slice = &mut self.entries[batch.range.clone()];
            match &self.pool {
                Some(pool) => pool.install(|| {
                    slice
                        .par_iter_mut()
                        .for_each(|e| e.component.simulate(nodes, clock, log));
                }),
                None => slice
                    .iter_mut()
                    .for_each(|e| e.component.simulate(nodes, clock, log)),
            }
        }

        self.steps = next;
        self.time = time;
        if next % self.config.log_every == 0 {
            self.recorder.sample(nodes, time);
        }
        tracing::trace!(step = next, time, "step");
    }

    /// End the run; the graph becomes editable again.
    pub fn finalize(&mut self) -> SimResult<()> {
        self.ensure_running()?;
        for e in &mut self.entries {
            e.component.finalize();
        }
        self.running = false;
        self.pool = None;
        tracing::info!(steps = self.steps, time = self.time, "system finalized");
        Ok(())
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.running
    }

    /// Time after the last completed step (s).
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn steps_completed(&self) -> u64 {
        self.steps
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Set the configuration used by the next `initialize`.
    pub fn set_config(&mut self, config: SimConfig) -> SimResult<()> {
        self.ensure_editable("change the configuration")?;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Batches of the current schedule, in execution order.
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    // ---- parameters ----

    pub fn parameter(&self, comp: CompId, name: &str) -> SimResult<f64> {
        Ok(self.component(comp)?.parameter(name)?.value)
    }

    /// Takes effect from the next step when a run is in progress.
    pub fn set_parameter(&mut self, comp: CompId, name: &str, value: f64) -> SimResult<()> {
        self.component_mut(comp)?.set_parameter(name, value)?;
        Ok(())
    }

    /// Unit-checked [`System::set_parameter`].
    pub fn set_quantity<Q: SiQuantity>(&mut self, comp: CompId, name: &str, quantity: Q) -> SimResult<()> {
        self.component_mut(comp)?.set_quantity(name, quantity)?;
        Ok(())
    }

    pub fn parameter_names(&self, comp: CompId) -> SimResult<Vec<&'static str>> {
        Ok(self
            .component(comp)?
            .parameters()
            .iter()
            .map(|p| p.name)
            .collect())
    }

    // ---- node values ----

    fn resolve(&self, comp: CompId, port: &str, index: usize, slot: &str) -> SimResult<(NodeId, usize)> {
        let port = self.port(comp, port)?;
        let slot = self.graph.slot_index(port, slot)?;
        let node = self.graph.port_node(port, index)?;
        Ok((node, slot))
    }

    fn arena(&self) -> &NodeArena {
        self.graph.arena()
    }

    pub fn node_value(&self, comp: CompId, port: &str, slot: &str) -> SimResult<f64> {
        self.node_value_at(comp, port, 0, slot)
    }

    /// Slot of the `index`th node of a (multi-)port.
    pub fn node_value_at(&self, comp: CompId, port: &str, index: usize, slot: &str) -> SimResult<f64> {
        let (node, slot) = self.resolve(comp, port, index, slot)?;
        self.arena()
            .value(node, slot)
            .ok_or_else(|| GraphError::StaleNode { node }.into())
    }

    pub fn set_node_value(&mut self, comp: CompId, port: &str, slot: &str, value: f64) -> SimResult<()> {
        self.set_node_value_at(comp, port, 0, slot, value)
    }

    /// Overwrite a slot, typically a start value before `initialize`.
    pub fn set_node_value_at(
        &mut self,
        comp: CompId,
        port: &str,
        index: usize,
        slot: &str,
        value: f64,
    ) -> SimResult<()> {
        let value = ensure_finite(value, slot)?;
        let (node, slot) = self.resolve(comp, port, index, slot)?;
        self.restore_start_values();
        if !self.arena().set_value(node, slot, value) {
            return Err(GraphError::StaleNode { node }.into());
        }
        Ok(())
    }

    // ---- diagnostics ----

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.log.records()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.log.take()
    }

    // ---- recording ----

    /// Record a slot of the first node of a port every `log_every` steps.
    pub fn add_probe(&mut self, comp: CompId, port: &str, slot: &str) -> SimResult<ProbeId> {
        self.ensure_editable("add a probe")?;
        let port = self.port(comp, port)?;
        let slot = self.graph.slot_index(port, slot)?;
        Ok(self.recorder.add(port, slot))
    }

    pub fn trace(&self, probe: ProbeId) -> SimResult<&[f64]> {
        self.recorder
            .trace(probe)
            .ok_or(SimError::UnknownProbe { probe })
    }

    /// Sample times shared by every probe.
    pub fn trace_times(&self) -> &[f64] {
        self.recorder.times()
    }
}
