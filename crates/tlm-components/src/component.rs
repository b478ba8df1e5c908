//! A named instance of a component model.

use tlm_core::SiQuantity;
use tlm_core::units::si_value_as;
use tlm_graph::{NodeArena, PortBinding, PortSpec, Role};

use crate::behavior::Behavior;
use crate::configure::Configurator;
use crate::context::{Clock, SimContext};
use crate::diagnostics::DiagnosticSink;
use crate::error::{ComponentError, ComponentResult};
use crate::model::ComponentModel;
use crate::parameter::{Parameter, ParameterSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Configured,
    Initialized,
    Stepping,
    Finalized,
}

#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    model: ComponentModel,
    ports: Vec<PortSpec>,
    params: ParameterSet,
    bindings: Vec<PortBinding>,
    lifecycle: Lifecycle,
}

impl Component {
    pub fn new(name: impl Into<String>, mut model: ComponentModel) -> Self {
        let mut cfg = Configurator::new();
        model.configure(&mut cfg);
        let (ports, params) = cfg.finish();
        let bindings = ports
            .iter()
            .map(|p| PortBinding::unbound(p.node_type))
            .collect();
        Self {
            name: name.into(),
            model,
            ports,
            params,
            bindings,
            lifecycle: Lifecycle::Configured,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &'static str {
        self.model.type_name()
    }

    pub fn role(&self) -> Role {
        self.model.role()
    }

    pub fn model(&self) -> &ComponentModel {
        &self.model
    }

    pub fn port_specs(&self) -> &[PortSpec] {
        &self.ports
    }

    pub fn port_index(&self, name: &str) -> Option<usize> {
        self.ports.iter().position(|p| p.name == name)
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    pub fn parameter(&self, name: &str) -> ComponentResult<&Parameter> {
        self.params
            .find(name)
            .ok_or_else(|| ComponentError::UnknownParameter {
                component: self.name.clone(),
                name: name.to_string(),
            })
    }

    pub fn set_parameter(&mut self, name: &str, value: f64) -> ComponentResult<()> {
        self.params.set(&self.name, name, value)
    }

    /// Set a parameter from a uom quantity, which must match the declared unit.
    pub fn set_quantity<Q: SiQuantity>(&mut self, name: &str, quantity: Q) -> ComponentResult<()> {
        let unit = self.parameter(name)?.unit;
        let value = si_value_as(quantity, unit, name)?;
        self.set_parameter(name, value)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn bindings(&self) -> &[PortBinding] {
        &self.bindings
    }

    /// Attach resolved port nodes, in declaration order.
    pub fn bind(&mut self, bindings: Vec<PortBinding>) -> ComponentResult<()> {
        if bindings.len() != self.ports.len() {
            return Err(ComponentError::InvalidArg {
                what: "binding count does not match port count",
            });
        }
        self.bindings = bindings;
        Ok(())
    }

    pub fn initialize(&mut self, nodes: &NodeArena, clock: Clock, sink: &dyn DiagnosticSink) {
        let ctx = SimContext::new(
            &self.name,
            nodes,
            &self.bindings,
            &self.params,
            clock,
            sink,
        );
        self.model.initialize(&ctx);
        self.lifecycle = Lifecycle::Initialized;
    }

    #[inline]
    pub fn simulate(&mut self, nodes: &NodeArena, clock: Clock, sink: &dyn DiagnosticSink) {
        debug_assert!(
            matches!(
                self.lifecycle,
                Lifecycle::Initialized | Lifecycle::Stepping
            ),
            "component stepped before initialize"
        );
        let ctx = SimContext::new(
            &self.name,
            nodes,
            &self.bindings,
            &self.params,
            clock,
            sink,
        );
        self.model.simulate_one_timestep(&ctx);
        self.lifecycle = Lifecycle::Stepping;
    }

    pub fn finalize(&mut self) {
        self.model.finalize();
        self.lifecycle = Lifecycle::Finalized;
    }
}
