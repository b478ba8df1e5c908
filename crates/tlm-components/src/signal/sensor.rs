use tlm_core::Unit;
use tlm_graph::{NodeType, Role, hydraulic, mechanical};

use crate::behavior::Behavior;
use crate::configure::{Configurator, PortIdx};
use crate::context::SimContext;
use crate::parameter::ParamIdx;

/// Publishes one slot of a physical node as a signal.
#[derive(Clone, Debug)]
pub struct NodeSensor {
    node_type: NodeType,
    slot: usize,
    unit: Unit,
    input: PortIdx,
    out: ParamIdx,
}

impl NodeSensor {
    fn new(node_type: NodeType, slot: usize, unit: Unit) -> Self {
        Self {
            node_type,
            slot,
            unit,
            input: PortIdx::default(),
            out: ParamIdx::default(),
        }
    }

    pub fn position() -> Self {
        Self::new(NodeType::Mechanical, mechanical::POSITION, Unit::Meter)
    }

    pub fn velocity() -> Self {
        Self::new(NodeType::Mechanical, mechanical::VELOCITY, Unit::MeterPerSecond)
    }

    pub fn force() -> Self {
        Self::new(NodeType::Mechanical, mechanical::FORCE, Unit::Newton)
    }

    pub fn pressure() -> Self {
        Self::new(NodeType::Hydraulic, hydraulic::PRESSURE, Unit::Pascal)
    }

    pub fn flow() -> Self {
        Self::new(NodeType::Hydraulic, hydraulic::FLOW, Unit::CubicMeterPerSecond)
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }
}

impl Behavior for NodeSensor {
    fn role(&self) -> Role {
        Role::Signal
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.input = cfg.read_port("in", self.node_type);
        self.out = cfg.output_variable("out", "Measured value", self.unit);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.simulate_one_timestep(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        ctx.set_output(self.out, ctx.read(self.input, self.slot));
    }
}
