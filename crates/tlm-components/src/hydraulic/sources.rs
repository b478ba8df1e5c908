use tlm_core::Unit;
use tlm_graph::{NodeType, Role, hydraulic as slot};

use crate::behavior::Behavior;
use crate::configure::{Configurator, PortIdx};
use crate::context::SimContext;
use crate::parameter::ParamIdx;

/// Imposes a pressure with zero impedance.
#[derive(Clone, Debug, Default)]
pub struct PressureSource {
    p1: PortIdx,
    pressure: ParamIdx,
}

impl PressureSource {
    fn publish(&self, ctx: &SimContext<'_>) {
        ctx.write(self.p1, slot::WAVE_VARIABLE, ctx.value(self.pressure));
        ctx.write(self.p1, slot::CHAR_IMPEDANCE, 0.0);
    }
}

impl Behavior for PressureSource {
    fn role(&self) -> Role {
        Role::C
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.p1 = cfg.power_port("P1", NodeType::Hydraulic);
        self.pressure = cfg.input_variable("p", "Pressure", Unit::Pascal, 1e5);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.publish(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        self.publish(ctx);
    }
}

/// Imposes a flow out of the port.
#[derive(Clone, Debug, Default)]
pub struct FlowSource {
    p1: PortIdx,
    flow: ParamIdx,
}

impl FlowSource {
    fn publish(&self, ctx: &SimContext<'_>) {
        let q = ctx.value(self.flow);
        let c = ctx.read(self.p1, slot::WAVE_VARIABLE);
        let zc = ctx.read(self.p1, slot::CHAR_IMPEDANCE);
        ctx.write(self.p1, slot::FLOW, q);
        ctx.write(self.p1, slot::PRESSURE, c + zc * q);
    }
}

impl Behavior for FlowSource {
    fn role(&self) -> Role {
        Role::Q
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.p1 = cfg.power_port("P1", NodeType::Hydraulic);
        self.flow = cfg.input_variable("q", "Flow", Unit::CubicMeterPerSecond, 0.0);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.publish(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        self.publish(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentModel;
    use crate::testing::Harness;

    #[test]
    fn pressure_source_is_stiff() {
        let mut h = Harness::new(ComponentModel::PressureSource(PressureSource::default()), 1e-3);
        h.set_param("p", 2e7);
        h.initialize();
        assert_eq!(h.get("P1", slot::WAVE_VARIABLE), 2e7);
        assert_eq!(h.get("P1", slot::CHAR_IMPEDANCE), 0.0);
    }

    #[test]
    fn flow_source_pressure_follows_impedance() {
        let mut h = Harness::new(ComponentModel::FlowSource(FlowSource::default()), 1e-3);
        h.set_param("q", 1e-4);
        h.set("P1", slot::WAVE_VARIABLE, 1e5);
        h.set("P1", slot::CHAR_IMPEDANCE, 1e9);
        h.initialize();
        h.step();
        assert_eq!(h.get("P1", slot::FLOW), 1e-4);
        assert!((h.get("P1", slot::PRESSURE) - 2e5).abs() < 1e-6);
    }
}
