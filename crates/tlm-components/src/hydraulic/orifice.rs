use tlm_core::Unit;
use tlm_graph::{NodeType, Role, hydraulic as slot};

use crate::behavior::Behavior;
use crate::configure::{Configurator, PortIdx};
use crate::context::SimContext;
use crate::parameter::ParamIdx;

/// Orifice with flow proportional to the pressure drop.
///
/// `q2 = K_c·(c1 - c2) / (1 + K_c·(Zc1 + Zc2))`, `q1 = -q2`. Port pressures
/// below zero are clamped to zero (cavitation); the flow is left as computed.
#[derive(Clone, Debug, Default)]
pub struct LaminarOrifice {
    p1: PortIdx,
    p2: PortIdx,
    coefficient: ParamIdx,
    cavitating: bool,
}

impl LaminarOrifice {
    fn solve(&mut self, ctx: &SimContext<'_>) {
        let kc = ctx.value(self.coefficient);
        let c1 = ctx.read(self.p1, slot::WAVE_VARIABLE);
        let zc1 = ctx.read(self.p1, slot::CHAR_IMPEDANCE);
        let c2 = ctx.read(self.p2, slot::WAVE_VARIABLE);
        let zc2 = ctx.read(self.p2, slot::CHAR_IMPEDANCE);

        let q2 = kc * (c1 - c2) / (1.0 + kc * (zc1 + zc2));
        let q1 = -q2;
        let mut p1 = c1 + zc1 * q1;
        let mut p2 = c2 + zc2 * q2;

        let cavitating = p1 < 0.0 || p2 < 0.0;
        if cavitating {
            p1 = p1.max(0.0);
            p2 = p2.max(0.0);
            if !self.cavitating {
                ctx.debug("Cavitation, pressure clamped to zero");
            }
        }
        self.cavitating = cavitating;

        ctx.write(self.p1, slot::FLOW, q1);
        ctx.write(self.p1, slot::PRESSURE, p1);
        ctx.write(self.p2, slot::FLOW, q2);
        ctx.write(self.p2, slot::PRESSURE, p2);
    }
}

impl Behavior for LaminarOrifice {
    fn role(&self) -> Role {
        Role::Q
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.p1 = cfg.power_port("P1", NodeType::Hydraulic);
        self.p2 = cfg.power_port("P2", NodeType::Hydraulic);
        self.coefficient = cfg.input_variable(
            "K_c",
            "Flow-pressure coefficient",
            Unit::CubicMeterPerSecondPascal,
            1e-11,
        );
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.cavitating = false;
        self.solve(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        self.solve(ctx);
    }
}
