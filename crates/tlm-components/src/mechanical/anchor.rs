use tlm_core::Unit;
use tlm_graph::{NodeType, Role, mechanical as slot};

use crate::behavior::Behavior;
use crate::configure::{Configurator, PortIdx};
use crate::context::SimContext;
use crate::parameter::ParamIdx;

/// Rigid attachment.
///
/// Presents zero impedance and holds the wave variable at the node force
/// found at initialize, so the force seen by the connected body always equals
/// the wave variable. The node velocity belongs to the body on the other
/// side; the anchor point itself reports its own velocity, always zero, and
/// its reaction force on the optional `v` and `F` outputs.
#[derive(Clone, Debug, Default)]
pub struct FixedAnchor {
    p1: PortIdx,
    velocity: ParamIdx,
    reaction: ParamIdx,
    held: f64,
}

impl FixedAnchor {
    fn publish(&self, ctx: &SimContext<'_>) {
        ctx.write(self.p1, slot::WAVE_VARIABLE, self.held);
        ctx.write(self.p1, slot::CHAR_IMPEDANCE, 0.0);
        ctx.set_output(self.velocity, 0.0);
        ctx.set_output(self.reaction, self.held);
    }
}

impl Behavior for FixedAnchor {
    fn role(&self) -> Role {
        Role::C
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.p1 = cfg.power_port("P1", NodeType::Mechanical);
        self.velocity = cfg.output_variable("v", "Anchor velocity", Unit::MeterPerSecond);
        self.reaction = cfg.output_variable("F", "Reaction force", Unit::Newton);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.held = ctx.read(self.p1, slot::FORCE);
        self.publish(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        self.publish(ctx);
    }
}
