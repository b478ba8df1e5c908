use tlm_core::Unit;
use tlm_graph::{NodeType, Role, mechanical as slot};

use crate::behavior::Behavior;
use crate::configure::{Configurator, PortIdx};
use crate::context::SimContext;
use crate::parameter::ParamIdx;

/// Linear spring as a lossless transmission line with one step of delay.
///
/// `Zc = k·T`; each end's wave variable is the opposite end's previous value
/// plus `2·Zc·v` of the opposite end.
#[derive(Clone, Debug, Default)]
pub struct TranslationalSpring {
    p1: PortIdx,
    p2: PortIdx,
    stiffness: ParamIdx,
    c1: f64,
    c2: f64,
    zc: f64,
}

impl TranslationalSpring {
    fn publish(&self, ctx: &SimContext<'_>) {
        ctx.write(self.p1, slot::WAVE_VARIABLE, self.c1);
        ctx.write(self.p1, slot::CHAR_IMPEDANCE, self.zc);
        ctx.write(self.p2, slot::WAVE_VARIABLE, self.c2);
        ctx.write(self.p2, slot::CHAR_IMPEDANCE, self.zc);
    }
}

impl Behavior for TranslationalSpring {
    fn role(&self) -> Role {
        Role::C
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.p1 = cfg.power_port("P1", NodeType::Mechanical);
        self.p2 = cfg.power_port("P2", NodeType::Mechanical);
        self.stiffness = cfg.constant("k", "Spring constant", Unit::NewtonPerMeter, 1000.0);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        let k = ctx.value(self.stiffness);
        if k <= 0.0 {
            ctx.stop_simulation(format!("Spring constant must be positive, got {k}"));
            return;
        }
        self.zc = k * ctx.timestep();
        self.c1 = ctx.read(self.p1, slot::FORCE)
            - self.zc * ctx.read(self.p1, slot::VELOCITY);
        self.c2 = ctx.read(self.p2, slot::FORCE)
            - self.zc * ctx.read(self.p2, slot::VELOCITY);
        self.publish(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        let v1 = ctx.read(self.p1, slot::VELOCITY);
        let v2 = ctx.read(self.p2, slot::VELOCITY);
        let c1 = self.c2 + 2.0 * self.zc * v2;
        let c2 = self.c1 + 2.0 * self.zc * v1;
        self.c1 = c1;
        self.c2 = c2;
        self.publish(ctx);
    }
}
