use tlm_core::Unit;
use tlm_graph::{NodeType, Role, hydraulic as slot};

use crate::behavior::Behavior;
use crate::configure::{Configurator, PortIdx};
use crate::context::SimContext;
use crate::parameter::ParamIdx;

/// Compressible volume between two hydraulic ports.
///
/// `Zc = β_e·T / (V·(1 - α))`. The new wave variable at each end is the
/// other end's `p + Zc·q`, low-pass filtered with the numerical damping `α`.
#[derive(Clone, Debug, Default)]
pub struct HydraulicVolume {
    p1: PortIdx,
    p2: PortIdx,
    volume: ParamIdx,
    bulk_modulus: ParamIdx,
    alpha: ParamIdx,
    c1: f64,
    c2: f64,
    zc: f64,
    alpha_value: f64,
}

impl HydraulicVolume {
    fn publish(&self, ctx: &SimContext<'_>) {
        ctx.write(self.p1, slot::WAVE_VARIABLE, self.c1);
        ctx.write(self.p1, slot::CHAR_IMPEDANCE, self.zc);
        ctx.write(self.p2, slot::WAVE_VARIABLE, self.c2);
        ctx.write(self.p2, slot::CHAR_IMPEDANCE, self.zc);
    }
}

impl Behavior for HydraulicVolume {
    fn role(&self) -> Role {
        Role::C
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.p1 = cfg.power_port("P1", NodeType::Hydraulic);
        self.p2 = cfg.power_port("P2", NodeType::Hydraulic);
        self.volume = cfg.constant("V", "Volume", Unit::CubicMeter, 1e-3);
        self.bulk_modulus = cfg.constant("beta_e", "Bulk modulus", Unit::Pascal, 1e9);
        self.alpha = cfg.constant("alpha", "Low pass coefficient", Unit::Dimensionless, 0.1);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        let v = ctx.value(self.volume);
        let beta = ctx.value(self.bulk_modulus);
        let alpha = ctx.value(self.alpha);
        if v <= 0.0 || beta <= 0.0 {
            ctx.stop_simulation(format!(
                "Volume and bulk modulus must be positive, got V = {v}, beta_e = {beta}"
            ));
            return;
        }
        if !(0.0..1.0).contains(&alpha) {
            ctx.stop_simulation(format!("alpha must lie in [0, 1), got {alpha}"));
            return;
        }

        self.alpha_value = alpha;
        self.zc = beta / v * ctx.timestep() / (1.0 - alpha);
        self.c1 = ctx.read(self.p1, slot::PRESSURE) - self.zc * ctx.read(self.p1, slot::FLOW);
        self.c2 = ctx.read(self.p2, slot::PRESSURE) - self.zc * ctx.read(self.p2, slot::FLOW);
        self.publish(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        let c10 = ctx.read(self.p2, slot::PRESSURE) + self.zc * ctx.read(self.p2, slot::FLOW);
        let c20 = ctx.read(self.p1, slot::PRESSURE) + self.zc * ctx.read(self.p1, slot::FLOW);
        let a = self.alpha_value;
        self.c1 = a * self.c1 + (1.0 - a) * c10;
        self.c2 = a * self.c2 + (1.0 - a) * c20;
        self.publish(ctx);
    }
}
