use tlm_core::Unit;
use tlm_graph::{NodeType, Role, mechanical as slot};
use tlm_numerics::TrapezoidIntegrator;

use crate::behavior::Behavior;
use crate::configure::{Configurator, PortIdx};
use crate::context::SimContext;
use crate::parameter::ParamIdx;

/// Imposes a force with zero impedance.
#[derive(Clone, Debug, Default)]
pub struct ForceSource {
    p1: PortIdx,
    force: ParamIdx,
}

impl ForceSource {
    fn publish(&self, ctx: &SimContext<'_>) {
        ctx.write(self.p1, slot::WAVE_VARIABLE, ctx.value(self.force));
        ctx.write(self.p1, slot::CHAR_IMPEDANCE, 0.0);
    }
}

impl Behavior for ForceSource {
    fn role(&self) -> Role {
        Role::C
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.p1 = cfg.power_port("P1", NodeType::Mechanical);
        self.force = cfg.input_variable("F", "Force", Unit::Newton, 0.0);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        self.publish(ctx);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        self.publish(ctx);
    }
}

/// Imposes a velocity; position follows by integration.
///
/// The force is reconstructed from the neighbour's wave, after which the
/// source emits its own wave `c = Zc·v` against the neighbour's impedance.
#[derive(Clone, Debug, Default)]
pub struct VelocitySource {
    p1: PortIdx,
    velocity: ParamIdx,
    integrator: Option<TrapezoidIntegrator>,
}

impl VelocitySource {
    fn publish(&self, ctx: &SimContext<'_>, v: f64, x: f64) {
        let c = ctx.read(self.p1, slot::WAVE_VARIABLE);
        let zc = ctx.read(self.p1, slot::CHAR_IMPEDANCE);
        ctx.write(self.p1, slot::FORCE, c + zc * v);
        ctx.write(self.p1, slot::VELOCITY, v);
        ctx.write(self.p1, slot::POSITION, x);
        ctx.write(self.p1, slot::WAVE_VARIABLE, zc * v);
    }
}

impl Behavior for VelocitySource {
    fn role(&self) -> Role {
        Role::Q
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.p1 = cfg.power_port("P1", NodeType::Mechanical);
        self.velocity = cfg.input_variable("v", "Velocity", Unit::MeterPerSecond, 0.0);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        let v = ctx.value(self.velocity);
        let x = ctx.read(self.p1, slot::POSITION);
        let mut integrator = TrapezoidIntegrator::new(ctx.timestep());
        integrator.initialize_values(v, x);
        self.integrator = Some(integrator);
        self.publish(ctx, v, x);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        let v = ctx.value(self.velocity);
        let Some(integrator) = self.integrator.as_mut() else {
            return;
        };
        let x = integrator.update(v);
        self.publish(ctx, v, x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentModel;
    use crate::testing::Harness;
    use tlm_graph::signal;

    const DT: f64 = 1e-3;

    #[test]
    fn force_source_follows_connected_input() {
        let mut h = Harness::new(ComponentModel::ForceSource(ForceSource::default()), DT);
        h.set_param("F", 50.0);
        h.initialize();
        assert_eq!(h.get("P1", slot::WAVE_VARIABLE), 50.0);
        assert_eq!(h.get("P1", slot::CHAR_IMPEDANCE), 0.0);

        let input = h.connect_optional("F");
        h.arena.set_value(input, signal::VALUE, -7.5);
        h.step();
        assert_eq!(h.get("P1", slot::WAVE_VARIABLE), -7.5);
    }

    #[test]
    fn velocity_source_integrates_position() {
        let mut h = Harness::new(ComponentModel::VelocitySource(VelocitySource::default()), DT);
        h.set_param("v", 2.0);
        h.set("P1", slot::WAVE_VARIABLE, 10.0);
        h.set("P1", slot::CHAR_IMPEDANCE, 4.0);
        h.initialize();
        for _ in 0..500 {
            h.set("P1", slot::WAVE_VARIABLE, 10.0);
            h.step();
        }
        assert!((h.get("P1", slot::POSITION) - 1.0).abs() < 1e-9);
        assert_eq!(h.get("P1", slot::VELOCITY), 2.0);
        assert_eq!(h.get("P1", slot::FORCE), 18.0);
    }

    #[test]
    fn velocity_source_emits_wave_from_neighbour_impedance() {
        let mut h = Harness::new(ComponentModel::VelocitySource(VelocitySource::default()), DT);
        h.set_param("v", 0.5);
        h.set("P1", slot::WAVE_VARIABLE, 10.0);
        h.set("P1", slot::CHAR_IMPEDANCE, 4.0);
        h.initialize();
        assert_eq!(h.get("P1", slot::FORCE), 12.0);
        assert_eq!(h.get("P1", slot::WAVE_VARIABLE), 2.0);

        // The neighbour republishes its wave each step; the impedance moves.
        for zc in [4.0, 6.0, 1.0] {
            h.set("P1", slot::WAVE_VARIABLE, 10.0);
            h.set("P1", slot::CHAR_IMPEDANCE, zc);
            h.step();
            assert_eq!(h.get("P1", slot::FORCE), 10.0 + zc * 0.5);
            assert_eq!(h.get("P1", slot::WAVE_VARIABLE), zc * 0.5);
        }
    }
}
