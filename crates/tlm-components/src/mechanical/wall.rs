use tlm_core::Unit;
use tlm_graph::{NodeType, Role, mechanical as slot};
use tlm_numerics::FirstOrderTransferFunction;

use crate::behavior::Behavior;
use crate::configure::{Configurator, PortIdx};
use crate::context::SimContext;
use crate::parameter::ParamIdx;

/// Free body on one port that comes to rest against a wall at `x_stop`.
///
/// Velocity follows `v = -c / (m_e·s + B + Zc)`, position integrates `v`.
/// On reaching the wall both are clamped and the filters reseeded, so the
/// body stays there until the wave variable pulls it away.
#[derive(Clone, Debug, Default)]
pub struct FreeLengthWall {
    p1: PortIdx,
    mass: ParamIdx,
    viscous: ParamIdx,
    x_stop: ParamIdx,
    velocity: Option<FirstOrderTransferFunction>,
    position: Option<FirstOrderTransferFunction>,
}

impl FreeLengthWall {
    fn publish(&self, ctx: &SimContext<'_>, c: f64, zc: f64, v: f64, x: f64) {
        ctx.write(self.p1, slot::FORCE, c + zc * v);
        ctx.write(self.p1, slot::VELOCITY, v);
        ctx.write(self.p1, slot::POSITION, x);
        ctx.write(self.p1, slot::EQUIVALENT_MASS, ctx.value(self.mass));
    }
}

impl Behavior for FreeLengthWall {
    fn role(&self) -> Role {
        Role::Q
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.p1 = cfg.power_port("P1", NodeType::Mechanical);
        self.mass = cfg.constant("m_e", "Equivalent mass", Unit::Kilogram, 1.0);
        self.viscous = cfg.constant(
            "B",
            "Viscous friction coefficient",
            Unit::NewtonSecondPerMeter,
            0.001,
        );
        self.x_stop = cfg.constant("x_stop", "Wall position", Unit::Meter, 0.0);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        let m = ctx.value(self.mass);
        if m <= 0.0 {
            ctx.stop_simulation(format!("Equivalent mass must be positive, got {m}"));
            return;
        }
        let c = ctx.read(self.p1, slot::WAVE_VARIABLE);
        let zc = ctx.read(self.p1, slot::CHAR_IMPEDANCE);
        let x_stop = ctx.value(self.x_stop);
        let mut v = ctx.read(self.p1, slot::VELOCITY);
        let mut x = ctx.read(self.p1, slot::POSITION);
        if x <= x_stop {
            x = x_stop;
            v = 0.0;
        }

        let dt = ctx.timestep();
        let b = ctx.value(self.viscous);
        let mut velocity = FirstOrderTransferFunction::new([0.0, 1.0], [m, b + zc], dt);
        velocity.initialize_values(-c, v);
        let mut position = FirstOrderTransferFunction::new([0.0, 1.0], [1.0, 0.0], dt);
        position.initialize_values(v, x);
        self.velocity = Some(velocity);
        self.position = Some(position);
        self.publish(ctx, c, zc, v, x);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        let c = ctx.read(self.p1, slot::WAVE_VARIABLE);
        let zc = ctx.read(self.p1, slot::CHAR_IMPEDANCE);
        let m = ctx.value(self.mass);
        let b = ctx.value(self.viscous);
        let x_stop = ctx.value(self.x_stop);
        let (Some(velocity), Some(position)) = (self.velocity.as_mut(), self.position.as_mut())
        else {
            return;
        };

        velocity.set_denominator([m, b + zc]);
        let mut v = velocity.update(-c);
        let mut x = position.update(v);
        if x <= x_stop {
            x = x_stop;
            v = 0.0;
            velocity.initialize_values(0.0, 0.0);
            position.initialize_values(0.0, x_stop);
        }

        self.publish(ctx, c, zc, v, x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentModel;
    use crate::testing::Harness;

    const DT: f64 = 1e-3;

    fn harness() -> Harness {
        Harness::new(ComponentModel::FreeLengthWall(FreeLengthWall::default()), DT)
    }

    #[test]
    fn crossing_step_clamps_exactly() {
        let mut h = harness();
        h.set("P1", slot::POSITION, 0.01);
        h.set("P1", slot::CHAR_IMPEDANCE, 2.0);
        h.initialize();
        h.set("P1", slot::WAVE_VARIABLE, 100.0);

        let mut prev_force = h.get("P1", slot::FORCE);
        let mut prev_v = h.get("P1", slot::VELOCITY);
        let mut crossed = false;
        for _ in 0..1000 {
            h.step();
            let x = h.get("P1", slot::POSITION);
            let v = h.get("P1", slot::VELOCITY);
            let f = h.get("P1", slot::FORCE);
            assert!(x >= 0.0);
            if x == 0.0 && !crossed {
                crossed = true;
                assert_eq!(v, 0.0);
                // Only the impedance term of the previous step disappears.
                assert!((f - prev_force).abs() <= 2.0 * prev_v.abs() + 1e-9);
            }
            prev_force = f;
            prev_v = v;
        }
        assert!(crossed);
        assert_eq!(h.get("P1", slot::POSITION), 0.0);
        assert_eq!(h.get("P1", slot::VELOCITY), 0.0);
        assert_eq!(h.get("P1", slot::FORCE), 100.0);
    }

    #[test]
    fn pulling_wave_lifts_body_off_the_wall() {
        let mut h = harness();
        h.initialize();
        assert_eq!(h.get("P1", slot::POSITION), 0.0);
        h.set("P1", slot::WAVE_VARIABLE, -10.0);
        for _ in 0..10 {
            h.step();
        }
        assert!(h.get("P1", slot::POSITION) > 0.0);
        assert!(h.get("P1", slot::VELOCITY) > 0.0);
    }
}
