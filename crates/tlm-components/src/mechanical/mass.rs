use tlm_core::Unit;
use tlm_graph::{NodeType, Role, mechanical as slot};
use tlm_numerics::DoubleIntegratorWithDampingAndCoulombFriction;

use crate::behavior::Behavior;
use crate::configure::{Configurator, PortIdx};
use crate::context::SimContext;
use crate::parameter::ParamIdx;

/// Rigid body between two mechanical ports.
///
/// `m·dv/dt = f1 - f2 - B·v` less Coulomb friction, integrated with the
/// impedances of both neighbours folded into the damping. Position is
/// confined to `[x_min, x_max]`; at a stop the velocity is zeroed if it
/// points further out.
#[derive(Clone, Debug, Default)]
pub struct TranslationalMass {
    p1: PortIdx,
    p2: PortIdx,
    mass: ParamIdx,
    viscous: ParamIdx,
    static_friction: ParamIdx,
    kinetic_friction: ParamIdx,
    x_min: ParamIdx,
    x_max: ParamIdx,
    integrator: Option<DoubleIntegratorWithDampingAndCoulombFriction>,
}

struct Waves {
    c1: f64,
    zc1: f64,
    c2: f64,
    zc2: f64,
}

impl TranslationalMass {
    fn waves(&self, ctx: &SimContext<'_>) -> Waves {
        Waves {
            c1: ctx.read(self.p1, slot::WAVE_VARIABLE),
            zc1: ctx.read(self.p1, slot::CHAR_IMPEDANCE),
            c2: ctx.read(self.p2, slot::WAVE_VARIABLE),
            zc2: ctx.read(self.p2, slot::CHAR_IMPEDANCE),
        }
    }

    fn write_ports(&self, ctx: &SimContext<'_>, w: &Waves, v: f64, x: f64, m: f64) {
        ctx.write(self.p1, slot::FORCE, w.c1 - w.zc1 * v);
        ctx.write(self.p1, slot::VELOCITY, -v);
        ctx.write(self.p1, slot::POSITION, -x);
        ctx.write(self.p1, slot::EQUIVALENT_MASS, m);
        ctx.write(self.p2, slot::FORCE, w.c2 + w.zc2 * v);
        ctx.write(self.p2, slot::VELOCITY, v);
        ctx.write(self.p2, slot::POSITION, x);
        ctx.write(self.p2, slot::EQUIVALENT_MASS, m);
    }
}

impl Behavior for TranslationalMass {
    fn role(&self) -> Role {
        Role::Q
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.p1 = cfg.power_port("P1", NodeType::Mechanical);
        self.p2 = cfg.power_port("P2", NodeType::Mechanical);
        self.mass = cfg.constant("m", "Mass", Unit::Kilogram, 100.0);
        self.viscous = cfg.constant(
            "B",
            "Viscous friction coefficient",
            Unit::NewtonSecondPerMeter,
            10.0,
        );
        self.static_friction = cfg.constant("f_s", "Static friction force", Unit::Newton, 0.0);
        self.kinetic_friction = cfg.constant("f_k", "Kinetic friction force", Unit::Newton, 0.0);
        self.x_min = cfg.constant("x_min", "Lower position limit", Unit::Meter, -1e30);
        self.x_max = cfg.constant("x_max", "Upper position limit", Unit::Meter, 1e30);
    }

    fn initialize(&mut self, ctx: &SimContext<'_>) {
        let m = ctx.value(self.mass);
        if m <= 0.0 {
            ctx.stop_simulation(format!("Mass must be positive, got {m}"));
            return;
        }
        let (x_min, x_max) = (ctx.value(self.x_min), ctx.value(self.x_max));
        if x_min > x_max {
            ctx.stop_simulation(format!("x_min ({x_min}) is above x_max ({x_max})"));
            return;
        }

        let w = self.waves(ctx);
        let v = ctx.read(self.p2, slot::VELOCITY);
        let mut x = ctx.read(self.p2, slot::POSITION);
        if x < x_min || x > x_max {
            ctx.warn(format!(
                "Start position {x} outside [{x_min}, {x_max}], clamped"
            ));
            x = x.clamp(x_min, x_max);
        }

        let mut integrator = DoubleIntegratorWithDampingAndCoulombFriction::new(ctx.timestep());
        integrator.initialize_values((w.c1 - w.c2) / m, v, x);
        self.integrator = Some(integrator);
        self.write_ports(ctx, &w, v, x, m);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        let w = self.waves(ctx);
        let m = ctx.value(self.mass);
        let b = ctx.value(self.viscous);
        let (x_min, x_max) = (ctx.value(self.x_min), ctx.value(self.x_max));
        let Some(integrator) = self.integrator.as_mut() else {
            return;
        };

        let u = (w.c1 - w.c2) / m;
        integrator.set_damping((b + w.zc1 + w.zc2) / m * ctx.timestep());
        integrator.set_friction(
            ctx.value(self.static_friction) / m,
            ctx.value(self.kinetic_friction) / m,
        );
        integrator.integrate_with_undo(u);

        let mut v = integrator.value_first();
        let mut x = integrator.value_second();
        if !v.is_finite() || !x.is_finite() {
            ctx.stop_simulation(format!("State diverged: v = {v}, x = {x}"));
            return;
        }
        if x < x_min {
            x = x_min;
            v = v.max(0.0);
            integrator.initialize_values(u, v, x);
        } else if x > x_max {
            x = x_max;
            v = v.min(0.0);
            integrator.initialize_values(u, v, x);
        }

        self.write_ports(ctx, &w, v, x, m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::model::ComponentModel;
    use crate::testing::Harness;
    use proptest::prelude::*;

    const DT: f64 = 1e-3;

    fn harness() -> Harness {
        Harness::new(ComponentModel::TranslationalMass(TranslationalMass::default()), DT)
    }

    #[test]
    fn force_against_anchor_accelerates_away() {
        let mut h = harness();
        h.set_param("x_min", 0.0);
        h.set_param("x_max", 1.0);
        // Force source on P1, anchor (Zc = 0) on P2.
        h.set("P1", slot::WAVE_VARIABLE, 50.0);
        h.initialize();
        assert_eq!(h.get("P2", slot::VELOCITY), 0.0);
        assert_eq!(h.get("P2", slot::POSITION), 0.0);

        h.step();
        let v = h.get("P2", slot::VELOCITY);
        let expected = 0.5 * DT;
        assert!(v > 0.0);
        assert!((v - expected).abs() < 1e-3 * expected, "v = {v}");
        assert_eq!(h.get("P1", slot::VELOCITY), -v);
        assert_eq!(h.get("P1", slot::FORCE), 50.0);
        assert_eq!(h.get("P2", slot::EQUIVALENT_MASS), 100.0);
    }

    #[test]
    fn impedance_enters_port_force() {
        let mut h = harness();
        h.set("P1", slot::WAVE_VARIABLE, 10.0);
        h.set("P1", slot::CHAR_IMPEDANCE, 5.0);
        h.set("P2", slot::CHAR_IMPEDANCE, 3.0);
        h.initialize();
        for _ in 0..10 {
            h.step();
        }
        let v = h.get("P2", slot::VELOCITY);
        assert!((h.get("P1", slot::FORCE) - (10.0 - 5.0 * v)).abs() < 1e-12);
        assert!((h.get("P2", slot::FORCE) - 3.0 * v).abs() < 1e-12);
    }

    #[test]
    fn static_friction_holds_small_force() {
        let mut h = harness();
        h.set_param("f_s", 100.0);
        h.set_param("f_k", 50.0);
        h.set("P1", slot::WAVE_VARIABLE, 80.0);
        h.initialize();
        for _ in 0..100 {
            h.step();
            assert_eq!(h.get("P2", slot::VELOCITY), 0.0);
        }
        h.set("P1", slot::WAVE_VARIABLE, 120.0);
        h.step();
        assert!(h.get("P2", slot::VELOCITY) > 0.0);
    }

    #[test]
    fn start_outside_limits_warns_and_clamps() {
        let mut h = harness();
        h.set_param("x_max", 0.5);
        h.set("P2", slot::POSITION, 2.0);
        h.initialize();
        assert_eq!(h.get("P2", slot::POSITION), 0.5);
        assert_eq!(h.count(Severity::Warning), 1);
    }

    #[test]
    fn nonpositive_mass_stops() {
        let mut h = harness();
        h.set_param("m", 0.0);
        h.initialize();
        assert_eq!(h.count(Severity::Fatal), 1);
    }

    #[test]
    fn diverging_state_stops() {
        let mut h = harness();
        h.initialize();
        h.step();
        let x = h.get("P2", slot::POSITION);
        h.set("P1", slot::WAVE_VARIABLE, f64::INFINITY);
        h.step();
        assert_eq!(h.count(Severity::Fatal), 1);
        // The diverged state is not published.
        assert_eq!(h.get("P2", slot::POSITION), x);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let run = |h: &mut Harness| {
            h.set("P1", slot::WAVE_VARIABLE, 30.0);
            h.set("P2", slot::POSITION, 0.0);
            h.set("P2", slot::VELOCITY, 0.0);
            h.initialize();
            (0..50)
                .map(|_| {
                    h.step();
                    h.get("P2", slot::POSITION).to_bits()
                })
                .collect::<Vec<_>>()
        };
        let mut h = harness();
        let first = run(&mut h);
        let second = run(&mut h);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn position_never_leaves_limits(
            c1 in -1e4_f64..1e4,
            c2 in -1e4_f64..1e4,
            x_min in -1.0_f64..0.0,
            width in 0.0_f64..0.01,
        ) {
            let mut h = harness();
            h.set_param("m", 1.0);
            h.set_param("x_min", x_min);
            h.set_param("x_max", x_min + width);
            h.set("P2", slot::POSITION, x_min);
            h.set("P1", slot::WAVE_VARIABLE, c1);
            h.set("P2", slot::WAVE_VARIABLE, c2);
            h.initialize();
            for _ in 0..50 {
                h.step();
                let x = h.get("P2", slot::POSITION);
                let v = h.get("P2", slot::VELOCITY);
                prop_assert!(x >= x_min && x <= x_min + width);
                if x == x_min && width > 0.0 {
                    prop_assert!(v >= 0.0);
                }
                if x == x_min + width && width > 0.0 {
                    prop_assert!(v <= 0.0);
                }
            }
        }
    }
}
