use tlm_core::{Tolerances, Unit, nearly_equal};
use tlm_graph::{NodeType, Role, mechanical as slot};
use tlm_numerics::DoubleIntegratorWithDamping;

use crate::behavior::Behavior;
use crate::configure::{Configurator, PortIdx};
use crate::context::SimContext;
use crate::parameter::ParamIdx;

/// Rigid body whose two sides accept any number of connections.
///
/// Wave variables and impedances are summed over each side; every
/// connection on a side receives the same velocity and position.
#[derive(Clone, Debug, Default)]
pub struct MultiPortTranslationalMass {
    p1: PortIdx,
    p2: PortIdx,
    mass: ParamIdx,
    viscous: ParamIdx,
    x_min: ParamIdx,
    x_max: ParamIdx,
    integrator: Option<DoubleIntegratorWithDamping>,
}

/// Summed wave variable and impedance of one side.
fn side_sums(ctx: &SimContext<'_>, port: PortIdx) -> (f64, f64) {
    (0..ctx.connection_count(port)).fold((0.0, 0.0), |(c, zc), i| {
        (
            c + ctx.read_at(port, i, slot::WAVE_VARIABLE),
            zc + ctx.read_at(port, i, slot::CHAR_IMPEDANCE),
        )
    })
}

/// First start velocity on a side that disagrees with the first connection.
fn velocity_mismatch(ctx: &SimContext<'_>, port: PortIdx) -> Option<(f64, f64)> {
    let tol = Tolerances::default();
    let v0 = ctx.read_at(port, 0, slot::VELOCITY);
    (1..ctx.connection_count(port))
        .map(|i| ctx.read_at(port, i, slot::VELOCITY))
        .find(|v| !nearly_equal(v0, *v, tol))
        .map(|v| (v0, v))
}

impl MultiPortTranslationalMass {
    fn write_ports(&self, ctx: &SimContext<'_>, v: f64, x: f64, m: f64) {
        for (port, sign) in [(self.p1, -1.0), (self.p2, 1.0)] {
            for i in 0..ctx.connection_count(port) {
                let c = ctx.read_at(port, i, slot::WAVE_VARIABLE);
                let zc = ctx.read_at(port, i, slot::CHAR_IMPEDANCE);
                ctx.write_at(port, i, slot::FORCE, c + zc * sign * v);
                ctx.write_at(port, i, slot::VELOCITY, sign * v);
                ctx.write_at(port, i, slot::POSITION, sign * x);
                ctx.write_at(port, i, slot::EQUIVALENT_MASS, m);
            }
        }
    }
}

impl Behavior for MultiPortTranslationalMass {
    fn role(&self) -> Role {
        Role::Q
    }

    fn configure(&mut self, cfg: &mut Configurator) {
        self.p1 = cfg.multi_power_port("P1", NodeType::Mechanical);
        self.p2 = cfg.multi_power_port("P2", NodeType::Mechanical);
        self.mass = cfg.constant("m", "Mass", Unit::Kilogram, 100.0);
        self.viscous = cfg.constant(
            "B",
            "Viscous friction coefficient",
            Unit::NewtonSecondPerMeter,
            10.0,
        );
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
        // A body cannot move at two speeds on the side it is driven from.
        if let Some((a, b)) = velocity_mismatch(ctx, self.p1) {
            ctx.stop_simulation(format!(
                "Start velocities on P1 differ between connections: {a} and {b}"
            ));
            return;
        }
        if let Some((a, b)) = velocity_mismatch(ctx, self.p2) {
            ctx.warn(format!(
                "Start velocities on P2 differ between connections: {a} and {b}"
            ));
        }

        let n1 = ctx.connection_count(self.p1);
        let n2 = ctx.connection_count(self.p2);
        let v1 = ctx.read_at(self.p1, 0, slot::VELOCITY);
        let v2 = ctx.read_at(self.p2, 0, slot::VELOCITY);
        if n1 > 0 && n2 > 0 && (v1 + v2).abs() > 1e-9 {
            ctx.warn(format!(
                "Start velocities on P1 ({v1}) and P2 ({v2}) are not opposite"
            ));
        }

        let (v, x) = if n2 > 0 {
            (v2, ctx.read_at(self.p2, 0, slot::POSITION))
        } else {
            (-v1, -ctx.read_at(self.p1, 0, slot::POSITION))
        };
        let x = x.clamp(x_min, x_max);

        let (c1, _) = side_sums(ctx, self.p1);
        let (c2, _) = side_sums(ctx, self.p2);
        let mut integrator = DoubleIntegratorWithDamping::new(ctx.timestep());
        integrator.initialize_values((c1 - c2) / m, v, x);
        self.integrator = Some(integrator);
        self.write_ports(ctx, v, x, m);
    }

    fn simulate_one_timestep(&mut self, ctx: &SimContext<'_>) {
        let (c1, zc1) = side_sums(ctx, self.p1);
        let (c2, zc2) = side_sums(ctx, self.p2);
        let m = ctx.value(self.mass);
        let b = ctx.value(self.viscous);
        let (x_min, x_max) = (ctx.value(self.x_min), ctx.value(self.x_max));
        let Some(integrator) = self.integrator.as_mut() else {
            return;
        };

        let u = (c1 - c2) / m;
        integrator.set_damping((b + zc1 + zc2) / m * ctx.timestep());
        integrator.integrate(u);

        let mut v = integrator.value_first();
        let mut x = integrator.value_second();
        if x < x_min {
            x = x_min;
            v = v.max(0.0);
            integrator.initialize_values(u, v, x);
        } else if x > x_max {
            x = x_max;
            v = v.min(0.0);
            integrator.initialize_values(u, v, x);
        }

        self.write_ports(ctx, v, x, m);
    }
}
