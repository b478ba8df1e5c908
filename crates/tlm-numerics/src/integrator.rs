//! Trapezoidal integrators.

/// Second-order integrator for `dv/dt = u - d·v`, `dx/dt = v`.
///
/// The damping is given in its discrete, dimensionless form
/// `w0 = d·T` (for a mass: `(B + Zc1 + Zc2) / m · T`). Both equations use the
/// trapezoidal rule with the damping term treated implicitly:
///
/// ```text
/// v[k] = ((1 - w0/2)·v[k-1] + T/2·(u[k] + u[k-1])) / (1 + w0/2)
/// x[k] = x[k-1] + T/2·(v[k] + v[k-1])
/// ```
///
/// `integrate_with_undo` keeps a copy of the pre-step state so a component can
/// inspect the result and `undo` or `redo_integrate` with different inputs
/// before committing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoubleIntegratorWithDamping {
    timestep: f64,
    damping: f64,
    delay_u: f64,
    delay_v: f64,
    delay_x: f64,
    backup: [f64; 3],
    seeded: bool,
}

impl DoubleIntegratorWithDamping {
    /// # Panics
    ///
    /// Panics if `timestep` is not positive.
    pub fn new(timestep: f64) -> Self {
        assert!(timestep > 0.0, "Timestep must be positive");
        Self {
            timestep,
            damping: 0.0,
            delay_u: 0.0,
            delay_v: 0.0,
            delay_x: 0.0,
            backup: [0.0; 3],
            seeded: false,
        }
    }

    /// Seed input, velocity and position.
    pub fn initialize_values(&mut self, u0: f64, v0: f64, x0: f64) {
        self.delay_u = u0;
        self.delay_v = v0;
        self.delay_x = x0;
        self.backup = [u0, v0, x0];
        self.seeded = true;
    }

    /// Set the dimensionless damping `w0 = d·T`.
    #[inline]
    pub fn set_damping(&mut self, w0: f64) {
        self.damping = w0;
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// # Panics
    ///
    /// Panics if the integrator was never seeded with `initialize_values`.
    #[inline]
    pub fn integrate(&mut self, u: f64) {
        assert!(
            self.seeded,
            "Integrator used before initialize_values seeded it"
        );
        let half_t = 0.5 * self.timestep;
        let half_w = 0.5 * self.damping;
        let v = ((1.0 - half_w) * self.delay_v + half_t * (u + self.delay_u)) / (1.0 + half_w);
        let x = self.delay_x + half_t * (v + self.delay_v);
        self.delay_u = u;
        self.delay_v = v;
        self.delay_x = x;
    }

    /// Integrate, remembering the state before the step.
    #[inline]
    pub fn integrate_with_undo(&mut self, u: f64) {
        self.backup = [self.delay_u, self.delay_v, self.delay_x];
        self.integrate(u);
    }

    /// Restore the state saved by the last `integrate_with_undo`.
    #[inline]
    pub fn undo(&mut self) {
        let [u, v, x] = self.backup;
        self.delay_u = u;
        self.delay_v = v;
        self.delay_x = x;
    }

    /// Discard the last step and integrate again from the saved state.
    #[inline]
    pub fn redo_integrate(&mut self, u: f64) {
        self.undo();
        self.integrate(u);
    }

    /// Velocity.
    #[inline]
    pub fn value_first(&self) -> f64 {
        self.delay_v
    }

    /// Position.
    #[inline]
    pub fn value_second(&self) -> f64 {
        self.delay_x
    }

    /// Last integrated input.
    #[inline]
    pub fn input(&self) -> f64 {
        self.delay_u
    }

    /// Velocity and position before the last `integrate_with_undo`.
    pub fn previous(&self) -> (f64, f64) {
        (self.backup[1], self.backup[2])
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }
}

/// Trapezoidal integrator `y[k] = y[k-1] + T/2·(u[k] + u[k-1])`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrapezoidIntegrator {
    timestep: f64,
    delay_u: f64,
    delay_y: f64,
}

impl TrapezoidIntegrator {
    /// # Panics
    ///
    /// Panics if `timestep` is not positive.
    pub fn new(timestep: f64) -> Self {
        assert!(timestep > 0.0, "Timestep must be positive");
        Self {
            timestep,
            delay_u: 0.0,
            delay_y: 0.0,
        }
    }

    pub fn initialize_values(&mut self, u0: f64, y0: f64) {
        self.delay_u = u0;
        self.delay_y = y0;
    }

    #[inline]
    pub fn update(&mut self, u: f64) -> f64 {
        self.delay_y += 0.5 * self.timestep * (u + self.delay_u);
        self.delay_u = u;
        self.delay_y
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.delay_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f64 = 1e-3;

    #[test]
    fn constant_acceleration_without_damping() {
        let mut di = DoubleIntegratorWithDamping::new(DT);
        di.initialize_values(2.0, 0.0, 0.0);
        for _ in 0..1000 {
            di.integrate(2.0);
        }
        // v = a·t, x = a·t²/2 are reproduced exactly by the trapezoidal rule.
        assert!((di.value_first() - 2.0).abs() < 1e-9);
        assert!((di.value_second() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn damping_settles_at_u_over_d() {
        let mut di = DoubleIntegratorWithDamping::new(DT);
        di.initialize_values(0.0, 0.0, 0.0);
        // d = 50 1/s, u = 10 m/s² -> v_inf = 0.2 m/s.
        di.set_damping(50.0 * DT);
        for _ in 0..2000 {
            di.integrate(10.0);
        }
        assert!((di.value_first() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn undo_and_redo_restore_pre_step_state() {
        let mut di = DoubleIntegratorWithDamping::new(DT);
        di.initialize_values(1.0, 0.5, 0.25);
        di.integrate_with_undo(3.0);
        assert_ne!(di.value_first(), 0.5);
        assert_eq!(di.previous(), (0.5, 0.25));

        di.undo();
        assert_eq!(di.value_first(), 0.5);
        assert_eq!(di.value_second(), 0.25);
        assert_eq!(di.input(), 1.0);

        let mut reference = di;
        reference.integrate(-2.0);
        di.integrate_with_undo(3.0);
        di.redo_integrate(-2.0);
        assert_eq!(di.value_first(), reference.value_first());
        assert_eq!(di.value_second(), reference.value_second());
    }

    #[test]
    #[should_panic(expected = "before initialize_values")]
    fn integrating_unseeded_state_panics() {
        let mut di = DoubleIntegratorWithDamping::new(DT);
        di.integrate(1.0);
    }

    #[test]
    #[should_panic(expected = "Timestep must be positive")]
    fn negative_timestep_panics() {
        let _ = DoubleIntegratorWithDamping::new(-1e-3);
    }

    #[test]
    fn trapezoid_integrates_ramp() {
        let mut ti = TrapezoidIntegrator::new(0.5);
        ti.initialize_values(0.0, 0.0);
        // u = t at t = 0.5, 1.0 -> integral t²/2 = 0.5
        ti.update(0.5);
        let y = ti.update(1.0);
        assert!((y - 0.5).abs() < 1e-15);
    }

    proptest! {
        #[test]
        fn free_velocity_never_grows_under_damping(
            v0 in -100.0_f64..100.0,
            w0 in 0.0_f64..50.0,
        ) {
            let mut di = DoubleIntegratorWithDamping::new(DT);
            di.initialize_values(0.0, v0, 0.0);
            di.set_damping(w0);
            let mut prev = v0.abs();
            for _ in 0..20 {
                di.integrate(0.0);
                let v = di.value_first().abs();
                prop_assert!(v <= prev + 1e-12);
                prev = v;
            }
        }
    }
}
