//! Damped double integrator with Coulomb friction.

use tlm_core::sign;

use crate::integrator::DoubleIntegratorWithDamping;

/// [`DoubleIntegratorWithDamping`] with a stick/slip friction band.
///
/// Friction is given as accelerations (force divided by mass):
/// `static_friction` must be exceeded by the applied input to break away from
/// rest, `kinetic_friction` opposes motion while sliding. When the velocity
/// would cross zero during a step the body stops exactly at zero and sticks
/// until the static band is exceeded again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoubleIntegratorWithDampingAndCoulombFriction {
    inner: DoubleIntegratorWithDamping,
    backup: (DoubleIntegratorWithDamping, bool),
    static_friction: f64,
    kinetic_friction: f64,
    stuck: bool,
}

impl DoubleIntegratorWithDampingAndCoulombFriction {
    /// # Panics
    ///
    /// Panics if `timestep` is not positive.
    pub fn new(timestep: f64) -> Self {
        let inner = DoubleIntegratorWithDamping::new(timestep);
        Self {
            inner,
            backup: (inner, false),
            static_friction: 0.0,
            kinetic_friction: 0.0,
            stuck: false,
        }
    }

    pub fn initialize_values(&mut self, u0: f64, v0: f64, x0: f64) {
        self.inner.initialize_values(u0, v0, x0);
        self.stuck = false;
        self.backup = (self.inner, self.stuck);
    }

    #[inline]
    pub fn set_damping(&mut self, w0: f64) {
        self.inner.set_damping(w0);
    }

    /// Set static and kinetic friction accelerations; negative values are
    /// taken by magnitude.
    #[inline]
    pub fn set_friction(&mut self, static_friction: f64, kinetic_friction: f64) {
        self.static_friction = static_friction.abs();
        self.kinetic_friction = kinetic_friction.abs();
    }

    /// Advance one step with applied acceleration `u` (friction excluded).
    ///
    /// # Panics
    ///
    /// Panics if the integrator was never seeded.
    pub fn integrate(&mut self, u: f64) {
        let (v_prev, x_prev) = (self.inner.value_first(), self.inner.value_second());

        if v_prev == 0.0 {
            if u.abs() <= self.static_friction {
                self.stick(x_prev);
                return;
            }
            // Break away against kinetic friction.
            self.inner.integrate_with_undo(u - sign(u) * self.kinetic_friction);
            if self.inner.value_first() * u < 0.0 {
                self.inner.undo();
                self.stick(x_prev);
                return;
            }
        } else {
            self.inner
                .integrate_with_undo(u - sign(v_prev) * self.kinetic_friction);
            if self.inner.value_first() * v_prev < 0.0 {
                // Velocity reversal inside the step: stop exactly at zero.
                self.inner.undo();
                let x = x_prev + 0.5 * self.inner.timestep() * v_prev;
                self.inner.initialize_values(0.0, 0.0, x);
                self.stuck = true;
                return;
            }
        }
        self.stuck = false;
    }

    fn stick(&mut self, x: f64) {
        self.inner.initialize_values(0.0, 0.0, x);
        self.stuck = true;
    }

    /// Integrate, remembering the full state before the step.
    pub fn integrate_with_undo(&mut self, u: f64) {
        self.backup = (self.inner, self.stuck);
        self.integrate(u);
    }

    /// Return to the state before the last `integrate_with_undo`, stick
    /// state included.
    pub fn undo(&mut self) {
        (self.inner, self.stuck) = self.backup;
    }

    pub fn redo_integrate(&mut self, u: f64) {
        self.undo();
        self.integrate(u);
    }

    /// Velocity.
    #[inline]
    pub fn value_first(&self) -> f64 {
        self.inner.value_first()
    }

    /// Position.
    #[inline]
    pub fn value_second(&self) -> f64 {
        self.inner.value_second()
    }

    /// True when the last step ended in stiction.
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1e-3;

    fn seeded(fs: f64, fk: f64) -> DoubleIntegratorWithDampingAndCoulombFriction {
        let mut di = DoubleIntegratorWithDampingAndCoulombFriction::new(DT);
        di.initialize_values(0.0, 0.0, 0.0);
        di.set_friction(fs, fk);
        di
    }

    #[test]
    fn stays_stuck_inside_static_band() {
        let mut di = seeded(2.0, 1.0);
        for _ in 0..100 {
            di.integrate(1.5);
            assert_eq!(di.value_first(), 0.0);
            assert_eq!(di.value_second(), 0.0);
            assert!(di.is_stuck());
        }
    }

    #[test]
    fn breaks_away_above_static_band_with_kinetic_friction() {
        let mut di = seeded(2.0, 1.0);
        di.integrate(3.0);
        assert!(di.value_first() > 0.0);
        assert!(!di.is_stuck());
        // Effective acceleration is 3 - 1 = 2 after breakaway.
        for _ in 0..999 {
            di.integrate(3.0);
        }
        assert!((di.value_first() - 2.0).abs() < 1e-2);
    }

    #[test]
    fn sliding_body_stops_exactly_at_zero() {
        let mut di = DoubleIntegratorWithDampingAndCoulombFriction::new(DT);
        di.initialize_values(0.0, 0.1, 0.0);
        di.set_friction(5.0, 5.0);
        let mut steps = 0;
        while di.value_first() != 0.0 {
            di.integrate(0.0);
            assert!(di.value_first() >= 0.0);
            steps += 1;
            assert!(steps < 1000);
        }
        // Decelerating at 5 m/s² from 0.1 m/s takes about 20 ms.
        assert!((18..=22).contains(&steps));
        assert!(di.is_stuck());
        let x = di.value_second();
        di.integrate(0.0);
        assert_eq!(di.value_second(), x);
    }

    #[test]
    fn without_friction_matches_plain_integrator() {
        let mut plain = DoubleIntegratorWithDamping::new(DT);
        plain.initialize_values(0.5, 0.0, 0.0);
        plain.set_damping(0.1 * DT);

        let mut fr = DoubleIntegratorWithDampingAndCoulombFriction::new(DT);
        fr.initialize_values(0.5, 0.0, 0.0);
        fr.set_damping(0.1 * DT);

        for _ in 0..10 {
            plain.integrate(0.5);
            fr.integrate(0.5);
            assert_eq!(plain.value_first(), fr.value_first());
            assert_eq!(plain.value_second(), fr.value_second());
        }
    }

    #[test]
    fn undo_across_breakaway_restores_stiction() {
        let mut di = seeded(2.0, 1.0);
        di.integrate(1.0);
        assert!(di.is_stuck());
        di.integrate_with_undo(3.0);
        assert!(!di.is_stuck());
        di.undo();
        assert!(di.is_stuck());
        assert_eq!((di.value_first(), di.value_second()), (0.0, 0.0));
    }

    #[test]
    fn undo_across_stop_restores_sliding() {
        let mut di = DoubleIntegratorWithDampingAndCoulombFriction::new(DT);
        di.initialize_values(0.0, 6e-3, 0.0);
        di.set_friction(5.0, 5.0);
        di.integrate(0.0);
        assert!(!di.is_stuck());
        let (v, x) = (di.value_first(), di.value_second());
        assert!(v > 0.0);
        // Kinetic friction removes more than what is left, so the body stops.
        di.integrate_with_undo(0.0);
        assert!(di.is_stuck());
        di.undo();
        assert!(!di.is_stuck());
        assert_eq!((di.value_first(), di.value_second()), (v, x));
    }

    #[test]
    fn undo_restores_whole_state() {
        let mut di = seeded(0.0, 0.0);
        di.integrate(1.0);
        let (v, x) = (di.value_first(), di.value_second());
        di.integrate_with_undo(100.0);
        di.undo();
        assert_eq!((di.value_first(), di.value_second()), (v, x));
    }
}
