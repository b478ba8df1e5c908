//! First-order transfer function.

use tlm_core::limit;

use crate::error::{NumericError, NumericResult};

/// Discrete first-order filter `G(s) = (num0·s + num1) / (den0·s + den1)`.
///
/// Discretised with the bilinear (Tustin) transform for timestep `T`:
///
/// ```text
/// b0 = num1·T + 2·num0     a0 = den1·T + 2·den0
/// b1 = num1·T - 2·num0     a1 = den1·T - 2·den0
///
/// y[k] = (b0·u[k] + b1·u[k-1] - a1·y[k-1]) / a0
/// ```
///
/// The output can be saturated to `[min, max]`; a saturated output is fed
/// back as the delayed output so the filter does not wind up.
///
/// # Example
///
/// ```
/// use tlm_numerics::FirstOrderTransferFunction;
///
/// // Low-pass with 10 rad/s break frequency.
/// let mut lp = FirstOrderTransferFunction::new([0.0, 1.0], [0.1, 1.0], 1e-3);
/// lp.initialize_values(0.0, 0.0);
/// let mut y = 0.0;
/// for _ in 0..2000 {
///     y = lp.update(1.0);
/// }
/// assert!((y - 1.0).abs() < 1e-6);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FirstOrderTransferFunction {
    timestep: f64,
    num: [f64; 2],
    den: [f64; 2],
    b0: f64,
    b1: f64,
    a0: f64,
    a1: f64,
    delay_u: f64,
    delay_y: f64,
    min: f64,
    max: f64,
    saturated: bool,
}

impl FirstOrderTransferFunction {
    /// # Panics
    ///
    /// Panics if `timestep` is not positive or the discretised denominator
    /// vanishes.
    pub fn new(num: [f64; 2], den: [f64; 2], timestep: f64) -> Self {
        assert!(timestep > 0.0, "Timestep must be positive");
        let mut tf = Self {
            timestep,
            num,
            den,
            b0: 0.0,
            b1: 0.0,
            a0: 1.0,
            a1: 0.0,
            delay_u: 0.0,
            delay_y: 0.0,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            saturated: false,
        };
        tf.discretise_numerator();
        tf.discretise_denominator();
        tf
    }

    /// Saturate the output to `[min, max]`.
    pub fn with_limits(mut self, min: f64, max: f64) -> NumericResult<Self> {
        self.set_limits(min, max)?;
        Ok(self)
    }

    pub fn set_limits(&mut self, min: f64, max: f64) -> NumericResult<()> {
        if min.is_nan() || max.is_nan() {
            return Err(NumericError::InvalidArg {
                what: "limits must not be NaN",
            });
        }
        if min > max {
            return Err(NumericError::InvertedLimits { min, max });
        }
        self.min = min;
        self.max = max;
        Ok(())
    }

    pub fn set_numerator(&mut self, num: [f64; 2]) {
        self.num = num;
        self.discretise_numerator();
    }

    /// Replace the denominator; cheap enough to call every step.
    pub fn set_denominator(&mut self, den: [f64; 2]) {
        self.den = den;
        self.discretise_denominator();
    }

    fn discretise_numerator(&mut self) {
        let t = self.timestep;
        self.b0 = self.num[1] * t + 2.0 * self.num[0];
        self.b1 = self.num[1] * t - 2.0 * self.num[0];
    }

    fn discretise_denominator(&mut self) {
        let t = self.timestep;
        self.a0 = self.den[1] * t + 2.0 * self.den[0];
        self.a1 = self.den[1] * t - 2.0 * self.den[0];
        assert!(self.a0 != 0.0, "Degenerate transfer function denominator");
    }

    /// Seed the delayed input and output.
    pub fn initialize_values(&mut self, u0: f64, y0: f64) {
        self.delay_u = u0;
        self.delay_y = limit(y0, self.min, self.max);
        self.saturated = self.delay_y != y0;
    }

    /// Advance one step with input `u` and return the new output.
    #[inline]
    pub fn update(&mut self, u: f64) -> f64 {
        let raw = (self.b0 * u + self.b1 * self.delay_u - self.a1 * self.delay_y) / self.a0;
        let y = limit(raw, self.min, self.max);
        self.saturated = y != raw;
        self.delay_u = u;
        self.delay_y = y;
        y
    }

    /// Most recent output.
    #[inline]
    pub fn value(&self) -> f64 {
        self.delay_y
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    pub fn numerator(&self) -> [f64; 2] {
        self.num
    }

    pub fn denominator(&self) -> [f64; 2] {
        self.den
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }
}
