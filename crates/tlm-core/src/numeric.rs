use crate::TlmError;

/// Floating point type used throughout the kernel.
pub type Real = f64;

/// Absolute/relative tolerance pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &str) -> Result<Real, TlmError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TlmError::NonFinite {
            what: what.to_string(),
            value: v,
        })
    }
}

/// Clamp `value` into `[min, max]`. Unlike `f64::clamp` this never panics when
/// the bounds are crossed; the lower bound wins.
#[inline]
pub fn limit(value: Real, min: Real, max: Real) -> Real {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// -1, 0 or 1.
#[inline]
pub fn sign(value: Real) -> Real {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
