use crate::{GsError, Vec3};

/// Floating point type used throughout system
pub type Real = f64;

/// Distance below which two bodies are treated as coincident.
///
/// Force and potential terms for such pairs are dropped instead of blowing up.
pub const COINCIDENT_DISTANCE: Real = 1e-10;

/// Absolute + relative tolerance pair for float comparisons
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

/// Component-wise [`nearly_equal`].
pub fn nearly_equal_vec(a: Vec3, b: Vec3, tol: Tolerances) -> bool {
    nearly_equal(a.x(), b.x(), tol)
        && nearly_equal(a.y(), b.y(), tol)
        && nearly_equal(a.z(), b.z(), tol)
}

/// Relative difference `|a - b| / |reference|`, falling back to the absolute
/// difference when the reference is zero.
pub fn relative_change(value: Real, reference: Real) -> Real {
    let diff = (value - reference).abs();
    if reference == 0.0 {
        diff
    } else {
        diff / reference.abs()
    }
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, GsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(GsError::NonFinite { what, value: v })
    }
}

pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, GsError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(GsError::InvalidArg { what })
    }
}
