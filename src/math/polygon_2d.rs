use super::{Point2, Vector2, TOLERANCE};
use crate::error::{OperationError, Result};

/// Signed angle subtended by the segment `a`→`b` as seen from `p`, in `[-π, π]`.
///
/// Positive when the segment sweeps counter-clockwise around `p`.
#[must_use]
pub fn subtended_angle(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let u = a - p;
    let v = b - p;
    u.perp(&v).atan2(u.dot(&v))
}

/// Absolute turning angle at `b` when walking `a → b → c`, in `[0, π]`.
///
/// Zero for a straight continuation; degenerate legs count as straight.
#[must_use]
pub fn turning_angle(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let d1 = b - a;
    let d2 = c - b;
    if d1.norm_squared() < TOLERANCE * TOLERANCE || d2.norm_squared() < TOLERANCE * TOLERANCE {
        return 0.0;
    }
    d1.perp(&d2).atan2(d1.dot(&d2)).abs()
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(OperationError::InvalidInput(format!(
            "zero-length segment between ({}, {}) and ({}, {})",
            a.x, a.y, b.x, b.y
        ))
        .into());
    }
    Ok(d / len)
}
