pub mod arc_2d;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

use std::f64::consts::TAU;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Coincidence tolerance for endpoint matching and shape equality.
pub const EPSILON: f64 = 1e-5;

/// Numerical tolerance for floating-point comparisons inside computations.
pub const TOLERANCE: f64 = 1e-10;

/// Normalizes an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Returns `true` if two points coincide within [`EPSILON`].
#[must_use]
pub fn points_coincide(a: &Point2, b: &Point2) -> bool {
    (a - b).norm_squared() <= EPSILON * EPSILON
}

/// Returns the right-pointing normal `(v.y, -v.x)` of a direction vector.
#[must_use]
pub fn right_normal(v: &Vector2) -> Vector2 {
    Vector2::new(v.y, -v.x)
}

/// Returns the left-pointing normal `(-v.y, v.x)` of a direction vector.
#[must_use]
pub fn left_normal(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}
