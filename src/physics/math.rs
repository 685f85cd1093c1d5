//! Small 2D helpers on top of raylib's [`Vector2`].
//!
//! Only plain field arithmetic is used here so the solver does not depend on
//! which convenience methods a given raylib release ships.

use raylib::prelude::Vector2;

#[inline]
pub fn dot(a: Vector2, b: Vector2) -> f32 {
    a.x * b.x + a.y * b.y
}

/// Scalar 2D cross product (z component of the 3D cross).
#[inline]
pub fn cross(a: Vector2, b: Vector2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// `w × r` for a scalar angular velocity `w`.
#[inline]
pub fn cross_sv(w: f32, r: Vector2) -> Vector2 {
    Vector2::new(-w * r.y, w * r.x)
}

/// Rotate `v` by `angle` radians (clockwise on screen, since Y grows down).
#[inline]
pub fn rotate(v: Vector2, angle: f32) -> Vector2 {
    let (s, c) = angle.sin_cos();
    Vector2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

#[inline]
pub fn perp(v: Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

#[inline]
pub fn scale(v: Vector2, s: f32) -> Vector2 {
    Vector2::new(v.x * s, v.y * s)
}

#[inline]
pub fn is_finite(v: Vector2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vector2::new(1.0, 0.0), FRAC_PI_2);
        assert!(approx_eq(v.x, 0.0));
        assert!(approx_eq(v.y, 1.0));
    }

    #[test]
    fn test_cross_and_cross_sv_agree() {
        // (w × r) · n == w * (r × n)
        let r = Vector2::new(3.0, -2.0);
        let n = Vector2::new(0.0, 1.0);
        let w = 1.5;
        assert!(approx_eq(dot(cross_sv(w, r), n), w * cross(r, n)));
    }

    #[test]
    fn test_is_finite() {
        assert!(is_finite(Vector2::new(1.0, 2.0)));
        assert!(!is_finite(Vector2::new(f32::NAN, 0.0)));
        assert!(!is_finite(Vector2::new(0.0, f32::INFINITY)));
    }
}
