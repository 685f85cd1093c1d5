//! Oriented rectangle used for tag and wall collision.
//!
//! [`OrientedBox`] is the rotated counterpart of an axis-aligned box collider:
//! a center, half extents and an angle. It answers point containment, the
//! rotated bounding box, and a separating-axis test producing a [`Contact`].

use arrayvec::ArrayVec;
use raylib::prelude::Vector2;

use super::math::{dot, rotate, scale};

/// Tolerance used when deciding whether a corner lies inside the other box.
const CORNER_SLOP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Vector2,
    pub half_extents: Vector2,
    /// Rotation in radians.
    pub angle: f32,
}

/// Result of a box-vs-box overlap.
///
/// `normal` points from the first box towards the second one; `depth` is the
/// penetration along it. `points` holds the corners found inside the other box
/// (at least one entry).
#[derive(Debug, Clone)]
pub struct Contact {
    pub normal: Vector2,
    pub depth: f32,
    pub points: ArrayVec<Vector2, 8>,
}

impl OrientedBox {
    pub fn new(center: Vector2, half_extents: Vector2, angle: f32) -> Self {
        Self {
            center,
            half_extents,
            angle,
        }
    }

    /// The box's local X and Y axes in world space.
    pub fn axes(&self) -> [Vector2; 2] {
        [
            rotate(Vector2::new(1.0, 0.0), self.angle),
            rotate(Vector2::new(0.0, 1.0), self.angle),
        ]
    }

    pub fn corners(&self) -> [Vector2; 4] {
        let [ax, ay] = self.axes();
        let ex = scale(ax, self.half_extents.x);
        let ey = scale(ay, self.half_extents.y);
        let c = self.center;
        [
            c - ex - ey,
            c + ex - ey,
            c + ex + ey,
            c - ex + ey,
        ]
    }

    /// Half extents of the axis-aligned box enclosing this rotated box.
    pub fn aabb_half_extents(&self) -> Vector2 {
        let (s, c) = self.angle.sin_cos();
        let (s, c) = (s.abs(), c.abs());
        Vector2::new(
            c * self.half_extents.x + s * self.half_extents.y,
            s * self.half_extents.x + c * self.half_extents.y,
        )
    }

    /// Returns (min, max) of the enclosing AABB.
    pub fn aabb(&self) -> (Vector2, Vector2) {
        let ext = self.aabb_half_extents();
        (self.center - ext, self.center + ext)
    }

    /// Point containment in world space.
    pub fn contains_point(&self, point: Vector2) -> bool {
        let local = rotate(point - self.center, -self.angle);
        local.x.abs() <= self.half_extents.x + CORNER_SLOP
            && local.y.abs() <= self.half_extents.y + CORNER_SLOP
    }

    /// Interval covered by this box when projected onto `axis` (unit length).
    fn project(&self, axis: Vector2) -> (f32, f32) {
        let [ax, ay] = self.axes();
        let center = dot(self.center, axis);
        let radius = self.half_extents.x * dot(ax, axis).abs()
            + self.half_extents.y * dot(ay, axis).abs();
        (center - radius, center + radius)
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.collide(other).is_some()
    }

    /// Separating-axis test against another oriented box.
    pub fn collide(&self, other: &Self) -> Option<Contact> {
        let [a0, a1] = self.axes();
        let [b0, b1] = other.axes();

        let mut best_depth = f32::INFINITY;
        let mut best_axis = a0;
        for axis in [a0, a1, b0, b1] {
            let (min_a, max_a) = self.project(axis);
            let (min_b, max_b) = other.project(axis);
            let overlap = max_a.min(max_b) - min_a.max(min_b);
            if overlap <= 0.0 {
                return None;
            }
            if overlap < best_depth {
                best_depth = overlap;
                best_axis = axis;
            }
        }

        let mut normal = best_axis;
        if dot(other.center - self.center, normal) < 0.0 {
            normal = scale(normal, -1.0);
        }

        let mut points: ArrayVec<Vector2, 8> = ArrayVec::new();
        for corner in self.corners() {
            if other.contains_point(corner) {
                points.push(corner);
            }
        }
        for corner in other.corners() {
            if self.contains_point(corner) {
                points.push(corner);
            }
        }
        if points.is_empty() {
            // Edge crossing with no corner inside: use the midpoint between
            // the two support features.
            points.push(scale(self.center + other.center, 0.5));
        }

        Some(Contact {
            normal,
            depth: best_depth,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn unit_box(x: f32, y: f32) -> OrientedBox {
        OrientedBox::new(Vector2::new(x, y), Vector2::new(1.0, 1.0), 0.0)
    }

    #[test]
    fn test_aabb_unrotated_matches_half_extents() {
        let b = OrientedBox::new(Vector2::new(0.0, 0.0), Vector2::new(50.0, 20.0), 0.0);
        let ext = b.aabb_half_extents();
        assert!(approx_eq(ext.x, 50.0));
        assert!(approx_eq(ext.y, 20.0));
    }

    #[test]
    fn test_aabb_quarter_turn_swaps_extents() {
        let b = OrientedBox::new(Vector2::new(0.0, 0.0), Vector2::new(50.0, 20.0), FRAC_PI_2);
        let ext = b.aabb_half_extents();
        assert!(approx_eq(ext.x, 20.0));
        assert!(approx_eq(ext.y, 50.0));
    }

    #[test]
    fn test_contains_point_rotated() {
        let b = OrientedBox::new(Vector2::new(0.0, 0.0), Vector2::new(50.0, 5.0), FRAC_PI_2);
        // Long axis now points down the screen.
        assert!(b.contains_point(Vector2::new(0.0, 40.0)));
        assert!(!b.contains_point(Vector2::new(40.0, 0.0)));
    }

    #[test]
    fn test_collide_separated() {
        assert!(unit_box(0.0, 0.0).collide(&unit_box(3.0, 0.0)).is_none());
    }

    #[test]
    fn test_collide_touching_is_not_overlap() {
        assert!(!unit_box(0.0, 0.0).overlaps(&unit_box(2.0, 0.0)));
    }

    #[test]
    fn test_collide_normal_points_from_a_to_b() {
        let contact = unit_box(0.0, 0.0).collide(&unit_box(1.5, 0.2)).unwrap();
        assert!(approx_eq(contact.normal.x, 1.0));
        assert!(approx_eq(contact.normal.y, 0.0));
        assert!(approx_eq(contact.depth, 0.5));
        assert!(!contact.points.is_empty());

        let reverse = unit_box(1.5, 0.2).collide(&unit_box(0.0, 0.0)).unwrap();
        assert!(approx_eq(reverse.normal.x, -1.0));
    }

    #[test]
    fn test_collide_vertical_stack() {
        let floor = OrientedBox::new(Vector2::new(0.0, 10.0), Vector2::new(100.0, 10.0), 0.0);
        let tag = OrientedBox::new(Vector2::new(0.0, -19.0), Vector2::new(50.0, 20.0), 0.0);
        let contact = tag.collide(&floor).unwrap();
        assert!(approx_eq(contact.normal.y, 1.0));
        assert!(approx_eq(contact.depth, 1.0));
    }
}
