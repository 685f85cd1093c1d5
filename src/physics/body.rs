//! Rigid rectangle simulated by the impulse backend.
//!
//! A [`RigidBody`] stores position, rotation, linear and angular velocity and
//! the material coefficients used when it touches another body. Static bodies
//! (the canvas walls) have zero inverse mass and inertia and are never
//! integrated.

use raylib::prelude::Vector2;

use super::math::{cross, is_finite, scale};
use super::shape::OrientedBox;

/// Surface and damping coefficients of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Coulomb friction coefficient. Pairs use the smaller of both values.
    pub friction: f32,
    /// Bounciness. Pairs use the larger of both values.
    pub restitution: f32,
    /// Fraction of velocity lost every step (0.0 = none).
    pub air_friction: f32,
}

impl Material {
    /// Chips: grippy, very bouncy, settle gradually.
    pub const TAG: Material = Material {
        friction: 0.4,
        restitution: 0.9,
        air_friction: 0.05,
    };

    /// Canvas walls.
    pub const WALL: Material = Material {
        friction: 0.1,
        restitution: 0.0,
        air_friction: 0.0,
    };
}

impl Default for Material {
    fn default() -> Self {
        Material::TAG
    }
}

/// Everything needed to create a body.
#[derive(Clone, Copy, Debug)]
pub struct BodyDesc {
    /// Center position in canvas pixels.
    pub position: Vector2,
    /// Full width and height in pixels.
    pub size: Vector2,
    pub angle: f32,
    pub material: Material,
    pub is_static: bool,
}

impl BodyDesc {
    pub fn dynamic(position: Vector2, size: Vector2, material: Material) -> Self {
        Self {
            position,
            size,
            angle: 0.0,
            material,
            is_static: false,
        }
    }

    pub fn fixed(position: Vector2, size: Vector2) -> Self {
        Self {
            position,
            size,
            angle: 0.0,
            material: Material::WALL,
            is_static: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RigidBody {
    pub position: Vector2,
    /// Rotation in radians.
    pub angle: f32,
    /// Pixels per second.
    pub velocity: Vector2,
    /// Radians per second.
    pub angular_velocity: f32,
    pub half_extents: Vector2,
    pub inv_mass: f32,
    pub inv_inertia: f32,
    pub material: Material,
    pub is_static: bool,
    /// Optional maximum speed. If set, velocity magnitude is clamped to this value.
    pub max_speed: Option<f32>,
}

impl RigidBody {
    /// Build a body from its description. Mass is `width * height * density`
    /// and the moment of inertia is the solid rectangle's `m (w² + h²) / 12`.
    pub fn from_desc(desc: &BodyDesc, density: f32) -> Self {
        let (inv_mass, inv_inertia) = if desc.is_static {
            (0.0, 0.0)
        } else {
            let w = desc.size.x.max(1.0);
            let h = desc.size.y.max(1.0);
            let mass = (w * h * density).max(f32::EPSILON);
            let inertia = mass * (w * w + h * h) / 12.0;
            (1.0 / mass, 1.0 / inertia)
        };
        Self {
            position: desc.position,
            angle: desc.angle,
            velocity: Vector2::zero(),
            angular_velocity: 0.0,
            half_extents: scale(desc.size, 0.5),
            inv_mass,
            inv_inertia,
            material: desc.material,
            is_static: desc.is_static,
            max_speed: None,
        }
    }

    pub fn shape(&self) -> OrientedBox {
        OrientedBox::new(self.position, self.half_extents, self.angle)
    }

    /// Advance velocity and pose by one step of `dt` seconds.
    pub fn integrate(&mut self, gravity: Vector2, dt: f32) {
        if self.is_static {
            return;
        }
        let damping = (1.0 - self.material.air_friction).clamp(0.0, 1.0);
        self.velocity = scale(self.velocity + scale(gravity, dt), damping);
        self.angular_velocity *= damping;
        self.sanitize();
        self.clamp_speed();
        self.position = self.position + scale(self.velocity, dt);
        self.angle += self.angular_velocity * dt;
    }

    /// Apply an impulse at `offset` from the center of mass.
    pub fn apply_impulse(&mut self, impulse: Vector2, offset: Vector2) {
        if self.is_static {
            return;
        }
        self.velocity = self.velocity + scale(impulse, self.inv_mass);
        self.angular_velocity += self.inv_inertia * cross(offset, impulse);
    }

    /// Clamp velocity magnitude to `max_speed`, keeping its direction.
    pub fn clamp_speed(&mut self) {
        if let Some(max_speed) = self.max_speed {
            let speed = self.velocity.length();
            if speed > max_speed && speed > 0.0 {
                self.velocity = scale(self.velocity, max_speed / speed);
            }
        }
    }

    /// Drop non-finite velocities instead of letting them poison the pose.
    fn sanitize(&mut self) {
        if !is_finite(self.velocity) {
            self.velocity = Vector2::zero();
        }
        if !self.angular_velocity.is_finite() {
            self.angular_velocity = 0.0;
        }
    }
}
