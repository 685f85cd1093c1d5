//! Sequential-impulse backend for oriented rectangles.
//!
//! Each [`ImpulseWorld::step`] runs, in order:
//! 1. integration of gravity and air friction into every dynamic body,
//! 2. positional drag constraints (the correction is fed back into velocity
//!    so a released tag keeps its throw),
//! 3. a few iterations of box-vs-box contact resolution (positional push-out
//!    plus restitution and Coulomb friction impulses with angular terms),
//! 4. containment: every dynamic body's rotated bounding box is clamped into
//!    the bounds rectangle and the offending velocity component reflected.
//!
//! The last pass is what keeps tags inside the walls no matter how large the
//! gravity or velocity gets; the contact pass alone can tunnel at extreme
//! speeds.

use raylib::prelude::{Rectangle, Vector2};

use super::body::{BodyDesc, RigidBody};
use super::math::{cross, cross_sv, dot, is_finite, scale};
use super::shape::Contact;
use super::{BodyId, BodyTransform, ConstraintDesc, ConstraintId, PhysicsBackend, PhysicsError};

/// Tuning knobs of the impulse solver.
#[derive(Clone, Copy, Debug)]
pub struct SolverSettings {
    /// Contact resolution passes per step.
    pub iterations: usize,
    /// Mass per square pixel.
    pub density: f32,
    /// Impacts slower than this (px/s) do not bounce.
    pub resting_threshold: f32,
    /// Speed clamp applied to dynamic bodies (px/s).
    pub max_speed: Option<f32>,
    /// Penetration tolerated before positional correction kicks in.
    pub position_slop: f32,
    /// Fraction of the remaining penetration removed per pass.
    pub position_percent: f32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            iterations: 4,
            density: 0.001,
            resting_threshold: 30.0,
            max_speed: Some(4000.0),
            position_slop: 0.5,
            position_percent: 0.8,
        }
    }
}

#[derive(Debug)]
pub struct ImpulseWorld {
    bodies: Vec<RigidBody>,
    constraints: Vec<Option<ConstraintDesc>>,
    gravity: Vector2,
    bounds: Option<Rectangle>,
    settings: SolverSettings,
}

impl Default for ImpulseWorld {
    fn default() -> Self {
        Self::new(SolverSettings::default())
    }
}

impl ImpulseWorld {
    pub fn new(settings: SolverSettings) -> Self {
        Self {
            bodies: Vec::new(),
            constraints: Vec::new(),
            gravity: Vector2::zero(),
            bounds: None,
            settings,
        }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(id.0 as usize)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id.0 as usize)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| (BodyId(i as u32), body))
    }

    fn solve_constraints(&mut self, dt: f32) {
        for constraint in self.constraints.iter().flatten() {
            let Some(body) = self.bodies.get_mut(constraint.body.0 as usize) else {
                continue;
            };
            if body.is_static {
                continue;
            }
            let offset = constraint.anchor - body.position;
            let distance = offset.length();
            let stretch = if constraint.length > 0.0 && distance > f32::EPSILON {
                offset - scale(offset, constraint.length / distance)
            } else {
                offset
            };
            let correction = scale(stretch, constraint.stiffness.clamp(0.0, 1.0));
            body.position = body.position + correction;
            body.velocity = body.velocity + scale(correction, 1.0 / dt);
            body.clamp_speed();
        }
    }

    fn solve_contacts(&mut self) {
        let count = self.bodies.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (a, b) = pair_mut(&mut self.bodies, i, j);
                if a.is_static && b.is_static {
                    continue;
                }
                if let Some(contact) = a.shape().collide(&b.shape()) {
                    resolve_contact(a, b, &contact, &self.settings);
                }
            }
        }
    }

    fn contain_bodies(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let threshold = self.settings.resting_threshold;
        for body in self.bodies.iter_mut().filter(|b| !b.is_static) {
            let ext = body.shape().aabb_half_extents();
            let restitution = body.material.restitution;
            let (x, vx) = contain_axis(
                body.position.x,
                body.velocity.x,
                ext.x,
                (bounds.x, bounds.x + bounds.width),
                restitution,
                threshold,
            );
            let (y, vy) = contain_axis(
                body.position.y,
                body.velocity.y,
                ext.y,
                (bounds.y, bounds.y + bounds.height),
                restitution,
                threshold,
            );
            body.position = Vector2::new(x, y);
            body.velocity = Vector2::new(vx, vy);
        }
    }

    fn check_finite(&self) -> Result<(), PhysicsError> {
        for (id, body) in self.bodies() {
            if !is_finite(body.position) || !body.angle.is_finite() {
                return Err(PhysicsError::NonFinite(id));
            }
        }
        Ok(())
    }
}

impl PhysicsBackend for ImpulseWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId {
        let mut body = RigidBody::from_desc(&desc, self.settings.density);
        if !body.is_static {
            body.max_speed = self.settings.max_speed;
        }
        self.bodies.push(body);
        BodyId((self.bodies.len() - 1) as u32)
    }

    fn step(&mut self, dt: f32) -> Result<(), PhysicsError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        let gravity = if is_finite(self.gravity) {
            self.gravity
        } else {
            Vector2::zero()
        };
        for body in self.bodies.iter_mut() {
            body.integrate(gravity, dt);
        }
        self.solve_constraints(dt);
        for _ in 0..self.settings.iterations.max(1) {
            self.solve_contacts();
        }
        self.contain_bodies();
        self.check_finite()
    }

    fn create_constraint(&mut self, desc: ConstraintDesc) -> Result<ConstraintId, PhysicsError> {
        if self.body(desc.body).is_none() {
            return Err(PhysicsError::UnknownBody(desc.body));
        }
        let slot = match self.constraints.iter().position(Option::is_none) {
            Some(free) => {
                self.constraints[free] = Some(desc);
                free
            }
            None => {
                self.constraints.push(Some(desc));
                self.constraints.len() - 1
            }
        };
        Ok(ConstraintId(slot as u32))
    }

    fn remove_constraint(&mut self, id: ConstraintId) -> bool {
        self.constraints
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .is_some()
    }

    fn set_constraint_anchor(
        &mut self,
        id: ConstraintId,
        anchor: Vector2,
    ) -> Result<(), PhysicsError> {
        match self.constraints.get_mut(id.0 as usize) {
            Some(Some(constraint)) => {
                constraint.anchor = anchor;
                Ok(())
            }
            _ => Err(PhysicsError::UnknownConstraint(id)),
        }
    }

    fn body_transform(&self, id: BodyId) -> Option<BodyTransform> {
        self.body(id).map(|body| BodyTransform {
            position: body.position,
            angle: body.angle,
            velocity: body.velocity,
        })
    }

    fn gravity(&self) -> Vector2 {
        self.gravity
    }

    fn set_gravity(&mut self, gravity: Vector2) {
        self.gravity = gravity;
    }

    fn set_bounds(&mut self, bounds: Rectangle) {
        self.bounds = Some(bounds);
    }

    fn constraint_count(&self) -> usize {
        self.constraints.iter().flatten().count()
    }
}

/// Two distinct mutable elements of a slice, `i < j`.
fn pair_mut(bodies: &mut [RigidBody], i: usize, j: usize) -> (&mut RigidBody, &mut RigidBody) {
    let (left, right) = bodies.split_at_mut(j);
    (&mut left[i], &mut right[0])
}

fn resolve_contact(
    a: &mut RigidBody,
    b: &mut RigidBody,
    contact: &Contact,
    settings: &SolverSettings,
) {
    let inv_mass_sum = a.inv_mass + b.inv_mass;
    if inv_mass_sum <= 0.0 {
        return;
    }
    let n = contact.normal;

    let push = (contact.depth - settings.position_slop).max(0.0) * settings.position_percent
        / inv_mass_sum;
    a.position = a.position - scale(n, push * a.inv_mass);
    b.position = b.position + scale(n, push * b.inv_mass);

    let restitution = a.material.restitution.max(b.material.restitution);
    let friction = a.material.friction.min(b.material.friction);
    let share = 1.0 / contact.points.len() as f32;

    for &point in contact.points.iter() {
        let ra = point - a.position;
        let rb = point - b.position;
        let relative = relative_velocity(a, b, ra, rb);
        let vn = dot(relative, n);
        if vn >= 0.0 {
            continue;
        }

        let ra_n = cross(ra, n);
        let rb_n = cross(rb, n);
        let denom = inv_mass_sum + ra_n * ra_n * a.inv_inertia + rb_n * rb_n * b.inv_inertia;
        if denom <= 0.0 {
            continue;
        }
        let bounce = if -vn < settings.resting_threshold {
            0.0
        } else {
            restitution
        };
        let jn = -(1.0 + bounce) * vn / denom * share;
        let impulse = scale(n, jn);
        a.apply_impulse(scale(impulse, -1.0), ra);
        b.apply_impulse(impulse, rb);

        let relative = relative_velocity(a, b, ra, rb);
        let tangential = relative - scale(n, dot(relative, n));
        let speed = tangential.length();
        if speed <= f32::EPSILON {
            continue;
        }
        let t = scale(tangential, 1.0 / speed);
        let ra_t = cross(ra, t);
        let rb_t = cross(rb, t);
        let denom_t = inv_mass_sum + ra_t * ra_t * a.inv_inertia + rb_t * rb_t * b.inv_inertia;
        if denom_t <= 0.0 {
            continue;
        }
        let max_friction = friction * jn;
        let jt = (-dot(relative, t) / denom_t * share).clamp(-max_friction, max_friction);
        let friction_impulse = scale(t, jt);
        a.apply_impulse(scale(friction_impulse, -1.0), ra);
        b.apply_impulse(friction_impulse, rb);
    }
    a.clamp_speed();
    b.clamp_speed();
}

fn relative_velocity(a: &RigidBody, b: &RigidBody, ra: Vector2, rb: Vector2) -> Vector2 {
    (b.velocity + cross_sv(b.angular_velocity, rb)) - (a.velocity + cross_sv(a.angular_velocity, ra))
}

/// Clamp one coordinate so `[pos - ext, pos + ext]` fits in `range`.
///
/// A body wider than the range is centered and stopped.
fn contain_axis(
    pos: f32,
    vel: f32,
    ext: f32,
    range: (f32, f32),
    restitution: f32,
    resting_threshold: f32,
) -> (f32, f32) {
    let (lo, hi) = range;
    let min = lo + ext;
    let max = hi - ext;
    if pos.is_nan() || min > max {
        return ((lo + hi) * 0.5, 0.0);
    }
    let bounce = |v: f32| {
        if v.abs() < resting_threshold {
            0.0
        } else {
            -v * restitution
        }
    };
    if pos < min {
        (min, if vel < 0.0 { bounce(vel) } else { vel })
    } else if pos > max {
        (max, if vel > 0.0 { bounce(vel) } else { vel })
    } else {
        (pos, vel)
    }
}
