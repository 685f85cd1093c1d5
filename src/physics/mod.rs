//! Rigid-body simulation behind a narrow, swappable interface.
//!
//! The canvas only talks to physics through [`PhysicsBackend`]: create
//! bodies, step, and create/move/remove drag constraints. The shipped
//! implementation is [`solver::ImpulseWorld`]; [`world::PhysicsWorld`] wraps
//! any backend together with the canvas walls and is stored as an ECS
//! resource.
//!
//! Submodules overview:
//! - [`body`] – rigid rectangle state and material coefficients
//! - [`math`] – scalar helpers over raylib's `Vector2`
//! - [`shape`] – oriented boxes and the separating-axis contact test
//! - [`solver`] – the impulse backend
//! - [`world`] – walls, tag body placement and the fixed timestep

pub mod body;
pub mod math;
pub mod shape;
pub mod solver;
pub mod world;

use raylib::prelude::{Rectangle, Vector2};
use thiserror::Error;

pub use body::{BodyDesc, Material};

/// Handle of a body inside a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

/// Handle of a constraint inside a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstraintId(pub u32);

/// Snapshot of a body's pose, read by the pointer controller and renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyTransform {
    pub position: Vector2,
    /// Rotation in radians.
    pub angle: f32,
    pub velocity: Vector2,
}

/// Spring pinning one body's center to a moving world-space anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintDesc {
    pub body: BodyId,
    pub anchor: Vector2,
    /// 0.0 (no pull) ..= 1.0 (rigid).
    pub stiffness: f32,
    /// Rest distance between body center and anchor.
    pub length: f32,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("canvas size must be positive, got {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("invalid timestep: {0}")]
    InvalidTimestep(f32),
    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),
    #[error("unknown constraint {0:?}")]
    UnknownConstraint(ConstraintId),
    #[error("simulation state became non-finite on body {0:?}")]
    NonFinite(BodyId),
}

/// Capability a simulation backend must provide.
///
/// Backends own every body exclusively; callers only keep [`BodyId`]s.
pub trait PhysicsBackend: Send + Sync {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId;

    /// Advance the simulation by `dt` seconds.
    fn step(&mut self, dt: f32) -> Result<(), PhysicsError>;

    fn create_constraint(&mut self, desc: ConstraintDesc) -> Result<ConstraintId, PhysicsError>;

    /// Remove a constraint. Returns false if it did not exist.
    fn remove_constraint(&mut self, id: ConstraintId) -> bool;

    fn set_constraint_anchor(&mut self, id: ConstraintId, anchor: Vector2)
    -> Result<(), PhysicsError>;

    fn body_transform(&self, id: BodyId) -> Option<BodyTransform>;

    fn gravity(&self) -> Vector2;

    fn set_gravity(&mut self, gravity: Vector2);

    /// Inner rectangle every dynamic body must stay inside.
    fn set_bounds(&mut self, bounds: Rectangle);

    fn constraint_count(&self) -> usize;
}
