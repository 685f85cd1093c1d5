//! The simulation container of one canvas.
//!
//! [`PhysicsWorld`] owns a boxed [`PhysicsBackend`], the four static walls
//! sized to the canvas at initialization and the fixed step length. It is
//! inserted as an ECS resource and is the only owner of tag bodies; tag
//! entities hold [`BodyId`]s into it.
//!
//! Walls are built once. A later window resize does not move them.

use bevy_ecs::prelude::Resource;
use fastrand::Rng;
use log::debug;
use raylib::prelude::{Rectangle, Vector2};

use super::body::{BodyDesc, Material};
use super::{BodyId, BodyTransform, ConstraintDesc, ConstraintId, PhysicsBackend, PhysicsError};

/// Thickness of the boundary walls placed just outside the canvas.
pub const WALL_THICKNESS: f32 = 20.0;
/// One conceptual step per animation frame.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Horizontal margin kept from the canvas edges when seeding tags.
const SPAWN_MARGIN_X: f32 = 50.0;
/// Top offset of the seeding band.
const SPAWN_TOP: f32 = 60.0;

#[derive(Resource)]
pub struct PhysicsWorld {
    backend: Box<dyn PhysicsBackend>,
    bounds: Rectangle,
    walls: [BodyId; 4],
    timestep: f32,
    steps: u64,
}

impl PhysicsWorld {
    /// Build the walls around a `width` x `height` canvas and set gravity.
    ///
    /// Fails only on a non-positive canvas size.
    pub fn initialize(
        mut backend: Box<dyn PhysicsBackend>,
        width: f32,
        height: f32,
        gravity: f32,
    ) -> Result<Self, PhysicsError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(PhysicsError::InvalidCanvas { width, height });
        }
        let half = WALL_THICKNESS / 2.0;
        let walls = [
            // bottom
            backend.create_body(BodyDesc::fixed(
                Vector2::new(width / 2.0, height + half),
                Vector2::new(width, WALL_THICKNESS),
            )),
            // top
            backend.create_body(BodyDesc::fixed(
                Vector2::new(width / 2.0, -half),
                Vector2::new(width, WALL_THICKNESS),
            )),
            // left
            backend.create_body(BodyDesc::fixed(
                Vector2::new(-half, height / 2.0),
                Vector2::new(WALL_THICKNESS, height),
            )),
            // right
            backend.create_body(BodyDesc::fixed(
                Vector2::new(width + half, height / 2.0),
                Vector2::new(WALL_THICKNESS, height),
            )),
        ];
        let bounds = Rectangle {
            x: 0.0,
            y: 0.0,
            width,
            height,
        };
        backend.set_bounds(bounds);
        backend.set_gravity(Vector2::new(0.0, gravity));
        debug!("Physics world {}x{} with gravity {}", width, height, gravity);

        Ok(Self {
            backend,
            bounds,
            walls,
            timestep: FIXED_TIMESTEP,
            steps: 0,
        })
    }

    /// Create a tag body of `size` at a random spot in the upper band of the
    /// canvas, so tags visibly fall after mount.
    pub fn spawn_tag_body(&mut self, size: Vector2, rng: &mut Rng) -> BodyId {
        let position = initial_position(self.bounds.width, self.bounds.height, rng);
        self.backend
            .create_body(BodyDesc::dynamic(position, size, Material::TAG))
    }

    /// Advance by one fixed step.
    pub fn step(&mut self) -> Result<(), PhysicsError> {
        self.backend.step(self.timestep)?;
        self.steps += 1;
        Ok(())
    }

    pub fn create_constraint(&mut self, desc: ConstraintDesc) -> Result<ConstraintId, PhysicsError> {
        self.backend.create_constraint(desc)
    }

    pub fn remove_constraint(&mut self, id: ConstraintId) -> bool {
        self.backend.remove_constraint(id)
    }

    pub fn set_constraint_anchor(
        &mut self,
        id: ConstraintId,
        anchor: Vector2,
    ) -> Result<(), PhysicsError> {
        self.backend.set_constraint_anchor(id, anchor)
    }

    pub fn transform(&self, id: BodyId) -> Option<BodyTransform> {
        self.backend.body_transform(id)
    }

    pub fn constraint_count(&self) -> usize {
        self.backend.constraint_count()
    }

    pub fn gravity(&self) -> Vector2 {
        self.backend.gravity()
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn walls(&self) -> &[BodyId; 4] {
        &self.walls
    }

    /// Number of steps taken since initialization.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

/// Random center in `[50, width-50] x [60, height/2 + 60]`.
pub fn initial_position(width: f32, height: f32, rng: &mut Rng) -> Vector2 {
    Vector2::new(
        rng.f32() * (width - 2.0 * SPAWN_MARGIN_X) + SPAWN_MARGIN_X,
        rng.f32() * (height / 2.0) + SPAWN_TOP,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::solver::ImpulseWorld;

    fn world(width: f32, height: f32) -> Result<PhysicsWorld, PhysicsError> {
        PhysicsWorld::initialize(Box::new(ImpulseWorld::default()), width, height, 450.0)
    }

    #[test]
    fn test_initialize_rejects_non_positive_canvas() {
        assert!(matches!(
            world(0.0, 400.0),
            Err(PhysicsError::InvalidCanvas { .. })
        ));
        assert!(matches!(
            world(400.0, -1.0),
            Err(PhysicsError::InvalidCanvas { .. })
        ));
    }

    #[test]
    fn test_walls_surround_canvas() {
        let w = world(400.0, 300.0).unwrap();
        let [bottom, top, left, right] = *w.walls();
        assert_eq!(w.transform(bottom).unwrap().position.y, 310.0);
        assert_eq!(w.transform(top).unwrap().position.y, -10.0);
        assert_eq!(w.transform(left).unwrap().position.x, -10.0);
        assert_eq!(w.transform(right).unwrap().position.x, 410.0);
    }

    #[test]
    fn test_walls_never_move() {
        let mut w = world(400.0, 300.0).unwrap();
        let before: Vec<_> = w.walls().iter().map(|id| w.transform(*id).unwrap()).collect();
        for _ in 0..30 {
            w.step().unwrap();
        }
        let after: Vec<_> = w.walls().iter().map(|id| w.transform(*id).unwrap()).collect();
        assert_eq!(before, after);
        assert_eq!(w.steps(), 30);
    }

    #[test]
    fn test_initial_position_band() {
        let mut rng = Rng::with_seed(42);
        for _ in 0..500 {
            let p = initial_position(400.0, 400.0, &mut rng);
            assert!((50.0..=350.0).contains(&p.x));
            assert!((60.0..=260.0).contains(&p.y));
        }
    }

    #[test]
    fn test_gravity_is_vertical() {
        let w = world(400.0, 300.0).unwrap();
        assert_eq!(w.gravity().x, 0.0);
        assert_eq!(w.gravity().y, 450.0);
    }
}
