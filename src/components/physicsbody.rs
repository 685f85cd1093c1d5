//! Link from a tag entity to its body in the physics backend.

use bevy_ecs::prelude::Component;

use crate::physics::BodyId;

/// Handle of the body simulating this entity.
///
/// The body itself is owned by the [`PhysicsWorld`]; read its pose through
/// [`PhysicsWorld::transform`].
///
/// [`PhysicsWorld`]: crate::physics::world::PhysicsWorld
/// [`PhysicsWorld::transform`]: crate::physics::world::PhysicsWorld::transform
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicsBody(pub BodyId);
