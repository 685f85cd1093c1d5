//! Fixed-step physics system.
//!
//! Runs once per frame while the canvas is `Running`. A backend failure is
//! not retried: it is logged and recorded as a [`PhysicsFault`], and the
//! canvas stops before drawing anything from the broken state.

use bevy_ecs::prelude::*;
use log::error;

use crate::physics::world::PhysicsWorld;
use crate::resources::canvasstate::PhysicsFault;

pub fn step_physics(
    mut physics: ResMut<PhysicsWorld>,
    fault: Option<Res<PhysicsFault>>,
    mut commands: Commands,
) {
    if fault.is_some() {
        return;
    }
    if let Err(e) = physics.step() {
        error!("Physics step {} failed: {}", physics.steps() + 1, e);
        commands.insert_resource(PhysicsFault(e));
    }
}
