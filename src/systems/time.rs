//! Frame clock update.
//!
//! Physics uses a fixed step per frame, so wall-clock time here is only
//! informational (debug overlay, logs).
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Record one executed frame that took `dt` seconds of wall-clock time.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    wt.elapsed += dt;
    wt.delta = dt;
    wt.frames += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_world_time_counts_frames() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        update_world_time(&mut world, 0.5);
        update_world_time(&mut world, 0.25);
        let wt = world.resource::<WorldTime>();
        assert_eq!(wt.frames, 2);
        assert_eq!(wt.elapsed, 0.75);
        assert_eq!(wt.delta, 0.25);
    }
}
