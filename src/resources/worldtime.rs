use bevy_ecs::prelude::Resource;

/// Frame bookkeeping of a canvas. `frames` counts executed frames, loading
/// frames included.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub frames: u64,
}
