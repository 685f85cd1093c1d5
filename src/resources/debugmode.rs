//! Debug overlay toggle.
//!
//! While this resource exists the draw list ends with hit circles and a
//! status line. F11 on the host toggles it.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug)]
pub struct DebugMode {}
