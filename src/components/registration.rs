//! Registration order of tags.
//!
//! The [`Registration`] index is assigned at mount in tag-set order and never
//! changes. It drives both hit-test priority (earlier wins) and painting
//! order (later is drawn on top).

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Registration(pub u32);
