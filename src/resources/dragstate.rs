//! Drag bookkeeping for the pointer controller.
//!
//! [`DragState`] holds the single active drag constraint of a canvas, if any.
//! Only the pointer observer writes it. [`PointerFeedback`] is the observer's
//! answer to the host for the event it just handled.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use crate::events::pointer::{InputDisposition, PointerSource};
use crate::physics::ConstraintId;

/// Spring stiffness of the drag constraint: strong, not rigid.
pub const DRAG_STIFFNESS: f32 = 0.9;
/// Rest length of the drag constraint.
pub const DRAG_LENGTH: f32 = 0.0;

/// The constraint currently pinning a tag to the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveDrag {
    pub tag: Entity,
    pub constraint: ConstraintId,
    /// Device that started the drag.
    pub source: PointerSource,
    /// Latest pointer position in canvas-local coordinates.
    pub anchor: Vector2,
}

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DragState {
    active: Option<ActiveDrag>,
}

impl DragState {
    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Record a new drag. Returns false, leaving the current drag untouched,
    /// if one is already active.
    pub fn begin(&mut self, drag: ActiveDrag) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(drag);
        true
    }

    pub fn move_anchor(&mut self, anchor: Vector2) -> Option<ConstraintId> {
        let drag = self.active.as_mut()?;
        drag.anchor = anchor;
        Some(drag.constraint)
    }

    /// Clear the drag, handing back what was active.
    pub fn end(&mut self) -> Option<ActiveDrag> {
        self.active.take()
    }
}

/// Result of the last pointer event delivered to the canvas.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PointerFeedback {
    /// Pointer events handled since mount.
    pub handled: u64,
    pub last_disposition: InputDisposition,
}
