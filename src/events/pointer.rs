//! Normalized pointer input.
//!
//! Mouse and touch input reach the canvas in one shape. The host adapter
//! produces [`PointerInput`] in window (client) coordinates;
//! [`TagCanvas::dispatch_pointer`] converts it to canvas-local coordinates
//! and triggers a [`CanvasPointerEvent`] that the pointer observer handles.
//!
//! [`TagCanvas::dispatch_pointer`]: crate::canvas::TagCanvas::dispatch_pointer

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerSource {
    Mouse,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Pointer left the canvas surface; ends a drag like `Up`.
    Leave,
}

/// Host-side pointer sample in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub source: PointerSource,
    pub phase: PointerPhase,
    pub client: Vector2,
}

impl PointerInput {
    pub fn new(source: PointerSource, phase: PointerPhase, client: Vector2) -> Self {
        Self {
            source,
            phase,
            client,
        }
    }

    pub fn mouse(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self::new(PointerSource::Mouse, phase, Vector2::new(x, y))
    }

    pub fn touch(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self::new(PointerSource::Touch, phase, Vector2::new(x, y))
    }
}

/// Pointer event in canvas-local coordinates.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct CanvasPointerEvent {
    pub source: PointerSource,
    pub phase: PointerPhase,
    pub position: Vector2,
}

/// Whether the host should still apply its default handling (scrolling,
/// gestures) to the event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputDisposition {
    #[default]
    PassThrough,
    /// The canvas used the event; suppress default handling.
    Consumed,
}
