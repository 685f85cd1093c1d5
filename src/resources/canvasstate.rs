//! Lifecycle of one mounted canvas.
//!
//! `Uninitialized → Loading → Running → TornDown`. Transitions only move
//! forward; `TornDown` is reachable from every state and is terminal.

use bevy_ecs::prelude::Resource;
use log::info;

use crate::physics::PhysicsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CanvasStates {
    #[default]
    Uninitialized,
    /// Bodies exist, icons may still be loading.
    Loading,
    /// Stepping, rendering and reacting to the pointer.
    Running,
    TornDown,
}

impl CanvasStates {
    fn can_transition_to(self, next: CanvasStates) -> bool {
        use CanvasStates::*;
        matches!(
            (self, next),
            (Uninitialized, Loading) | (Loading, Running) | (Uninitialized | Loading | Running, TornDown)
        )
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub struct CanvasState {
    current: CanvasStates,
}

impl CanvasState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> CanvasStates {
        self.current
    }

    /// Move to `next` if the lifecycle allows it. Returns whether the state
    /// changed.
    pub fn advance(&mut self, next: CanvasStates) -> bool {
        if !self.current.can_transition_to(next) {
            return false;
        }
        info!("Canvas state {:?} -> {:?}", self.current, next);
        self.current = next;
        true
    }

    pub fn is_running(&self) -> bool {
        self.current == CanvasStates::Running
    }

    pub fn is_torn_down(&self) -> bool {
        self.current == CanvasStates::TornDown
    }
}

/// Inserted by the physics step when the backend fails. The canvas stops
/// on the next check instead of rendering undefined state.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PhysicsFault(pub PhysicsError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        let mut state = CanvasState::new();
        assert_eq!(state.get(), CanvasStates::Uninitialized);
        assert!(state.advance(CanvasStates::Loading));
        assert!(state.advance(CanvasStates::Running));
        assert!(state.is_running());
        assert!(state.advance(CanvasStates::TornDown));
        assert!(state.is_torn_down());
    }

    #[test]
    fn test_no_way_back() {
        let mut state = CanvasState::new();
        state.advance(CanvasStates::Loading);
        state.advance(CanvasStates::Running);
        assert!(!state.advance(CanvasStates::Loading));
        state.advance(CanvasStates::TornDown);
        assert!(!state.advance(CanvasStates::Running));
        assert!(!state.advance(CanvasStates::TornDown));
    }

    #[test]
    fn test_cannot_skip_loading() {
        let mut state = CanvasState::new();
        assert!(!state.advance(CanvasStates::Running));
        assert!(state.advance(CanvasStates::TornDown));
    }
}
