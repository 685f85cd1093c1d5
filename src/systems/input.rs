//! Host input adapter.
//!
//! raylib exposes input as per-frame polled state. [`PointerAdapter`] diffs
//! consecutive [`RawPointerFrame`]s into discrete [`PointerInput`] events,
//! so the canvas sees the same down/move/up/leave stream for mouse and
//! touch. [`poll_pointer_frame`] reads the raw state from raylib.

use raylib::prelude::*;
use smallvec::SmallVec;

use crate::events::pointer::{PointerInput, PointerPhase, PointerSource};
use crate::resources::canvasplacement::CanvasPlacement;

/// Raw pointer state sampled once per frame, in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawPointerFrame {
    pub mouse: Vector2,
    pub mouse_down: bool,
    /// Mouse is inside the window and over the canvas rectangle.
    pub over_canvas: bool,
    /// First touch point, if a finger is down.
    pub touch: Option<Vector2>,
}

#[derive(Debug, Default)]
pub struct PointerAdapter {
    mouse_down: bool,
    last_mouse: Option<Vector2>,
    over_canvas: bool,
    touch: Option<Vector2>,
}

impl PointerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events implied by the change from the previous frame to `frame`.
    pub fn translate(&mut self, frame: RawPointerFrame) -> SmallVec<[PointerInput; 4]> {
        let mut events = SmallVec::new();

        match (self.touch, frame.touch) {
            (None, Some(p)) => events.push(PointerInput::new(PointerSource::Touch, PointerPhase::Down, p)),
            (Some(prev), Some(p)) if prev != p => {
                events.push(PointerInput::new(PointerSource::Touch, PointerPhase::Move, p))
            }
            (Some(prev), None) => {
                events.push(PointerInput::new(PointerSource::Touch, PointerPhase::Up, prev))
            }
            _ => {}
        }
        self.touch = frame.touch;

        let mouse = |phase| PointerInput::new(PointerSource::Mouse, phase, frame.mouse);
        if self.last_mouse != Some(frame.mouse) {
            events.push(mouse(PointerPhase::Move));
        }
        if frame.mouse_down && !self.mouse_down {
            events.push(mouse(PointerPhase::Down));
        } else if !frame.mouse_down && self.mouse_down {
            events.push(mouse(PointerPhase::Up));
        }
        if self.over_canvas && !frame.over_canvas {
            events.push(mouse(PointerPhase::Leave));
        }

        self.last_mouse = Some(frame.mouse);
        self.mouse_down = frame.mouse_down;
        self.over_canvas = frame.over_canvas;
        events
    }
}

/// Sample raylib's pointer state.
pub fn poll_pointer_frame(rl: &RaylibHandle, placement: &CanvasPlacement) -> RawPointerFrame {
    let mouse = rl.get_mouse_position();
    let mouse_down = rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT);
    // On desktop raylib mirrors the left button as touch point 0; only a
    // touch without a pressed mouse button is a real finger.
    let touch = (rl.get_touch_point_count() > 0 && !mouse_down).then(|| rl.get_touch_position(0));
    RawPointerFrame {
        mouse,
        mouse_down,
        over_canvas: rl.is_cursor_on_screen() && placement.contains_client(mouse),
        touch,
    }
}

/// F11 toggles the debug overlay.
pub fn debug_toggle_pressed(rl: &RaylibHandle) -> bool {
    rl.is_key_pressed(KeyboardKey::KEY_F11)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(x: f32, y: f32, down: bool) -> RawPointerFrame {
        RawPointerFrame {
            mouse: Vector2::new(x, y),
            mouse_down: down,
            over_canvas: true,
            touch: None,
        }
    }

    fn phases(events: &[PointerInput]) -> Vec<(PointerSource, PointerPhase)> {
        events.iter().map(|e| (e.source, e.phase)).collect()
    }

    #[test]
    fn test_mouse_click_and_drag() {
        let mut adapter = PointerAdapter::new();
        adapter.translate(frame(10.0, 10.0, false));

        let down = adapter.translate(frame(10.0, 10.0, true));
        assert_eq!(phases(&down), vec![(PointerSource::Mouse, PointerPhase::Down)]);

        let drag = adapter.translate(frame(20.0, 15.0, true));
        assert_eq!(phases(&drag), vec![(PointerSource::Mouse, PointerPhase::Move)]);
        assert_eq!(drag[0].client, Vector2::new(20.0, 15.0));

        let up = adapter.translate(frame(20.0, 15.0, false));
        assert_eq!(phases(&up), vec![(PointerSource::Mouse, PointerPhase::Up)]);

        assert!(adapter.translate(frame(20.0, 15.0, false)).is_empty());
    }

    #[test]
    fn test_leaving_canvas_emits_leave_once() {
        let mut adapter = PointerAdapter::new();
        adapter.translate(frame(10.0, 10.0, true));
        let outside = RawPointerFrame {
            over_canvas: false,
            ..frame(-5.0, 10.0, true)
        };
        let events = adapter.translate(outside);
        assert_eq!(
            phases(&events),
            vec![
                (PointerSource::Mouse, PointerPhase::Move),
                (PointerSource::Mouse, PointerPhase::Leave)
            ]
        );
        assert!(adapter.translate(outside).is_empty());
    }

    #[test]
    fn test_touch_sequence() {
        let mut adapter = PointerAdapter::new();
        adapter.translate(frame(0.0, 0.0, false));
        let touch = |p: Option<Vector2>| RawPointerFrame {
            touch: p,
            ..frame(0.0, 0.0, false)
        };

        let down = adapter.translate(touch(Some(Vector2::new(5.0, 5.0))));
        assert_eq!(phases(&down), vec![(PointerSource::Touch, PointerPhase::Down)]);
        let moved = adapter.translate(touch(Some(Vector2::new(6.0, 5.0))));
        assert_eq!(phases(&moved), vec![(PointerSource::Touch, PointerPhase::Move)]);
        let up = adapter.translate(touch(None));
        assert_eq!(phases(&up), vec![(PointerSource::Touch, PointerPhase::Up)]);
        assert_eq!(up[0].client, Vector2::new(6.0, 5.0));
    }
}
