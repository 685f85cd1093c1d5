//! Where the canvas sits inside the host window.
//!
//! The canvas keeps its logical size for its whole life, but its origin
//! moves whenever the window is resized (it is kept centred). The host
//! recomputes the placement every frame and passes the current origin with
//! each pointer event, so client coordinates are never converted with a
//! stale origin.

use raylib::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasPlacement {
    /// Top-left corner of the canvas in window coordinates.
    pub origin: Vector2,
    /// Logical canvas size in pixels.
    pub size: Vector2,
}

impl CanvasPlacement {
    /// Center a `size` canvas inside a `window_w` x `window_h` window.
    ///
    /// A window smaller than the canvas yields a negative origin; the canvas
    /// is then cropped, never scaled.
    pub fn centered(window_w: i32, window_h: i32, size: Vector2) -> Self {
        Self {
            origin: Vector2::new(
                ((window_w as f32 - size.x) / 2.0).floor(),
                ((window_h as f32 - size.y) / 2.0).floor(),
            ),
            size,
        }
    }

    /// Window rectangle covered by the canvas.
    pub fn dest_rect(&self) -> Rectangle {
        Rectangle {
            x: self.origin.x,
            y: self.origin.y,
            width: self.size.x,
            height: self.size.y,
        }
    }

    pub fn client_to_local(&self, client: Vector2) -> Vector2 {
        client - self.origin
    }

    pub fn contains_client(&self, client: Vector2) -> bool {
        let local = self.client_to_local(client);
        local.x >= 0.0 && local.y >= 0.0 && local.x < self.size.x && local.y < self.size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_origin() {
        let p = CanvasPlacement::centered(1000, 600, Vector2::new(400.0, 400.0));
        assert_eq!(p.origin, Vector2::new(300.0, 100.0));
        assert_eq!(p.dest_rect().width, 400.0);
    }

    #[test]
    fn test_client_to_local_follows_resize() {
        let size = Vector2::new(400.0, 400.0);
        let client = Vector2::new(500.0, 300.0);
        let before = CanvasPlacement::centered(1000, 600, size);
        let after = CanvasPlacement::centered(800, 600, size);
        assert_eq!(before.client_to_local(client), Vector2::new(200.0, 200.0));
        assert_eq!(after.client_to_local(client), Vector2::new(300.0, 200.0));
    }

    #[test]
    fn test_contains_client() {
        let p = CanvasPlacement::centered(400, 400, Vector2::new(400.0, 400.0));
        assert!(p.contains_client(Vector2::new(0.0, 0.0)));
        assert!(!p.contains_client(Vector2::new(400.0, 10.0)));
        assert!(!p.contains_client(Vector2::new(-1.0, 10.0)));
    }
}
