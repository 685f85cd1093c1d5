//! High-density backing texture of the canvas.
//!
//! The canvas is drawn into a render texture of `logical size × dpr` pixels
//! with a 2D camera zoomed by `dpr`, so drawing code always works in logical
//! pixels and the result stays crisp on HiDPI screens. The scale is fixed at
//! creation.
//!
//! # Note
//! Holds GPU resources: keep it on the main thread.

use raylib::ffi::{self, TextureFilter};
use raylib::prelude::*;

pub struct CanvasTarget {
    pub texture: RenderTexture2D,
    pub logical_width: u32,
    pub logical_height: u32,
    /// Device pixel ratio applied once at creation.
    pub dpr: f32,
}

/// Physical backing size for a logical size and pixel ratio.
pub fn backing_size(logical_width: u32, logical_height: u32, dpr: f32) -> (u32, u32) {
    let dpr = sanitize_dpr(dpr);
    (
        ((logical_width as f32) * dpr).round().max(1.0) as u32,
        ((logical_height as f32) * dpr).round().max(1.0) as u32,
    )
}

/// Ratios below 1 or non-finite fall back to 1.
pub fn sanitize_dpr(dpr: f32) -> f32 {
    if dpr.is_finite() && dpr >= 1.0 { dpr } else { 1.0 }
}

impl CanvasTarget {
    pub fn new(
        rl: &mut RaylibHandle,
        th: &RaylibThread,
        logical_width: u32,
        logical_height: u32,
        dpr: f32,
    ) -> Result<Self, String> {
        let dpr = sanitize_dpr(dpr);
        let (w, h) = backing_size(logical_width, logical_height, dpr);
        let texture = rl
            .load_render_texture(th, w, h)
            .map_err(|e| format!("Failed to create render texture: {}", e))?;

        unsafe {
            ffi::SetTextureFilter(
                texture.texture,
                TextureFilter::TEXTURE_FILTER_BILINEAR as i32,
            );
        }

        Ok(Self {
            texture,
            logical_width,
            logical_height,
            dpr,
        })
    }

    /// Camera mapping logical canvas pixels onto the backing texture.
    pub fn camera(&self) -> Camera2D {
        Camera2D {
            offset: Vector2::zero(),
            target: Vector2::zero(),
            rotation: 0.0,
            zoom: self.dpr,
        }
    }

    /// Source rectangle covering the whole texture, Y flipped for OpenGL.
    pub fn source_rect(&self) -> Rectangle {
        let (w, h) = backing_size(self.logical_width, self.logical_height, self.dpr);
        Rectangle {
            x: 0.0,
            y: 0.0,
            width: w as f32,
            height: -(h as f32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backing_size_scales_by_dpr() {
        assert_eq!(backing_size(400, 300, 2.0), (800, 600));
        assert_eq!(backing_size(400, 300, 1.5), (600, 450));
    }

    #[test]
    fn test_bad_dpr_falls_back_to_one() {
        assert_eq!(sanitize_dpr(f32::NAN), 1.0);
        assert_eq!(sanitize_dpr(0.0), 1.0);
        assert_eq!(backing_size(400, 300, 0.5), (400, 300));
    }
}
