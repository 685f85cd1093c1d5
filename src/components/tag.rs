//! Tag chip component.
//!
//! A [`Tag`] carries the immutable display metadata of one draggable chip.
//! Its physical body lives in the [`PhysicsWorld`] and is referenced through
//! the sibling [`PhysicsBody`] component.
//!
//! [`PhysicsWorld`]: crate::physics::world::PhysicsWorld
//! [`PhysicsBody`]: crate::components::physicsbody::PhysicsBody

use std::path::PathBuf;

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Vector2};

/// Fixed chip height in pixels.
pub const TAG_HEIGHT: f32 = 40.0;
/// Upper bound of the chip width in pixels.
pub const TAG_MAX_WIDTH: f32 = 150.0;
/// Extra radius added around a chip for pointer hit-testing.
pub const HIT_SLOP: f32 = 10.0;

/// What is drawn at the left of the chip, before the label.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum TagIcon {
    #[default]
    None,
    /// Inline text glyph, always available.
    Glyph(String),
    /// Image file loaded in the background. May carry a glyph fallback.
    Image {
        path: PathBuf,
        fallback: Option<String>,
    },
}

impl TagIcon {
    /// Glyph drawn when no image texture is available.
    pub fn glyph(&self) -> Option<&str> {
        match self {
            TagIcon::None => None,
            TagIcon::Glyph(glyph) => Some(glyph),
            TagIcon::Image { fallback, .. } => fallback.as_deref(),
        }
    }

    pub fn image_path(&self) -> Option<&PathBuf> {
        match self {
            TagIcon::Image { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Chip size in pixels, computed once from the label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    /// `width = min(150, 10 * chars + 40)`, `height = 40`.
    ///
    /// Length counts UTF-16 code units, so a character outside the Basic
    /// Multilingual Plane (most emoji) counts twice.
    pub fn for_label(label: &str) -> Self {
        let len = label.encode_utf16().count() as f32;
        Self {
            width: (10.0 * len + 40.0).min(TAG_MAX_WIDTH),
            height: TAG_HEIGHT,
        }
    }

    pub fn size(&self) -> Vector2 {
        Vector2::new(self.width, self.height)
    }

    /// Radius of the circle used to hit-test this chip.
    pub fn hit_radius(&self) -> f32 {
        self.width.max(self.height) / 2.0 + HIT_SLOP
    }
}

#[derive(Component, Clone, Debug)]
pub struct Tag {
    /// Stable id, `tag-{index}`.
    pub id: String,
    pub label: String,
    pub color: Color,
    pub icon: TagIcon,
    pub extent: Extent,
}

impl Tag {
    pub fn new(index: usize, label: impl Into<String>, color: Color, icon: TagIcon) -> Self {
        let label = label.into();
        Self {
            id: format!("tag-{}", index),
            extent: Extent::for_label(&label),
            label,
            color,
            icon,
        }
    }
}
