//! Tag rendering.
//!
//! Rendering is split in two so the frame contents can be checked without a
//! window:
//! - [`extract_tag_draw_ops`] reads the ECS world (tags in registration
//!   order, body transforms, icon states) and produces a flat list of
//!   [`DrawOp`]s in canvas-local logical pixels,
//! - [`paint`] replays that list on any [`Painter`]. [`RaylibPainter`] is
//!   the real one; tests use a recording painter.
//!
//! Every chip is drawn in its own transform: translate to the body center,
//! rotate by the body angle, then shadow, body, highlight, icon, label
//! shadow and label, all relative to the center.

use std::ffi::CString;

use bevy_ecs::prelude::*;
use raylib::ffi;
use raylib::prelude::*;
use smallvec::SmallVec;

use crate::components::physicsbody::PhysicsBody;
use crate::components::registration::Registration;
use crate::components::tag::{Tag, TagIcon};
use crate::physics::BodyTransform;
use crate::physics::world::PhysicsWorld;
use crate::resources::canvasconfig::CanvasConfig;
use crate::resources::debugmode::DebugMode;
use crate::resources::dragstate::DragState;
use crate::resources::iconstore::{IconState, IconStore};
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;

pub const CORNER_RADIUS: f32 = 8.0;
pub const SHADOW_OFFSET: f32 = 4.0;
pub const SHADOW_COLOR: Color = Color::new(0, 0, 0, 51);
pub const HIGHLIGHT_COLOR: Color = Color::new(255, 255, 255, 77);
/// Highlight band covers the top `1 / HIGHLIGHT_DIVISOR` of the chip.
pub const HIGHLIGHT_DIVISOR: f32 = 2.5;
pub const ICON_SIZE: f32 = 24.0;
/// Icon center, from the chip's left edge.
pub const ICON_INSET: f32 = 20.0;
pub const LABEL_SIZE: f32 = 14.0;
/// Label start, from the chip's left edge.
pub const LABEL_INSET: f32 = 42.0;
pub const LABEL_COLOR: Color = Color::WHITE;

const DEBUG_CIRCLE: Color = Color::new(250, 204, 21, 255);
const DEBUG_CIRCLE_ACTIVE: Color = Color::new(239, 68, 68, 255);
const DEBUG_TEXT: Color = Color::new(226, 232, 240, 255);
const DEBUG_TEXT_SIZE: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// `anchor` is the left end of the text, vertically centred.
    Left,
    /// `anchor` is the center of the text.
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub enum IconDraw {
    /// Draw the uploaded texture of this label, or the fallback glyph if the
    /// host has no texture for it.
    Image {
        label: String,
        fallback: Option<String>,
    },
    Glyph(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    PushTransform { translate: Vector2, rotation: f32 },
    Shadow { rect: Rectangle, radius: f32, color: Color },
    Body { rect: Rectangle, radius: f32, color: Color },
    Highlight { rect: Rectangle, radius: f32, color: Color },
    Icon { center: Vector2, size: f32, icon: IconDraw },
    LabelShadow { text: String, anchor: Vector2, size: f32, color: Color },
    Label { text: String, anchor: Vector2, size: f32, color: Color },
    PopTransform,
    /// Debug overlay only.
    HitCircle { center: Vector2, radius: f32, color: Color },
    /// Debug overlay only; canvas coordinates, no transform.
    DebugText { text: String, position: Vector2, size: f32, color: Color },
}

/// Which icon, if any, a chip shows this frame.
///
/// An image is only referenced once its bytes are `Ready`; while pending or
/// after a failure the glyph fallback (if any) is used instead.
pub fn icon_for(tag: &Tag, icons: &IconStore) -> Option<IconDraw> {
    match &tag.icon {
        TagIcon::None => None,
        TagIcon::Glyph(glyph) => Some(IconDraw::Glyph(glyph.clone())),
        TagIcon::Image { fallback, .. } => match icons.get(&tag.label) {
            Some(IconState::Ready { .. }) => Some(IconDraw::Image {
                label: tag.label.clone(),
                fallback: fallback.clone(),
            }),
            _ => fallback.clone().map(IconDraw::Glyph),
        },
    }
}

/// Draw ops of one chip, wrapped in its transform.
pub fn tag_draw_ops(
    tag: &Tag,
    transform: &BodyTransform,
    icon: Option<IconDraw>,
) -> SmallVec<[DrawOp; 8]> {
    let w = tag.extent.width;
    let h = tag.extent.height;
    let left = -w / 2.0;
    let top = -h / 2.0;
    let chip = Rectangle {
        x: left,
        y: top,
        width: w,
        height: h,
    };

    let mut ops: SmallVec<[DrawOp; 8]> = SmallVec::new();
    ops.push(DrawOp::PushTransform {
        translate: transform.position,
        rotation: transform.angle,
    });
    ops.push(DrawOp::Shadow {
        rect: Rectangle {
            y: top + SHADOW_OFFSET,
            ..chip
        },
        radius: CORNER_RADIUS,
        color: SHADOW_COLOR,
    });
    ops.push(DrawOp::Body {
        rect: chip,
        radius: CORNER_RADIUS,
        color: tag.color,
    });
    ops.push(DrawOp::Highlight {
        rect: Rectangle {
            height: h / HIGHLIGHT_DIVISOR,
            ..chip
        },
        radius: CORNER_RADIUS,
        color: HIGHLIGHT_COLOR,
    });
    if let Some(icon) = icon {
        ops.push(DrawOp::Icon {
            center: Vector2::new(left + ICON_INSET, -2.0),
            size: ICON_SIZE,
            icon,
        });
    }
    ops.push(DrawOp::LabelShadow {
        text: tag.label.clone(),
        anchor: Vector2::new(left + LABEL_INSET, 1.0),
        size: LABEL_SIZE,
        color: SHADOW_COLOR,
    });
    ops.push(DrawOp::Label {
        text: tag.label.clone(),
        anchor: Vector2::new(left + LABEL_INSET, 0.0),
        size: LABEL_SIZE,
        color: LABEL_COLOR,
    });
    ops.push(DrawOp::PopTransform);
    ops
}

/// Build the full draw list of a canvas frame.
///
/// Tags are emitted in registration order, so later tags are painted over
/// earlier ones. A tag whose body is missing from the backend is skipped.
pub fn extract_tag_draw_ops(world: &mut World) -> Vec<DrawOp> {
    let mut tags: Vec<(Registration, Tag, PhysicsBody)> = {
        let mut q = world.query::<(&Registration, &Tag, &PhysicsBody)>();
        q.iter(world)
            .map(|(order, tag, body)| (*order, tag.clone(), *body))
            .collect()
    };
    tags.sort_by_key(|(order, _, _)| *order);

    let physics = world.resource::<PhysicsWorld>();
    let icons = world.resource::<IconStore>();
    let background = world
        .get_resource::<CanvasConfig>()
        .map(|c| c.background)
        .unwrap_or(Color::BLANK);

    let mut ops = Vec::with_capacity(1 + tags.len() * 8);
    ops.push(DrawOp::Clear(background));
    for (_, tag, body) in tags.iter() {
        let Some(transform) = physics.transform(body.0) else {
            continue;
        };
        ops.extend(tag_draw_ops(tag, &transform, icon_for(tag, icons)));
    }

    if world.contains_resource::<DebugMode>() {
        ops.extend(debug_overlay_ops(world, &tags));
    }
    ops
}

fn debug_overlay_ops(world: &World, tags: &[(Registration, Tag, PhysicsBody)]) -> Vec<DrawOp> {
    let physics = world.resource::<PhysicsWorld>();
    let drag = world.get_resource::<DragState>().and_then(|d| d.active().copied());
    let dragged_body = drag.and_then(|d| world.get::<PhysicsBody>(d.tag).copied());

    let mut ops = Vec::new();
    for (_, tag, body) in tags {
        if let Some(transform) = physics.transform(body.0) {
            let color = if Some(*body) == dragged_body {
                DEBUG_CIRCLE_ACTIVE
            } else {
                DEBUG_CIRCLE
            };
            ops.push(DrawOp::HitCircle {
                center: transform.position,
                radius: tag.extent.hit_radius(),
                color,
            });
        }
    }

    let frames = world.get_resource::<WorldTime>().map_or(0, |t| t.frames);
    let drag_text = match (drag, dragged_body) {
        (Some(active), Some(_)) => {
            ops.push(DrawOp::HitCircle {
                center: active.anchor,
                radius: 3.0,
                color: DEBUG_CIRCLE_ACTIVE,
            });
            let label = world
                .get::<Tag>(active.tag)
                .map(|t| t.label.as_str())
                .unwrap_or("?");
            format!("{} ({:?})", label, active.source)
        }
        _ => "none".to_string(),
    };
    ops.push(DrawOp::DebugText {
        text: format!(
            "frame {} | tags {} | constraints {} | drag: {}",
            frames,
            tags.len(),
            physics.constraint_count(),
            drag_text
        ),
        position: Vector2::new(8.0, 8.0),
        size: DEBUG_TEXT_SIZE,
        color: DEBUG_TEXT,
    });
    ops
}

/// Drawing backend of the canvas.
///
/// All coordinates are logical pixels relative to the current transform.
pub trait Painter {
    fn clear(&mut self, color: Color);
    fn push_transform(&mut self, translate: Vector2, rotation: f32);
    fn pop_transform(&mut self);
    fn fill_rounded_rect(&mut self, rect: Rectangle, radius: f32, color: Color);
    /// Draw the texture of `label` in a `size` square. Returns false if the
    /// painter has no texture for it.
    fn draw_image(&mut self, label: &str, center: Vector2, size: f32) -> bool;
    fn draw_text(&mut self, text: &str, anchor: Vector2, size: f32, color: Color, align: TextAlign);
    fn stroke_circle(&mut self, center: Vector2, radius: f32, color: Color);
}

pub fn paint<P: Painter + ?Sized>(ops: &[DrawOp], painter: &mut P) {
    for op in ops {
        match op {
            DrawOp::Clear(color) => painter.clear(*color),
            DrawOp::PushTransform {
                translate,
                rotation,
            } => painter.push_transform(*translate, *rotation),
            DrawOp::Shadow {
                rect,
                radius,
                color,
            }
            | DrawOp::Body {
                rect,
                radius,
                color,
            }
            | DrawOp::Highlight {
                rect,
                radius,
                color,
            } => painter.fill_rounded_rect(*rect, *radius, *color),
            DrawOp::Icon { center, size, icon } => match icon {
                IconDraw::Image { label, fallback } => {
                    if !painter.draw_image(label, *center, *size) {
                        if let Some(glyph) = fallback {
                            painter.draw_text(glyph, *center, *size, Color::WHITE, TextAlign::Center);
                        }
                    }
                }
                IconDraw::Glyph(glyph) => {
                    painter.draw_text(glyph, *center, *size, Color::WHITE, TextAlign::Center)
                }
            },
            DrawOp::LabelShadow {
                text,
                anchor,
                size,
                color,
            }
            | DrawOp::Label {
                text,
                anchor,
                size,
                color,
            } => painter.draw_text(text, *anchor, *size, *color, TextAlign::Left),
            DrawOp::PopTransform => painter.pop_transform(),
            DrawOp::HitCircle {
                center,
                radius,
                color,
            } => painter.stroke_circle(*center, *radius, *color),
            DrawOp::DebugText {
                text,
                position,
                size,
                color,
            } => {
                let anchor = Vector2::new(position.x, position.y + size / 2.0);
                painter.draw_text(text, anchor, *size, *color, TextAlign::Left)
            }
        }
    }
}

/// Raylib roundness for a corner radius on a `rect`.
pub fn roundness(rect: &Rectangle, radius: f32) -> f32 {
    let short = rect.width.min(rect.height);
    if short <= 0.0 {
        0.0
    } else {
        (2.0 * radius / short).clamp(0.0, 1.0)
    }
}

/// [`Painter`] over any raylib draw handle.
///
/// Transforms use the rlgl matrix stack, so it must run inside a drawing
/// scope; pushes and pops must balance within the frame.
pub struct RaylibPainter<'a, D: RaylibDraw> {
    d: &'a mut D,
    textures: &'a TextureStore,
}

impl<'a, D: RaylibDraw> RaylibPainter<'a, D> {
    pub fn new(d: &'a mut D, textures: &'a TextureStore) -> Self {
        Self { d, textures }
    }

    fn measure(text: &str, size: i32) -> i32 {
        match CString::new(text) {
            Ok(c_text) => unsafe { ffi::MeasureText(c_text.as_ptr(), size) },
            Err(_) => 0,
        }
    }
}

impl<D: RaylibDraw> Painter for RaylibPainter<'_, D> {
    fn clear(&mut self, color: Color) {
        self.d.clear_background(color);
    }

    fn push_transform(&mut self, translate: Vector2, rotation: f32) {
        unsafe {
            ffi::rlPushMatrix();
            ffi::rlTranslatef(translate.x, translate.y, 0.0);
            ffi::rlRotatef(rotation.to_degrees(), 0.0, 0.0, 1.0);
        }
    }

    fn pop_transform(&mut self) {
        unsafe {
            ffi::rlPopMatrix();
        }
    }

    fn fill_rounded_rect(&mut self, rect: Rectangle, radius: f32, color: Color) {
        self.d
            .draw_rectangle_rounded(rect, roundness(&rect, radius), 8, color);
    }

    fn draw_image(&mut self, label: &str, center: Vector2, size: f32) -> bool {
        let Some(texture) = self.textures.get(label) else {
            return false;
        };
        let source = Rectangle {
            x: 0.0,
            y: 0.0,
            width: texture.width as f32,
            height: texture.height as f32,
        };
        let dest = Rectangle {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            width: size,
            height: size,
        };
        self.d
            .draw_texture_pro(texture, source, dest, Vector2::zero(), 0.0, Color::WHITE);
        true
    }

    fn draw_text(&mut self, text: &str, anchor: Vector2, size: f32, color: Color, align: TextAlign) {
        let font_size = size.round() as i32;
        let x = match align {
            TextAlign::Left => anchor.x,
            TextAlign::Center => anchor.x - Self::measure(text, font_size) as f32 / 2.0,
        };
        let y = anchor.y - size / 2.0;
        self.d
            .draw_text(text, x.round() as i32, y.round() as i32, font_size, color);
    }

    fn stroke_circle(&mut self, center: Vector2, radius: f32, color: Color) {
        self.d
            .draw_circle_lines(center.x as i32, center.y as i32, radius, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::tag::Extent;

    fn tag(label: &str, icon: TagIcon) -> Tag {
        Tag::new(0, label, Color::new(0x17, 0x15, 0x15, 0xFF), icon)
    }

    fn at(x: f32, y: f32) -> BodyTransform {
        BodyTransform {
            position: Vector2::new(x, y),
            angle: 0.5,
            velocity: Vector2::zero(),
        }
    }

    #[test]
    fn test_tag_draw_ops_geometry() {
        let t = tag("Github", TagIcon::Glyph("G".into()));
        let ops = tag_draw_ops(&t, &at(200.0, 100.0), Some(IconDraw::Glyph("G".into())));
        assert_eq!(ops.len(), 8);
        assert_eq!(
            ops[0],
            DrawOp::PushTransform {
                translate: Vector2::new(200.0, 100.0),
                rotation: 0.5
            }
        );
        let DrawOp::Shadow { rect, .. } = &ops[1] else {
            panic!("expected shadow, got {:?}", ops[1]);
        };
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (-50.0, -16.0, 100.0, 40.0));
        let DrawOp::Highlight { rect, .. } = &ops[3] else {
            panic!("expected highlight, got {:?}", ops[3]);
        };
        assert_eq!(rect.height, 16.0);
        let DrawOp::Icon { center, .. } = &ops[4] else {
            panic!("expected icon, got {:?}", ops[4]);
        };
        assert_eq!(*center, Vector2::new(-30.0, -2.0));
        let DrawOp::Label { anchor, color, .. } = &ops[6] else {
            panic!("expected label, got {:?}", ops[6]);
        };
        assert_eq!(*anchor, Vector2::new(-8.0, 0.0));
        assert_eq!(*color, Color::WHITE);
        assert_eq!(ops[7], DrawOp::PopTransform);
    }

    #[test]
    fn test_tag_draw_ops_without_icon() {
        let t = tag("Rust", TagIcon::None);
        let ops = tag_draw_ops(&t, &at(0.0, 0.0), None);
        assert_eq!(ops.len(), 7);
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::Icon { .. })));
        assert!(matches!(ops[4], DrawOp::LabelShadow { .. }));
    }

    #[test]
    fn test_icon_for_image_states() {
        let t = tag(
            "Docs",
            TagIcon::Image {
                path: "docs.png".into(),
                fallback: None,
            },
        );
        let mut icons = IconStore::new();
        icons.register("Docs");
        assert_eq!(icon_for(&t, &icons), None);
        icons.mark_ready("Docs", vec![1], ".png".into());
        assert_eq!(
            icon_for(&t, &icons),
            Some(IconDraw::Image {
                label: "Docs".into(),
                fallback: None
            })
        );
        // Ready is terminal.
        assert!(!icons.mark_failed("Docs", "bad data"));
        assert!(matches!(icon_for(&t, &icons), Some(IconDraw::Image { .. })));
    }

    #[test]
    fn test_icon_for_failed_image_uses_glyph_fallback() {
        let t = tag(
            "Docs",
            TagIcon::Image {
                path: "docs.png".into(),
                fallback: Some("D".into()),
            },
        );
        let mut icons = IconStore::new();
        icons.register("Docs");
        icons.mark_failed("Docs", "missing");
        assert_eq!(icon_for(&t, &icons), Some(IconDraw::Glyph("D".into())));
    }

    #[test]
    fn test_roundness() {
        let rect = Rectangle {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 40.0,
        };
        assert!((roundness(&rect, 8.0) - 0.4).abs() < 1e-6);
        assert_eq!(roundness(&rect, 100.0), 1.0);
        assert_eq!(
            roundness(
                &Rectangle {
                    height: 0.0,
                    ..rect
                },
                8.0
            ),
            0.0
        );
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        has_texture: bool,
    }

    impl Painter for Recorder {
        fn clear(&mut self, _color: Color) {
            self.calls.push("clear".into());
        }
        fn push_transform(&mut self, _translate: Vector2, _rotation: f32) {
            self.calls.push("push".into());
        }
        fn pop_transform(&mut self) {
            self.calls.push("pop".into());
        }
        fn fill_rounded_rect(&mut self, _rect: Rectangle, _radius: f32, _color: Color) {
            self.calls.push("rect".into());
        }
        fn draw_image(&mut self, label: &str, _center: Vector2, _size: f32) -> bool {
            if self.has_texture {
                self.calls.push(format!("image {}", label));
            }
            self.has_texture
        }
        fn draw_text(&mut self, text: &str, _a: Vector2, _s: f32, _c: Color, _al: TextAlign) {
            self.calls.push(format!("text {}", text));
        }
        fn stroke_circle(&mut self, _center: Vector2, _radius: f32, _color: Color) {
            self.calls.push("circle".into());
        }
    }

    #[test]
    fn test_paint_image_without_texture_falls_back_to_glyph() {
        let t = tag("Docs", TagIcon::None);
        let icon = IconDraw::Image {
            label: "Docs".into(),
            fallback: Some("D".into()),
        };
        let ops = tag_draw_ops(&t, &at(0.0, 0.0), Some(icon));

        let mut without = Recorder::default();
        paint(&ops, &mut without);
        assert_eq!(
            without.calls,
            vec!["push", "rect", "rect", "rect", "text D", "text Docs", "text Docs", "pop"]
        );

        let mut with = Recorder {
            has_texture: true,
            ..Default::default()
        };
        paint(&ops, &mut with);
        assert_eq!(with.calls[4], "image Docs");
    }

    #[test]
    fn test_extent_matches_label() {
        assert_eq!(tag("Github", TagIcon::None).extent, Extent::for_label("Github"));
    }
}
