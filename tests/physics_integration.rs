//! Simulation tests on the built-in impulse solver, driven through a
//! mounted canvas.

use raylib::prelude::Vector2;

use tagfall::canvas::{CanvasOptions, FrameOutcome, TagCanvas};
use tagfall::events::pointer::{PointerInput, PointerPhase};
use tagfall::resources::canvasconfig::CanvasConfig;
use tagfall::tagset::TagSpec;

const DT: f32 = 1.0 / 60.0;

fn assert_inside(canvas: &mut TagCanvas) {
    let bounds = canvas.bounds();
    for (entity, tag) in canvas.tags() {
        let p = canvas.tag_transform(entity).unwrap().position;
        assert!(
            p.x >= bounds.x && p.x <= bounds.x + bounds.width,
            "'{}' escaped horizontally: {:?}",
            tag.label,
            p
        );
        assert!(
            p.y >= bounds.y && p.y <= bounds.y + bounds.height,
            "'{}' escaped vertically: {:?}",
            tag.label,
            p
        );
    }
}

#[test]
fn test_tags_fall_and_settle_inside() {
    let mut canvas = TagCanvas::mount(CanvasOptions::new(CanvasConfig::new()).with_seed(3)).unwrap();
    let first = canvas.tags()[0].0;
    let start = canvas.tag_transform(first).unwrap().position;

    for _ in 0..600 {
        assert_ne!(canvas.frame(DT), FrameOutcome::Stopped);
        assert_inside(&mut canvas);
    }
    let end = canvas.tag_transform(first).unwrap().position;
    assert!(end.y > start.y, "tag did not fall: {:?} -> {:?}", start, end);
}

#[test]
fn test_extreme_gravity_stays_contained() {
    let mut config = CanvasConfig::new();
    config.gravity = 1.0e6;
    config.max_speed = 1.0e5;
    let mut canvas = TagCanvas::mount(CanvasOptions::new(config).with_seed(11)).unwrap();
    for _ in 0..300 {
        let outcome = canvas.frame(DT);
        assert!(
            matches!(outcome, FrameOutcome::Stepped | FrameOutcome::Loading),
            "unexpected outcome {:?}",
            outcome
        );
        assert_inside(&mut canvas);
    }
}

#[test]
fn test_drag_pulls_tag_toward_pointer() {
    let tags = vec![TagSpec::new("Rust", "#B7410E")];
    let mut canvas = TagCanvas::mount(
        CanvasOptions::new(CanvasConfig::new())
            .with_tags(tags)
            .with_seed(5),
    )
    .unwrap();
    let (entity, _) = canvas.tags().remove(0);
    for _ in 0..120 {
        canvas.frame(DT);
    }

    let origin = Vector2::zero();
    let grab = canvas.tag_transform(entity).unwrap().position;
    canvas.dispatch_pointer(PointerInput::mouse(PointerPhase::Down, grab.x, grab.y), origin);
    assert_eq!(canvas.constraint_count(), 1);

    let target = Vector2::new(320.0, 120.0);
    canvas.dispatch_pointer(PointerInput::mouse(PointerPhase::Move, target.x, target.y), origin);
    for _ in 0..120 {
        canvas.frame(DT);
    }
    let held = canvas.tag_transform(entity).unwrap().position;
    assert!(
        (held - target).length() < (grab - target).length(),
        "tag did not follow the pointer: {:?} -> {:?}",
        grab,
        held
    );

    canvas.dispatch_pointer(PointerInput::mouse(PointerPhase::Up, target.x, target.y), origin);
    assert_eq!(canvas.constraint_count(), 0);
    for _ in 0..180 {
        canvas.frame(DT);
    }
    let dropped = canvas.tag_transform(entity).unwrap().position;
    assert!(dropped.y > held.y, "released tag did not fall");
}
