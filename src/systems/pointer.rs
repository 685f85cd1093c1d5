//! Pointer controller.
//!
//! Turns [`CanvasPointerEvent`]s into the lifecycle of the single drag
//! constraint:
//! - `Down` hit-tests the tags and, if one is hit and nothing is being
//!   dragged, pins it to the pointer with a spring constraint,
//! - `Move` moves the constraint anchor,
//! - `Up` and `Leave` remove the constraint wherever the pointer is.
//!
//! Every handler tolerates events arriving in any order: a stray `Up` or a
//! `Move` without a drag does nothing.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, warn};
use raylib::prelude::Vector2;

use crate::components::physicsbody::PhysicsBody;
use crate::components::registration::Registration;
use crate::components::tag::Tag;
use crate::events::pointer::{CanvasPointerEvent, InputDisposition, PointerPhase, PointerSource};
use crate::physics::ConstraintDesc;
use crate::physics::world::PhysicsWorld;
use crate::resources::dragstate::{
    ActiveDrag, DRAG_LENGTH, DRAG_STIFFNESS, DragState, PointerFeedback,
};

/// A tag as seen by the hit test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitCandidate {
    pub entity: Entity,
    pub order: Registration,
    pub center: Vector2,
    pub radius: f32,
}

/// First candidate, in registration order, whose hit circle strictly
/// contains `point`. Not the closest one.
pub fn first_hit(point: Vector2, candidates: &mut [HitCandidate]) -> Option<Entity> {
    candidates.sort_by_key(|c| c.order);
    candidates
        .iter()
        .find(|c| (point - c.center).length() < c.radius)
        .map(|c| c.entity)
}

type TagQuery<'w, 's> = Query<'w, 's, (Entity, &'static Tag, &'static PhysicsBody, &'static Registration)>;

/// Hit-test the current body positions of every tag.
pub fn hit_test(point: Vector2, tags: &TagQuery, physics: &PhysicsWorld) -> Option<Entity> {
    let mut candidates: Vec<HitCandidate> = tags
        .iter()
        .filter_map(|(entity, tag, body, order)| {
            let transform = physics.transform(body.0)?;
            Some(HitCandidate {
                entity,
                order: *order,
                center: transform.position,
                radius: tag.extent.hit_radius(),
            })
        })
        .collect();
    first_hit(point, &mut candidates)
}

fn on_pointer_down(
    ev: &CanvasPointerEvent,
    tags: &TagQuery,
    physics: &mut PhysicsWorld,
    drag: &mut DragState,
) {
    if drag.is_dragging() {
        debug!("Pointer down ignored, a drag is already active");
        return;
    }
    let Some(entity) = hit_test(ev.position, tags, physics) else {
        return;
    };
    let Ok((_, tag, body, _)) = tags.get(entity) else {
        return;
    };
    let desc = ConstraintDesc {
        body: body.0,
        anchor: ev.position,
        stiffness: DRAG_STIFFNESS,
        length: DRAG_LENGTH,
    };
    match physics.create_constraint(desc) {
        Ok(constraint) => {
            drag.begin(ActiveDrag {
                tag: entity,
                constraint,
                source: ev.source,
                anchor: ev.position,
            });
            debug!("Dragging '{}' ({:?})", tag.label, ev.source);
        }
        Err(e) => warn!("Could not attach drag to '{}': {}", tag.label, e),
    }
}

fn on_pointer_move(
    ev: &CanvasPointerEvent,
    physics: &mut PhysicsWorld,
    drag: &mut DragState,
) -> InputDisposition {
    let Some(constraint) = drag.move_anchor(ev.position) else {
        return InputDisposition::PassThrough;
    };
    if let Err(e) = physics.set_constraint_anchor(constraint, ev.position) {
        warn!("Drag anchor update failed: {}", e);
    }
    match ev.source {
        PointerSource::Touch => InputDisposition::Consumed,
        PointerSource::Mouse => InputDisposition::PassThrough,
    }
}

/// End the active drag, if any. Returns whether one was active.
pub fn release_drag(physics: &mut PhysicsWorld, drag: &mut DragState) -> bool {
    match drag.end() {
        Some(active) => {
            if !physics.remove_constraint(active.constraint) {
                warn!("Drag constraint {:?} was already gone", active.constraint);
            }
            debug!("Drag released");
            true
        }
        None => false,
    }
}

/// Observer handling every pointer event delivered to the canvas.
pub fn pointer_observer(
    trigger: On<CanvasPointerEvent>,
    tags: TagQuery,
    mut physics: ResMut<PhysicsWorld>,
    mut drag: ResMut<DragState>,
    mut feedback: ResMut<PointerFeedback>,
) {
    let ev = *trigger.event();
    let disposition = match ev.phase {
        PointerPhase::Down => {
            on_pointer_down(&ev, &tags, &mut physics, &mut drag);
            InputDisposition::PassThrough
        }
        PointerPhase::Move => on_pointer_move(&ev, &mut physics, &mut drag),
        PointerPhase::Up | PointerPhase::Leave => {
            release_drag(&mut physics, &mut drag);
            InputDisposition::PassThrough
        }
    };
    feedback.handled += 1;
    feedback.last_disposition = disposition;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(world: &mut World, order: u32, x: f32, radius: f32) -> HitCandidate {
        HitCandidate {
            entity: world.spawn_empty().id(),
            order: Registration(order),
            center: Vector2::new(x, 0.0),
            radius,
        }
    }

    #[test]
    fn test_first_hit_prefers_registration_order_over_distance() {
        let mut world = World::new();
        let early = candidate(&mut world, 0, 0.0, 60.0);
        let late = candidate(&mut world, 1, 20.0, 60.0);
        // Listed out of order and `late` is closer.
        let mut candidates = [late, early];
        assert_eq!(
            first_hit(Vector2::new(19.0, 0.0), &mut candidates),
            Some(early.entity)
        );
    }

    #[test]
    fn test_first_hit_boundary_is_exclusive() {
        let mut world = World::new();
        let c = candidate(&mut world, 0, 0.0, 60.0);
        assert_eq!(first_hit(Vector2::new(60.0, 0.0), &mut [c]), None);
        assert_eq!(first_hit(Vector2::new(59.9, 0.0), &mut [c]), Some(c.entity));
    }

    #[test]
    fn test_first_hit_empty() {
        assert_eq!(first_hit(Vector2::new(0.0, 0.0), &mut []), None);
    }
}
