//! One mounted tag canvas.
//!
//! [`TagCanvas`] owns everything a canvas needs: an ECS world holding the
//! tag entities and resources, the per-frame schedule, the frame scheduler
//! and the pointer listeners. Several canvases can coexist; none of them
//! shares state with another.
//!
//! Typical host loop:
//!
//! ```ignore
//! let mut canvas = TagCanvas::mount(CanvasOptions::new(config))?;
//! loop {
//!     for input in adapter.translate(poll_pointer_frame(&rl, &placement)) {
//!         canvas.dispatch_pointer(input, placement.origin);
//!     }
//!     match canvas.frame(dt) {
//!         FrameOutcome::Stopped | FrameOutcome::Faulted(_) => break,
//!         _ => {}
//!     }
//!     paint(&canvas.draw_list(), &mut painter);
//! }
//! canvas.teardown();
//! ```

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use fastrand::Rng;
use log::{error, info, warn};
use raylib::prelude::{Rectangle, Vector2};
use thiserror::Error;

use crate::components::physicsbody::PhysicsBody;
use crate::components::registration::Registration;
use crate::components::tag::Tag;
use crate::events::assets::AssetCmd;
use crate::events::pointer::{CanvasPointerEvent, InputDisposition, PointerInput};
use crate::events::switchdebug::{SwitchDebugEvent, switch_debug_observer};
use crate::physics::solver::ImpulseWorld;
use crate::physics::world::PhysicsWorld;
use crate::physics::{BodyTransform, PhysicsBackend, PhysicsError};
use crate::resources::assetloader::{AssetBridge, setup_asset_loader, shutdown_asset_loader};
use crate::resources::canvasconfig::CanvasConfig;
use crate::resources::canvasstate::{CanvasState, CanvasStates, PhysicsFault};
use crate::resources::debugmode::DebugMode;
use crate::resources::dragstate::{ActiveDrag, DragState, PointerFeedback};
use crate::resources::iconstore::IconStore;
use crate::resources::worldtime::WorldTime;
use crate::scheduler::{CancelToken, FrameScheduler};
use crate::systems::assets::{apply_asset_messages, poll_asset_messages, update_asset_messages};
use crate::systems::canvasstate::{promote_when_ready, state_is_running};
use crate::systems::physics::step_physics;
use crate::systems::pointer::{pointer_observer, release_drag};
use crate::systems::render::{DrawOp, extract_tag_draw_ops};
use crate::systems::time::update_world_time;
use crate::tagset::{TagSetError, TagSpec, default_tag_specs, validate_tag_specs};

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("no drawing surface: canvas size is {width}x{height}")]
    NoSurface { width: f32, height: f32 },
    #[error("physics initialization failed: {0}")]
    Physics(#[from] PhysicsError),
    #[error("invalid tag set: {0}")]
    TagSet(#[from] TagSetError),
    #[error("could not start the asset loader: {0}")]
    AssetLoader(#[from] std::io::Error),
}

/// Everything [`TagCanvas::mount`] needs.
#[derive(Debug, Clone)]
pub struct CanvasOptions {
    pub config: CanvasConfig,
    pub tags: Vec<TagSpec>,
    /// Seed for tag placement; random when `None`.
    pub seed: Option<u64>,
    /// Width of the host viewport, used to pick the gravity.
    pub viewport_width: f32,
}

impl CanvasOptions {
    /// Default tag set, random placement, viewport as wide as the window.
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            viewport_width: config.window_width as f32,
            config,
            tags: default_tag_specs(),
            seed: None,
        }
    }

    pub fn with_tags(mut self, tags: Vec<TagSpec>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_viewport_width(mut self, width: f32) -> Self {
        self.viewport_width = width;
        self
    }
}

/// What happened when the host asked for a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Physics advanced one step.
    Stepped,
    /// Still waiting for icons; nothing moved.
    Loading,
    /// The canvas is torn down; stop scheduling frames.
    Stopped,
    /// The physics backend failed. The canvas tore itself down.
    Faulted(PhysicsError),
}

pub struct TagCanvas {
    world: World,
    schedule: Schedule,
    scheduler: FrameScheduler,
    /// Observer entities listening for pointer and debug events.
    listeners: Vec<Entity>,
}

impl TagCanvas {
    /// Mount a canvas backed by the built-in impulse solver.
    pub fn mount(options: CanvasOptions) -> Result<Self, CanvasError> {
        let backend = ImpulseWorld::new(options.config.solver_settings());
        Self::mount_with_backend(options, Box::new(backend))
    }

    /// Mount a canvas on any physics backend.
    ///
    /// Fails, without leaving anything running, if the canvas has no usable
    /// size or the tag set is invalid.
    pub fn mount_with_backend(
        options: CanvasOptions,
        backend: Box<dyn PhysicsBackend>,
    ) -> Result<Self, CanvasError> {
        let CanvasOptions {
            config,
            tags,
            seed,
            viewport_width,
        } = options;
        let (width, height) = config.canvas_size();
        if !(width > 0.0 && height > 0.0) {
            error!("Cannot mount tag canvas: no drawing surface ({}x{})", width, height);
            return Err(CanvasError::NoSurface { width, height });
        }
        validate_tag_specs(&tags)?;

        let gravity = config.gravity_for_viewport(viewport_width);
        let mut physics = PhysicsWorld::initialize(backend, width, height, gravity)?;
        let mut rng = seed.map_or_else(Rng::new, Rng::with_seed);

        let mut world = World::new();
        let mut state = CanvasState::new();
        let mut icons = IconStore::new();
        let mut loads = Vec::new();

        for (index, spec) in tags.iter().enumerate() {
            let tag = spec.to_tag(index)?;
            let body = physics.spawn_tag_body(tag.extent.size(), &mut rng);
            if let Some(path) = tag.icon.image_path() {
                icons.register(tag.label.clone());
                loads.push(AssetCmd::LoadImage {
                    label: tag.label.clone(),
                    path: path.clone(),
                });
            }
            world.spawn((tag, PhysicsBody(body), Registration(index as u32)));
        }

        setup_asset_loader(&mut world)?;
        if let Some(bridge) = world.get_resource::<AssetBridge>() {
            for cmd in loads {
                if let Err(e) = bridge.send(cmd) {
                    let AssetCmd::LoadImage { label, .. } = e.0;
                    warn!("Could not queue icon load for '{}'", label);
                    icons.mark_failed(&label, "asset loader unavailable");
                }
            }
        }

        state.advance(CanvasStates::Loading);
        world.insert_resource(config);
        world.insert_resource(physics);
        world.insert_resource(icons);
        world.insert_resource(state);
        world.insert_resource(DragState::default());
        world.insert_resource(PointerFeedback::default());
        world.insert_resource(WorldTime::default());

        let listeners = vec![
            world.spawn(Observer::new(pointer_observer)).id(),
            world.spawn(Observer::new(switch_debug_observer)).id(),
        ];
        world.flush();

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                poll_asset_messages,
                update_asset_messages,
                apply_asset_messages,
                promote_when_ready,
                step_physics.run_if(state_is_running),
            )
                .chain(),
        );

        info!(
            "Mounted tag canvas {}x{} with {} tags (gravity {})",
            width,
            height,
            tags.len(),
            gravity
        );

        Ok(Self {
            world,
            schedule,
            scheduler: FrameScheduler::new(),
            listeners,
        })
    }

    /// Run one frame: settle loaded icons, promote the lifecycle and step
    /// physics once. `dt` is wall-clock time, only recorded.
    pub fn frame(&mut self, dt: f32) -> FrameOutcome {
        if !self.scheduler.request_frame() {
            return FrameOutcome::Stopped;
        }
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();

        if let Some(PhysicsFault(e)) = self.world.remove_resource::<PhysicsFault>() {
            error!("Stopping tag canvas after physics fault: {}", e);
            self.teardown();
            return FrameOutcome::Faulted(e);
        }
        if self.state() == CanvasStates::Running {
            FrameOutcome::Stepped
        } else {
            FrameOutcome::Loading
        }
    }

    /// Deliver a pointer event given in client coordinates.
    ///
    /// `origin` is the canvas's current top-left corner in the same
    /// coordinates; pass a fresh value each time. Events are ignored unless
    /// the canvas is running.
    pub fn dispatch_pointer(&mut self, input: PointerInput, origin: Vector2) -> InputDisposition {
        if self.listeners.is_empty() || self.state() != CanvasStates::Running {
            return InputDisposition::PassThrough;
        }
        self.world.resource_mut::<PointerFeedback>().last_disposition =
            InputDisposition::PassThrough;
        self.world.trigger(CanvasPointerEvent {
            source: input.source,
            phase: input.phase,
            position: input.client - origin,
        });
        self.world.flush();
        self.world.resource::<PointerFeedback>().last_disposition
    }

    /// Draw list for the current state. Empty once torn down, and while
    /// loading if rendering is gated on icons.
    pub fn draw_list(&mut self) -> Vec<DrawOp> {
        let visible = match self.state() {
            CanvasStates::Running => true,
            CanvasStates::Loading => !self.world.resource::<CanvasConfig>().gate_render,
            CanvasStates::Uninitialized | CanvasStates::TornDown => false,
        };
        if !visible {
            return Vec::new();
        }
        extract_tag_draw_ops(&mut self.world)
    }

    pub fn toggle_debug(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        self.world.trigger(SwitchDebugEvent {});
        self.world.flush();
    }

    pub fn debug_enabled(&self) -> bool {
        self.world.contains_resource::<DebugMode>()
    }

    /// Stop the canvas for good: no more frames, no listeners, no loader
    /// thread, no drag constraint. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.state() == CanvasStates::TornDown {
            return;
        }
        self.scheduler.cancel();
        for listener in self.listeners.drain(..) {
            self.world.despawn(listener);
        }
        self.world.flush();
        self.world
            .resource_scope(|world, mut physics: Mut<PhysicsWorld>| {
                let mut drag = world.resource_mut::<DragState>();
                release_drag(&mut physics, &mut drag);
            });
        shutdown_asset_loader(&mut self.world);
        self.world
            .resource_mut::<CanvasState>()
            .advance(CanvasStates::TornDown);
        info!(
            "Tag canvas torn down after {} frames",
            self.scheduler.frames_granted()
        );
    }

    pub fn state(&self) -> CanvasStates {
        self.world.resource::<CanvasState>().get()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.scheduler.token()
    }

    pub fn frames_granted(&self) -> u64 {
        self.scheduler.frames_granted()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Pointer events handled by the listener since mount.
    pub fn pointer_events_handled(&self) -> u64 {
        self.world.resource::<PointerFeedback>().handled
    }

    pub fn active_drag(&self) -> Option<ActiveDrag> {
        self.world.resource::<DragState>().active().copied()
    }

    pub fn constraint_count(&self) -> usize {
        self.world.resource::<PhysicsWorld>().constraint_count()
    }

    pub fn bounds(&self) -> Rectangle {
        self.world.resource::<PhysicsWorld>().bounds()
    }

    pub fn gravity(&self) -> f32 {
        self.world.resource::<PhysicsWorld>().gravity().y
    }

    /// Tags in registration order.
    pub fn tags(&mut self) -> Vec<(Entity, Tag)> {
        let mut q = self.world.query::<(Entity, &Tag, &Registration)>();
        let mut tags: Vec<_> = q
            .iter(&self.world)
            .map(|(entity, tag, order)| (*order, entity, tag.clone()))
            .collect();
        tags.sort_by_key(|(order, _, _)| *order);
        tags.into_iter().map(|(_, e, t)| (e, t)).collect()
    }

    /// Current pose of a tag's body.
    pub fn tag_transform(&self, tag: Entity) -> Option<BodyTransform> {
        let body = self.world.get::<PhysicsBody>(tag)?;
        self.world.resource::<PhysicsWorld>().transform(body.0)
    }

    /// Icon load states, for the host's texture upload.
    pub fn icons(&self) -> &IconStore {
        self.world.resource::<IconStore>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Drop for TagCanvas {
    fn drop(&mut self) {
        self.teardown();
    }
}
