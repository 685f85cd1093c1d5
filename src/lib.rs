//! Tagfall library.
//!
//! A physics-driven canvas of draggable skill tags: chips fall under gravity,
//! bounce off the canvas walls and each other, and can be dragged with the
//! mouse or a finger. The crate exposes the ECS components, resources,
//! systems and events of the canvas, the pluggable physics backend, and
//! [`canvas::TagCanvas`], which ties them together for a host.
//!
//! - [`canvas`] – mounting, per-frame driving and teardown of one canvas
//! - [`components`] – tag entities
//! - [`events`] – pointer, asset and debug events
//! - [`physics`] – the simulation behind [`physics::PhysicsBackend`]
//! - [`resources`] – configuration, drag state, icon store, lifecycle
//! - [`scheduler`] – frame scheduling with a cancellation token
//! - [`systems`] – physics step, pointer controller, asset bridge, renderer
//! - [`tagset`] – tag definitions and tag files

pub mod canvas;
pub mod components;
pub mod events;
pub mod physics;
pub mod resources;
pub mod scheduler;
pub mod systems;
pub mod tagset;
