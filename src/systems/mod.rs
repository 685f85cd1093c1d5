//! Canvas systems.
//!
//! Submodules overview
//! - [`assets`] – bridge with the icon loader thread (poll/update/apply messages)
//! - [`canvasstate`] – promote a loading canvas once it may run
//! - [`input`] – turn raylib's polled mouse/touch state into pointer events
//! - [`physics`] – advance the physics world by one fixed step
//! - [`pointer`] – hit testing and the drag constraint lifecycle
//! - [`render`] – build the draw list and paint it with raylib
//! - [`time`] – update frame time

pub mod assets;
pub mod canvasstate;
pub mod input;
pub mod physics;
pub mod pointer;
pub mod render;
pub mod time;
