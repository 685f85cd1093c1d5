//! Event types and observers used by the canvas.
//!
//! Submodules:
//! - [`assets`] – commands and messages for the background icon loader
//! - [`pointer`] – host pointer input and the canvas-local pointer event
//! - [`switchdebug`] – toggle the debug overlay on/off
pub mod assets;
pub mod pointer;
pub mod switchdebug;
