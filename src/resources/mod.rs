//! ECS resources made available to systems.
//!
//! Overview
//! - `assetloader` – bridge and channels for the background icon loader thread
//! - `canvasconfig` – INI-backed canvas and window settings
//! - `canvasplacement` – where the canvas sits inside the host window
//! - `canvasstate` – lifecycle of a mounted canvas
//! - `debugmode` – presence enables the debug overlay
//! - `dragstate` – the single active drag and pointer bookkeeping
//! - `iconstore` – per-tag icon load state
//! - `rendertarget` – HiDPI render texture backing the canvas
//! - `texturestore` – icon textures keyed by tag label
//! - `worldtime` – frame time and counters
pub mod assetloader;
pub mod canvasconfig;
pub mod canvasplacement;
pub mod canvasstate;
pub mod debugmode;
pub mod dragstate;
pub mod iconstore;
pub mod rendertarget;
pub mod texturestore;
pub mod worldtime;
