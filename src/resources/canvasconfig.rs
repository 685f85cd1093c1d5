//! Canvas configuration resource.
//!
//! Settings loaded from an INI file. Every key is optional; missing or
//! malformed values keep the defaults below.
//!
//! # Configuration File Format
//!
//! ```ini
//! [canvas]
//! width = 640
//! height = 400
//! background = 0F172A
//!
//! [window]
//! width = 1024
//! height = 640
//! target_fps = 60
//! vsync = true
//!
//! [physics]
//! gravity = 450
//! mobile_gravity = 300
//! mobile_breakpoint = 768
//! max_speed = 4000
//! solver_iterations = 4
//!
//! [assets]
//! gate_render = false
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use raylib::prelude::Color;
use std::path::PathBuf;

use crate::physics::solver::SolverSettings;
use crate::tagset::parse_hex_color;

const DEFAULT_CANVAS_WIDTH: u32 = 640;
const DEFAULT_CANVAS_HEIGHT: u32 = 400;
const DEFAULT_BACKGROUND: Color = Color::new(0x0F, 0x17, 0x2A, 0xFF);
const DEFAULT_WINDOW_WIDTH: u32 = 1024;
const DEFAULT_WINDOW_HEIGHT: u32 = 640;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_GRAVITY: f32 = 450.0;
const DEFAULT_MOBILE_GRAVITY: f32 = 300.0;
const DEFAULT_MOBILE_BREAKPOINT: u32 = 768;
const DEFAULT_MAX_SPEED: f32 = 4000.0;
const DEFAULT_SOLVER_ITERATIONS: u32 = 4;
const DEFAULT_GATE_RENDER: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone)]
pub struct CanvasConfig {
    /// Logical canvas width in pixels.
    pub canvas_width: u32,
    /// Logical canvas height in pixels.
    pub canvas_height: u32,
    /// Clear colour of the canvas. Written as bare hex in the INI file,
    /// since `#` starts a comment there.
    pub background: Color,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    pub vsync: bool,
    /// Gravity in px/s² on wide viewports.
    pub gravity: f32,
    /// Gravity in px/s² below the mobile breakpoint.
    pub mobile_gravity: f32,
    /// Viewport width (px) under which `mobile_gravity` applies.
    pub mobile_breakpoint: u32,
    /// Speed clamp in px/s. Zero disables it.
    pub max_speed: f32,
    pub solver_iterations: u32,
    /// Keep the canvas in `Loading` until every icon settled.
    pub gate_render: bool,
    pub config_path: PathBuf,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasConfig {
    pub fn new() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            background: DEFAULT_BACKGROUND,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            gravity: DEFAULT_GRAVITY,
            mobile_gravity: DEFAULT_MOBILE_GRAVITY,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            max_speed: DEFAULT_MAX_SPEED,
            solver_iterations: DEFAULT_SOLVER_ITERATIONS,
            gate_render: DEFAULT_GATE_RENDER,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config);

        info!(
            "Loaded config: canvas {}x{}, window {}x{}, gravity={}/{}, gate_render={}",
            self.canvas_width,
            self.canvas_height,
            self.window_width,
            self.window_height,
            self.gravity,
            self.mobile_gravity,
            self.gate_render
        );
        Ok(())
    }

    /// Same as [`load_from_file`](Self::load_from_file) but from an in-memory string.
    pub fn load_from_str(&mut self, contents: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(contents.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        // [canvas]
        if let Some(width) = config.getuint("canvas", "width").ok().flatten() {
            self.canvas_width = width as u32;
        }
        if let Some(height) = config.getuint("canvas", "height").ok().flatten() {
            self.canvas_height = height as u32;
        }
        if let Some(color) = config
            .get("canvas", "background")
            .and_then(|hex| parse_hex_color(&hex).ok())
        {
            self.background = color;
        }

        // [window]
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }

        // [physics]
        if let Some(gravity) = config.getfloat("physics", "gravity").ok().flatten() {
            self.gravity = gravity as f32;
        }
        if let Some(gravity) = config.getfloat("physics", "mobile_gravity").ok().flatten() {
            self.mobile_gravity = gravity as f32;
        }
        if let Some(bp) = config.getuint("physics", "mobile_breakpoint").ok().flatten() {
            self.mobile_breakpoint = bp as u32;
        }
        if let Some(speed) = config.getfloat("physics", "max_speed").ok().flatten() {
            self.max_speed = speed as f32;
        }
        if let Some(iters) = config.getuint("physics", "solver_iterations").ok().flatten() {
            self.solver_iterations = iters as u32;
        }

        // [assets]
        if let Some(gate) = config.getbool("assets", "gate_render").ok().flatten() {
            self.gate_render = gate;
        }
    }

    fn to_ini(&self) -> Ini {
        let mut config = Ini::new();
        let bg = self.background;

        config.set("canvas", "width", Some(self.canvas_width.to_string()));
        config.set("canvas", "height", Some(self.canvas_height.to_string()));
        config.set(
            "canvas",
            "background",
            Some(format!("{:02X}{:02X}{:02X}{:02X}", bg.r, bg.g, bg.b, bg.a)),
        );

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));

        config.set("physics", "gravity", Some(self.gravity.to_string()));
        config.set("physics", "mobile_gravity", Some(self.mobile_gravity.to_string()));
        config.set(
            "physics",
            "mobile_breakpoint",
            Some(self.mobile_breakpoint.to_string()),
        );
        config.set("physics", "max_speed", Some(self.max_speed.to_string()));
        config.set(
            "physics",
            "solver_iterations",
            Some(self.solver_iterations.to_string()),
        );

        config.set("assets", "gate_render", Some(self.gate_render.to_string()));
        config
    }

    /// Save configuration to the INI file.
    pub fn save_to_file(&self) -> Result<(), String> {
        self.to_ini()
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;
        info!("Saved config to {:?}", self.config_path);
        Ok(())
    }

    /// The INI text [`save_to_file`](Self::save_to_file) would write.
    pub fn to_ini_string(&self) -> String {
        self.to_ini().writes()
    }

    /// Gravity for a viewport of the given width.
    pub fn gravity_for_viewport(&self, viewport_width: f32) -> f32 {
        if viewport_width < self.mobile_breakpoint as f32 {
            self.mobile_gravity
        } else {
            self.gravity
        }
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.canvas_width as f32, self.canvas_height as f32)
    }

    pub fn solver_settings(&self) -> SolverSettings {
        SolverSettings {
            iterations: self.solver_iterations.max(1) as usize,
            max_speed: (self.max_speed > 0.0).then_some(self.max_speed),
            ..SolverSettings::default()
        }
    }
}
