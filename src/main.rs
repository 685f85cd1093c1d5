//! Tagfall desktop host.
//!
//! Opens a raylib window and shows one tag canvas centred in it:
//! - **raylib** for the window, input and drawing,
//! - **bevy_ecs** for the canvas state (through [`tagfall::canvas::TagCanvas`]).
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults if missing) and the tag set
//! 2. Open the window, mount the canvas, create its HiDPI render target
//! 3. Every frame:
//!    - translate mouse/touch state into pointer events for the canvas
//!    - run one canvas frame (icons, lifecycle, physics step)
//!    - upload newly loaded icon textures
//!    - paint the draw list into the render target and blit it
//! 4. Tear the canvas down on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --tags tags.json --seed 7
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use clap::Parser;
use log::{error, info};
use raylib::prelude::*;
use std::path::PathBuf;

use tagfall::canvas::{CanvasOptions, FrameOutcome, TagCanvas};
use tagfall::resources::canvasconfig::CanvasConfig;
use tagfall::resources::canvasplacement::CanvasPlacement;
use tagfall::resources::rendertarget::CanvasTarget;
use tagfall::resources::texturestore::TextureStore;
use tagfall::systems::input::{PointerAdapter, debug_toggle_pressed, poll_pointer_frame};
use tagfall::systems::render::{RaylibPainter, paint};
use tagfall::tagset::{default_tag_specs, load_tag_specs};

const WINDOW_BACKGROUND: Color = Color::new(0x02, 0x06, 0x17, 0xFF);

/// Draggable physics tag canvas
#[derive(Parser)]
#[command(version, about = "A canvas of falling, bouncing, draggable skill tags.")]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// JSON tag set. The built-in skill tags are used when omitted.
    #[arg(long, value_name = "PATH")]
    tags: Option<PathBuf>,

    /// Seed for the initial tag placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    dump_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = CanvasConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("{}; using defaults", e);
    }

    // Early-exit: write config and quit (no window needed)
    if cli.dump_config {
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Config written to {}", config.config_path.display());
        return;
    }

    let tags = match &cli.tags {
        Some(path) => match load_tag_specs(path) {
            Ok(tags) => tags,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => default_tag_specs(),
    };

    // --------------- Raylib window ---------------
    let mut builder = raylib::init();
    builder
        .size(config.window_width as i32, config.window_height as i32)
        .resizable()
        .title("tagfall");
    if config.vsync {
        builder.vsync();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(config.target_fps);
    rl.set_exit_key(None);

    // --------------- Canvas ---------------
    let dpr = rl.get_window_scale_dpi().x;
    let mut options = CanvasOptions::new(config.clone())
        .with_tags(tags)
        .with_viewport_width(rl.get_screen_width() as f32);
    if let Some(seed) = cli.seed {
        options = options.with_seed(seed);
    }
    let mut canvas = match TagCanvas::mount(options) {
        Ok(canvas) => canvas,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut target = match CanvasTarget::new(
        &mut rl,
        &thread,
        config.canvas_width,
        config.canvas_height,
        dpr,
    ) {
        Ok(target) => target,
        Err(e) => {
            error!("{}", e);
            canvas.teardown();
            std::process::exit(1);
        }
    };
    info!("Canvas render target at {}x pixel ratio", target.dpr);

    let mut textures = TextureStore::new();
    let mut adapter = PointerAdapter::new();
    let canvas_size = Vector2::new(config.canvas_width as f32, config.canvas_height as f32);

    // --------------- Main loop ---------------
    while !rl.window_should_close() {
        if debug_toggle_pressed(&rl) {
            canvas.toggle_debug();
        }

        // The canvas origin moves with the window size; recompute every frame.
        let placement =
            CanvasPlacement::centered(rl.get_screen_width(), rl.get_screen_height(), canvas_size);
        for input in adapter.translate(poll_pointer_frame(&rl, &placement)) {
            canvas.dispatch_pointer(input, placement.origin);
        }

        match canvas.frame(rl.get_frame_time()) {
            FrameOutcome::Stepped | FrameOutcome::Loading => {}
            FrameOutcome::Stopped => break,
            FrameOutcome::Faulted(e) => {
                error!("Canvas stopped: {}", e);
                break;
            }
        }

        textures.upload_ready(&mut rl, &thread, canvas.icons());
        let ops = canvas.draw_list();
        let camera = target.camera();
        let source = target.source_rect();

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(WINDOW_BACKGROUND);
        {
            let mut t = d.begin_texture_mode(&thread, &mut target.texture);
            let mut m = t.begin_mode2D(camera);
            let mut painter = RaylibPainter::new(&mut m, &textures);
            paint(&ops, &mut painter);
        }
        d.draw_texture_pro(
            &target.texture,
            source,
            placement.dest_rect(),
            Vector2::zero(),
            0.0,
            Color::WHITE,
        );
    }

    canvas.teardown();
    // Textures must go before the GL context does.
    textures.clear();
}
