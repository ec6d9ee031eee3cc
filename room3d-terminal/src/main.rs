//! room3d Terminal - a furnished room rendered as ASCII
//!
//! Controls:
//!   - Arrow Keys: Turn the room about x and y
//!   - Q/E: Roll
//!   - A/D: Tilt the fish tank
//!   - Space: Move the seats
//!   - T: Toggle textures
//!   - ESC: Quit

use anyhow::Context;
use clap::Parser;
use room3d_core::{Scene, TextureFlags};
use room3d_terminal::{describe, CliArgs, TerminalApp};
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// The renderer owns the screen, so logs only go to a file when asked for.
fn init_tracing(args: &CliArgs) -> anyhow::Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args)?;

    let scene = Scene::new(args.room_config()).context("failed to build the room")?;
    describe(&scene);

    let mut app = TerminalApp::new(scene, args.fps)?;
    if args.textures {
        app.set_textures(TextureFlags::all_ready());
    }
    app.run()?;

    tracing::info!("room3d terminal exited");
    Ok(())
}
