//! Command line arguments for the terminal front end.

use clap::Parser;
use room3d_core::RoomConfig;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "room3d-terminal")]
#[command(about = "Walk around a furnished room rendered in the terminal", long_about = None)]
pub struct CliArgs {
    /// Write tracing output to this file (the screen is taken by the renderer)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Enable debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Target frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=120))]
    pub fps: u32,

    /// Largest fish tank tilt in degrees
    #[arg(long, default_value_t = 45, value_parser = clap::value_parser!(i32).range(0..=80))]
    pub max_tilt: i32,

    /// Start with floor, wall and fish textures already loaded
    #[arg(long)]
    pub textures: bool,
}

impl CliArgs {
    pub fn room_config(&self) -> RoomConfig {
        RoomConfig::default().with_max_tilt(self.max_tilt)
    }

    /// Filter directive used when `RUST_LOG` is unset
    pub fn default_filter(&self) -> &'static str {
        if self.verbose {
            "room3d_core=debug,room3d_terminal=debug"
        } else {
            "room3d_core=info,room3d_terminal=info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["room3d-terminal"]);
        assert_eq!(args.fps, 30);
        assert!(args.log_file.is_none());
        assert_eq!(args.room_config(), RoomConfig::default());
    }

    #[test]
    fn test_max_tilt_reaches_config() {
        let args = CliArgs::parse_from(["room3d-terminal", "--max-tilt", "30", "-v"]);
        assert_eq!(args.room_config().tilts.steps().count(), 21);
        assert!(args.default_filter().contains("debug"));
    }

    #[test]
    fn test_rejects_zero_fps() {
        assert!(CliArgs::try_parse_from(["room3d-terminal", "--fps", "0"]).is_err());
    }
}
