mod core;
mod renderer;
mod shared;
mod sync;
mod ui;
mod utils;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::renderer::DisplayMode;
use crate::shared::config::{ConfigOverrides, PlayerConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by every subcommand
#[derive(Args, Clone)]
struct FrameArgs {
    /// Frame base path; files are read as <FRAMES>_<index>.bmp
    #[arg(long)]
    frames: Option<String>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long)]
    fps: Option<f64>,
    #[arg(long)]
    start: Option<u32>,
    /// JSON config file (defaults to ./badapple.json, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Restart at the first frame when the sequence runs out
    #[arg(long, default_value_t = false)]
    loop_playback: bool,
}

impl FrameArgs {
    fn resolve(&self) -> Result<PlayerConfig> {
        let overrides = ConfigOverrides {
            width: self.width,
            height: self.height,
            base_path: self.frames.clone(),
            fps: self.fps,
            start_frame: self.start,
            loop_playback: self.loop_playback,
        };
        PlayerConfig::resolve(self.config.as_deref(), &overrides)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play the frame sequence as a point grid
    Play {
        #[command(flatten)]
        frames: FrameArgs,
        #[arg(short, long, value_enum, default_value_t = DisplayMode::Rgb)]
        mode: DisplayMode,
    },
    /// Print the resolved configuration and the frames found on disk
    Info {
        #[command(flatten)]
        frames: FrameArgs,
    },
    /// Print the points of a single frame, one "x y z" per line
    Points {
        #[command(flatten)]
        frames: FrameArgs,
        /// Frame index to rasterize (defaults to the start frame)
        #[arg(short, long)]
        index: Option<u32>,
    },
}

#[derive(Serialize)]
struct InfoReport<'a> {
    config: &'a PlayerConfig,
    frames_found: usize,
    first_frame: Option<u32>,
    last_frame: Option<u32>,
    problems: Vec<String>,
}

fn main() -> Result<()> {
    crate::utils::logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Play { frames, mode } => {
            let config = frames.resolve()?;
            crate::core::launcher::run(config, *mode)?;
        }
        Commands::Info { frames } => {
            let config = frames.resolve()?;
            let indices =
                crate::utils::file_utils::list_frame_indices(&config.base_path).unwrap_or_default();
            let report = InfoReport {
                config: &config,
                frames_found: indices.len(),
                first_frame: indices.first().copied(),
                last_frame: indices.last().copied(),
                problems: crate::core::launcher::preflight(&config, false),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Points { frames, index } => {
            let config = frames.resolve()?;
            for point in crate::core::launcher::frame_points(&config, *index)? {
                println!("{} {} {}", point.x, point.y, point.z);
            }
        }
    }

    Ok(())
}
