use anyhow::{Context, Result};
use std::{fs::OpenOptions, path::PathBuf, time::Duration};

pub mod app_core;
pub mod config;
pub mod controller;
pub mod file_handle;
pub mod key_handler;
pub mod loads;
pub mod media;
pub mod skin;
pub mod state;
pub mod surface;
pub mod tui;
pub mod visualizer;

pub use config::Config;
pub use controller::Controller;
pub use file_handle::FileHandle;
pub use state::{Action, AppState};
pub use visualizer::VisualizerStyle;

// ~30fps
pub const REFRESH_RATE: Duration = Duration::from_millis(33);

pub const CONFIG_DIRECTORY: &str = "skinamp";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOG_FILE: &str = "skinamp.log";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIRECTORY))
}

/// The terminal belongs to the TUI, so log lines go to a file next to the config.
pub fn init_logging() -> Result<()> {
    let dir = config_dir().context("Could not determine config directory!")?;
    std::fs::create_dir_all(&dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
        .with_context(|| format!("Could not open log file in {}", dir.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(())
}

pub enum DurationStyle {
    Clean,
    Compact,
}

pub fn get_readable_duration(duration: Duration, style: DurationStyle) -> String {
    let mut secs = duration.as_secs();
    let mins = secs / 60;
    secs %= 60;

    match style {
        DurationStyle::Clean => match mins {
            0 => format!("{secs:02}s"),
            _ => format!("{mins}m {secs:02}s"),
        },
        DurationStyle::Compact => format!("{mins}:{secs:02}"),
    }
}
