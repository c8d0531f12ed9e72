use crate::{CONFIG_FILE, Controller, FileHandle, config_dir, visualizer::VisualizerStyle};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Startup settings. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub volume: i32,
    pub balance: i32,
    pub media_file: Option<MediaFileConfig>,
    pub skin_url: Option<String>,
    pub visualizer: VisualizerStyle,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaFileConfig {
    pub url: String,
    pub name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            volume: 75,
            balance: 0,
            media_file: None,
            skin_url: None,
            visualizer: VisualizerStyle::default(),
        }
    }
}

impl Config {
    /// Reads `<config_dir>/skinamp/config.toml`, falling back to defaults
    /// when it does not exist.
    pub fn load() -> Result<Self> {
        let Some(path) = config_dir().map(|dir| dir.join(CONFIG_FILE)) else {
            return Ok(Config::default());
        };

        match path.exists() {
            true => Self::load_from_file(&path),
            false => Ok(Config::default()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_str = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config at {}", path.display()))?;

        toml::from_str::<Config>(&file_str)
            .with_context(|| format!("Malformed config at {}", path.display()))
    }

    pub fn apply_to(&self, controller: &mut Controller) -> Result<()> {
        controller.set_volume(self.volume)?;
        controller.set_balance(self.balance)?;

        if let Some(media) = &self.media_file {
            let file = FileHandle::from_location(&media.url, media.name.as_deref());
            controller.begin_media_load(file, false);
        }

        if let Some(skin) = &self.skin_url {
            controller.set_skin(FileHandle::from_location(skin, None));
        }

        if self.visualizer != VisualizerStyle::None {
            controller.set_visualizer_style(self.visualizer);
        }

        Ok(())
    }
}
