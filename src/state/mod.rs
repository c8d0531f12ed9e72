mod action;
mod reducer;

pub use action::Action;
pub use reducer::reduce;

use crate::{
    DurationStyle, get_readable_duration,
    visualizer::VisualizerStyle,
};
use std::time::Duration;

pub const VOLUME_RANGE: (i32, i32) = (0, 100);
pub const BALANCE_RANGE: (i32, i32) = (-100, 100);

pub fn clamp_volume(volume: i32) -> u8 {
    volume.clamp(VOLUME_RANGE.0, VOLUME_RANGE.1) as u8
}

pub fn clamp_balance(balance: i32) -> i8 {
    balance.clamp(BALANCE_RANGE.0, BALANCE_RANGE.1) as i8
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MediaStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The single application state. Only the controller holds a mutable one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub volume: u8,
    pub balance: i8,

    pub time_elapsed: Duration,
    pub media_length: Duration,
    pub media_name: Option<String>,
    pub file_name: Option<String>,

    pub kbps: Option<u32>,
    pub khz: Option<u32>,
    pub channels: Option<u16>,

    pub status: MediaStatus,
    pub working: bool,
    pub loading: bool,

    pub visualizer_style: VisualizerStyle,
    pub repeat: bool,
    pub shuffle: bool,
}

impl Default for AppState {
    fn default() -> Self {
        AppState {
            volume: 75,
            balance: 0,

            time_elapsed: Duration::ZERO,
            media_length: Duration::ZERO,
            media_name: None,
            file_name: None,

            kbps: None,
            khz: None,
            channels: None,

            status: MediaStatus::Stopped,
            working: false,
            loading: false,

            visualizer_style: VisualizerStyle::default(),
            repeat: false,
            shuffle: false,
        }
    }
}

impl AppState {
    pub fn is_playing(&self) -> bool {
        self.status == MediaStatus::Playing
    }

    pub fn is_stopped(&self) -> bool {
        self.status == MediaStatus::Stopped
    }

    pub fn elapsed_display(&self) -> String {
        get_readable_duration(self.time_elapsed, DurationStyle::Compact)
    }

    pub fn length_display(&self) -> String {
        get_readable_duration(self.media_length, DurationStyle::Compact)
    }

    /// 0.0..=1.0, or 0.0 when no length is known
    pub fn progress(&self) -> f64 {
        match self.media_length.is_zero() {
            true => 0.0,
            false => {
                (self.time_elapsed.as_secs_f64() / self.media_length.as_secs_f64()).clamp(0.0, 1.0)
            }
        }
    }

    pub fn stereo_label(&self) -> &'static str {
        match self.channels {
            Some(1) => "mono",
            Some(_) => "stereo",
            None => "",
        }
    }
}
