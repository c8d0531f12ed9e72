use crate::visualizer::VisualizerStyle;
use std::time::Duration;

/// One discrete state transition. The set is closed: `reduce` handles every
/// variant and nothing else writes `AppState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Mixer
    SetVolume { volume: i32 },
    SetBalance { balance: i32 },

    // Transport
    UpdateTimeElapsed { elapsed: Duration },
    MediaIsStopped,
    MediaIsPlaying,
    MediaIsPaused,

    // Indicators
    StartWorking,
    StopWorking,
    StartLoading,
    StopLoading,

    // Metadata
    SetMediaKbps { kbps: u32 },
    SetMediaKhz { khz: u32 },
    SetChannelsCount { channels: u16 },
    SetMediaName { name: String },
    SetMediaLength { length: Duration },
    SetFileName { name: String },

    // Options
    ToggleRepeat,
    ToggleShuffle,
    SetVisualizerStyle { style: VisualizerStyle },
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::SetVolume { .. } => "SET_VOLUME",
            Action::SetBalance { .. } => "SET_BALANCE",
            Action::UpdateTimeElapsed { .. } => "UPDATE_TIME_ELAPSED",
            Action::MediaIsStopped => "MEDIA_IS_STOPPED",
            Action::MediaIsPlaying => "MEDIA_IS_PLAYING",
            Action::MediaIsPaused => "MEDIA_IS_PAUSED",
            Action::StartWorking => "START_WORKING",
            Action::StopWorking => "STOP_WORKING",
            Action::StartLoading => "START_LOADING",
            Action::StopLoading => "STOP_LOADING",
            Action::SetMediaKbps { .. } => "SET_MEDIA_KBPS",
            Action::SetMediaKhz { .. } => "SET_MEDIA_KHZ",
            Action::SetChannelsCount { .. } => "SET_CHANNELS_COUNT",
            Action::SetMediaName { .. } => "SET_MEDIA_NAME",
            Action::SetMediaLength { .. } => "SET_MEDIA_LENGTH",
            Action::SetFileName { .. } => "SET_FILE_NAME",
            Action::ToggleRepeat => "TOGGLE_REPEAT",
            Action::ToggleShuffle => "TOGGLE_SHUFFLE",
            Action::SetVisualizerStyle { .. } => "SET_VISUALIZER_STYLE",
        }
    }
}
