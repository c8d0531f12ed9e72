mod backend_rodio;
mod metrics;
mod tapped_source;

pub use backend_rodio::RodioMedia;
pub use metrics::{MediaMetrics, PlaybackState};
pub use tapped_source::BalancedTap;

use crate::loads::LoadTicket;
use anyhow::Result;
use crossbeam_channel::Receiver;
use std::{sync::Arc, time::Duration};

pub(crate) const VISUALIZER_BUFFER_CAPACITY: usize = 2048;

/// Lifecycle events, delivered in chronological order on one timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Waiting,
    StopWaiting,
    Playing,
    Paused,
    Ended,
    TimeUpdate(Duration),
    VisualizerUpdate(Vec<f32>),
    Loaded(LoadTicket),
    LoadFailed(LoadTicket, String),
}

pub enum MediaCommand {
    LoadBuffer(Vec<u8>, LoadTicket),
    Activate(Arc<[u8]>),
    Play,
    Pause,
    Stop,
    SeekTo(Duration),
    SetVolume(u8),
    SetBalance(i8),
    ToggleRepeat,
    ToggleShuffle,
}

/// The audio engine as seen by the controller.
///
/// Commands return immediately; their effects surface as `MediaEvent`s.
/// Telemetry accessors are synchronous snapshots.
pub trait MediaSource {
    /// Decode `buffer` and hold it aside. Completion is reported as
    /// `Loaded(ticket)` or `LoadFailed(ticket, _)`. The playing track is
    /// untouched either way.
    fn load_buffer(&self, buffer: Vec<u8>, ticket: LoadTicket) -> Result<()>;

    /// Replace the current track with the buffer decoded under `ticket` and
    /// publish its format to the telemetry accessors. Fails when that buffer
    /// is no longer held, e.g. because a later decode took its place.
    fn activate(&self, ticket: LoadTicket) -> Result<()>;

    fn play(&self) -> Result<()>;
    fn pause(&self) -> Result<()>;
    fn stop(&self) -> Result<()>;
    fn seek_to_time(&self, time: Duration) -> Result<()>;

    fn seek_to_percent_complete(&self, percent: f32) -> Result<()> {
        let fraction = percent.clamp(0.0, 100.0) / 100.0;
        self.seek_to_time(self.duration().mul_f32(fraction))
    }

    fn set_volume(&self, volume: u8) -> Result<()>;
    fn set_balance(&self, balance: i8) -> Result<()>;
    fn toggle_repeat(&self) -> Result<()>;
    fn toggle_shuffle(&self) -> Result<()>;

    fn sample_rate(&self) -> u32;
    fn channels(&self) -> u16;
    fn duration(&self) -> Duration;
    fn time_elapsed(&self) -> Duration;

    fn events(&self) -> Receiver<MediaEvent>;
}
