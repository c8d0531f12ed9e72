use super::VISUALIZER_BUFFER_CAPACITY;
use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicI8, AtomicU8, AtomicU16, AtomicU32, AtomicU64, Ordering},
    },
    time::Duration,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum PlaybackState {
    Stopped = 0,
    Playing = 1,
    Paused = 2,
}

impl TryFrom<u8> for PlaybackState {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PlaybackState::Stopped),
            1 => Ok(PlaybackState::Playing),
            2 => Ok(PlaybackState::Paused),
            _ => Err(()),
        }
    }
}

/// Telemetry shared between the engine thread and its handle.
pub struct MediaMetrics {
    state: AtomicU8,
    elapsed_ms: AtomicU64,
    duration_ms: AtomicU64,
    sample_rate: AtomicU32,
    channels: AtomicU16,
    volume: AtomicU8,
    balance: AtomicI8,
    repeat: AtomicBool,
    shuffle: AtomicBool,
    pub audio_tap: Mutex<VecDeque<f32>>,
}

impl MediaMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(MediaMetrics {
            state: AtomicU8::new(0),
            elapsed_ms: AtomicU64::new(0),
            duration_ms: AtomicU64::new(0),
            sample_rate: AtomicU32::new(0),
            channels: AtomicU16::new(0),
            volume: AtomicU8::new(100),
            balance: AtomicI8::new(0),
            repeat: AtomicBool::new(false),
            shuffle: AtomicBool::new(false),
            audio_tap: Mutex::new(VecDeque::with_capacity(VISUALIZER_BUFFER_CAPACITY)),
        })
    }

    pub fn get_state(&self) -> PlaybackState {
        self.state
            .load(Ordering::Relaxed)
            .try_into()
            .unwrap_or(PlaybackState::Stopped)
    }

    pub fn set_playback_state(&self, state: PlaybackState) {
        self.state.store(state as u8, Ordering::Relaxed);
    }

    pub fn get_elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.load(Ordering::Relaxed))
    }

    pub fn set_elapsed(&self, d: Duration) {
        self.elapsed_ms
            .store(d.as_millis() as u64, Ordering::Relaxed)
    }

    pub fn get_duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms.load(Ordering::Relaxed))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.load(Ordering::Relaxed)
    }

    pub fn channels(&self) -> u16 {
        self.channels.load(Ordering::Relaxed)
    }

    pub fn set_format(&self, sample_rate: u32, channels: u16, duration: Duration) {
        self.sample_rate.store(sample_rate, Ordering::Relaxed);
        self.channels.store(channels, Ordering::Relaxed);
        self.duration_ms
            .store(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn volume(&self) -> u8 {
        self.volume.load(Ordering::Relaxed)
    }

    pub fn set_volume(&self, volume: u8) {
        self.volume.store(volume, Ordering::Relaxed)
    }

    pub fn balance(&self) -> i8 {
        self.balance.load(Ordering::Relaxed)
    }

    pub fn set_balance(&self, balance: i8) {
        self.balance.store(balance, Ordering::Relaxed)
    }

    /// Returns the new value.
    pub fn toggle_repeat(&self) -> bool {
        !self.repeat.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn repeat(&self) -> bool {
        self.repeat.load(Ordering::Relaxed)
    }

    pub fn toggle_shuffle(&self) -> bool {
        !self.shuffle.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.set_elapsed(Duration::ZERO);
        self.set_playback_state(PlaybackState::Stopped);
        self.drain_samples();
    }

    pub fn drain_samples(&self) -> Vec<f32> {
        match self.audio_tap.try_lock() {
            Ok(mut buf) => buf.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}
