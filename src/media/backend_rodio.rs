use super::{
    BalancedTap, MediaCommand, MediaEvent, MediaMetrics, MediaSource, PlaybackState,
};
use crate::{REFRESH_RATE, loads::LoadTicket};
use anyhow::{Context, Result, anyhow};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::{
    io::Cursor,
    sync::{Arc, Mutex},
    thread::{self, JoinHandle},
    time::Duration,
};

// HTML audio fires `timeupdate` roughly four times a second
const TIME_UPDATE_INTERVAL_MS: u128 = 250;

type TrackDecoder = Decoder<Cursor<Arc<[u8]>>>;

/// A decoded buffer waiting for the controller to accept it.
struct StagedTrack {
    ticket: LoadTicket,
    bytes: Arc<[u8]>,
    sample_rate: u32,
    channels: u16,
    duration: Duration,
}

type StagingSlot = Arc<Mutex<Option<StagedTrack>>>;

/// Handle to the rodio engine thread.
pub struct RodioMedia {
    commands: Sender<MediaCommand>,
    events: Receiver<MediaEvent>,
    metrics: Arc<MediaMetrics>,
    staging: StagingSlot,
    _thread_handle: JoinHandle<()>,
}

impl RodioMedia {
    pub fn spawn() -> Result<Self> {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (evt_tx, evt_rx) = crossbeam_channel::unbounded();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
        let metrics = MediaMetrics::new();
        let staging = StagingSlot::default();

        let thread_handle = MediaCore::spawn(
            cmd_rx,
            evt_tx,
            Arc::clone(&metrics),
            Arc::clone(&staging),
            ready_tx,
        );

        ready_rx
            .recv()
            .context("Audio thread exited during startup")?
            .map_err(|e| anyhow!("Cannot open audio output: {e}"))?;

        Ok(RodioMedia {
            commands: cmd_tx,
            events: evt_rx,
            metrics,
            staging,
            _thread_handle: thread_handle,
        })
    }

    pub fn metrics(&self) -> Arc<MediaMetrics> {
        Arc::clone(&self.metrics)
    }

    fn send(&self, command: MediaCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("Audio thread is gone"))
    }
}

impl MediaSource for RodioMedia {
    fn load_buffer(&self, buffer: Vec<u8>, ticket: LoadTicket) -> Result<()> {
        self.send(MediaCommand::LoadBuffer(buffer, ticket))
    }

    fn activate(&self, ticket: LoadTicket) -> Result<()> {
        let staged = take_staged(&self.staging, ticket)?;
        self.metrics
            .set_format(staged.sample_rate, staged.channels, staged.duration);
        self.send(MediaCommand::Activate(staged.bytes))
    }

    fn play(&self) -> Result<()> {
        self.send(MediaCommand::Play)
    }

    fn pause(&self) -> Result<()> {
        self.send(MediaCommand::Pause)
    }

    fn stop(&self) -> Result<()> {
        self.send(MediaCommand::Stop)
    }

    fn seek_to_time(&self, time: Duration) -> Result<()> {
        self.send(MediaCommand::SeekTo(time))
    }

    fn set_volume(&self, volume: u8) -> Result<()> {
        self.send(MediaCommand::SetVolume(volume))
    }

    fn set_balance(&self, balance: i8) -> Result<()> {
        self.send(MediaCommand::SetBalance(balance))
    }

    fn toggle_repeat(&self) -> Result<()> {
        self.send(MediaCommand::ToggleRepeat)
    }

    fn toggle_shuffle(&self) -> Result<()> {
        self.send(MediaCommand::ToggleShuffle)
    }

    fn sample_rate(&self) -> u32 {
        self.metrics.sample_rate()
    }

    fn channels(&self) -> u16 {
        self.metrics.channels()
    }

    fn duration(&self) -> Duration {
        self.metrics.get_duration()
    }

    fn time_elapsed(&self) -> Duration {
        self.metrics.get_elapsed()
    }

    fn events(&self) -> Receiver<MediaEvent> {
        self.events.clone()
    }
}

struct MediaCore {
    sink: Sink,
    _stream: Option<OutputStream>,
    commands: Receiver<MediaCommand>,
    events: Sender<MediaEvent>,
    metrics: Arc<MediaMetrics>,
    staging: StagingSlot,

    track: Option<Arc<[u8]>>,
    active: bool,
    last_time_update: Option<u128>,
}

impl MediaCore {
    fn new(
        sink: Sink,
        stream: Option<OutputStream>,
        commands: Receiver<MediaCommand>,
        events: Sender<MediaEvent>,
        metrics: Arc<MediaMetrics>,
        staging: StagingSlot,
    ) -> Self {
        MediaCore {
            sink,
            _stream: stream,
            commands,
            events,
            metrics,
            staging,

            track: None,
            active: false,
            last_time_update: None,
        }
    }

    fn spawn(
        commands: Receiver<MediaCommand>,
        events: Sender<MediaEvent>,
        metrics: Arc<MediaMetrics>,
        staging: StagingSlot,
        ready: Sender<Result<(), String>>,
    ) -> JoinHandle<()> {
        thread::spawn(move || {
            let stream = match OutputStreamBuilder::open_default_stream() {
                Ok(s) => s,
                Err(e) => {
                    let _ = ready.send(Err(e.to_string()));
                    return;
                }
            };
            let sink = Sink::connect_new(stream.mixer());
            let _ = ready.send(Ok(()));

            MediaCore::new(sink, Some(stream), commands, events, metrics, staging).run();
        })
    }

    fn run(&mut self) {
        while self.process_commands() {
            self.check_track_end();
            self.update_metrics();
            thread::sleep(REFRESH_RATE);
        }
        log::debug!("Audio thread shutting down");
    }

    /// Returns `false` once the handle has been dropped.
    fn process_commands(&mut self) -> bool {
        loop {
            match self.commands.try_recv() {
                Ok(cmd) => match cmd {
                    MediaCommand::LoadBuffer(bytes, ticket) => self.load_buffer(bytes, ticket),
                    MediaCommand::Activate(bytes) => self.activate(bytes),
                    MediaCommand::Play => self.play(),
                    MediaCommand::Pause => self.pause(),
                    MediaCommand::Stop => self.stop(),
                    MediaCommand::SeekTo(t) => self.seek_to(t),
                    MediaCommand::SetVolume(v) => self.set_volume(v),
                    MediaCommand::SetBalance(b) => self.metrics.set_balance(b),
                    MediaCommand::ToggleRepeat => {
                        self.metrics.toggle_repeat();
                    }
                    MediaCommand::ToggleShuffle => {
                        self.metrics.toggle_shuffle();
                    }
                },
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    fn check_track_end(&mut self) {
        // Checking `active` ensures the end event is sent once
        if !(self.active && self.sink.empty()) {
            return;
        }

        if self.metrics.repeat() {
            self.start_track();
            return;
        }

        self.active = false;
        self.metrics.reset();
        self.emit(MediaEvent::Ended);
    }

    fn update_metrics(&mut self) {
        if !self.active || self.sink.is_paused() {
            return;
        }

        let pos = self.sink.get_pos();
        self.metrics.set_elapsed(pos);

        let bucket = pos.as_millis() / TIME_UPDATE_INTERVAL_MS;
        if self.last_time_update != Some(bucket) {
            self.last_time_update = Some(bucket);
            self.emit(MediaEvent::TimeUpdate(pos));
        }

        let samples = self.metrics.drain_samples();
        if !samples.is_empty() {
            self.emit(MediaEvent::VisualizerUpdate(samples));
        }
    }

    fn emit(&self, event: MediaEvent) {
        let _ = self.events.send(event);
    }
}

impl MediaCore {
    /// Decodes without touching the sink. Only `activate` replaces what is
    /// playing.
    fn load_buffer(&mut self, bytes: Vec<u8>, ticket: LoadTicket) {
        self.emit(MediaEvent::Waiting);

        let bytes: Arc<[u8]> = Arc::from(bytes);
        let decoded = decode(&bytes);
        self.emit(MediaEvent::StopWaiting);

        let decoder = match decoded {
            Ok(d) => d,
            Err(e) => {
                self.emit(MediaEvent::LoadFailed(ticket, e.to_string()));
                return;
            }
        };

        let staged = StagedTrack {
            ticket,
            sample_rate: decoder.sample_rate(),
            channels: decoder.channels(),
            duration: decoder.total_duration().unwrap_or_default(),
            bytes,
        };

        // A newer decode always replaces an older, unaccepted one
        let held = self.staging.lock().map(|mut slot| *slot = Some(staged));
        match held {
            Ok(()) => self.emit(MediaEvent::Loaded(ticket)),
            Err(_) => self.emit(MediaEvent::LoadFailed(ticket, "Staging slot poisoned".into())),
        }
    }

    fn activate(&mut self, bytes: Arc<[u8]>) {
        self.clear_track();
        self.track = Some(bytes);
    }

    /// Silences the sink. Listeners hear `Ended` if a track was playing or paused.
    fn clear_track(&mut self) {
        self.sink.clear();
        self.metrics.reset();

        if self.active {
            self.active = false;
            self.emit(MediaEvent::Ended);
        }
    }

    fn start_track(&mut self) -> bool {
        let Some(bytes) = &self.track else {
            return false;
        };

        let decoder = match decode(bytes) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Could not restart track: {e}");
                return false;
            }
        };

        self.sink.clear();
        self.sink
            .append(BalancedTap::new(decoder, Arc::clone(&self.metrics)));
        self.sink.play();

        self.active = true;
        self.last_time_update = None;
        self.metrics.set_playback_state(PlaybackState::Playing);
        true
    }

    fn play(&mut self) {
        let resumed = match self.active {
            true => {
                self.sink.play();
                self.metrics.set_playback_state(PlaybackState::Playing);
                true
            }
            false => self.start_track(),
        };

        if resumed {
            self.emit(MediaEvent::Playing);
        }
    }

    fn pause(&mut self) {
        if self.active && !self.sink.is_paused() {
            self.sink.pause();
            self.metrics.set_playback_state(PlaybackState::Paused);
            self.emit(MediaEvent::Paused);
        }
    }

    fn stop(&mut self) {
        self.clear_track();
    }

    fn seek_to(&mut self, time: Duration) {
        if !self.active {
            return;
        }

        let duration = self.metrics.get_duration();
        let target = match duration.is_zero() {
            true => time,
            false => time.min(duration),
        };

        match self.sink.try_seek(target) {
            Ok(()) => {
                self.metrics.set_elapsed(target);
                self.emit(MediaEvent::TimeUpdate(target));
            }
            Err(e) => log::warn!("Seek to {target:?} failed: {e}"),
        }
    }

    fn set_volume(&mut self, volume: u8) {
        self.metrics.set_volume(volume);
        self.sink.set_volume(volume as f32 / 100.0);
    }
}

fn take_staged(slot: &StagingSlot, ticket: LoadTicket) -> Result<StagedTrack> {
    let mut slot = slot.lock().map_err(|_| anyhow!("Staging slot poisoned"))?;
    slot.take_if(|staged| staged.ticket == ticket)
        .ok_or_else(|| anyhow!("No decoded track held for load {}", ticket.token()))
}

fn decode(bytes: &Arc<[u8]>) -> Result<TrackDecoder> {
    let len = bytes.len() as u64;

    let decoder = Decoder::builder()
        .with_data(Cursor::new(Arc::clone(bytes)))
        .with_byte_len(len)
        .with_seekable(true)
        .build()?;

    Ok(decoder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{LoadCoordinator, LoadFamily};

    // 0.1s of 8kHz mono silence
    fn wav_bytes() -> Vec<u8> {
        let rate = 8_000u32;
        let data_len = 1_600u32;

        let mut b = Vec::new();
        b.extend_from_slice(b"RIFF");
        b.extend_from_slice(&(36 + data_len).to_le_bytes());
        b.extend_from_slice(b"WAVEfmt ");
        b.extend_from_slice(&16u32.to_le_bytes());
        b.extend_from_slice(&1u16.to_le_bytes());
        b.extend_from_slice(&1u16.to_le_bytes());
        b.extend_from_slice(&rate.to_le_bytes());
        b.extend_from_slice(&(rate * 2).to_le_bytes());
        b.extend_from_slice(&2u16.to_le_bytes());
        b.extend_from_slice(&16u16.to_le_bytes());
        b.extend_from_slice(b"data");
        b.extend_from_slice(&data_len.to_le_bytes());
        b.resize(b.len() + data_len as usize, 0);
        b
    }

    fn playing_core() -> (MediaCore, Receiver<MediaEvent>) {
        let (sink, _queue) = Sink::new();
        let (_cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (evt_tx, evt_rx) = crossbeam_channel::unbounded();

        let mut core = MediaCore::new(
            sink,
            None,
            cmd_rx,
            evt_tx,
            MediaMetrics::new(),
            StagingSlot::default(),
        );
        core.track = Some(Arc::from(&b"current"[..]));
        core.active = true;

        (core, evt_rx)
    }

    fn drain(events: &Receiver<MediaEvent>) -> Vec<MediaEvent> {
        events.try_iter().collect()
    }

    #[test]
    fn failed_decode_keeps_current_track() {
        let (mut core, events) = playing_core();
        let ticket = LoadCoordinator::new().begin(LoadFamily::Media).ticket();

        core.load_buffer(b"not audio".to_vec(), ticket);

        let seen = drain(&events);
        assert_eq!(seen[..2], [MediaEvent::Waiting, MediaEvent::StopWaiting]);
        assert!(matches!(seen[2], MediaEvent::LoadFailed(t, _) if t == ticket));
        assert_eq!(seen.len(), 3);

        assert!(core.active);
        assert_eq!(core.track.as_deref(), Some(&b"current"[..]));
        assert!(core.staging.lock().unwrap().is_none());
    }

    #[test]
    fn decoded_buffer_waits_for_activation() {
        let (mut core, events) = playing_core();
        let ticket = LoadCoordinator::new().begin(LoadFamily::Media).ticket();

        core.load_buffer(wav_bytes(), ticket);

        assert_eq!(
            drain(&events),
            vec![
                MediaEvent::Waiting,
                MediaEvent::StopWaiting,
                MediaEvent::Loaded(ticket)
            ]
        );
        assert!(core.active);
        assert_eq!(core.track.as_deref(), Some(&b"current"[..]));

        let staged = take_staged(&core.staging, ticket).unwrap();
        assert_eq!(staged.sample_rate, 8_000);
        assert_eq!(staged.channels, 1);

        core.activate(Arc::clone(&staged.bytes));

        assert_eq!(drain(&events), vec![MediaEvent::Ended]);
        assert!(!core.active);
        assert_eq!(core.track.as_deref(), Some(&staged.bytes[..]));
    }

    #[test]
    fn only_the_staged_ticket_can_activate() {
        let (mut core, _events) = playing_core();
        let mut loads = LoadCoordinator::new();
        let first = loads.begin(LoadFamily::Media).ticket();
        let second = loads.begin(LoadFamily::Media).ticket();

        core.load_buffer(wav_bytes(), first);

        assert!(take_staged(&core.staging, second).is_err());
        assert!(take_staged(&core.staging, first).is_ok());
        assert!(take_staged(&core.staging, first).is_err());
    }

    #[test]
    fn stop_reports_end_once() {
        let (mut core, events) = playing_core();

        core.stop();
        core.stop();

        assert_eq!(drain(&events), vec![MediaEvent::Ended]);
    }
}
