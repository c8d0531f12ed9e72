#![allow(dead_code)]

use anyhow::{Result, bail};
use crossbeam_channel::{Receiver, Sender};
use skinamp::{
    Action, AppState, Controller,
    controller::{Inbound, StateObserver},
    loads::{Job, LoadFamily, LoadTicket, Spawn},
    media::{MediaEvent, MediaSource},
    skin::{BasicSkinLoader, Skin},
    surface::Renderer,
    visualizer::VisualizerStyle,
};
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

pub const ZIP_BYTES: &[u8] = b"PK\x03\x04skin-archive";

// ===== MEDIA =====

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    LoadBuffer(Vec<u8>, LoadTicket),
    Activate(LoadTicket),
    Play,
    Pause,
    Stop,
    SeekTo(Duration),
    SetVolume(u8),
    SetBalance(i8),
    ToggleRepeat,
    ToggleShuffle,
}

pub struct EngineScript {
    pub calls: Vec<Call>,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration: Duration,
    pub elapsed: Duration,
    /// When set, every buffer "decodes" instantly and `Loaded` is emitted.
    pub auto_complete: bool,
    /// When set, `activate` fails as if the staged buffer were gone.
    pub reject_activation: bool,
}

impl Default for EngineScript {
    fn default() -> Self {
        EngineScript {
            calls: Vec::new(),
            sample_rate: 44_100,
            channels: 2,
            duration: Duration::from_secs(200),
            elapsed: Duration::ZERO,
            auto_complete: true,
            reject_activation: false,
        }
    }
}

pub struct FakeMedia {
    script: Arc<Mutex<EngineScript>>,
    events_tx: Sender<MediaEvent>,
    events_rx: Receiver<MediaEvent>,
}

/// The test's side of a `FakeMedia`.
#[derive(Clone)]
pub struct MediaHandle {
    pub script: Arc<Mutex<EngineScript>>,
    pub events_tx: Sender<MediaEvent>,
    pub events_rx: Receiver<MediaEvent>,
}

impl FakeMedia {
    pub fn new() -> (Self, MediaHandle) {
        let script = Arc::new(Mutex::new(EngineScript::default()));
        let (events_tx, events_rx) = crossbeam_channel::unbounded();

        let handle = MediaHandle {
            script: Arc::clone(&script),
            events_tx: events_tx.clone(),
            events_rx: events_rx.clone(),
        };

        let media = FakeMedia {
            script,
            events_tx,
            events_rx,
        };
        (media, handle)
    }

    fn record(&self, call: Call) -> Result<()> {
        self.script.lock().unwrap().calls.push(call);
        Ok(())
    }
}

impl MediaSource for FakeMedia {
    fn load_buffer(&self, buffer: Vec<u8>, ticket: LoadTicket) -> Result<()> {
        let auto_complete = self.script.lock().unwrap().auto_complete;
        self.record(Call::LoadBuffer(buffer, ticket))?;
        if auto_complete {
            let _ = self.events_tx.send(MediaEvent::Loaded(ticket));
        }
        Ok(())
    }

    fn activate(&self, ticket: LoadTicket) -> Result<()> {
        if self.script.lock().unwrap().reject_activation {
            bail!("No decoded buffer held for token {}", ticket.token());
        }
        self.record(Call::Activate(ticket))
    }

    fn play(&self) -> Result<()> {
        self.record(Call::Play)
    }

    fn pause(&self) -> Result<()> {
        self.record(Call::Pause)
    }

    fn stop(&self) -> Result<()> {
        self.record(Call::Stop)
    }

    fn seek_to_time(&self, time: Duration) -> Result<()> {
        self.record(Call::SeekTo(time))
    }

    fn set_volume(&self, volume: u8) -> Result<()> {
        self.record(Call::SetVolume(volume))
    }

    fn set_balance(&self, balance: i8) -> Result<()> {
        self.record(Call::SetBalance(balance))
    }

    fn toggle_repeat(&self) -> Result<()> {
        self.record(Call::ToggleRepeat)
    }

    fn toggle_shuffle(&self) -> Result<()> {
        self.record(Call::ToggleShuffle)
    }

    fn sample_rate(&self) -> u32 {
        self.script.lock().unwrap().sample_rate
    }

    fn channels(&self) -> u16 {
        self.script.lock().unwrap().channels
    }

    fn duration(&self) -> Duration {
        self.script.lock().unwrap().duration
    }

    fn time_elapsed(&self) -> Duration {
        self.script.lock().unwrap().elapsed
    }

    fn events(&self) -> Receiver<MediaEvent> {
        self.events_rx.clone()
    }
}

impl MediaHandle {
    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn emit(&self, event: MediaEvent) {
        self.events_tx.send(event).unwrap();
    }

    pub fn last_ticket(&self) -> Option<LoadTicket> {
        self.calls().iter().rev().find_map(|call| match call {
            Call::LoadBuffer(_, ticket) => Some(*ticket),
            _ => None,
        })
    }

    pub fn load_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::LoadBuffer(..)))
            .count()
    }

    pub fn activations(&self) -> Vec<LoadTicket> {
        self.calls()
            .iter()
            .filter_map(|call| match call {
                Call::Activate(ticket) => Some(*ticket),
                _ => None,
            })
            .collect()
    }
}

// ===== RENDERER =====

#[derive(Default)]
pub struct RenderLog {
    pub clears: usize,
    pub skins: Vec<Skin>,
    pub frames: Vec<(VisualizerStyle, Vec<f32>)>,
}

#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub log: Arc<Mutex<RenderLog>>,
}

impl Renderer for RecordingRenderer {
    fn apply_skin(&mut self, skin: Skin) {
        self.log.lock().unwrap().skins.push(skin);
    }

    fn clear_visualizer(&mut self) {
        self.log.lock().unwrap().clears += 1;
    }

    fn paint_visualizer(&mut self, style: VisualizerStyle, samples: &[f32]) {
        self.log.lock().unwrap().frames.push((style, samples.to_vec()));
    }
}

// ===== OBSERVER =====

#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    Action(Action),
    TimeUpdated,
    LoadFailed(LoadFamily, String),
}

#[derive(Clone, Default)]
pub struct RecordingObserver {
    pub seen: Arc<Mutex<Vec<Seen>>>,
}

impl StateObserver for RecordingObserver {
    fn state_changed(&mut self, action: &Action, _state: &AppState) {
        self.seen.lock().unwrap().push(Seen::Action(action.clone()));
    }

    fn time_updated(&mut self, _state: &AppState) {
        self.seen.lock().unwrap().push(Seen::TimeUpdated);
    }

    fn load_failed(&mut self, family: LoadFamily, error: &anyhow::Error) {
        self.seen
            .lock()
            .unwrap()
            .push(Seen::LoadFailed(family, format!("{error:#}")));
    }
}

impl RecordingObserver {
    pub fn all(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap().clear();
    }

    pub fn actions(&self) -> Vec<Action> {
        self.all()
            .into_iter()
            .filter_map(|s| match s {
                Seen::Action(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<LoadFamily> {
        self.all()
            .into_iter()
            .filter_map(|s| match s {
                Seen::LoadFailed(family, _) => Some(family),
                _ => None,
            })
            .collect()
    }

    pub fn time_updates(&self) -> usize {
        self.all()
            .iter()
            .filter(|s| **s == Seen::TimeUpdated)
            .count()
    }
}

// ===== SPAWNER =====

/// Queues jobs so a test can finish them in any order.
#[derive(Clone, Default)]
pub struct ManualSpawner {
    jobs: Arc<Mutex<Vec<(String, Job)>>>,
    refuse: Arc<AtomicBool>,
}

impl Spawn for ManualSpawner {
    fn spawn(&self, name: &str, job: Job) -> Result<()> {
        if self.refuse.load(Ordering::SeqCst) {
            bail!("Could not start {name} worker");
        }
        self.jobs.lock().unwrap().push((name.to_string(), job));
        Ok(())
    }
}

impl ManualSpawner {
    /// Every later spawn fails and its job is dropped.
    pub fn refuse_all(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }

    pub fn pending(&self) -> Vec<String> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Runs the job at `index` (in spawn order among those still queued).
    pub fn run_at(&self, index: usize) {
        let (_, job) = self.jobs.lock().unwrap().remove(index);
        job();
    }

    pub fn run_all(&self) {
        loop {
            let next = {
                let mut jobs = self.jobs.lock().unwrap();
                match jobs.is_empty() {
                    true => None,
                    false => Some(jobs.remove(0)),
                }
            };

            match next {
                Some((_, job)) => job(),
                None => break,
            }
        }
    }
}

// ===== HARNESS =====

pub struct Harness {
    pub controller: Controller,
    pub media: MediaHandle,
    pub renderer: RecordingRenderer,
    pub observer: RecordingObserver,
    pub spawner: ManualSpawner,
}

impl Harness {
    pub fn new() -> Self {
        let (media, handle) = FakeMedia::new();
        let renderer = RecordingRenderer::default();
        let observer = RecordingObserver::default();
        let spawner = ManualSpawner::default();

        let mut controller = Controller::new(
            Box::new(media),
            Arc::new(BasicSkinLoader),
            Box::new(renderer.clone()),
        )
        .with_spawner(Box::new(spawner.clone()));
        controller.add_observer(Box::new(observer.clone()));

        Harness {
            controller,
            media: handle,
            renderer,
            observer,
            spawner,
        }
    }

    /// Hand everything the fake engine emitted to the controller, the way
    /// the bridge would.
    pub fn deliver_media_events(&mut self) {
        while let Ok(event) = self.media.events_rx.try_recv() {
            self.controller.handle(Inbound::Media(event));
        }
    }

    /// Apply worker results, then any engine events they caused.
    pub fn pump(&mut self) {
        self.controller.pump();
        self.deliver_media_events();
    }

    /// Run every queued job and drain every result.
    pub fn settle(&mut self) {
        self.spawner.run_all();
        self.pump();
    }

    pub fn state(&self) -> &AppState {
        self.controller.state()
    }

    pub fn clears(&self) -> usize {
        self.renderer.log.lock().unwrap().clears
    }

    pub fn skins(&self) -> Vec<Skin> {
        self.renderer.log.lock().unwrap().skins.clone()
    }
}
