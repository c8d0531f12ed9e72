mod bridge;
mod commands;
mod dispatch;
mod loads;

pub use bridge::{MediaSubscription, action_for_event};
pub use dispatch::{LogObserver, StateObserver};

use crate::{
    file_handle::FileHandle,
    loads::{LoadCoordinator, LoadTicket, Spawn, ThreadSpawner},
    media::{MediaEvent, MediaSource},
    skin::{Skin, SkinLoader},
    state::AppState,
    surface::{FilePicker, NoPicker, Renderer},
};
use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::{sync::Arc, time::Duration};

/// Everything that can reach the controller from outside its own call stack.
pub enum Inbound {
    Media(MediaEvent),
    MediaFetched {
        ticket: LoadTicket,
        result: Result<Vec<u8>>,
    },
    SkinParsed {
        ticket: LoadTicket,
        result: Result<Skin>,
    },
    FileSelected(FileHandle),
}

struct PendingMedia {
    ticket: LoadTicket,
    name: String,
    autoplay: bool,
}

/// Sole owner of `AppState`.
///
/// User commands are methods on the controller; asynchronous results arrive
/// through the inbox and are applied by `pump`. Both paths end in `dispatch`,
/// so state changes happen in exactly the order they are applied here.
pub struct Controller {
    state: AppState,

    media: Box<dyn MediaSource>,
    skins: Arc<dyn SkinLoader>,
    renderer: Box<dyn Renderer>,
    picker: Box<dyn FilePicker>,
    spawner: Box<dyn Spawn>,
    observers: Vec<Box<dyn StateObserver>>,

    loads: LoadCoordinator,
    pending_media: Option<PendingMedia>,

    inbox_tx: Sender<Inbound>,
    inbox_rx: Receiver<Inbound>,
}

impl Controller {
    pub fn new(
        media: Box<dyn MediaSource>,
        skins: Arc<dyn SkinLoader>,
        renderer: Box<dyn Renderer>,
    ) -> Self {
        let (inbox_tx, inbox_rx) = crossbeam_channel::unbounded();

        Controller {
            state: AppState::default(),

            media,
            skins,
            renderer,
            picker: Box::new(NoPicker),
            spawner: Box::new(ThreadSpawner),
            observers: Vec::new(),

            loads: LoadCoordinator::new(),
            pending_media: None,

            inbox_tx,
            inbox_rx,
        }
    }

    pub fn with_spawner(mut self, spawner: Box<dyn Spawn>) -> Self {
        self.spawner = spawner;
        self
    }

    pub fn with_picker(mut self, picker: Box<dyn FilePicker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn media(&self) -> &dyn MediaSource {
        self.media.as_ref()
    }

    /// Sender side of the inbox, for collaborators that live elsewhere.
    pub fn inbox(&self) -> Sender<Inbound> {
        self.inbox_tx.clone()
    }

    /// Whether the current media load will start playback once decoded.
    pub fn autoplay_on_ready(&self) -> bool {
        self.pending_media.as_ref().is_some_and(|p| p.autoplay)
    }

    pub fn is_loading(&self) -> bool {
        self.loads.any_pending()
    }

    /// Apply every message already waiting in the inbox. Never blocks.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.inbox_rx.try_recv() {
            self.handle(message);
            handled += 1;
        }
        handled
    }

    /// Wait up to `timeout` for the first message, then drain the rest.
    pub fn pump_timeout(&mut self, timeout: Duration) -> usize {
        match self.inbox_rx.recv_timeout(timeout) {
            Ok(message) => {
                self.handle(message);
                1 + self.pump()
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        }
    }

    pub fn handle(&mut self, message: Inbound) {
        match message {
            Inbound::Media(event) => self.handle_media_event(event),
            Inbound::MediaFetched { ticket, result } => self.on_media_fetched(ticket, result),
            Inbound::SkinParsed { ticket, result } => self.on_skin_parsed(ticket, result),
            Inbound::FileSelected(file) => self.load_from_file_reference(file),
        }
    }
}
