use super::{Controller, Inbound, PendingMedia};
use crate::{
    file_handle::{FileHandle, Route},
    loads::{LoadFamily, LoadTicket},
    skin::Skin,
    state::Action,
};
use anyhow::{Result, anyhow};
use std::sync::Arc;

// The engine does not report bitrate
const DEFAULT_KBPS: u32 = 128;

impl Controller {
    /// Initial media load. Does not start playback on its own.
    pub fn load_from_url(&mut self, url: &str, name: Option<&str>) {
        let file = FileHandle::from_url(url, name);
        self.begin_media_load(file, false);
    }

    /// A file the user picked: skin archives go to the skin path, anything
    /// else is treated as media and plays once decoded.
    pub fn load_from_file_reference(&mut self, file: FileHandle) {
        match file.route() {
            Route::Skin => self.begin_skin_load(file),
            Route::Media => self.begin_media_load(file, true),
        }
    }

    pub fn set_skin(&mut self, file: FileHandle) {
        self.begin_skin_load(file);
    }

    pub(crate) fn begin_media_load(&mut self, file: FileHandle, autoplay: bool) {
        let op = self.loads.begin(LoadFamily::Media);
        let ticket = op.ticket();
        let name = file.name().to_string();

        log::info!("Loading media \"{name}\" (token {})", ticket.token());

        self.pending_media = Some(PendingMedia {
            ticket,
            name: name.clone(),
            autoplay,
        });
        self.dispatch(Action::SetFileName { name });
        self.dispatch(Action::StartLoading);

        let inbox = self.inbox_tx.clone();
        let spawned = self.spawner.spawn(
            "media-fetch",
            Box::new(move || {
                let result = file.read_bytes();
                let _ = inbox.send(Inbound::MediaFetched {
                    ticket: op.ticket(),
                    result,
                });
            }),
        );
        if let Err(e) = spawned {
            self.fail_load(ticket, e);
        }
    }

    pub(crate) fn begin_skin_load(&mut self, file: FileHandle) {
        let op = self.loads.begin(LoadFamily::Skin);
        let ticket = op.ticket();

        log::info!("Loading skin \"{}\" (token {})", file.name(), ticket.token());
        self.dispatch(Action::StartLoading);

        let inbox = self.inbox_tx.clone();
        let skins = Arc::clone(&self.skins);
        let spawned = self.spawner.spawn(
            "skin-load",
            Box::new(move || {
                let bytes = file.read_bytes();
                if op.is_superseded() {
                    return;
                }

                let result = bytes.and_then(|b| skins.parse(file.name(), &b));
                let _ = inbox.send(Inbound::SkinParsed {
                    ticket: op.ticket(),
                    result,
                });
            }),
        );
        if let Err(e) = spawned {
            self.fail_load(ticket, e);
        }
    }

    pub(super) fn on_media_fetched(&mut self, ticket: LoadTicket, result: Result<Vec<u8>>) {
        if !self.loads.is_current(ticket) {
            log::debug!("Dropping stale media fetch (token {})", ticket.token());
            return;
        }

        let handed_off = result.and_then(|bytes| self.media.load_buffer(bytes, ticket));
        if let Err(e) = handed_off {
            self.fail_load(ticket, e);
        }
    }

    /// Only the current decode is swapped into the engine. Older ones stay
    /// staged until the next decode replaces them.
    pub(super) fn on_media_ready(&mut self, ticket: LoadTicket) {
        if !self.loads.is_current(ticket) {
            log::debug!("Dropping stale decode (token {})", ticket.token());
            return;
        }
        if let Err(e) = self.media.activate(ticket) {
            self.fail_load(ticket, e);
            return;
        }
        self.loads.settle(ticket);

        let (name, autoplay) = match self.pending_media.take() {
            Some(pending) => (pending.name, pending.autoplay),
            None => (String::new(), false),
        };

        let khz = (self.media.sample_rate() as f64 / 1000.0).round() as u32;
        let channels = self.media.channels();
        let length = self.media.duration();

        self.dispatch(Action::SetMediaKbps { kbps: DEFAULT_KBPS });
        self.dispatch(Action::SetMediaKhz { khz });
        self.dispatch(Action::SetChannelsCount { channels });
        self.dispatch(Action::SetMediaName { name });
        self.broadcast_time_updated();
        self.dispatch(Action::SetMediaLength { length });
        self.finish_loading();

        if autoplay {
            if let Err(e) = self.media.play() {
                log::warn!("Autoplay failed: {e:#}");
            }
        }
    }

    pub(super) fn on_media_failed(&mut self, ticket: LoadTicket, message: String) {
        if !self.loads.is_current(ticket) {
            log::debug!("Dropping stale decode failure (token {})", ticket.token());
            return;
        }
        self.fail_load(ticket, anyhow!(message));
    }

    pub(super) fn on_skin_parsed(&mut self, ticket: LoadTicket, result: Result<Skin>) {
        if !self.loads.is_current(ticket) {
            log::debug!("Dropping stale skin (token {})", ticket.token());
            return;
        }

        match result {
            Ok(skin) => {
                self.loads.settle(ticket);
                log::info!("Applying skin \"{}\"", skin.name);
                self.renderer.apply_skin(skin);
                self.finish_loading();
            }
            Err(e) => self.fail_load(ticket, e),
        }
    }

    /// Prior state stays intact; only the loading flag is released.
    fn fail_load(&mut self, ticket: LoadTicket, error: anyhow::Error) {
        if !self.loads.settle(ticket) {
            return;
        }

        let family = ticket.family();
        if family == LoadFamily::Media {
            self.pending_media = None;
        }

        log::warn!("{family} load failed: {error:#}");
        self.finish_loading();
        self.report_load_failure(family, &error);
    }

    /// One visible flag covers both families, so it only drops once neither
    /// has a load in flight.
    fn finish_loading(&mut self) {
        if !self.loads.any_pending() {
            self.dispatch(Action::StopLoading);
        }
    }
}
