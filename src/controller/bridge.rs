use super::{Controller, Inbound};
use crate::{
    media::MediaEvent,
    state::Action,
    visualizer::VisualizerStyle,
};
use crossbeam_channel::{Receiver, Sender, select};
use std::thread::{self, JoinHandle};

/// 1:1 mapping from lifecycle events to actions. Events that carry no
/// state transition map to `None`.
pub fn action_for_event(event: &MediaEvent) -> Option<Action> {
    match event {
        MediaEvent::Waiting => Some(Action::StartWorking),
        MediaEvent::StopWaiting => Some(Action::StopWorking),
        MediaEvent::Playing => Some(Action::MediaIsPlaying),
        MediaEvent::Paused => Some(Action::MediaIsPaused),
        MediaEvent::Ended => Some(Action::MediaIsStopped),
        MediaEvent::TimeUpdate(elapsed) => Some(Action::UpdateTimeElapsed { elapsed: *elapsed }),
        MediaEvent::VisualizerUpdate(_) | MediaEvent::Loaded(_) | MediaEvent::LoadFailed(..) => {
            None
        }
    }
}

impl Controller {
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::VisualizerUpdate(samples) => {
                let style = self.state.visualizer_style;
                if style != VisualizerStyle::None {
                    self.renderer.paint_visualizer(style, &samples);
                }
            }
            MediaEvent::Loaded(ticket) => self.on_media_ready(ticket),
            MediaEvent::LoadFailed(ticket, message) => self.on_media_failed(ticket, message),
            event => {
                if let Some(action) = action_for_event(&event) {
                    let time_update = matches!(action, Action::UpdateTimeElapsed { .. });
                    self.dispatch(action);
                    if time_update {
                        self.broadcast_time_updated();
                    }
                }
            }
        }
    }

    /// Start forwarding the media source's events into the inbox. Dropping
    /// (or disposing) the returned handle stops the forwarding.
    pub fn wire_media(&self) -> MediaSubscription {
        MediaSubscription::spawn(self.media.events(), self.inbox_tx.clone())
    }
}

pub struct MediaSubscription {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MediaSubscription {
    fn spawn(events: Receiver<MediaEvent>, inbox: Sender<Inbound>) -> Self {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(0);

        let handle = thread::spawn(move || {
            loop {
                let keep_going = select! {
                    recv(stop_rx) -> _ => false,
                    recv(events) -> event => match event {
                        Ok(event) => inbox.send(Inbound::Media(event)).is_ok(),
                        Err(_) => false,
                    },
                };

                if !keep_going {
                    break;
                }
            }
        });

        MediaSubscription {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn dispose(self) {}
}

impl Drop for MediaSubscription {
    fn drop(&mut self) {
        // Disconnecting the stop channel wakes the forwarder
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
