use super::Controller;
use crate::{
    loads::LoadFamily,
    state::{Action, AppState, reduce},
};

/// Receives the outcome of every dispatch.
pub trait StateObserver {
    fn state_changed(&mut self, action: &Action, state: &AppState);

    /// Legacy "time updated" broadcast. Deprecated side channel: it is always
    /// sent in addition to the structured `state_changed`, never instead of it.
    fn time_updated(&mut self, _state: &AppState) {}

    fn load_failed(&mut self, _family: LoadFamily, _error: &anyhow::Error) {}
}

/// Traces every action. Installed by the binary.
pub struct LogObserver;

impl StateObserver for LogObserver {
    fn state_changed(&mut self, action: &Action, _state: &AppState) {
        log::trace!("{} {:?}", action.kind(), action);
    }
}

impl Controller {
    /// The only writer of `AppState`.
    pub fn dispatch(&mut self, action: Action) {
        self.state = reduce(&self.state, &action);

        if action == Action::MediaIsStopped {
            self.renderer.clear_visualizer();
        }

        for observer in self.observers.iter_mut() {
            observer.state_changed(&action, &self.state);
        }
    }

    pub(super) fn broadcast_time_updated(&mut self) {
        for observer in self.observers.iter_mut() {
            observer.time_updated(&self.state);
        }
    }

    pub(super) fn report_load_failure(&mut self, family: LoadFamily, error: &anyhow::Error) {
        for observer in self.observers.iter_mut() {
            observer.load_failed(family, error);
        }
    }
}
