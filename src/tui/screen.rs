use crate::{
    controller::StateObserver,
    loads::LoadFamily,
    skin::Skin,
    state::{Action, AppState},
    surface::{FilePicker, Renderer},
    visualizer::VisualizerStyle,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

/// What the terminal draws beyond `AppState`: the applied skin, the most
/// recent visualizer frame and the last load error.
#[derive(Default)]
pub struct ScreenModel {
    pub skin: Option<Skin>,
    pub style: VisualizerStyle,
    pub samples: Vec<f32>,
    pub last_error: Option<String>,
}

pub type SharedScreen = Arc<Mutex<ScreenModel>>;

pub struct TuiRenderer {
    screen: SharedScreen,
}

impl TuiRenderer {
    pub fn new() -> (Self, SharedScreen) {
        let screen = SharedScreen::default();
        let renderer = TuiRenderer {
            screen: Arc::clone(&screen),
        };
        (renderer, screen)
    }
}

impl Renderer for TuiRenderer {
    fn apply_skin(&mut self, skin: Skin) {
        if let Ok(mut screen) = self.screen.lock() {
            screen.skin = Some(skin);
        }
    }

    fn clear_visualizer(&mut self) {
        if let Ok(mut screen) = self.screen.lock() {
            screen.samples.clear();
        }
    }

    fn paint_visualizer(&mut self, style: VisualizerStyle, samples: &[f32]) {
        if let Ok(mut screen) = self.screen.lock() {
            screen.style = style;
            screen.samples.clear();
            screen.samples.extend_from_slice(samples);
        }
    }
}

/// Surfaces load failures in the status line.
pub struct ScreenObserver {
    screen: SharedScreen,
}

impl ScreenObserver {
    pub fn new(screen: SharedScreen) -> Self {
        ScreenObserver { screen }
    }
}

impl StateObserver for ScreenObserver {
    fn state_changed(&mut self, action: &Action, _state: &AppState) {
        // A fresh load clears the previous complaint
        if *action == Action::StartLoading {
            if let Ok(mut screen) = self.screen.lock() {
                screen.last_error = None;
            }
        }
    }

    fn load_failed(&mut self, family: LoadFamily, error: &anyhow::Error) {
        if let Ok(mut screen) = self.screen.lock() {
            screen.last_error = Some(format!("{family} load failed: {error}"));
        }
    }
}

/// Raises a flag the app loop turns into a path prompt.
pub struct PromptPicker {
    requested: Arc<AtomicBool>,
}

impl PromptPicker {
    pub fn new() -> (Self, Arc<AtomicBool>) {
        let requested = Arc::new(AtomicBool::new(false));
        let picker = PromptPicker {
            requested: Arc::clone(&requested),
        };
        (picker, requested)
    }
}

impl FilePicker for PromptPicker {
    fn open(&mut self) {
        self.requested.store(true, Ordering::Relaxed);
    }
}
