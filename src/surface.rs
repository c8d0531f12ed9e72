use crate::{skin::Skin, visualizer::VisualizerStyle};

/// Presentation side of the controller. Implementations draw, they never
/// write application state.
pub trait Renderer {
    fn apply_skin(&mut self, skin: Skin);
    fn clear_visualizer(&mut self);
    fn paint_visualizer(&mut self, style: VisualizerStyle, samples: &[f32]);
}

/// Asks the user for a file. The choice comes back later as
/// `Inbound::FileSelected`.
pub trait FilePicker {
    fn open(&mut self);
}

pub struct NoPicker;

impl FilePicker for NoPicker {
    fn open(&mut self) {
        log::debug!("File dialog requested but no picker is installed");
    }
}
