mod display;
mod visualizer;

pub use display::{Controls, NowPlaying, frame};
pub use visualizer::Visualizer;
