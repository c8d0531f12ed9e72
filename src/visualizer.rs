use serde::Deserialize;

/// Rendering mode of the visualizer panel.
///
/// The controller owns the active style (it lives in `AppState`); renderers
/// only ever read it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizerStyle {
    #[default]
    None,
    Bar,
    Oscilloscope,
}

impl VisualizerStyle {
    /// Cyclic transition: NONE -> BAR -> OSCILLOSCOPE -> NONE
    pub fn advance(self) -> Self {
        match self {
            VisualizerStyle::None => VisualizerStyle::Bar,
            VisualizerStyle::Bar => VisualizerStyle::Oscilloscope,
            VisualizerStyle::Oscilloscope => VisualizerStyle::None,
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "bar" => Self::Bar,
            "oscilloscope" => Self::Oscilloscope,
            _ => Self::None,
        }
    }
}

impl std::fmt::Display for VisualizerStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisualizerStyle::None => write!(f, "none"),
            VisualizerStyle::Bar => write!(f, "bar"),
            VisualizerStyle::Oscilloscope => write!(f, "oscilloscope"),
        }
    }
}
