mod screen;
mod widgets;

pub use screen::{PromptPicker, ScreenModel, ScreenObserver, SharedScreen, TuiRenderer};
pub use widgets::{Controls, NowPlaying, Visualizer};

use crate::{skin::SkinKind, state::AppState};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    text::Line,
    widgets::{Block, Paragraph, StatefulWidget, Widget},
};

pub const DARK_WHITE: Color = Color::Rgb(210, 210, 210);
pub const MID_GRAY: Color = Color::Rgb(100, 100, 100);
pub const BG: Color = Color::Rgb(25, 25, 25);
pub const GOOD_RED: Color = Color::Rgb(255, 70, 70);
pub const GOLD: Color = Color::Rgb(220, 220, 100);
pub const GOLD_FADED: Color = Color::Rgb(130, 130, 60);

const HELP: &str =
    "space play/pause  s stop  x close  ←/→ seek  0-9 jump  +/- vol  [/] bal  r rep  h shuf  v vis  o open  q quit";

pub fn render(f: &mut Frame, state: &AppState, screen: &SharedScreen, prompt: Option<&str>) {
    let Ok(mut screen) = screen.lock() else {
        return;
    };

    Block::new().bg(BG).render(f.area(), f.buffer_mut());

    let [window, footer] =
        Layout::vertical([Constraint::Min(12), Constraint::Length(1)]).areas(f.area());

    let outer = widgets::frame(window_title(&screen));
    let inner = outer.inner(window);
    outer.render(window, f.buffer_mut());

    let [now_playing, visualizer, controls] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .areas(inner);

    NowPlaying { state }.render(now_playing, f.buffer_mut());
    Visualizer.render(visualizer, f.buffer_mut(), &mut screen);
    Controls { state }.render(controls, f.buffer_mut());

    render_footer(footer, f, &screen, prompt);
}

fn window_title(screen: &ScreenModel) -> String {
    match &screen.skin {
        Some(skin) => match skin.kind {
            SkinKind::Archive { .. } => format!(" skinamp · {} ", skin.name),
            SkinKind::Image { width, height } => {
                format!(" skinamp · {} ({width}x{height}) ", skin.name)
            }
        },
        None => String::from(" skinamp "),
    }
}

fn render_footer(area: Rect, f: &mut Frame, screen: &ScreenModel, prompt: Option<&str>) {
    let line = match (prompt, &screen.last_error) {
        (Some(input), _) => Line::from(format!("Open: {input}_")).fg(GOLD),
        (None, Some(err)) => Line::from(err.as_str()).fg(GOOD_RED),
        (None, None) => Line::from(HELP).fg(MID_GRAY),
    };

    Paragraph::new(line).bg(BG).render(area, f.buffer_mut());
}
