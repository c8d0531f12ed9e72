use crate::{
    state::{AppState, MediaStatus},
    tui::{BG, DARK_WHITE, GOLD, GOLD_FADED, GOOD_RED, MID_GRAY},
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, LineGauge, Paragraph, Widget},
};

/// Time, title, stream metadata and the position bar.
pub struct NowPlaying<'a> {
    pub state: &'a AppState,
}

impl Widget for NowPlaying<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let [time_row, meta_row, bar_row] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let title = state
            .media_name
            .as_deref()
            .or(state.file_name.as_deref())
            .unwrap_or("");

        Paragraph::new(Line::from(vec![
            Span::from(status_glyph(state.status)).fg(GOOD_RED),
            Span::from(format!(" {} ", state.elapsed_display())).fg(GOLD).bold(),
            Span::from(format!("/ {}  ", state.length_display())).fg(MID_GRAY),
            Span::from(title.to_string()).fg(DARK_WHITE),
        ]))
        .bg(BG)
        .render(time_row, buf);

        Paragraph::new(Line::from(metadata_line(state)).fg(GOLD_FADED))
            .bg(BG)
            .render(meta_row, buf);

        LineGauge::default()
            .filled_style(Style::new().fg(GOLD))
            .unfilled_style(Style::new().fg(MID_GRAY))
            .label("")
            .ratio(state.progress())
            .render(bar_row, buf);
    }
}

/// Volume and balance sliders plus the toggle indicators.
pub struct Controls<'a> {
    pub state: &'a AppState,
}

impl Widget for Controls<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.state;
        let [volume_row, balance_row, flags_row] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        LineGauge::default()
            .filled_style(Style::new().fg(GOLD))
            .unfilled_style(Style::new().fg(MID_GRAY))
            .label(format!("VOL {:>3} ", state.volume))
            .ratio(state.volume as f64 / 100.0)
            .render(volume_row, buf);

        // -100..=100 shown as a 0..=1 slider, centre means balanced
        LineGauge::default()
            .filled_style(Style::new().fg(GOLD_FADED))
            .unfilled_style(Style::new().fg(MID_GRAY))
            .label(format!("BAL {:>4} ", state.balance))
            .ratio((state.balance as f64 + 100.0) / 200.0)
            .render(balance_row, buf);

        Paragraph::new(Line::from(vec![
            indicator("REP", state.repeat),
            Span::from(" "),
            indicator("SHUF", state.shuffle),
            Span::from(" "),
            indicator("BUSY", state.working),
            Span::from(" "),
            indicator("LOADING", state.loading),
        ]))
        .bg(BG)
        .render(flags_row, buf);
    }
}

pub fn metadata_line(state: &AppState) -> String {
    match (state.kbps, state.khz) {
        (Some(kbps), Some(khz)) => format!("{kbps} kbps  {khz} kHz  {}", state.stereo_label()),
        _ => String::new(),
    }
}

fn status_glyph(status: MediaStatus) -> &'static str {
    match status {
        MediaStatus::Playing => "▶",
        MediaStatus::Paused => "⏸",
        MediaStatus::Stopped => "■",
    }
}

fn indicator(label: &str, on: bool) -> Span<'static> {
    let span = Span::from(format!("[{label}]"));
    match on {
        true => span.fg(GOLD).bold(),
        false => span.fg(MID_GRAY),
    }
}

pub fn frame(title: String) -> Block<'static> {
    Block::bordered()
        .title(title)
        .border_style(Style::new().fg(GOLD))
        .bg(BG)
}
