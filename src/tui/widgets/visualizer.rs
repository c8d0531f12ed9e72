use crate::{
    tui::{BG, GOLD, GOOD_RED, ScreenModel},
    visualizer::VisualizerStyle,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Stylize},
    widgets::{
        Bar, BarChart, BarGroup, Block, Padding, StatefulWidget, Widget,
        canvas::{Canvas, Context, Line},
    },
};

const BAR_COUNT: usize = 19;

pub struct Visualizer;

impl StatefulWidget for Visualizer {
    type State = ScreenModel;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        Block::new().bg(BG).render(area, buf);

        if state.samples.is_empty() {
            return;
        }

        match state.style {
            VisualizerStyle::None => (),
            VisualizerStyle::Bar => render_bars(area, buf, &state.samples),
            VisualizerStyle::Oscilloscope => render_scope(area, buf, &state.samples),
        }
    }
}

fn render_bars(area: Rect, buf: &mut Buffer, samples: &[f32]) {
    let levels = band_levels(samples, BAR_COUNT);
    let bars = levels
        .iter()
        .map(|level| {
            Bar::default()
                .value((level * 100.0) as u64)
                .text_value(String::new())
                .style(level_color(*level))
        })
        .collect::<Vec<_>>();

    BarChart::default()
        .block(Block::new().bg(BG).padding(Padding::horizontal(1)))
        .data(BarGroup::default().bars(&bars))
        .bar_width(2)
        .bar_gap(1)
        .max(100)
        .render(area, buf);
}

fn render_scope(area: Rect, buf: &mut Buffer, samples: &[f32]) {
    let v_marg = match area.height > 20 {
        true => ((area.height as f32) * 0.2) as u16,
        false => 0,
    };

    Canvas::default()
        .x_bounds([0.0, samples.len() as f64])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| draw_wave(ctx, samples))
        .background_color(BG)
        .block(Block::new().bg(BG).padding(Padding {
            left: 1,
            right: 1,
            top: v_marg,
            bottom: v_marg,
        }))
        .render(area, buf);
}

fn draw_wave(ctx: &mut Context, samples: &[f32]) {
    for (i, window) in samples.windows(2).enumerate() {
        let color = level_color(window[0].abs());
        ctx.draw(&Line {
            x1: i as f64,
            y1: window[0] as f64,
            x2: (i + 1) as f64,
            y2: window[1] as f64,
            color,
        });
    }
}

/// Peak amplitude of `bands` equal slices of the frame, each in 0.0..=1.0.
pub fn band_levels(samples: &[f32], bands: usize) -> Vec<f32> {
    if samples.is_empty() || bands == 0 {
        return vec![0.0; bands];
    }

    let chunk = samples.len().div_ceil(bands);
    let mut levels = samples
        .chunks(chunk)
        .map(|c| c.iter().fold(0.0_f32, |peak, s| peak.max(s.abs())).min(1.0))
        .collect::<Vec<_>>();

    levels.resize(bands, 0.0);
    levels
}

fn level_color(level: f32) -> Color {
    match level {
        l if l > 0.8 => GOOD_RED,
        l if l > 0.5 => GOLD,
        _ => Color::Rgb(80, 200, 80),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_levels_take_peaks() {
        let samples = [0.1, -0.9, 0.2, 0.3];
        assert_eq!(band_levels(&samples, 2), vec![0.9, 0.3]);
    }

    #[test]
    fn band_levels_pad_short_frames() {
        assert_eq!(band_levels(&[0.5], 3), vec![0.5, 0.0, 0.0]);
        assert_eq!(band_levels(&[], 2), vec![0.0, 0.0]);
    }

    #[test]
    fn band_levels_clip_hot_samples() {
        assert_eq!(band_levels(&[1.7, -2.0], 1), vec![1.0]);
    }
}
