use super::Controller;
use crate::{
    state::{Action, clamp_balance, clamp_volume},
    visualizer::VisualizerStyle,
};
use anyhow::Result;
use std::time::Duration;

// ===== USER COMMANDS =====
impl Controller {
    pub fn set_volume(&mut self, volume: i32) -> Result<()> {
        let volume = clamp_volume(volume);
        self.dispatch(Action::SetVolume {
            volume: volume as i32,
        });
        self.media.set_volume(volume)
    }

    pub fn set_balance(&mut self, balance: i32) -> Result<()> {
        let balance = clamp_balance(balance);
        self.dispatch(Action::SetBalance {
            balance: balance as i32,
        });
        self.media.set_balance(balance)
    }

    pub fn seek_to_percent_complete(&mut self, percent: f32) -> Result<()> {
        self.media.seek_to_percent_complete(percent)
    }

    /// Relative seek. Negative offsets rewind, stopping at zero.
    pub fn seek_forward_by(&mut self, seconds: i64) -> Result<()> {
        let elapsed = self.media.time_elapsed();
        let offset = Duration::from_secs(seconds.unsigned_abs());

        let target = match seconds >= 0 {
            true => elapsed.saturating_add(offset),
            false => elapsed.saturating_sub(offset),
        };

        self.media.seek_to_time(target)?;
        self.broadcast_time_updated();
        Ok(())
    }

    pub fn toggle_repeat(&mut self) -> Result<()> {
        self.media.toggle_repeat()?;
        self.dispatch(Action::ToggleRepeat);
        Ok(())
    }

    pub fn toggle_shuffle(&mut self) -> Result<()> {
        self.media.toggle_shuffle()?;
        self.dispatch(Action::ToggleShuffle);
        Ok(())
    }

    /// NONE -> BAR -> OSCILLOSCOPE -> NONE. The previous style's output is
    /// always wiped.
    pub fn toggle_visualizer(&mut self) {
        let style = self.state.visualizer_style.advance();
        self.set_visualizer_style(style);
    }

    pub fn set_visualizer_style(&mut self, style: VisualizerStyle) {
        self.dispatch(Action::SetVisualizerStyle { style });
        self.renderer.clear_visualizer();
    }

    pub fn open_file_dialog(&mut self) {
        self.picker.open();
    }

    pub fn play(&mut self) -> Result<()> {
        self.media.play()
    }

    pub fn pause(&mut self) -> Result<()> {
        self.media.pause()
    }

    pub fn toggle_playback(&mut self) -> Result<()> {
        match self.state.is_playing() {
            true => self.media.pause(),
            false => self.media.play(),
        }
    }

    pub fn stop(&mut self) -> Result<()> {
        self.media.stop()
    }

    /// Stop playback and mark the player stopped even if the engine stays
    /// quiet about it. An engine that does report `Ended` afterwards still
    /// gets its own MEDIA_IS_STOPPED through the bridge.
    pub fn close(&mut self) -> Result<()> {
        let stopped = self.media.stop();
        if !self.state.is_stopped() {
            self.dispatch(Action::MediaIsStopped);
        }
        stopped
    }
}
