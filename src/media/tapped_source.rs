use super::{MediaMetrics, VISUALIZER_BUFFER_CAPACITY};
use rodio::{ChannelCount, SampleRate, Source};
use std::{sync::Arc, time::Duration};

/// Applies the stereo balance and copies every sample into the visualizer tap.
pub struct BalancedTap<I> {
    input: I,
    metrics: Arc<MediaMetrics>,
    channel: ChannelCount,
}

impl<I> BalancedTap<I> {
    pub fn new(input: I, metrics: Arc<MediaMetrics>) -> Self {
        BalancedTap {
            input,
            metrics,
            channel: 0,
        }
    }
}

/// Left/right gain for a balance in -100..=100. Negative pans left.
pub fn channel_gains(balance: i8) -> (f32, f32) {
    let b = balance as f32 / 100.0;
    match balance {
        0 => (1.0, 1.0),
        x if x > 0 => (1.0 - b, 1.0),
        _ => (1.0, 1.0 + b),
    }
}

impl<I> Iterator for BalancedTap<I>
where
    I: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.input.next()?;
        let channels = self.input.channels().max(1);

        let out = match channels {
            1 => sample,
            _ => {
                let (left, right) = channel_gains(self.metrics.balance());
                match self.channel {
                    0 => sample * left,
                    1 => sample * right,
                    _ => sample,
                }
            }
        };
        self.channel = (self.channel + 1) % channels;

        if let Ok(mut tap) = self.metrics.audio_tap.try_lock() {
            if tap.len() >= VISUALIZER_BUFFER_CAPACITY {
                tap.pop_front();
            }
            tap.push_back(out);
        }

        Some(out)
    }
}

impl<I> Source for BalancedTap<I>
where
    I: Source<Item = f32>,
{
    fn current_span_len(&self) -> Option<usize> {
        self.input.current_span_len()
    }

    fn channels(&self) -> ChannelCount {
        self.input.channels()
    }

    fn sample_rate(&self) -> SampleRate {
        self.input.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.input.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), rodio::source::SeekError> {
        self.channel = 0;
        self.input.try_seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodio::buffer::SamplesBuffer;

    #[test]
    fn centered_balance_is_unity() {
        assert_eq!(channel_gains(0), (1.0, 1.0));
    }

    #[test]
    fn balance_attenuates_opposite_side() {
        assert_eq!(channel_gains(100), (0.0, 1.0));
        assert_eq!(channel_gains(-100), (1.0, 0.0));
        assert_eq!(channel_gains(50), (0.5, 1.0));
    }

    #[test]
    fn stereo_samples_are_panned_and_tapped() {
        let metrics = MediaMetrics::new();
        metrics.set_balance(-100);

        let input = SamplesBuffer::new(2, 44_100, vec![0.5f32, 0.5, 0.25, 0.25]);
        let out: Vec<f32> = BalancedTap::new(input, Arc::clone(&metrics)).collect();

        assert_eq!(out, vec![0.5, 0.0, 0.25, 0.0]);
        assert_eq!(metrics.drain_samples().len(), 4);
    }

    #[test]
    fn mono_ignores_balance() {
        let metrics = MediaMetrics::new();
        metrics.set_balance(100);

        let input = SamplesBuffer::new(1, 22_050, vec![0.3f32, -0.3]);
        let out: Vec<f32> = BalancedTap::new(input, metrics).collect();

        assert_eq!(out, vec![0.3, -0.3]);
    }
}
