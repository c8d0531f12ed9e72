use super::{Action, AppState, MediaStatus, clamp_balance, clamp_volume};

/// Pure reduction. No I/O, total over `Action`, and the same
/// `(state, action)` pair always produces the same result.
#[rustfmt::skip]
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let mut next = state.clone();

    match action {
        Action::SetVolume { volume }        => next.volume = clamp_volume(*volume),
        Action::SetBalance { balance }      => next.balance = clamp_balance(*balance),

        Action::UpdateTimeElapsed { elapsed } => next.time_elapsed = *elapsed,
        Action::MediaIsStopped              => next.status = MediaStatus::Stopped,
        Action::MediaIsPlaying              => next.status = MediaStatus::Playing,
        Action::MediaIsPaused               => next.status = MediaStatus::Paused,

        Action::StartWorking                => next.working = true,
        Action::StopWorking                 => next.working = false,
        Action::StartLoading                => next.loading = true,
        Action::StopLoading                 => next.loading = false,

        Action::SetMediaKbps { kbps }       => next.kbps = Some(*kbps),
        Action::SetMediaKhz { khz }         => next.khz = Some(*khz),
        Action::SetChannelsCount { channels } => next.channels = Some(*channels),
        Action::SetMediaName { name }       => next.media_name = Some(name.clone()),
        Action::SetMediaLength { length }   => next.media_length = *length,
        Action::SetFileName { name }        => next.file_name = Some(name.clone()),

        Action::ToggleRepeat                => next.repeat = !next.repeat,
        Action::ToggleShuffle               => next.shuffle = !next.shuffle,
        Action::SetVisualizerStyle { style } => next.visualizer_style = *style,
    }

    next
}
