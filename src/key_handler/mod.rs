use crate::{REFRESH_RATE, state::AppState};
use anyhow::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use KeyCode::*;

const X: KeyModifiers = KeyModifiers::NONE;
const S: KeyModifiers = KeyModifiers::SHIFT;
const C: KeyModifiers = KeyModifiers::CONTROL;

const SEEK_SMALL: i64 = 5;
const SEEK_LARGE: i64 = 30;
const VOLUME_STEP: i32 = 5;
const BALANCE_STEP: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Stop,
    Close,
    Seek(i64),
    SeekPercent(u8),
    Volume(i32),
    Balance(i32),
    ToggleRepeat,
    ToggleShuffle,
    ToggleVisualizer,
    OpenFile,

    // Path prompt
    PromptInput(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,

    Quit,
}

pub fn next_event() -> Result<Option<Event>> {
    match event::poll(REFRESH_RATE)? {
        true => Ok(Some(event::read()?)),
        false => Ok(None),
    }
}

pub fn handle_key_event(key: KeyEvent, state: &AppState, prompt_open: bool) -> Option<Command> {
    if let (C, Char('c')) = (key.modifiers, key.code) {
        return Some(Command::Quit);
    }

    match prompt_open {
        true => handle_prompt(&key),
        false => handle_player(&key, state),
    }
}

#[rustfmt::skip]
fn handle_player(key: &KeyEvent, state: &AppState) -> Option<Command> {
    match (key.modifiers, key.code) {
        (X, Char(' '))  => Some(Command::TogglePause),
        (X, Char('s'))  => Some(Command::Stop),
        (X, Char('x'))  => Some(Command::Close),

        (X, Right)      => Some(Command::Seek(SEEK_SMALL)),
        (X, Left)       => Some(Command::Seek(-SEEK_SMALL)),
        (S, Right)      => Some(Command::Seek(SEEK_LARGE)),
        (S, Left)       => Some(Command::Seek(-SEEK_LARGE)),

        // 1..9 jump to 10%..90%, 0 rewinds to the start
        (X, Char(d)) if d.is_ascii_digit() => {
            d.to_digit(10).map(|n| Command::SeekPercent(n as u8 * 10))
        }

        (X, Char('+')) | (S, Char('+')) | (X, Char('=')) | (X, Up) => {
            Some(Command::Volume(state.volume as i32 + VOLUME_STEP))
        }
        (X, Char('-')) | (X, Down) => {
            Some(Command::Volume(state.volume as i32 - VOLUME_STEP))
        }

        (X, Char('[')) => Some(Command::Balance(state.balance as i32 - BALANCE_STEP)),
        (X, Char(']')) => Some(Command::Balance(state.balance as i32 + BALANCE_STEP)),

        (X, Char('r'))  => Some(Command::ToggleRepeat),
        (X, Char('h'))  => Some(Command::ToggleShuffle),
        (X, Char('v'))  => Some(Command::ToggleVisualizer),
        (X, Char('o'))  => Some(Command::OpenFile),
        (X, Char('q'))  => Some(Command::Quit),

        _ => None,
    }
}

fn handle_prompt(key: &KeyEvent) -> Option<Command> {
    match (key.modifiers, key.code) {
        (_, Enter) => Some(Command::PromptSubmit),
        (_, Esc) => Some(Command::PromptCancel),
        (_, Backspace) => Some(Command::PromptBackspace),
        (X, Char(c)) | (S, Char(c)) => Some(Command::PromptInput(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn transport_keys() {
        let state = AppState::default();
        assert_eq!(handle_key_event(key(Char(' ')), &state, false), Some(Command::TogglePause));
        assert_eq!(handle_key_event(key(Char('x')), &state, false), Some(Command::Close));
        assert_eq!(handle_key_event(key(Left), &state, false), Some(Command::Seek(-5)));
        assert_eq!(handle_key_event(key(Char('7')), &state, false), Some(Command::SeekPercent(70)));
    }

    #[test]
    fn volume_and_balance_steps_are_relative_to_state() {
        let state = AppState {
            volume: 50,
            balance: -20,
            ..AppState::default()
        };

        assert_eq!(handle_key_event(key(Char('+')), &state, false), Some(Command::Volume(55)));
        assert_eq!(handle_key_event(key(Char('-')), &state, false), Some(Command::Volume(45)));
        assert_eq!(handle_key_event(key(Char(']')), &state, false), Some(Command::Balance(-10)));
    }

    #[test]
    fn prompt_captures_letters() {
        let state = AppState::default();
        assert_eq!(handle_key_event(key(Char('q')), &state, true), Some(Command::PromptInput('q')));
        assert_eq!(handle_key_event(key(Enter), &state, true), Some(Command::PromptSubmit));
        assert_eq!(
            handle_key_event(KeyEvent::new(Char('c'), C), &state, true),
            Some(Command::Quit)
        );
    }
}
