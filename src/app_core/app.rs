use crate::{
    Config, Controller, FileHandle,
    controller::{Inbound, LogObserver, MediaSubscription},
    key_handler::{self, Command},
    media::RodioMedia,
    skin::BasicSkinLoader,
    tui::{self, PromptPicker, ScreenObserver, SharedScreen, TuiRenderer},
};
use anyhow::Result;
use ratatui::{
    DefaultTerminal,
    crossterm::event::{Event, KeyEventKind},
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

pub struct Skinamp {
    controller: Controller,
    screen: SharedScreen,
    prompt_requested: Arc<AtomicBool>,
    prompt: Option<String>,
    _subscription: MediaSubscription,
    quit: bool,
}

impl Skinamp {
    pub fn new(config: &Config) -> Result<Self> {
        let media = RodioMedia::spawn()?;
        let (renderer, screen) = TuiRenderer::new();
        let (picker, prompt_requested) = PromptPicker::new();

        let mut controller = Controller::new(
            Box::new(media),
            Arc::new(BasicSkinLoader),
            Box::new(renderer),
        )
        .with_picker(Box::new(picker));

        controller.add_observer(Box::new(LogObserver));
        controller.add_observer(Box::new(ScreenObserver::new(Arc::clone(&screen))));

        let subscription = controller.wire_media();
        config.apply_to(&mut controller)?;

        Ok(Skinamp {
            controller,
            screen,
            prompt_requested,
            prompt: None,
            _subscription: subscription,
            quit: false,
        })
    }

    /// Open a file given on the command line, as if it had been picked.
    pub fn open(&mut self, location: &str) {
        let file = FileHandle::from_location(location, None);
        self.controller.load_from_file_reference(file);
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        terminal.clear()?;

        let result = self.main_loop(&mut terminal);
        ratatui::restore();

        if let Err(e) = self.controller.close() {
            log::warn!("Could not stop playback: {e:#}");
        }
        result
    }

    fn main_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.quit {
            self.controller.pump();

            if self.prompt_requested.swap(false, Ordering::Relaxed) {
                self.prompt = Some(String::new());
            }

            let state = self.controller.state();
            let screen = &self.screen;
            let prompt = self.prompt.as_deref();
            terminal.draw(|f| tui::render(f, state, screen, prompt))?;

            match key_handler::next_event()? {
                Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    let prompt_open = self.prompt.is_some();
                    if let Some(command) =
                        key_handler::handle_key_event(key, self.controller.state(), prompt_open)
                    {
                        if let Err(e) = self.handle_command(command) {
                            log::warn!("{e:#}");
                        }
                    }
                }
                _ => (),
            }
        }

        Ok(())
    }

    #[rustfmt::skip]
    fn handle_command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::TogglePause        => self.controller.toggle_playback()?,
            Command::Stop               => self.controller.stop()?,
            Command::Close              => self.controller.close()?,
            Command::Seek(secs)         => self.controller.seek_forward_by(secs)?,
            Command::SeekPercent(p)     => self.controller.seek_to_percent_complete(p as f32)?,
            Command::Volume(v)          => self.controller.set_volume(v)?,
            Command::Balance(b)         => self.controller.set_balance(b)?,
            Command::ToggleRepeat       => self.controller.toggle_repeat()?,
            Command::ToggleShuffle      => self.controller.toggle_shuffle()?,
            Command::ToggleVisualizer   => self.controller.toggle_visualizer(),
            Command::OpenFile           => self.controller.open_file_dialog(),

            Command::PromptInput(c)     => { if let Some(p) = self.prompt.as_mut() { p.push(c) } }
            Command::PromptBackspace    => { if let Some(p) = self.prompt.as_mut() { p.pop(); } }
            Command::PromptSubmit       => self.submit_prompt(),
            Command::PromptCancel       => self.prompt = None,

            Command::Quit               => self.quit = true,
        }
        Ok(())
    }

    fn submit_prompt(&mut self) {
        let Some(input) = self.prompt.take() else {
            return;
        };

        let location = input.trim();
        if location.is_empty() {
            return;
        }

        let file = FileHandle::from_location(location, None);
        let _ = self.controller.inbox().send(Inbound::FileSelected(file));
    }
}
