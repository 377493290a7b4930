use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Discrete events gathered once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputEvents {
    pub quit: bool,
    pub pause_toggle: bool,
    pub lock_toggle: bool,
    pub skip_next: bool,
    pub skip_prev: bool,
    pub new_palette: bool,
    pub fullscreen_toggle: bool,
    pub fade_dir_toggle: bool,
    pub faster: bool,
    pub slower: bool,
    pub help_toggle: bool,
    pub mode_toggle: bool,
}

impl InputEvents {
    pub fn none() -> Self {
        Self::default()
    }

    /// Record one key press. Unknown keys are ignored.
    pub fn apply_key(&mut self, code: KeyCode, mods: KeyModifiers) {
        if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
            self.quit = true;
            return;
        }

        match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => self.quit = true,
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                self.pause_toggle = !self.pause_toggle
            }
            KeyCode::Char('l') | KeyCode::Char('L') => self.lock_toggle = !self.lock_toggle,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Right => self.skip_next = true,
            KeyCode::Left => self.skip_prev = true,
            KeyCode::Char('c') | KeyCode::Char('C') => self.new_palette = true,
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.fullscreen_toggle = !self.fullscreen_toggle
            }
            KeyCode::Char('w') | KeyCode::Char('W') => {
                self.fade_dir_toggle = !self.fade_dir_toggle
            }
            KeyCode::Char('m') | KeyCode::Char('M') => self.mode_toggle = !self.mode_toggle,
            KeyCode::Char('+') | KeyCode::Char('=') => self.faster = true,
            KeyCode::Char('-') | KeyCode::Char('_') => self.slower = true,
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') | KeyCode::F(1) => {
                self.help_toggle = !self.help_toggle
            }
            _ => {}
        }
    }

    pub fn any(&self) -> bool {
        *self != Self::default()
    }
}

/// Drain pending terminal events without blocking.
pub fn poll_input() -> anyhow::Result<InputEvents> {
    let mut ev = InputEvents::none();
    while event::poll(Duration::ZERO)? {
        if let Event::Key(k) = event::read()? {
            if k.kind != KeyEventKind::Release {
                ev.apply_key(k.code, k.modifiers);
            }
        }
    }
    Ok(ev)
}
