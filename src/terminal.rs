use anyhow::Context;
use crossterm::{
    cursor, queue,
    style::ResetColor,
    terminal::{self, ClearType},
};
use std::io::{stdout, Stdout, Write};

/// Alternate screen, window title, cleared page, hidden cursor.
pub fn enter_screen(out: &mut impl Write, title: &str) -> std::io::Result<()> {
    queue!(
        out,
        terminal::EnterAlternateScreen,
        terminal::SetTitle(title),
        terminal::Clear(ClearType::All),
        cursor::Hide
    )?;
    out.flush()
}

/// Undo everything `enter_screen` and the renderers may have left on:
/// synchronized output, disabled autowrap and the last SGR colors.
pub fn restore_screen(out: &mut impl Write) -> std::io::Result<()> {
    out.write_all(b"\x1b[?2026l\x1b[?7h")?;
    queue!(out, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
    out.flush()
}

/// Raw mode plus the screen from [`enter_screen`] for as long as it lives.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn new(title: &str) -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        // Drop restores raw mode even if the screen setup fails.
        let guard = Self { _private: () };
        enter_screen(&mut stdout(), title).context("prepare alternate screen")?;
        Ok(guard)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = restore_screen(&mut stdout());
    }
}
