//! Raw-mode alternate screen for the arena UI.
//!
//! [`init`] chains a panic hook that restores the terminal before the panic
//! report is printed. [`TerminalGuard`] covers early returns.
use std::io::{self, Stdout};
use std::panic;

use anyhow::Result;
use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn init() -> Result<Tui> {
    restore_on_panic();
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;
    Ok(terminal)
}

pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}

fn restore_on_panic() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore();
        previous(info);
    }));
}

/// Restores the terminal on drop unless [`TerminalGuard::release`] already did.
pub struct TerminalGuard {
    released: bool,
}

impl TerminalGuard {
    pub fn new() -> Self {
        Self { released: false }
    }

    pub fn release(mut self) -> Result<()> {
        self.released = true;
        restore()
    }
}

impl Default for TerminalGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.released {
            let _ = restore();
        }
    }
}
