//! Terminal lifecycle and event polling
//!
//! Raw mode, the alternate screen, mouse capture and bracketed paste are
//! switched on together in `enter` and off together in `exit`. Bracketed
//! paste delivers pasted code as one `Event::Paste` instead of a burst of
//! key presses.

use anyhow::Result;
use crossterm::{
    cursor,
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyEventKind,
    },
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::debug;

const DEFAULT_TICK_RATE: Duration = Duration::from_millis(50);

/// Owns the ratatui terminal for the lifetime of the app
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// How long `next_event` waits before reporting a tick
    pub tick_rate: Duration,
    /// Whether the terminal is currently in TUI mode
    active: bool,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self {
            terminal,
            tick_rate: DEFAULT_TICK_RATE,
            active: false,
        })
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Switch the terminal into TUI mode
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            cursor::Hide
        )?;
        self.active = true;
        // Whatever was on screen before is stale
        self.terminal.clear()?;
        Ok(())
    }

    /// Restore the terminal; a no-op when already restored
    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Hand the terminal to a child process such as `$EDITOR`
    pub fn suspend(&mut self) -> Result<()> {
        debug!("suspending terminal");
        self.exit()
    }

    /// Take the terminal back after `suspend`
    pub fn resume(&mut self) -> Result<()> {
        debug!("resuming terminal");
        self.enter()
    }

    /// Wait up to `tick_rate` for an event
    ///
    /// Key releases and repeats are dropped so each press maps to one action.
    pub fn next_event(&self) -> Result<Option<Event>> {
        if !event::poll(self.tick_rate)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Press => Ok(None),
            event => Ok(Some(event)),
        }
    }

    pub fn draw<F>(&mut self, render: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
