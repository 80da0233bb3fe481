//! refactor-tui - terminal client for the AI code refactoring service
//!
//! Usage: `refactor-tui [PATH]`, where PATH is an optional source file or
//! `.zip` project to load on startup.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::model::notice::Notice;
use crate::tui::Tui;
use anyhow::Result;
use crossterm::event::Event;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tracing::{error, info};

/// Fast enough for a smooth typing animation
const TICK_RATE: Duration = Duration::from_millis(30);

const FALLBACK_EDITOR: &str = "vi";

fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: {}", e);
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting refactor-tui");

    let mut app = App::new(Config::load_or_default())?;
    let mut tui = Tui::new()?.with_tick_rate(TICK_RATE);
    tui.enter()?;

    app.init()?;
    let startup = std::env::args().nth(1).map(Action::LoadPath);
    let result = apply(&mut app, startup).and_then(|_| run_app(&mut tui, &mut app));

    tui.exit()?;

    if let Err(err) = result {
        error!(error = ?err, "fatal error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    info!("exiting");
    Ok(())
}

fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                error!(error = %e, "draw failed");
            }
        })?;

        if let Some(file_path) = app.pending_editor_file.take() {
            launch_external_editor(tui, app, &file_path)?;
            continue;
        }

        let action = match tui.next_event()? {
            Some(event) => event_to_action(app, event)?,
            None => Some(Action::Tick),
        };
        apply(app, action)?;
    }

    Ok(())
}

fn event_to_action(app: &mut App, event: Event) -> Result<Option<Action>> {
    let action = match event {
        Event::Key(key) => app.handle_key_event(key)?,
        Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
        Event::Resize(w, h) => Some(Action::Resize(w, h)),
        Event::Paste(text) => Some(Action::Paste(text)),
        _ => None,
    };
    Ok(action)
}

/// Feed `action` and every follow-up it produces into the app
fn apply(app: &mut App, mut action: Option<Action>) -> Result<()> {
    while let Some(next) = action {
        action = app.update(next)?;
    }
    Ok(())
}

/// `$VISUAL`, then `$EDITOR`, then `vi`
fn editor_command() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// Hand the terminal to the user's editor on `file_path`, then reload it
fn launch_external_editor(tui: &mut Tui, app: &mut App, file_path: &Path) -> Result<()> {
    let editor = editor_command();
    info!(%editor, path = %file_path.display(), "launching editor");

    tui.suspend()?;
    let status = Command::new(&editor).arg(file_path).status();
    tui.resume()?;

    match status {
        Ok(status) if !status.success() => app.notify(Notice::warning(
            "Editor exited with an error",
            format!("{} returned {}", editor, status),
        )),
        Ok(_) => {}
        Err(e) => app.notify(Notice::error(
            "Could not launch editor",
            format!("'{}': {}", editor, e),
        )),
    }

    apply(app, Some(Action::EditorClosed))
}
