//! Component trait - Interface for UI components
//!
//! Components turn terminal events into Actions and react to Actions
//! dispatched by the App. Components that need workflow data to render
//! expose a `draw_with_*` function and leave `draw` empty.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// 1. `handle_key_event` / `handle_mouse_event` map input to an Action
/// 2. `update` applies an Action and may return a follow-up
/// 3. `draw` renders into the given area
pub trait Component {
    /// Called once before the first draw
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Map a key press to an Action
    ///
    /// Scroll-only dialogs may adjust their own offset here instead of
    /// returning an Action.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Map a mouse event to an Action
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let _ = mouse;
        Ok(None)
    }

    /// Apply an Action; a returned Action is dispatched right after
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Render the component
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
