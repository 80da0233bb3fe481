//! Path prompt for loading a source file or a `.zip` project

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::{centered_popup, dialog_block, key_hint};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

/// Path prompt dialog; the typed text lives in `Modal::OpenPath`
#[derive(Default)]
pub struct PathDialog;

impl PathDialog {
    pub fn draw_with_input(&self, frame: &mut Frame, area: Rect, input: &str) -> Result<()> {
        let popup_area = centered_popup(area, 70, 9);
        frame.render_widget(Clear, popup_area);

        let prompt = Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::styled(input, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ]);
        let content = vec![
            Line::default(),
            Line::raw("Path to a source file or a .zip project (~ is expanded):"),
            Line::default(),
            prompt,
            Line::default(),
            Line::from(
                [
                    key_hint("Enter", "Load  ", Color::Green),
                    key_hint("Esc", "Cancel", Color::Red),
                ]
                .concat(),
            ),
        ];

        frame.render_widget(
            Paragraph::new(content).block(dialog_block(" Open ", Color::Cyan)),
            popup_area,
        );
        Ok(())
    }
}

impl Component for PathDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Enter => Some(Action::ConfirmModal),
            KeyCode::Backspace => Some(Action::PathBackspace),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PathInput(c))
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_with_input which takes full context
        Ok(())
    }
}
