//! Quit confirmation dialog component

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::{centered_popup, dialog_block, key_hint};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Clear, Paragraph},
    Frame,
};

/// Quit confirmation dialog
#[derive(Default)]
pub struct QuitDialog;

impl QuitDialog {
    /// Draw the dialog; `in_flight` is the number of requests still running
    pub fn draw_with_in_flight(&self, frame: &mut Frame, area: Rect, in_flight: usize) {
        let mut content = vec![
            Line::default(),
            Line::styled(
                "Are you sure you want to quit?",
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ];
        if in_flight > 0 {
            let verb = if in_flight == 1 { "request is" } else { "requests are" };
            content.push(Line::default());
            content.push(Line::styled(
                format!("⚠ {} {} still running", in_flight, verb),
                Style::default().fg(Color::Yellow),
            ));
        }
        content.push(Line::default());
        content.push(Line::from(
            [
                key_hint("y", "Yes, quit  ", Color::Green),
                key_hint("n/Esc", "No, cancel", Color::Red),
            ]
            .concat(),
        ));

        let popup_area = centered_popup(area, 46, content.len() as u16 + 2);
        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(content)
                .block(dialog_block(" Quit? ", Color::Yellow))
                .alignment(Alignment::Center),
            popup_area,
        );
    }
}

impl Component for QuitDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ForceQuit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_with_in_flight(frame, area, 0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_util::render_to_text;

    #[test]
    fn test_warns_about_running_requests() {
        let dialog = QuitDialog;

        let idle = render_to_text(60, 20, |frame| {
            dialog.draw_with_in_flight(frame, frame.area(), 0)
        });
        assert!(!idle.contains("still running"));

        let busy = render_to_text(60, 20, |frame| {
            dialog.draw_with_in_flight(frame, frame.area(), 2)
        });
        assert!(busy.contains("2 requests are still running"));
    }
}
