//! Help dialog component
//!
//! Lists the keyboard shortcuts, grouped by what they act on.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::{centered_popup, dialog_block};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let content = help_lines();
        let height = (content.len() as u16 + 2).min(area.height.saturating_sub(2));
        let popup = centered_popup(area, POPUP_WIDTH, height);
        frame.render_widget(Clear, popup);

        let visible = popup.height.saturating_sub(2) as usize;
        let overflow = content.len().saturating_sub(visible);
        self.scroll_offset = self.scroll_offset.min(overflow);

        frame.render_widget(
            Paragraph::new(content)
                .block(dialog_block(" Keyboard Shortcuts ", Color::Cyan))
                .scroll((self.scroll_offset as u16, 0)),
            popup,
        );

        if overflow > 0 {
            let mut state = ScrollbarState::new(overflow).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                popup.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut state,
            );
        }

        Ok(())
    }
}

const POPUP_WIDTH: u16 = 64;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("Tab / Shift+Tab", "Next / previous tab"),
            ("1 / 2 / 3", "Input / AI Generation / Results"),
            ("j k / ↓ ↑", "Scroll"),
            ("Ctrl+d / Ctrl+u", "Page down / up"),
        ],
    ),
    (
        "Source",
        &[
            ("o", "Open a file or a .zip project"),
            ("e", "Paste code in $EDITOR"),
            ("Paste", "Terminal paste loads the pasted code"),
            ("x", "Clear and start over"),
        ],
    ),
    (
        "Refactoring",
        &[
            ("s / Enter", "Start refactoring"),
            ("d", "Download result (or project archive)"),
        ],
    ),
    (
        "Animation",
        &[
            ("Space", "Pause / resume typing"),
            ("r", "Restart typing"),
            ("+ / -", "Faster / slower"),
            ("← / →", "Previous / next file (zip)"),
        ],
    ),
    (
        "Dialogs",
        &[
            ("c", "Settings"),
            ("i", "Server statistics"),
            ("?", "Show this help"),
            ("q", "Quit / close dialog"),
            ("Ctrl+c", "Quit immediately"),
        ],
    ),
];

fn help_lines() -> Vec<Line<'static>> {
    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let heading_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let mut lines = Vec::new();
    for (heading, shortcuts) in SECTIONS {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::styled(format!(" {}", heading), heading_style));
        lines.extend(shortcuts.iter().map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("   {:<18}", keys), key_style),
                Span::raw(*what),
            ])
        }));
    }
    lines.push(Line::default());
    lines.push(Line::styled(
        " q / Esc / ? close",
        Style::default().fg(Color::DarkGray),
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_scroll_is_clamped_on_draw() {
        let mut dialog = HelpDialog::default();
        for _ in 0..500 {
            dialog
                .handle_key_event(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE))
                .unwrap();
        }

        crate::components::test_util::render_to_text(80, 30, |frame| {
            dialog.draw(frame, frame.area()).unwrap()
        });

        assert!(dialog.scroll_offset < help_lines().len());
    }

    #[test]
    fn test_lists_refactor_shortcuts() {
        let text: String = help_lines()
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Start refactoring"));
        assert!(text.contains("Pause / resume typing"));
    }
}
