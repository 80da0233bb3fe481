//! Settings dialog component
//!
//! Language, animation speed and the refactor options. Rows are edited in
//! place on the `Config`; the app forwards changes to the workflow and saves
//! the config when the dialog closes.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::{centered_popup, dialog_block, key_hint};
use crate::config::Config;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

const LANGUAGE_ROW: usize = 0;
const SPEED_ROW: usize = 1;
const FIRST_OPTION_ROW: usize = 2;

/// Number of selectable rows
pub const ROW_COUNT: usize = FIRST_OPTION_ROW + 5;

/// What changed after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    Language,
    Speed,
    Options,
}

/// Settings dialog
#[derive(Default)]
pub struct SettingsDialog;

impl SettingsDialog {
    /// Apply a toggle on row `index` to `config`
    pub fn toggle(config: &mut Config, index: usize) -> Option<SettingsChange> {
        match index {
            LANGUAGE_ROW => {
                config.language = config.language.next();
                Some(SettingsChange::Language)
            }
            SPEED_ROW => {
                config.cycle_speed();
                Some(SettingsChange::Speed)
            }
            i if i < ROW_COUNT => {
                config.settings.toggle(i - FIRST_OPTION_ROW);
                Some(SettingsChange::Options)
            }
            _ => None,
        }
    }

    pub fn draw_with_config(
        &self,
        frame: &mut Frame,
        area: Rect,
        config: &Config,
        selected_index: usize,
    ) -> Result<()> {
        let popup_area = centered_popup(area, 56, ROW_COUNT as u16 + 10);
        frame.render_widget(Clear, popup_area);

        let row_style = |index: usize| {
            if index == selected_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            }
        };
        let marker = |index: usize| if index == selected_index { "▶ " } else { "  " };

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(marker(LANGUAGE_ROW), Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("{:<20}{}", "Language", config.language.label()),
                    row_style(LANGUAGE_ROW),
                ),
            ]),
            Line::from(vec![
                Span::styled(marker(SPEED_ROW), Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!(
                        "{:<20}{} ({} ms)",
                        "Animation speed",
                        config.speed_label(),
                        config.animation_speed_ms
                    ),
                    row_style(SPEED_ROW),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  Refactor options",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        for (i, (name, enabled)) in config.settings.entries().iter().enumerate() {
            let index = FIRST_OPTION_ROW + i;
            let check = if *enabled { "[x] " } else { "[ ] " };
            lines.push(Line::from(vec![
                Span::styled(marker(index), Style::default().fg(Color::Cyan)),
                Span::styled(format!("{}{}", check, name), row_style(index)),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(
            [
                key_hint("j/k", "Move  ", Color::Cyan),
                key_hint("Space", "Change  ", Color::Green),
                key_hint("Esc", "Close", Color::Red),
            ]
            .concat(),
        ));

        let paragraph = Paragraph::new(lines).block(dialog_block(" Settings ", Color::Cyan));

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

impl Component for SettingsDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ModalDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ModalUp),
            KeyCode::Char(' ')
            | KeyCode::Enter
            | KeyCode::Char('l')
            | KeyCode::Right
            | KeyCode::Char('h')
            | KeyCode::Left => Some(Action::ModalToggle),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('c') => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_with_config which takes full context
        Ok(())
    }
}
