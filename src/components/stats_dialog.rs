//! Server statistics dialog
//!
//! Shows the JSON returned by `GET /refactor/stats` as a flat list of
//! `key: value` rows.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::{centered_popup, dialog_block};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};
use serde_json::Value;

/// Fetch state of the stats request
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StatsState {
    #[default]
    Loading,
    Loaded(Value),
    Failed(String),
}

/// Stats dialog
#[derive(Default)]
pub struct StatsDialog {
    pub state: StatsState,
    scroll_offset: usize,
}

impl StatsDialog {
    /// Start a new fetch
    pub fn begin_loading(&mut self) {
        self.state = StatsState::Loading;
        self.scroll_offset = 0;
    }

    pub fn set_result(&mut self, result: std::result::Result<Value, String>) {
        self.state = match result {
            Ok(value) => StatsState::Loaded(value),
            Err(message) => StatsState::Failed(message),
        };
    }

    pub fn draw_with_state(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_area = centered_popup(area, 60, 20);
        frame.render_widget(Clear, popup_area);

        let lines = match &self.state {
            StatsState::Loading => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Loading statistics...",
                    Style::default().fg(Color::Yellow),
                )),
            ],
            StatsState::Failed(message) => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Could not load statistics",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("  {}", message),
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            StatsState::Loaded(value) => {
                let rows = flatten(value);
                if rows.is_empty() {
                    vec![Line::from(Span::styled(
                        "  No statistics available",
                        Style::default().fg(Color::DarkGray),
                    ))]
                } else {
                    rows.into_iter()
                        .map(|(key, value)| {
                            Line::from(vec![
                                Span::styled(
                                    format!("  {}: ", key),
                                    Style::default().fg(Color::Cyan),
                                ),
                                Span::styled(value, Style::default().fg(Color::White)),
                            ])
                        })
                        .collect()
                }
            }
        };

        let visible = popup_area.height.saturating_sub(2) as usize;
        self.scroll_offset = self.scroll_offset.min(lines.len().saturating_sub(visible));

        let paragraph = Paragraph::new(lines)
            .block(
                dialog_block(" Server Stats ", Color::Magenta)
                    .title_bottom(Line::from(" Esc to close ").right_aligned()),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

impl Component for StatsDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('i') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.draw_with_state(frame, area)
    }
}

/// Flatten nested objects into dotted keys
pub fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    flatten_into(value, String::new(), &mut rows);
    rows
}

fn flatten_into(value: &Value, prefix: String, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(child, path, rows);
            }
        }
        Value::String(s) => rows.push((prefix, s.clone())),
        Value::Null => rows.push((prefix, "-".to_string())),
        other => rows.push((prefix, other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_util::render_to_text;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_objects() {
        let value = json!({
            "success": true,
            "data": {"totalRequests": 12, "model": "gpt", "last": null},
        });

        let rows = flatten(&value);

        assert_eq!(
            rows,
            vec![
                ("data.last".to_string(), "-".to_string()),
                ("data.model".to_string(), "gpt".to_string()),
                ("data.totalRequests".to_string(), "12".to_string()),
                ("success".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_draw_states() {
        let mut dialog = StatsDialog::default();
        let text = render_to_text(80, 24, |frame| {
            dialog.draw_with_state(frame, frame.area()).unwrap()
        });
        assert!(text.contains("Loading statistics"));

        dialog.set_result(Err("connection refused".to_string()));
        let text = render_to_text(80, 24, |frame| {
            dialog.draw_with_state(frame, frame.area()).unwrap()
        });
        assert!(text.contains("connection refused"));

        dialog.set_result(Ok(json!({"requests": 3})));
        let text = render_to_text(80, 24, |frame| {
            dialog.draw_with_state(frame, frame.area()).unwrap()
        });
        assert!(text.contains("requests: 3"));
    }
}
