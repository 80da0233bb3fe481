//! Scrollable code panel
//!
//! Shared by the input, generation and results tabs. While the typing
//! animation runs the view follows the line being typed until the user
//! scrolls by hand.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

const PAGE_SIZE: usize = 20;

/// Scroll state for the body of the active tab
pub struct CodeViewComponent {
    /// Current scroll offset
    scroll: usize,
    /// Keep `follow_line` in view on every draw
    follow: bool,
    /// Line count of the last drawn content
    content_len: usize,
    /// Inner height of the last drawn area
    visible_height: usize,
}

impl Default for CodeViewComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeViewComponent {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            follow: true,
            content_len: 0,
            visible_height: 0,
        }
    }

    /// Back to the top, following again
    pub fn reset(&mut self) {
        self.scroll = 0;
        self.follow = true;
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    fn max_scroll(&self) -> usize {
        self.content_len.saturating_sub(self.visible_height.max(1))
    }

    /// Draw `lines` inside a bordered block
    ///
    /// `follow_line` is the line that should stay visible while following,
    /// usually the line the animation cursor is on.
    pub fn draw_with_lines(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        lines: Vec<Line<'static>>,
        follow_line: Option<usize>,
    ) {
        self.visible_height = area.height.saturating_sub(2) as usize;
        self.content_len = lines.len();

        if self.follow {
            if let Some(line) = follow_line {
                self.scroll = line.saturating_sub(self.visible_height.saturating_sub(1));
            }
        }
        self.scroll = self.scroll.min(self.max_scroll());

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .scroll((self.scroll as u16, 0));

        frame.render_widget(paragraph, area);

        // Render scrollbar if content exceeds visible area
        if self.content_len > self.visible_height {
            let mut scrollbar_state = ScrollbarState::new(self.max_scroll()).position(self.scroll);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }
    }
}

impl Component for CodeViewComponent {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let max_scroll = self.max_scroll();

        match action {
            Action::ScrollDown => {
                self.follow = false;
                if self.scroll < max_scroll {
                    self.scroll += 1;
                }
            }
            Action::ScrollUp => {
                self.follow = false;
                self.scroll = self.scroll.saturating_sub(1);
            }
            Action::PageDown => {
                self.follow = false;
                self.scroll = (self.scroll + PAGE_SIZE).min(max_scroll);
            }
            Action::PageUp => {
                self.follow = false;
                self.scroll = self.scroll.saturating_sub(PAGE_SIZE);
            }
            Action::RestartAnimation | Action::NextFile | Action::PrevFile => self.reset(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing goes through draw_with_lines, which takes the content
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn lines(n: usize) -> Vec<Line<'static>> {
        (0..n).map(|i| Line::from(format!("line {}", i))).collect()
    }

    fn draw(view: &mut CodeViewComponent, n: usize, follow_line: Option<usize>) {
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal
            .draw(|frame| view.draw_with_lines(frame, frame.area(), " Code ", lines(n), follow_line))
            .unwrap();
    }

    #[test]
    fn test_follow_keeps_cursor_line_visible() {
        let mut view = CodeViewComponent::new();
        draw(&mut view, 50, Some(30));

        // 10 visible rows, line 30 is the last one shown
        assert_eq!(view.scroll(), 21);
    }

    #[test]
    fn test_manual_scroll_stops_following() {
        let mut view = CodeViewComponent::new();
        draw(&mut view, 50, Some(30));

        view.update(Action::ScrollUp).unwrap();
        assert!(!view.is_following());
        draw(&mut view, 50, Some(40));

        assert_eq!(view.scroll(), 20);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut view = CodeViewComponent::new();
        draw(&mut view, 15, None);

        for _ in 0..3 {
            view.update(Action::PageDown).unwrap();
        }
        assert_eq!(view.scroll(), 5);

        view.update(Action::PageUp).unwrap();
        assert_eq!(view.scroll(), 0);
    }

    #[test]
    fn test_restart_resumes_following() {
        let mut view = CodeViewComponent::new();
        draw(&mut view, 50, None);
        view.update(Action::PageDown).unwrap();

        view.update(Action::RestartAnimation).unwrap();

        assert!(view.is_following());
        assert_eq!(view.scroll(), 0);
    }
}
