//! Splash screen component
//!
//! Shows the logo for a moment on startup. Any key skips it, `q` quits.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

const TITLE: &str = "refactor-tui";
const SUBTITLE: &str = "AI code refactoring in your terminal";

const LOGO: [&str; 5] = [
    "   ==     = ==        @@@@  @@@@@ @@@@@  @@@   @@@@ @@@@@  @@@  @@@@  ",
    "  ==     =   ==       @   @ @     @     @   @ @       @   @   @ @   @ ",
    " ==     =     ==      @@@@  @@@@  @@@@  @@@@@ @       @   @   @ @@@@  ",
    "  ==   =     ==       @  @  @     @     @   @ @       @   @   @ @  @  ",
    "   == =     ==        @   @ @@@@@ @     @   @  @@@@   @    @@@  @   @ ",
];

const BACKGROUND: Color = Color::Rgb(0, 0, 0);
const ACCENT: Color = Color::Rgb(97, 218, 251);

/// Splash screen component
pub struct SplashComponent {
    /// Set by `init`
    shown_at: Option<Instant>,
    duration: Duration,
}

impl Default for SplashComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SplashComponent {
    pub fn new() -> Self {
        Self {
            shown_at: None,
            duration: Duration::from_millis(1500),
        }
    }

    /// Whether the splash has been shown long enough
    pub fn is_complete(&self) -> bool {
        self.shown_at
            .is_some_and(|shown_at| shown_at.elapsed() >= self.duration)
    }
}

/// Style for one logo cell: brackets in the accent color, letters in white
fn logo_style(c: char) -> Style {
    let fg = match c {
        '=' => ACCENT,
        '@' => Color::White,
        _ => BACKGROUND,
    };
    Style::default().fg(fg).bg(BACKGROUND)
}

/// One-row rect of `width` centered horizontally at row `y`
fn centered_row(area: Rect, y: u16, width: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    Rect::new(x, y, width, 1).intersection(area)
}

impl Component for SplashComponent {
    fn init(&mut self) -> Result<()> {
        self.shown_at = Some(Instant::now());
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('q') => Action::ForceQuit,
            _ => Action::SplashComplete,
        };
        Ok(Some(action))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Tick && self.is_complete() {
            return Ok(Some(Action::SplashComplete));
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(BACKGROUND)), area);

        // Logo, a blank row, title, subtitle
        let block_height = LOGO.len() as u16 + 3;
        let top = area.y + area.height.saturating_sub(block_height) / 2;

        for (i, row) in LOGO.iter().enumerate() {
            let spans: Vec<Span> = row
                .chars()
                .map(|c| Span::styled(c.to_string(), logo_style(c)))
                .collect();
            let rect = centered_row(area, top + i as u16, row.chars().count() as u16);
            frame.render_widget(Paragraph::new(Line::from(spans)), rect);
        }

        let (name, suffix) = TITLE.split_at(TITLE.len() - 4);
        let title = Line::from(vec![
            Span::styled(
                name,
                Style::default()
                    .fg(ACCENT)
                    .bg(BACKGROUND)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                suffix,
                Style::default()
                    .fg(Color::White)
                    .bg(BACKGROUND)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        let title_row = top + LOGO.len() as u16 + 1;
        frame.render_widget(
            Paragraph::new(title),
            centered_row(area, title_row, TITLE.len() as u16),
        );

        let subtitle = Span::styled(SUBTITLE, Style::default().fg(Color::DarkGray).bg(BACKGROUND));
        frame.render_widget(
            Paragraph::new(Line::from(subtitle)),
            centered_row(area, title_row + 1, SUBTITLE.len() as u16),
        );

        Ok(())
    }
}
