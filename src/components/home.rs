//! Home component - Main application screen
//!
//! Displays the tab header, the body of the active tab, the status bar and
//! the help bar. Owns tab navigation state.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::key_hint;
use crate::components::{
    calculate_main_layout, draw_generation_panel, draw_input_panel, CodeViewComponent,
    ResultsComponent,
};
use crate::model::notice::{Notice, NoticeLevel};
use crate::model::ui::{ServerHealth, Tab};
use crate::model::workflow::{Workflow, WorkflowMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use std::time::Instant;

// ═══════════════════════════════════════════════════════════════════════════════
// Home Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Home component for the main application view
#[derive(Debug, Default)]
pub struct HomeComponent {
    /// Current active tab
    pub active_tab: Tab,
}

impl HomeComponent {
    pub fn new() -> Self {
        Self {
            active_tab: Tab::Input,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Switch to the next enabled tab, wrapping around
    pub fn next_tab(&mut self, workflow: &Workflow) -> bool {
        self.step_tab(workflow, 1)
    }

    /// Switch to the previous enabled tab, wrapping around
    pub fn previous_tab(&mut self, workflow: &Workflow) -> bool {
        let tabs = Tab::all();
        self.step_tab(workflow, tabs.len() - 1)
    }

    fn step_tab(&mut self, workflow: &Workflow, step: usize) -> bool {
        let tabs = Tab::all();
        let mut index = self.active_tab.index();
        for _ in 0..tabs.len() {
            index = (index + step) % tabs.len();
            if workflow.is_tab_enabled(tabs[index]) {
                let changed = tabs[index] != self.active_tab;
                self.active_tab = tabs[index];
                return changed;
            }
        }
        false
    }

    /// Jump to `tab` if it is enabled; returns whether the tab changed
    pub fn select_tab(&mut self, tab: Tab, workflow: &Workflow) -> bool {
        if tab == self.active_tab || !workflow.is_tab_enabled(tab) {
            return false;
        }
        self.active_tab = tab;
        true
    }

    /// Fall back to the input tab when the active one got disabled
    pub fn ensure_enabled(&mut self, workflow: &Workflow) -> bool {
        if workflow.is_tab_enabled(self.active_tab) {
            return false;
        }
        self.active_tab = Tab::Input;
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            // Tabs
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::BackTab => Some(Action::PrevTab),
            KeyCode::Char('1') => Some(Action::SelectTab(Tab::Input)),
            KeyCode::Char('2') => Some(Action::SelectTab(Tab::Generation)),
            KeyCode::Char('3') => Some(Action::SelectTab(Tab::Results)),

            // Scrolling
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageDown)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageUp)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),

            // Source
            KeyCode::Char('o') => Some(Action::OpenPathPrompt),
            KeyCode::Char('e') => Some(Action::OpenEditor),

            // Refactoring
            KeyCode::Char('s') | KeyCode::Enter => Some(Action::StartRefactor),
            KeyCode::Char('x') => Some(Action::Reset),
            KeyCode::Char('d') => Some(Action::Download),

            // Animation
            KeyCode::Char(' ') => Some(Action::TogglePause),
            KeyCode::Char('r') => Some(Action::RestartAnimation),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::SpeedUp),
            KeyCode::Char('-') => Some(Action::SpeedDown),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::NextFile),
            KeyCode::Char('h') | KeyCode::Left => Some(Action::PrevFile),

            // Modals
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ForceQuit)
            }
            KeyCode::Char('c') => Some(Action::OpenSettings),
            KeyCode::Char('i') => Some(Action::OpenStats),
            KeyCode::Char('?') => Some(Action::OpenHelp),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, _action: Action) -> Result<Option<Action>> {
        // Tab changes need the workflow, so App calls the navigation methods directly
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_home_screen which takes full context
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the home screen
pub struct HomeRenderContext<'a> {
    pub workflow: &'a Workflow,
    pub notice: Option<&'a Notice>,
    pub health: ServerHealth,
    pub base_url: &'a str,
    pub now: Instant,
}

/// Draw the home screen
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &HomeComponent,
    code_view: &mut CodeViewComponent,
    results: &mut ResultsComponent,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area, true);

    render_header(frame, layout.header, home, ctx);

    match home.active_tab {
        Tab::Input => draw_input_panel(frame, layout.body, ctx.workflow, code_view),
        Tab::Generation => {
            draw_generation_panel(frame, layout.body, ctx.workflow, code_view, ctx.now)
        }
        Tab::Results => results.draw_with_workflow(frame, layout.body, ctx.workflow, code_view)?,
    }

    if let Some(status_area) = layout.status {
        render_status_bar(frame, status_area, ctx);
    }
    render_help_bar(frame, layout.help, home, ctx.workflow);

    Ok(())
}

fn render_header(frame: &mut Frame, area: Rect, home: &HomeComponent, ctx: &HomeRenderContext) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(22)])
        .split(area);

    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|tab| {
            let style = if ctx.workflow.is_tab_enabled(*tab) {
                Style::default().fg(Color::Gray)
            } else {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
            };
            Line::from(Span::styled(
                format!("{} {}", tab.index() + 1, tab.name()),
                style,
            ))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .title(" refactor-tui ")
                .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
        )
        .select(home.active_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    let health_color = match ctx.health {
        ServerHealth::Checking => Color::Yellow,
        ServerHealth::Online => Color::Green,
        ServerHealth::Offline => Color::Red,
    };
    let health = Paragraph::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(health_color)),
        Span::styled(
            format!("server {}", ctx.health.label()),
            Style::default().fg(health_color).add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::BOTTOM))
    .alignment(ratatui::layout::Alignment::Right);
    frame.render_widget(health, chunks[1]);
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    let mut spans = vec![Span::styled(
        format!(" {} ", ctx.workflow.mode().label()),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw(" "));

    if let Some(notice) = ctx.notice {
        let color = match notice.level {
            NoticeLevel::Info => Color::Blue,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        };
        spans.push(Span::styled(
            format!("{} ", notice.icon()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(notice.summary(), Style::default().fg(color)));
        spans.push(Span::styled(
            format!("  {}", notice.formatted_time()),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            ctx.base_url.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Key hint: bold colored key followed by its description
fn render_help_bar(frame: &mut Frame, area: Rect, home: &HomeComponent, workflow: &Workflow) {
    let mut hints: Vec<[Span<'static>; 2]> = vec![key_hint("q", "Quit ", Color::Yellow)];

    match home.active_tab {
        Tab::Input => {
            hints.push(key_hint("o", "Open ", Color::Cyan));
            hints.push(key_hint("e", "Paste ", Color::Cyan));
            hints.push(key_hint("s", "Start ", Color::Green));
            hints.push(key_hint("x", "Clear ", Color::Cyan));
            hints.push(key_hint("c", "Settings ", Color::Magenta));
            hints.push(key_hint("i", "Stats ", Color::Magenta));
        }
        Tab::Generation => {
            hints.push(key_hint("Space", "Pause ", Color::Green));
            hints.push(key_hint("r", "Restart ", Color::Cyan));
            hints.push(key_hint("+/-", "Speed ", Color::Cyan));
            if workflow.mode().is_zip() {
                hints.push(key_hint("←/→", "File ", Color::Cyan));
            }
            if workflow.download_all_available() {
                hints.push(key_hint("d", "Download all ", Color::Green));
            }
        }
        Tab::Results => {
            hints.push(key_hint("j/k", "Scroll ", Color::Cyan));
            hints.push(key_hint("d", "Download ", Color::Green));
            hints.push(key_hint("x", "New ", Color::Cyan));
        }
    }

    if workflow.mode() != WorkflowMode::Idle {
        hints.push(key_hint("Tab", "Switch ", Color::Blue));
    }
    hints.push(key_hint("?", "Help", Color::White));

    let spans: Vec<Span> = hints.into_iter().flatten().collect();
    let paragraph = Paragraph::new(Line::from(spans))
        .alignment(ratatui::layout::Alignment::Left);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_util::render_to_text;
    use crate::model::refactor::{RefactorMetrics, RefactorResult, RefactorSettings};
    use crate::model::source::{Language, SourceUnit};
    use crate::model::workflow::WorkflowEvent;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn idle() -> Workflow {
        Workflow::new(Language::JavaScript, RefactorSettings::default(), 10, 0)
    }

    fn single_done() -> Workflow {
        let now = Instant::now();
        let mut wf = idle();
        wf.dispatch(
            WorkflowEvent::SourceLoaded {
                unit: SourceUnit::new("a.js", "var a;"),
                language: None,
            },
            now,
        );
        wf.dispatch(WorkflowEvent::Start, now);
        let run = wf.run_id();
        wf.dispatch(
            WorkflowEvent::SingleSucceeded {
                run,
                result: RefactorResult {
                    refactored_code: "let a;".to_string(),
                    metrics: RefactorMetrics::default(),
                    token_usage: None,
                },
            },
            now,
        );
        wf.tick(now + Duration::from_secs(5));
        wf
    }

    #[test]
    fn test_key_mapping() {
        let mut home = HomeComponent::new();
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char('s'))).unwrap(),
            Some(Action::StartRefactor)
        );
        assert_eq!(
            home.handle_key_event(key(KeyCode::Right)).unwrap(),
            Some(Action::NextFile)
        );
        assert_eq!(
            home.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
                .unwrap(),
            Some(Action::ForceQuit)
        );
        assert_eq!(
            home.handle_key_event(key(KeyCode::Char('c'))).unwrap(),
            Some(Action::OpenSettings)
        );
        assert_eq!(home.handle_key_event(key(KeyCode::F(5))).unwrap(), None);
    }

    #[test]
    fn test_disabled_tabs_are_skipped() {
        let mut home = HomeComponent::new();
        let wf = idle();

        assert!(!home.next_tab(&wf));
        assert_eq!(home.active_tab, Tab::Input);
        assert!(!home.select_tab(Tab::Results, &wf));
    }

    #[test]
    fn test_tabs_cycle_when_enabled() {
        let mut home = HomeComponent::new();
        let wf = single_done();

        assert!(home.next_tab(&wf));
        assert_eq!(home.active_tab, Tab::Generation);
        assert!(home.next_tab(&wf));
        assert_eq!(home.active_tab, Tab::Results);
        assert!(home.next_tab(&wf));
        assert_eq!(home.active_tab, Tab::Input);
        assert!(home.previous_tab(&wf));
        assert_eq!(home.active_tab, Tab::Results);
    }

    #[test]
    fn test_ensure_enabled_falls_back_to_input() {
        let mut home = HomeComponent::new();
        let mut wf = single_done();
        home.select_tab(Tab::Results, &wf);

        wf.dispatch(WorkflowEvent::Reset, Instant::now());

        assert!(home.ensure_enabled(&wf));
        assert_eq!(home.active_tab, Tab::Input);
    }

    #[test]
    fn test_status_bar_shows_notice() {
        let home = HomeComponent::new();
        let wf = idle();
        let notice = Notice::error("No code to refactor", "Please enter or upload some code first.");
        let ctx = HomeRenderContext {
            workflow: &wf,
            notice: Some(&notice),
            health: ServerHealth::Offline,
            base_url: "http://localhost:5000/api",
            now: Instant::now(),
        };
        let mut view = CodeViewComponent::new();
        let mut results = ResultsComponent::default();

        let text = render_to_text(140, 24, |frame| {
            draw_home_screen(frame, frame.area(), &home, &mut view, &mut results, &ctx).unwrap()
        });

        assert!(text.contains("No code to refactor"));
        assert!(text.contains("server offline"));
        assert!(text.contains("Settings"));
    }
}
