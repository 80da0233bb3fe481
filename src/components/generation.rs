//! AI Generation tab - progress, typing animation and statistics

use super::code_highlight::highlight_code;
use super::code_view::CodeViewComponent;
use super::layout::{split_with_sidebar, truncate_to_width};
use crate::model::animation::TypingAnimator;
use crate::model::source::Language;
use crate::model::workflow::{Workflow, WorkflowMode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};
use std::path::Path;
use std::time::Instant;

const CURSOR: &str = "▌";

/// One-line description of what the AI is doing
pub fn status_line(workflow: &Workflow) -> String {
    if let Some(progress) = workflow.progress() {
        return progress.phase_label().to_string();
    }
    match workflow.animator() {
        None if workflow.is_awaiting_response() => "AI is thinking...".to_string(),
        None => "Idle".to_string(),
        Some(animator) if animator.is_completed() => match workflow.mode() {
            WorkflowMode::ZipDone => "All files refactored!".to_string(),
            _ => "Refactoring complete!".to_string(),
        },
        Some(animator) if animator.is_paused() => "Paused".to_string(),
        Some(_) => "AI is typing...".to_string(),
    }
}

/// Highlighted prefix with the cursor appended to its last line
pub fn animated_lines(animator: &TypingAnimator, language: Language, now: Instant) -> Vec<Line<'static>> {
    let state = animator.state(now);
    let mut lines = highlight_code(state.displayed_prefix, language);

    let cursor = if state.completed {
        Span::styled(
            CURSOR,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else if state.cursor_visible {
        Span::styled(CURSOR, Style::default().fg(Color::Cyan))
    } else {
        Span::raw(" ")
    };

    if let Some(last) = lines.last_mut() {
        last.spans.push(cursor);
    }
    lines
}

/// Draw the generation tab body
pub fn draw_generation_panel(
    frame: &mut Frame,
    area: Rect,
    workflow: &Workflow,
    code_view: &mut CodeViewComponent,
    now: Instant,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_progress(frame, chunks[0], workflow);

    let (main, sidebar) = split_with_sidebar(chunks[1]);
    let title = code_title(workflow);

    match (workflow.mode(), workflow.animator()) {
        (WorkflowMode::ZipProgress, _) => {
            let width = main.width.saturating_sub(8) as usize;
            let lines = workflow
                .zip_files()
                .iter()
                .map(|f| {
                    Line::from(vec![
                        Span::styled("  ⚙ ", Style::default().fg(Color::Yellow)),
                        Span::styled(
                            truncate_to_width(f.display_path(), width),
                            Style::default().fg(Color::Gray),
                        ),
                    ])
                })
                .collect();
            code_view.draw_with_lines(frame, main, &title, lines, None);
        }
        (_, Some(animator)) => {
            let lines = animated_lines(animator, highlight_language(workflow), now);
            code_view.draw_with_lines(frame, main, &title, lines, Some(animator.current_line()));
        }
        (_, None) => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Waiting for the AI response...",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            code_view.draw_with_lines(frame, main, &title, lines, None);
        }
    }

    render_statistics(frame, sidebar, workflow);
}

/// Zip units are highlighted by their own extension
fn highlight_language(workflow: &Workflow) -> Language {
    workflow
        .current_zip_result()
        .filter(|_| workflow.mode().is_zip())
        .and_then(|r| Language::from_path(Path::new(&r.name)))
        .unwrap_or_else(|| workflow.language())
}

fn code_title(workflow: &Workflow) -> String {
    match workflow.mode() {
        WorkflowMode::ZipProgress => format!(" Refactoring {} files ", workflow.zip_files().len()),
        WorkflowMode::ZipAnimating | WorkflowMode::ZipDone => {
            let total = workflow.zip_results().len();
            let name = workflow
                .current_zip_result()
                .map(|r| r.name.as_str())
                .unwrap_or("");
            format!(" ◀ {} ({} / {}) ▶ ", name, workflow.cursor() + 1, total)
        }
        _ => " Refactored code ".to_string(),
    }
}

fn render_progress(frame: &mut Frame, area: Rect, workflow: &Workflow) {
    let percent = match (workflow.progress(), workflow.animator()) {
        (Some(progress), _) => progress.percent(),
        (None, Some(animator)) => animator.progress_percent(),
        (None, None) => 0,
    };

    let color = match workflow.animator() {
        Some(a) if a.is_completed() => Color::Green,
        Some(a) if a.is_paused() => Color::Yellow,
        _ => Color::Cyan,
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", status_line(workflow)))
                .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .percent(u16::from(percent.min(100)))
        .label(format!("{}%", percent));

    frame.render_widget(gauge, area);
}

fn render_statistics(frame: &mut Frame, area: Rect, workflow: &Workflow) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let stat = |name: &'static str, v: String| {
        Line::from(vec![Span::styled(name, label), Span::styled(v, value)])
    };

    let mut lines = vec![Line::from(Span::styled(
        "Statistics",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))];

    if let Some(animator) = workflow.animator() {
        lines.push(stat("Total lines: ", animator.total_lines().to_string()));
        lines.push(stat("Progress: ", format!("{}%", animator.progress_percent())));
        lines.push(stat(
            "Current line: ",
            format!("{} / {}", animator.current_line() + 1, animator.total_lines()),
        ));
        lines.push(stat("Speed: ", format!("{} ms/char", animator.speed_ms())));
    } else {
        lines.push(stat("Speed: ", format!("{} ms/char", workflow.speed_ms())));
    }

    if workflow.mode().is_zip() && !workflow.zip_results().is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Files",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        let width = area.width.saturating_sub(6) as usize;
        for (i, result) in workflow.zip_results().iter().enumerate() {
            let current = i == workflow.cursor();
            let style = if current {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::from(vec![
                Span::styled(if current { "▶ " } else { "  " }, style),
                Span::styled(truncate_to_width(&result.name, width), style),
            ]));
        }
    }

    lines.push(Line::from(""));
    if workflow.download_all_available() {
        let size = workflow
            .archive()
            .map(|a| a.formatted_size())
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(
                " d ",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("Download all ({})", size)),
        ]));
    } else if workflow.is_zip_done() {
        lines.push(Line::from(Span::styled(
            "Preparing the project archive...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if workflow.mode() == WorkflowMode::SingleDone {
        lines.push(Line::from(vec![
            Span::styled(
                " Tab ",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw("View results"),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Details ")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
