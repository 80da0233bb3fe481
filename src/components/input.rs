//! Input tab - loaded source, zip file list and refactor options

use super::code_highlight::highlight_code;
use super::code_view::CodeViewComponent;
use super::layout::{split_with_sidebar, truncate_to_width};
use crate::model::workflow::Workflow;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw the input tab body
pub fn draw_input_panel(
    frame: &mut Frame,
    area: Rect,
    workflow: &Workflow,
    code_view: &mut CodeViewComponent,
) {
    let (main, sidebar) = split_with_sidebar(area);

    let (title, lines) = if workflow.is_uploading() {
        (
            " Uploading ".to_string(),
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  ⏳ Uploading zip file...",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "  Extracting files. This may take a moment.",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        )
    } else if !workflow.zip_files().is_empty() {
        let width = main.width.saturating_sub(22) as usize;
        (
            format!(" Project files ({}) ", workflow.zip_files().len()),
            zip_file_lines(workflow, width),
        )
    } else if let Some(source) = workflow.source() {
        (
            format!(" {} · {} ", source.name, workflow.language().label()),
            highlight_code(&source.content, workflow.language()),
        )
    } else {
        (" Source ".to_string(), empty_lines())
    };

    code_view.draw_with_lines(frame, main, &title, lines, None);
    render_details(frame, sidebar, workflow);
}

fn zip_file_lines(workflow: &Workflow, path_width: usize) -> Vec<Line<'static>> {
    workflow
        .zip_files()
        .iter()
        .enumerate()
        .map(|(i, file)| {
            Line::from(vec![
                Span::styled(format!("{:>4}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled("📄 ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    truncate_to_width(file.display_path(), path_width),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("  ({} lines)", file.content.lines().count()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect()
}

fn empty_lines() -> Vec<Line<'static>> {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    };
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "  No code loaded yet.",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("  Press "),
            key("o"),
            Span::raw(" to open a file or a .zip project"),
        ]),
        Line::from(vec![
            Span::raw("  Press "),
            key("e"),
            Span::raw(" to paste code in $EDITOR"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Supported: JavaScript, React, Node.js, TypeScript, JSON",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn render_details(frame: &mut Frame, area: Rect, workflow: &Workflow) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(vec![
        Span::styled("Language: ", label),
        Span::styled(workflow.language().label(), Style::default().fg(Color::Cyan)),
    ])];

    if !workflow.zip_files().is_empty() {
        let total: usize = workflow
            .zip_files()
            .iter()
            .map(|f| f.content.lines().count())
            .sum();
        lines.push(Line::from(vec![
            Span::styled("Files: ", label),
            Span::styled(workflow.zip_files().len().to_string(), value),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Lines: ", label),
            Span::styled(total.to_string(), value),
        ]));
    } else if let Some(source) = workflow.source() {
        lines.push(Line::from(vec![
            Span::styled("Lines: ", label),
            Span::styled(source.line_count().to_string(), value),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Characters: ", label),
            Span::styled(source.content.chars().count().to_string(), value),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Options",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    for (name, enabled) in workflow.settings().entries() {
        let (mark, color) = if enabled {
            ("✓", Color::Green)
        } else {
            ("✗", Color::DarkGray)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", mark), Style::default().fg(color)),
            Span::raw(name),
        ]));
    }

    if let Some(summary) = workflow.zip_summary() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            summary.to_string(),
            Style::default().fg(Color::Green),
        )));
    }

    if let Some(error) = workflow.last_error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )));
    }

    let ready = workflow.source().is_some_and(|s| !s.is_blank()) || !workflow.zip_files().is_empty();
    if ready {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                " s ",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::raw("Start refactoring"),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::refactor::RefactorSettings;
    use crate::model::source::{Language, SourceUnit};
    use crate::model::workflow::WorkflowEvent;
    use crate::components::test_util::render_to_text;
    use std::time::Instant;

    fn render(workflow: &Workflow) -> String {
        let mut view = CodeViewComponent::new();
        render_to_text(100, 24, |frame| {
            draw_input_panel(frame, frame.area(), workflow, &mut view)
        })
    }

    #[test]
    fn test_empty_state_shows_hints() {
        let workflow = Workflow::new(Language::JavaScript, RefactorSettings::default(), 30, 0);
        let text = render(&workflow);

        assert!(text.contains("No code loaded yet."));
        assert!(text.contains("to open a file"));
        assert!(!text.contains("Start refactoring"));
    }

    #[test]
    fn test_loaded_source_is_shown() {
        let mut workflow = Workflow::new(Language::JavaScript, RefactorSettings::default(), 30, 0);
        workflow.dispatch(
            WorkflowEvent::SourceLoaded {
                unit: SourceUnit::new("app.jsx", "var x = 1;"),
                language: Some(Language::React),
            },
            Instant::now(),
        );

        let text = render(&workflow);

        assert!(text.contains("app.jsx · React"));
        assert!(text.contains("var x = 1;"));
        assert!(text.contains("Start refactoring"));
    }
}
