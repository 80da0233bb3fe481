//! Results tab - diff against the original source and refactor metrics

use super::code_view::CodeViewComponent;
use super::layout::split_with_sidebar;
use crate::action::Action;
use crate::component::Component;
use crate::model::refactor::RefactorResult;
use crate::model::workflow::{RunId, Workflow};
use crate::services::diff::{diff_stats, DiffRenderer, DiffStats, UnifiedDiffRenderer};
use anyhow::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rendered diff for one run
struct CachedDiff {
    run: RunId,
    lines: Vec<Line<'static>>,
    stats: DiffStats,
}

/// Results panel
///
/// The diff is computed once per run and reused on every frame.
pub struct ResultsComponent {
    renderer: Box<dyn DiffRenderer>,
    cache: Option<CachedDiff>,
}

impl Default for ResultsComponent {
    fn default() -> Self {
        Self::new(Box::new(UnifiedDiffRenderer::default()))
    }
}

impl ResultsComponent {
    pub fn new(renderer: Box<dyn DiffRenderer>) -> Self {
        Self {
            renderer,
            cache: None,
        }
    }

    fn refresh_cache(&mut self, workflow: &Workflow, result: &RefactorResult) {
        let run = workflow.run_id();
        if matches!(&self.cache, Some(cached) if cached.run == run) {
            return;
        }
        let original = workflow.source().map(|s| s.content.as_str()).unwrap_or("");
        self.cache = Some(CachedDiff {
            run,
            lines: self
                .renderer
                .render(original, &result.refactored_code, workflow.language()),
            stats: diff_stats(original, &result.refactored_code),
        });
    }

    pub fn draw_with_workflow(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        workflow: &Workflow,
        code_view: &mut CodeViewComponent,
    ) -> Result<()> {
        let Some(result) = workflow.result() else {
            let paragraph = Paragraph::new("No results yet").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
            frame.render_widget(paragraph, area);
            return Ok(());
        };

        self.refresh_cache(workflow, result);
        let Some(cached) = self.cache.as_ref() else {
            return Ok(());
        };
        let lines = cached.lines.clone();
        let stats = cached.stats;

        let (main, sidebar) = split_with_sidebar(area);

        code_view.draw_with_lines(frame, main, " Diff ", lines, None);
        render_metrics(frame, sidebar, result, stats);
        Ok(())
    }
}

impl Component for ResultsComponent {
    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_with_workflow which takes full context
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Reset {
            self.cache = None;
        }
        Ok(None)
    }
}

/// Quality score shown as `4.5/5`
pub fn format_quality(score: f64) -> String {
    let rounded = (score * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}/5", rounded)
    } else {
        format!("{:.1}/5", rounded)
    }
}

fn render_metrics(frame: &mut Frame, area: Rect, result: &RefactorResult, stats: DiffStats) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let metric = |name: &'static str, v: String| {
        Line::from(vec![Span::styled(name, label), Span::styled(v, value)])
    };
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    };

    let m = result.metrics;
    let mut lines = vec![
        section("Metrics"),
        metric("Original lines: ", m.original_lines.to_string()),
        metric("Refactored lines: ", m.refactored_lines.to_string()),
        metric("Lines reduced: ", m.lines_reduced.to_string()),
        metric("Quality score: ", format_quality(m.quality_score)),
        Line::from(""),
        section("Changes"),
        Line::from(vec![
            Span::styled(format!("+{}", stats.added), Style::default().fg(Color::Green)),
            Span::raw("  "),
            Span::styled(format!("-{}", stats.removed), Style::default().fg(Color::Red)),
        ]),
    ];

    if let Some(usage) = result.token_usage {
        lines.push(Line::from(""));
        lines.push(section("Token usage"));
        lines.push(metric("Prompt: ", usage.prompt.to_string()));
        lines.push(metric("Completion: ", usage.completion.to_string()));
        lines.push(metric("Total: ", usage.total.to_string()));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            " d ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw("Download"),
    ]));

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
    use crate::components::test_util::render_to_text;
    use crate::model::refactor::{RefactorMetrics, RefactorSettings, TokenUsage};
    use crate::model::source::{Language, SourceUnit};
    use crate::model::workflow::WorkflowEvent;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    struct CountingRenderer {
        calls: Rc<Cell<usize>>,
    }

    impl DiffRenderer for CountingRenderer {
        fn render(&self, _original: &str, _modified: &str, _language: Language) -> Vec<Line<'static>> {
            self.calls.set(self.calls.get() + 1);
            vec![Line::from("diff")]
        }
    }

    fn done_workflow() -> Workflow {
        let now = Instant::now();
        let mut wf = Workflow::new(Language::JavaScript, RefactorSettings::default(), 10, 0);
        wf.dispatch(
            WorkflowEvent::SourceLoaded {
                unit: SourceUnit::new("a.js", "var x = 1;\n"),
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
                    refactored_code: "const x = 1;\n".to_string(),
                    metrics: RefactorMetrics {
                        original_lines: 1,
                        refactored_lines: 1,
                        lines_reduced: 0,
                        quality_score: 4.5,
                    },
                    token_usage: Some(TokenUsage {
                        prompt: 120,
                        completion: 30,
                        total: 150,
                    }),
                },
            },
            now,
        );
        wf.tick(now + Duration::from_secs(5));
        wf
    }

    #[test]
    fn test_format_quality() {
        assert_eq!(format_quality(4.0), "4/5");
        assert_eq!(format_quality(4.46), "4.5/5");
        assert_eq!(format_quality(0.0), "0/5");
    }

    #[test]
    fn test_diff_is_rendered_once_per_run() {
        let calls = Rc::new(Cell::new(0));
        let mut results = ResultsComponent::new(Box::new(CountingRenderer {
            calls: Rc::clone(&calls),
        }));
        let wf = done_workflow();
        let mut view = CodeViewComponent::new();

        for _ in 0..3 {
            render_to_text(100, 24, |frame| {
                results
                    .draw_with_workflow(frame, frame.area(), &wf, &mut view)
                    .unwrap()
            });
        }

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_metrics_and_token_usage_are_shown() {
        let mut results = ResultsComponent::default();
        let wf = done_workflow();
        let mut view = CodeViewComponent::new();

        let text = render_to_text(110, 30, |frame| {
            results
                .draw_with_workflow(frame, frame.area(), &wf, &mut view)
                .unwrap()
        });

        assert!(text.contains("-var x = 1;"));
        assert!(text.contains("+const x = 1;"));
        assert!(text.contains("Quality score: 4.5/5"));
        assert!(text.contains("Total: 150"));
    }
}
