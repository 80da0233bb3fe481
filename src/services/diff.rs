//! Unified diff between the original and refactored code

use crate::components::code_highlight::highlight_code;
use crate::model::source::Language;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use similar::{ChangeTag, TextDiff};

/// Renders a diff of two texts into terminal lines
pub trait DiffRenderer {
    fn render(&self, original: &str, modified: &str, language: Language) -> Vec<Line<'static>>;
}

/// Added / removed line counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

pub fn diff_stats(original: &str, modified: &str) -> DiffStats {
    let diff = TextDiff::from_lines(original, modified);
    let mut stats = DiffStats::default();
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => stats.added += 1,
            ChangeTag::Delete => stats.removed += 1,
            ChangeTag::Equal => {}
        }
    }
    stats
}

/// Line-based unified diff backed by `similar`
#[derive(Debug, Clone)]
pub struct UnifiedDiffRenderer {
    pub context_lines: usize,
}

impl Default for UnifiedDiffRenderer {
    fn default() -> Self {
        Self { context_lines: 3 }
    }
}

impl DiffRenderer for UnifiedDiffRenderer {
    fn render(&self, original: &str, modified: &str, language: Language) -> Vec<Line<'static>> {
        let diff = TextDiff::from_lines(original, modified);
        let mut lines = Vec::new();

        for hunk in diff
            .unified_diff()
            .context_radius(self.context_lines)
            .iter_hunks()
        {
            lines.push(Line::from(Span::styled(
                hunk.header().to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));

            for change in hunk.iter_changes() {
                let text = change.value().trim_end_matches(['\n', '\r']).to_string();
                let line = match change.tag() {
                    ChangeTag::Delete => Line::from(Span::styled(
                        format!("-{}", text),
                        Style::default().fg(Color::Red),
                    )),
                    ChangeTag::Insert => Line::from(Span::styled(
                        format!("+{}", text),
                        Style::default().fg(Color::Green),
                    )),
                    ChangeTag::Equal => {
                        let mut spans = vec![Span::raw(" ")];
                        if let Some(highlighted) = highlight_code(&text, language).pop() {
                            spans.extend(highlighted.spans);
                        }
                        Line::from(spans)
                    }
                };
                lines.push(line);
            }
        }

        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "No changes",
                Style::default().fg(Color::DarkGray),
            )));
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_render_marks_changed_lines() {
        let renderer = UnifiedDiffRenderer::default();
        let lines = renderer.render(
            "var x = 1;\nconsole.log(x);\n",
            "const x = 1;\nconsole.log(x);\n",
            Language::JavaScript,
        );
        let text: Vec<String> = lines.iter().map(plain).collect();

        assert!(text[0].starts_with("@@"));
        assert!(text.contains(&"-var x = 1;".to_string()));
        assert!(text.contains(&"+const x = 1;".to_string()));
        assert!(text.contains(&" console.log(x);".to_string()));
    }

    #[test]
    fn test_identical_input_has_no_hunks() {
        let lines = UnifiedDiffRenderer::default().render("a\n", "a\n", Language::Json);
        assert_eq!(lines.len(), 1);
        assert_eq!(plain(&lines[0]), "No changes");
    }

    #[test]
    fn test_context_is_limited() {
        let original: String = (0..20).map(|i| format!("line{}\n", i)).collect();
        let modified = original.replace("line10\n", "changed\n");
        let renderer = UnifiedDiffRenderer { context_lines: 1 };

        let lines = renderer.render(&original, &modified, Language::JavaScript);

        // header + 1 context + removed + added + 1 context
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_diff_stats() {
        let stats = diff_stats("a\nb\nc\n", "a\nc\nd\ne\n");
        assert_eq!(stats, DiffStats { added: 2, removed: 1 });
    }
}
