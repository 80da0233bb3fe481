//! Request and response types for the refactoring API

use super::source::{Language, SourceUnit};
use serde::{Deserialize, Serialize};

/// Refactoring options sent along with a single-file request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefactorSettings {
    pub use_airbnb_style: bool,
    pub convert_callbacks: bool,
    pub add_comments: bool,
    pub remove_dead_code: bool,
    pub improve_naming: bool,
}

impl Default for RefactorSettings {
    fn default() -> Self {
        Self {
            use_airbnb_style: true,
            convert_callbacks: true,
            add_comments: true,
            remove_dead_code: true,
            improve_naming: true,
        }
    }
}

impl RefactorSettings {
    /// Labels in display order, paired with the current values
    pub fn entries(&self) -> [(&'static str, bool); 5] {
        [
            ("Airbnb style", self.use_airbnb_style),
            ("Convert callbacks to async/await", self.convert_callbacks),
            ("Add comments", self.add_comments),
            ("Remove dead code", self.remove_dead_code),
            ("Improve naming", self.improve_naming),
        ]
    }

    /// Flip the setting at `index` (same order as `entries`)
    pub fn toggle(&mut self, index: usize) {
        match index {
            0 => self.use_airbnb_style = !self.use_airbnb_style,
            1 => self.convert_callbacks = !self.convert_callbacks,
            2 => self.add_comments = !self.add_comments,
            3 => self.remove_dead_code = !self.remove_dead_code,
            4 => self.improve_naming = !self.improve_naming,
            _ => {}
        }
    }
}

/// Body of `POST /refactor`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefactorRequest {
    pub code: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<RefactorSettings>,
}

/// Line counts and quality score reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactorMetrics {
    pub original_lines: i64,
    pub refactored_lines: i64,
    pub lines_reduced: i64,
    pub quality_score: f64,
}

/// LLM token accounting, when the server reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt: u64,
    pub completion: u64,
    pub total: u64,
}

/// Output for one refactored unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefactorResult {
    pub refactored_code: String,
    #[serde(default)]
    pub metrics: RefactorMetrics,
    #[serde(default)]
    pub token_usage: Option<TokenUsage>,
}

/// One entry of the animated zip response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipFileResult {
    pub name: String,
    pub refactored_code: String,
}

/// Body of the zip refactor endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ZipRefactorRequest<'a> {
    pub files: &'a [SourceUnit],
}

/// `error` object inside a response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope used by `/refactor`, `/refactor/stats` and `/health`
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// Envelope used by the zip endpoints, which return `files` instead of `data`
#[derive(Debug, Deserialize)]
pub struct FilesEnvelope<T> {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub files: Vec<T>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_refactor_request_serializes_camel_case_settings() {
        let request = RefactorRequest {
            code: "var a = 1;".to_string(),
            language: Language::React,
            settings: Some(RefactorSettings::default()),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "code": "var a = 1;",
                "language": "react",
                "settings": {
                    "useAirbnbStyle": true,
                    "convertCallbacks": true,
                    "addComments": true,
                    "removeDeadCode": true,
                    "improveNaming": true
                }
            })
        );
    }

    #[test]
    fn test_refactor_result_without_token_usage() {
        let json = r#"{
            "refactoredCode": "const x = 1;",
            "metrics": {"originalLines": 3, "refactoredLines": 1, "linesReduced": 2, "qualityScore": 4.5}
        }"#;

        let result: RefactorResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.refactored_code, "const x = 1;");
        assert_eq!(result.metrics.lines_reduced, 2);
        assert_eq!(result.metrics.quality_score, 4.5);
        assert!(result.token_usage.is_none());
    }

    #[test]
    fn test_files_envelope_failure_without_files() {
        let json = r#"{"success": false, "error": {"message": "bad zip"}}"#;
        let envelope: FilesEnvelope<ZipFileResult> = serde_json::from_str(json).unwrap();

        assert!(!envelope.success);
        assert!(envelope.files.is_empty());
        assert_eq!(
            envelope.error.and_then(|e| e.message).as_deref(),
            Some("bad zip")
        );
    }

    #[test]
    fn test_settings_toggle() {
        let mut settings = RefactorSettings::default();
        settings.toggle(3);
        assert!(!settings.remove_dead_code);
        assert_eq!(settings.entries()[3], ("Remove dead code", false));

        settings.toggle(99);
        assert!(settings.use_airbnb_style);
    }
}
