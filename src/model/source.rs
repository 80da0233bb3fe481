//! Source units and language detection

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// One file's original text, as uploaded or pasted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub name: String,
    pub content: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// True when there is nothing but whitespace to refactor
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// A file the server discovered inside an uploaded zip archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFile {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub path: String,
}

impl ExtractedFile {
    /// Path to show in the file list, falling back to the bare name
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() {
            &self.name
        } else {
            &self.path
        }
    }
}

impl From<&ExtractedFile> for SourceUnit {
    fn from(file: &ExtractedFile) -> Self {
        SourceUnit::new(file.name.clone(), file.content.clone())
    }
}

/// Language/framework sent with a refactor request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    React,
    NodeJs,
    TypeScript,
    Json,
}

impl Language {
    pub fn all() -> [Language; 5] {
        [
            Language::JavaScript,
            Language::React,
            Language::NodeJs,
            Language::TypeScript,
            Language::Json,
        ]
    }

    /// Wire name used in request bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::React => "react",
            Language::NodeJs => "nodejs",
            Language::TypeScript => "typescript",
            Language::Json => "json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::React => "React/JSX",
            Language::NodeJs => "Node.js",
            Language::TypeScript => "TypeScript",
            Language::Json => "JSON",
        }
    }

    /// Conventional file extension for downloads
    pub fn extension(&self) -> &'static str {
        match self {
            Language::JavaScript | Language::NodeJs => "js",
            Language::React => "jsx",
            Language::TypeScript => "ts",
            Language::Json => "json",
        }
    }

    pub fn next(&self) -> Language {
        let all = Self::all();
        let idx = all.iter().position(|l| l == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> Language {
        let all = Self::all();
        let idx = all.iter().position(|l| l == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }

    /// Detect from a file name's extension
    ///
    /// Mirrors the upload form: `jsx`/`tsx` are React, `js`/`ts` are plain
    /// JavaScript, `json` is JSON. Anything else is left undecided.
    pub fn from_path(path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jsx" | "tsx" => Some(Language::React),
            "js" | "ts" | "mjs" | "cjs" => Some(Language::JavaScript),
            "json" => Some(Language::Json),
            _ => None,
        }
    }

    /// Guess the language of pasted code that has no file name
    pub fn detect_from_content(content: &str) -> Option<Language> {
        let trimmed = content.trim_start();
        if trimmed.is_empty() {
            return None;
        }
        if (trimmed.starts_with('{') || trimmed.starts_with('['))
            && serde_json::from_str::<serde_json::Value>(content).is_ok()
        {
            return Some(Language::Json);
        }
        if JSX_REGEX.is_match(content) {
            return Some(Language::React);
        }
        if TYPESCRIPT_REGEX.is_match(content) {
            return Some(Language::TypeScript);
        }
        if NODE_REGEX.is_match(content) {
            return Some(Language::NodeJs);
        }
        Some(Language::JavaScript)
    }
}

static JSX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"from\s+['"]react['"]|<[A-Z][A-Za-z0-9]*[\s/>]|</[a-zA-Z]+>"#)
        .unwrap()
});

static TYPESCRIPT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\binterface\s+\w+\s*\{|\btype\s+\w+\s*=|:\s*(string|number|boolean|void)\b")
        .unwrap()
});

static NODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\brequire\(\s*['"]|\bmodule\.exports\b|\bprocess\.env\b"#)
        .unwrap()
});
