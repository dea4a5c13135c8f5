/*!
 * Line-based outlines for Python, Markdown and SQL
 */

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{lower_name, SignatureExtractor};
use crate::error::Result;

static PYTHON_DEF_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:async\s+def|def|class)\s+\w+").unwrap());

static MARKDOWN_HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}\s+\S").unwrap());

static SQL_CREATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*create\s+(?:or\s+replace\s+)?(?:unique\s+)?(?:materialized\s+)?(?:table|view|index|function|procedure|trigger|schema|type)\b",
    )
    .unwrap()
});

/// Keep the lines matching `regex`, preceded by a title
fn outline(title: &str, content: &str, regex: &Regex) -> String {
    let mut out = vec![format!("# {}", title), String::new()];
    out.extend(
        content
            .lines()
            .filter(|line| regex.is_match(line))
            .map(|line| line.trim_end().to_string()),
    );
    out.join("\n")
}

/// `def` and `class` lines with their indentation
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonExtractor;

impl PythonExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }
}

impl SignatureExtractor for PythonExtractor {
    fn name(&self) -> &'static str {
        "python"
    }

    fn supports(&self, path: &Path) -> bool {
        path.to_string_lossy().ends_with(".py")
    }

    fn extract(&self, _path: &Path, content: &str) -> Result<String> {
        Ok(outline("Python File", content, &PYTHON_DEF_REGEX))
    }
}

/// Heading outline, ignoring fenced code blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExtractor;

impl MarkdownExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }
}

impl SignatureExtractor for MarkdownExtractor {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn supports(&self, path: &Path) -> bool {
        let name = lower_name(path);
        name.ends_with(".md") || name.ends_with(".markdown")
    }

    fn extract(&self, _path: &Path, content: &str) -> Result<String> {
        let mut out = vec!["# Markdown Outline".to_string(), String::new()];
        let mut in_fence = false;

        for line in content.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
                continue;
            }
            if !in_fence && MARKDOWN_HEADING_REGEX.is_match(line) {
                out.push(line.trim_end().to_string());
            }
        }

        Ok(out.join("\n"))
    }
}

/// `CREATE ...` statement heads
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlExtractor;

impl SqlExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }
}

impl SignatureExtractor for SqlExtractor {
    fn name(&self) -> &'static str {
        "sql"
    }

    fn supports(&self, path: &Path) -> bool {
        lower_name(path).ends_with(".sql")
    }

    fn extract(&self, _path: &Path, content: &str) -> Result<String> {
        Ok(outline("SQL File", content, &SQL_CREATE_REGEX))
    }
}
