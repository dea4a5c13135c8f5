/*!
 * Utility functions for ctxpack
 */

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::error::{Result, ResultExt};

static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[^\w\s]").unwrap());

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Rough LLM token estimate: words and punctuation marks at 0.75 tokens each
pub fn estimate_tokens(text: &str) -> usize {
    let words = TOKEN_REGEX.find_iter(text).count();
    (words as f64 / 0.75) as usize
}

/// Lexically normalize a path, resolving `.` and `..` without touching the
/// filesystem
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Read a list of file paths, one per line.
///
/// Blank lines and `#` comments are dropped and a leading `-` bullet is
/// stripped. A missing list yields no files.
pub fn read_file_list(path: &Path) -> Result<Vec<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("File list not found - {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read file list {}", path.display()))
        }
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.strip_prefix('-') {
            Some(rest) => rest.trim_start(),
            None => line,
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
