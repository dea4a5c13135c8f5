/*!
 * Exclusion patterns: built-in defaults layered over ignore-file patterns
 */

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::Match;

use crate::error::Result;

/// Exclusions that always apply and cannot be negated by user patterns.
///
/// Three shapes are understood: `dir/` (a root-anchored directory and
/// everything under it),
/// a single `*` wildcard (prefix/suffix split), and exact relative paths.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    // Version control
    ".git/",
    // Environments
    ".conda/",
    ".venv/",
    "venv/",
    // Dependencies
    "node_modules/",
    // Python
    "__pycache__/",
    "*.pyc",
    ".pytest_cache/",
    // IDEs
    ".idea/",
    ".vscode/",
    // Build output
    "dist/",
    "build/",
    "target/",
    "out/",
    ".next/",
    ".nuxt/",
    // OS files
    ".DS_Store",
    // Coverage
    ".coverage/",
    "coverage/",
    // Temp & caches
    "tmp/",
    "temp/",
    ".sass-cache/",
    "__tests__/__snapshots__/",
    ".ipynb_checkpoints/",
    // Lock files
    "*.lock",
];

/// Parse a newline-delimited pattern file.
///
/// Blank lines and `#` comments are dropped; a missing file yields no patterns.
pub fn parse_patterns_file(path: &Path) -> Result<Vec<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Path of `path` relative to `base`, with `/` separators and a trailing `/`
/// for directories. `None` when `path` does not live under `base`.
pub fn relative_pattern_path(path: &Path, base: &Path, is_dir: bool) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            _ => return None,
        }
    }

    let mut rel_str = parts.join("/");
    if is_dir {
        rel_str.push('/');
    }
    Some(rel_str)
}

/// The fixed default-exclusion predicate
#[derive(Debug, Clone, Copy)]
pub struct DefaultExclusions {
    patterns: &'static [&'static str],
}

impl Default for DefaultExclusions {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_EXCLUSIONS,
        }
    }
}

impl DefaultExclusions {
    /// Check a relative path (directories carry a trailing `/`)
    pub fn matches(&self, rel_path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| Self::pattern_matches(pattern, rel_path))
    }

    fn pattern_matches(pattern: &str, rel_path: &str) -> bool {
        if pattern.ends_with('/') {
            // The path itself or one of its ancestors, anchored at the root
            rel_path
                .match_indices('/')
                .any(|(end, _)| &rel_path[..=end] == pattern)
        } else if pattern.contains('*') {
            // Exactly one wildcard, otherwise the pattern never matches
            let parts: Vec<&str> = pattern.split('*').collect();
            parts.len() == 2 && rel_path.starts_with(parts[0]) && rel_path.ends_with(parts[1])
        } else {
            rel_path == pattern
        }
    }
}

/// Layered exclusion rules: defaults first, then ignore-file semantics
#[derive(Debug, Clone)]
pub struct PatternSet {
    defaults: DefaultExclusions,
    user_patterns: Vec<String>,
    matcher: Option<Gitignore>,
}

impl PatternSet {
    /// Build a pattern set from user patterns (ignore-file syntax).
    ///
    /// Patterns are evaluated with last-match-wins precedence and `!` negation.
    pub fn new(root: &Path, user_patterns: Vec<String>) -> Result<Self> {
        let matcher = if user_patterns.is_empty() {
            None
        } else {
            let mut builder = GitignoreBuilder::new(root);
            for pattern in &user_patterns {
                builder.add_line(None, pattern)?;
            }
            Some(builder.build()?)
        };

        Ok(Self {
            defaults: DefaultExclusions::default(),
            user_patterns,
            matcher,
        })
    }

    /// A pattern set containing only the built-in defaults
    pub fn defaults_only() -> Self {
        Self {
            defaults: DefaultExclusions::default(),
            user_patterns: Vec::new(),
            matcher: None,
        }
    }

    /// Load patterns from an ignore file and a supplementary exclude file,
    /// in that order. Either source may be absent.
    pub fn from_sources(
        root: &Path,
        ignore_file: Option<&Path>,
        exclude_file: Option<&Path>,
    ) -> Result<Self> {
        let mut patterns = Vec::new();
        for source in [ignore_file, exclude_file].into_iter().flatten() {
            patterns.extend(parse_patterns_file(source)?);
        }
        Self::new(root, patterns)
    }

    /// User patterns in evaluation order
    pub fn user_patterns(&self) -> &[String] {
        &self.user_patterns
    }

    /// Whether `path` is excluded relative to `base`.
    ///
    /// Paths that cannot be expressed relative to `base` are not excluded.
    pub fn excluded(&self, path: &Path, base: &Path) -> bool {
        self.excluded_entry(path, base, path.is_dir())
    }

    /// Same as [`PatternSet::excluded`] when the caller already knows whether
    /// the entry is a directory
    pub fn excluded_entry(&self, path: &Path, base: &Path, is_dir: bool) -> bool {
        let Some(rel_path) = relative_pattern_path(path, base, is_dir) else {
            return false;
        };
        self.excluded_relative(&rel_path)
    }

    /// Evaluate an already-relative path (`/` separators, trailing `/` for
    /// directories)
    pub fn excluded_relative(&self, rel_path: &str) -> bool {
        // The root itself
        if rel_path.is_empty() || rel_path == "/" {
            return false;
        }

        if self.defaults.matches(rel_path) {
            return true;
        }

        match &self.matcher {
            Some(matcher) => {
                let is_dir = rel_path.ends_with('/');
                let candidate = PathBuf::from(rel_path.trim_end_matches('/'));
                matches!(
                    matcher.matched_path_or_any_parents(&candidate, is_dir),
                    Match::Ignore(_)
                )
            }
            None => false,
        }
    }
}
