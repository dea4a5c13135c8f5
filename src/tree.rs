/*!
 * ASCII tree rendering of the visible project layout
 */

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::patterns::PatternSet;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// A listed child of a directory
struct TreeItem {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

/// Renders a directory as `tree`-style lines, honouring exclusions
pub struct TreeRenderer<'a> {
    patterns: &'a PatternSet,
}

impl<'a> TreeRenderer<'a> {
    /// Create a renderer using the given exclusion rules
    pub fn new(patterns: &'a PatternSet) -> Self {
        Self { patterns }
    }

    /// Render `directory`. The first line is the absolute root path; a
    /// missing root renders as no lines at all.
    pub fn render(&self, directory: &Path) -> Vec<String> {
        let root = match fs::canonicalize(directory) {
            Ok(root) if root.is_dir() => root,
            _ => return Vec::new(),
        };

        let mut lines = vec![root.display().to_string()];
        self.render_children(&root, &root, "", &mut lines);
        lines
    }

    /// Render `directory` as a single newline-joined string
    pub fn render_string(&self, directory: &Path) -> String {
        self.render(directory).join("\n")
    }

    fn render_children(&self, dir: &Path, root: &Path, prefix: &str, lines: &mut Vec<String>) {
        let mut items = Vec::new();
        for item in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Cannot list {} for tree: {}", dir.display(), e);
                    continue;
                }
            };

            let is_dir = entry.file_type().is_dir();
            if self.patterns.excluded_entry(entry.path(), root, is_dir) {
                continue;
            }

            items.push(TreeItem {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.into_path(),
                is_dir,
            });
        }

        // Directories first, then case-insensitive by name
        items.sort_by(|a, b| {
            (!a.is_dir, a.name.to_lowercase(), &a.name).cmp(&(
                !b.is_dir,
                b.name.to_lowercase(),
                &b.name,
            ))
        });

        let count = items.len();
        for (index, item) in items.iter().enumerate() {
            let is_last = index + 1 == count;
            let connector = if is_last { LAST_BRANCH } else { BRANCH };
            let suffix = if item.is_dir { "/" } else { "" };
            lines.push(format!("{}{}{}{}", prefix, connector, item.name, suffix));

            if item.is_dir {
                let indent = if is_last { SPACE_INDENT } else { PIPE_INDENT };
                let child_prefix = format!("{}{}", prefix, indent);
                self.render_children(&item.path, root, &child_prefix, lines);
            }
        }
    }
}
