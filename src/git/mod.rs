/*!
 * Version-control tracking used to narrow signature candidates
 */

mod command;
mod index;

pub use command::GitCommandTracker;
pub use index::GitIndexTracker;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Queries the version-control system for tracked files.
///
/// Tracking is best-effort: implementations return an empty set on any
/// failure instead of an error.
pub trait VcsTracker {
    /// Whether `path` is the top of a repository
    fn is_repo(&self, path: &Path) -> bool;

    /// Absolute, normalized paths of every tracked file under `path`
    fn tracked_files(&self, path: &Path) -> HashSet<PathBuf>;
}

/// A `.git` entry directly inside `path` marks a repository root
pub(crate) fn has_git_dir(path: &Path) -> bool {
    path.join(".git").exists()
}
