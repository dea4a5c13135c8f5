/*!
 * Tracked-file listing through libgit2
 */

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

use super::{has_git_dir, VcsTracker};
use crate::error::Result;
use crate::utils::normalize_path;

/// Reads tracked paths straight from the repository index
#[derive(Debug, Clone, Copy, Default)]
pub struct GitIndexTracker;

impl GitIndexTracker {
    /// Create a new tracker
    pub fn new() -> Self {
        Self
    }

    fn read_index(&self, path: &Path) -> Result<HashSet<PathBuf>> {
        let repo = Repository::open(path)?;
        let workdir = match repo.workdir() {
            Some(dir) => dir.to_path_buf(),
            None => crate::bail!(Scanner, "Repository at {} is bare", path.display()),
        };
        let workdir = fs::canonicalize(&workdir).unwrap_or(workdir);

        let index = repo.index()?;
        let tracked = index
            .iter()
            .map(|entry| {
                let rel = String::from_utf8_lossy(&entry.path).into_owned();
                normalize_path(&workdir.join(rel))
            })
            .collect();

        Ok(tracked)
    }
}

impl VcsTracker for GitIndexTracker {
    fn is_repo(&self, path: &Path) -> bool {
        has_git_dir(path)
    }

    fn tracked_files(&self, path: &Path) -> HashSet<PathBuf> {
        match self.read_index(path) {
            Ok(tracked) => tracked,
            Err(e) => {
                debug!("Could not list tracked files in {}: {}", path.display(), e);
                HashSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_tracked_files_from_index() -> Result<()> {
        let temp_dir = tempdir()?;
        let root = fs::canonicalize(temp_dir.path())?;
        let repo = Repository::init(&root)?;

        fs::create_dir(root.join("src"))?;
        fs::write(root.join("src").join("app.py"), "def run():\n    pass\n")?;
        fs::write(root.join("src").join("untracked.py"), "x = 1\n")?;

        let mut index = repo.index()?;
        index.add_path(Path::new("src/app.py"))?;
        index.write()?;

        let tracker = GitIndexTracker::new();
        assert!(tracker.is_repo(&root));

        let tracked = tracker.tracked_files(&root);
        assert_eq!(tracked.len(), 1);
        assert!(tracked.contains(&root.join("src").join("app.py")));
        Ok(())
    }

    #[test]
    fn test_not_a_repository_degrades_to_empty() -> Result<()> {
        let temp_dir = tempdir()?;
        let tracker = GitIndexTracker::new();
        assert!(!tracker.is_repo(temp_dir.path()));
        assert!(tracker.tracked_files(temp_dir.path()).is_empty());
        Ok(())
    }
}
