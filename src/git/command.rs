/*!
 * Tracked-file listing through the `git` executable
 */

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::{has_git_dir, VcsTracker};
use crate::error::Result;
use crate::utils::normalize_path;

/// Runs `git ls-files --full-name` in the target directory
#[derive(Debug, Clone)]
pub struct GitCommandTracker {
    program: String,
}

impl Default for GitCommandTracker {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitCommandTracker {
    /// Create a tracker that runs `git` from the PATH
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn list_files(&self, path: &Path) -> Result<HashSet<PathBuf>> {
        let output = Command::new(&self.program)
            .args(["-c", "core.quotepath=off", "ls-files", "--full-name"])
            .current_dir(path)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;

        if !output.status.success() {
            crate::bail!(
                Scanner,
                "{} ls-files exited with status: {}",
                self.program,
                output.status
            );
        }

        let base = fs::canonicalize(path)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| normalize_path(&base.join(line)))
            .collect())
    }
}

impl VcsTracker for GitCommandTracker {
    fn is_repo(&self, path: &Path) -> bool {
        has_git_dir(path)
    }

    fn tracked_files(&self, path: &Path) -> HashSet<PathBuf> {
        match self.list_files(path) {
            Ok(tracked) => tracked,
            Err(e) => {
                debug!("Could not list tracked files in {}: {}", path.display(), e);
                HashSet::new()
            }
        }
    }
}
