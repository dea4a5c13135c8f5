/*!
 * Single-pass project scanning
 *
 * One walk over the project partitions every admitted file into the full
 * visible-file inventory and the signature-extraction candidates. Excluded
 * directories are dropped from the work list before they are listed, so an
 * excluded subtree costs nothing beyond its parent's listing.
 */

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::binary::BinaryDetector;
use crate::error::Result;
use crate::git::{GitIndexTracker, VcsTracker};
use crate::patterns::PatternSet;
use crate::types::{FileKind, ScanEntry};
use crate::utils::format_file_size;

/// Files larger than this are left out of the inventory
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Whether a file type is supported for signature extraction
pub fn is_signature_file(path: &Path) -> bool {
    let name = path.to_string_lossy();
    let lower = name.to_lowercase();
    name.ends_with(".py")
        || [".md", ".markdown", ".js", ".jsx", ".ts", ".tsx", ".sql"]
            .iter()
            .any(|ext| lower.ends_with(ext))
}

/// Counters collected during one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStatistics {
    /// Directories whose children were listed
    pub directories_visited: usize,
    /// Directories dropped before listing
    pub directories_pruned: usize,
    /// Files matching an exclusion pattern
    pub files_excluded: usize,
    /// Files classified as binary
    pub binary_skipped: usize,
    /// Files over [`MAX_FILE_SIZE`]
    pub oversized_skipped: usize,
    /// Entries that could not be listed or stat'ed
    pub unreadable_skipped: usize,
    /// Combined size of all visible files
    pub visible_bytes: u64,
}

/// Output of a project scan
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Every admitted text file, sorted
    pub all_files: Vec<PathBuf>,
    /// Admitted files eligible for signature extraction, sorted
    pub signature_candidates: Vec<PathBuf>,
    /// Tracked paths reported by version control (possibly empty)
    pub tracked: HashSet<PathBuf>,
    /// Scan counters
    pub statistics: ScanStatistics,
}

/// Scanner for a project tree
pub struct ProjectScanner {
    /// Exclusion rules
    patterns: PatternSet,
    /// Binary classification
    detector: BinaryDetector,
    /// Tracked-file source
    tracker: Box<dyn VcsTracker>,
    /// Only tracked files become signature candidates
    require_tracking: bool,
    /// Optional progress bar
    progress: Option<Arc<ProgressBar>>,
}

impl ProjectScanner {
    /// Create a scanner that requires git tracking for signature candidates
    pub fn new(patterns: PatternSet) -> Self {
        Self {
            patterns,
            detector: BinaryDetector::new(),
            tracker: Box::new(GitIndexTracker::new()),
            require_tracking: true,
            progress: None,
        }
    }

    /// Replace the version-control tracker
    pub fn with_tracker(mut self, tracker: Box<dyn VcsTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Whether signature candidates must be tracked by version control
    pub fn require_tracking(mut self, require: bool) -> Self {
        self.require_tracking = require;
        self
    }

    /// Report each admitted file on a progress bar
    pub fn with_progress(mut self, progress: Arc<ProgressBar>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Exclusion rules used by this scanner
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Scan `directory` and categorize its files.
    ///
    /// Fails only when the root itself is missing or cannot be listed.
    pub fn scan(&self, directory: &Path) -> Result<ScanResult> {
        crate::ensure!(
            directory.is_dir(),
            PathNotFound,
            "{}",
            directory.display()
        );
        let root = fs::canonicalize(directory)?;

        let tracked = if self.require_tracking && self.tracker.is_repo(&root) {
            self.tracker.tracked_files(&root)
        } else {
            HashSet::new()
        };

        let mut stats = ScanStatistics::default();
        let mut entries = Vec::new();
        let mut pending = vec![root.clone()];

        while let Some(dir) = pending.pop() {
            let children = match self.list_children(&dir, &mut stats) {
                Ok(children) => children,
                Err(e) if dir == root => return Err(e),
                Err(e) => {
                    warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                    stats.unreadable_skipped += 1;
                    continue;
                }
            };
            stats.directories_visited += 1;

            for child in children {
                if child.is_dir() {
                    if self.patterns.excluded_entry(&child.path, &root, true) {
                        debug!("Pruned {}", child.path.display());
                        stats.directories_pruned += 1;
                    } else {
                        pending.push(child.path);
                    }
                    continue;
                }

                match self.classify(child.path, &root, &tracked, &mut stats) {
                    Some(entry) if entry.is_binary() => stats.binary_skipped += 1,
                    Some(entry) => entries.push(entry),
                    None => {}
                }
            }
        }

        let mut result = ScanResult {
            tracked,
            ..ScanResult::default()
        };
        for entry in entries {
            if is_signature_file(&entry.path) && (!self.require_tracking || entry.tracked) {
                result.signature_candidates.push(entry.path.clone());
            }
            stats.visible_bytes += entry.size;
            result.all_files.push(entry.path);
        }

        // Plain string order, so `a-c.txt` sorts before `a/b.txt`
        result.all_files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        result
            .signature_candidates
            .sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        result.statistics = stats;
        Ok(result)
    }

    /// List the immediate children of a directory. Files come back
    /// unclassified; symlinked files count as files and symlinked directories
    /// are never followed.
    fn list_children(&self, dir: &Path, stats: &mut ScanStatistics) -> Result<Vec<ScanEntry>> {
        let mut children = Vec::new();

        for item in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = match item {
                Ok(entry) => entry,
                // Depth zero means the directory itself could not be read
                Err(e) if e.depth() == 0 || e.path() == Some(dir) => {
                    return Err(std::io::Error::from(e).into())
                }
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    stats.unreadable_skipped += 1;
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                children.push(ScanEntry::directory(entry.into_path()));
            } else if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
                children.push(ScanEntry::file(entry.into_path(), FileKind::TextFile, 0));
            }
        }

        Ok(children)
    }

    /// Apply exclusion, binary and size checks to one file. Binary files come
    /// back as [`FileKind::BinaryFile`] entries for the caller to count.
    fn classify(
        &self,
        path: PathBuf,
        root: &Path,
        tracked: &HashSet<PathBuf>,
        stats: &mut ScanStatistics,
    ) -> Option<ScanEntry> {
        if self.patterns.excluded_entry(&path, root, false) {
            stats.files_excluded += 1;
            return None;
        }

        if self.detector.is_binary(&path) {
            return Some(ScanEntry::file(path, FileKind::BinaryFile, 0));
        }

        let size = match fs::metadata(&path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                stats.unreadable_skipped += 1;
                return None;
            }
        };

        if size > MAX_FILE_SIZE {
            warn!(
                "Skipping large file ({}) - size {} exceeds {}",
                path.display(),
                format_file_size(size),
                format_file_size(MAX_FILE_SIZE)
            );
            stats.oversized_skipped += 1;
            return None;
        }

        if let Some(progress) = &self.progress {
            progress.inc(1);
            let file_name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            progress.set_message(format!("Current file: {}", file_name));
        }

        let is_tracked = tracked.contains(&path);
        Some(ScanEntry::file(path, FileKind::TextFile, size).tracked(is_tracked))
    }
}

/// Scan `directory` with the default git tracker
pub fn scan(
    directory: &Path,
    patterns: PatternSet,
    require_tracking_for_signatures: bool,
) -> Result<ScanResult> {
    ProjectScanner::new(patterns)
        .require_tracking(require_tracking_for_signatures)
        .scan(directory)
}
