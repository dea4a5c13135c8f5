/*!
 * Core types shared by the scanner and its consumers
 */

use std::path::PathBuf;

/// Represents different kinds of filesystem entries seen during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Directory containing other entries
    Directory,
    /// Text file with readable content
    TextFile,
    /// Binary or unreadable file
    BinaryFile,
}

/// A path discovered during traversal. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// Absolute path
    pub path: PathBuf,
    /// Entry classification
    pub kind: FileKind,
    /// Size in bytes (zero for directories)
    pub size: u64,
    /// Whether the path is tracked by version control
    pub tracked: bool,
}

impl ScanEntry {
    /// A directory entry
    pub fn directory(path: PathBuf) -> Self {
        Self {
            path,
            kind: FileKind::Directory,
            size: 0,
            tracked: false,
        }
    }

    /// A file entry of the given kind
    pub fn file(path: PathBuf, kind: FileKind, size: u64) -> Self {
        Self {
            path,
            kind,
            size,
            tracked: false,
        }
    }

    /// Mark whether version control tracks this entry
    pub fn tracked(mut self, tracked: bool) -> Self {
        self.tracked = tracked;
        self
    }

    /// Whether this entry is a directory
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    /// Whether this entry was classified as binary
    pub fn is_binary(&self) -> bool {
        self.kind == FileKind::BinaryFile
    }
}
