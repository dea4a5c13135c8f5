/*!
 * ctxpack - Pack a project's source tree into a single text context file
 *
 * This library walks a project once, honouring layered exclusion rules,
 * renders a tree of the visible files and writes selected file contents and
 * structural signatures into one artifact for Large Language Model
 * conversations.
 */

pub mod binary;
pub mod config;
pub mod error;
pub mod git;
pub mod patterns;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod selection;
pub mod signatures;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use binary::BinaryDetector;
pub use config::{Args, Config};
pub use error::{CtxPackError, Result};
pub use git::{GitCommandTracker, GitIndexTracker, VcsTracker};
pub use patterns::{PatternSet, DEFAULT_EXCLUSIONS};
pub use pipeline::build_context;
pub use report::{ReportFormat, Reporter, ScanReport};
pub use scanner::{scan, ProjectScanner, ScanResult, ScanStatistics};
pub use selection::is_important_file;
pub use signatures::{Extraction, SignatureExtractor, SignatureRegistry};
pub use tree::TreeRenderer;
pub use types::{FileKind, ScanEntry};
pub use utils::{estimate_tokens, format_file_size};
pub use writer::{ContextWriter, ProjectContext, WriteSummary};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
