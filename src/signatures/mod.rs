/*!
 * Structural signature extraction
 *
 * Extractors turn a source file into a short outline (imports, functions,
 * classes, headings). Every extraction runs on a worker thread and is bounded
 * by a wall-clock timeout so a pathological input cannot stall the run.
 */

mod javascript;
mod outline;

pub use javascript::JavaScriptExtractor;
pub use outline::{MarkdownExtractor, PythonExtractor, SqlExtractor};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::Result;

/// Default time budget for one extraction
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Inputs larger than this are summarised instead of analysed
pub const MAX_SIGNATURE_INPUT: usize = 200_000;

/// Produces a structural summary of a source file
pub trait SignatureExtractor: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Whether this extractor understands the file
    fn supports(&self, path: &Path) -> bool;

    /// Summarise `content`, which was read from `path`
    fn extract(&self, path: &Path, content: &str) -> Result<String>;
}

/// Outcome of one bounded extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The summary text
    Extracted(String),
    /// The extractor did not finish within its budget
    TimedOut,
    /// No registered extractor handles the file
    Unsupported,
    /// Reading or extracting failed
    Failed(String),
}

/// Run `extractor` on a worker thread, waiting at most `timeout`.
///
/// A timed-out worker is abandoned; its result is discarded when it finishes.
pub fn extract_with_timeout(
    extractor: Arc<dyn SignatureExtractor>,
    path: &Path,
    content: String,
    timeout: Duration,
) -> Extraction {
    let (tx, rx) = mpsc::channel();
    let worker_path: PathBuf = path.to_path_buf();

    let spawned = thread::Builder::new()
        .name("signature-extract".to_string())
        .spawn(move || {
            let _ = tx.send(extractor.extract(&worker_path, &content));
        });
    if let Err(e) = spawned {
        return Extraction::Failed(format!("Failed to spawn extractor: {}", e));
    }

    match rx.recv_timeout(timeout) {
        Ok(Ok(summary)) => Extraction::Extracted(summary),
        Ok(Err(e)) => Extraction::Failed(e.to_string()),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(
                "Signature extraction timed out after {:?}: {}",
                timeout,
                path.display()
            );
            Extraction::TimedOut
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Extraction::Failed("Extractor stopped without a result".to_string())
        }
    }
}

/// Ordered collection of extractors sharing one timeout
pub struct SignatureRegistry {
    extractors: Vec<Arc<dyn SignatureExtractor>>,
    timeout: Duration,
}

impl Default for SignatureRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl SignatureRegistry {
    /// Registry with the built-in extractors
    pub fn new(timeout: Duration) -> Self {
        let mut registry = Self::empty(timeout);
        registry.register(Arc::new(JavaScriptExtractor::new()));
        registry.register(Arc::new(PythonExtractor::new()));
        registry.register(Arc::new(MarkdownExtractor::new()));
        registry.register(Arc::new(SqlExtractor::new()));
        registry
    }

    /// Registry without any extractors
    pub fn empty(timeout: Duration) -> Self {
        Self {
            extractors: Vec::new(),
            timeout,
        }
    }

    /// Add an extractor; earlier registrations take precedence
    pub fn register(&mut self, extractor: Arc<dyn SignatureExtractor>) {
        self.extractors.push(extractor);
    }

    /// Extract signatures from the file at `path`
    pub fn extract(&self, path: &Path) -> Extraction {
        let Some(extractor) = self.extractors.iter().find(|e| e.supports(path)) else {
            return Extraction::Unsupported;
        };

        let content = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => return Extraction::Failed(format!("Could not read file: {}", e)),
        };

        if content.len() > MAX_SIGNATURE_INPUT {
            return Extraction::Extracted(
                "File too large for detailed signature extraction".to_string(),
            );
        }

        extract_with_timeout(Arc::clone(extractor), path, content, self.timeout)
    }
}

/// Lower-cased file name, used for extension checks
pub(crate) fn lower_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_lowercase()
}
