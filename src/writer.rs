/*!
 * Context file writer
 *
 * Lays out the header, the project tree, the signature section and the full
 * contents of selected files into one text artifact.
 */

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::warn;

use crate::error::Result;
use crate::signatures::Extraction;
use crate::utils::estimate_tokens;

const RULE_WIDTH: usize = 80;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything that goes into one context file
#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    /// Project root as shown in the header
    pub project_path: PathBuf,
    /// Rendered tree lines
    pub tree: Vec<String>,
    /// Signature outcome per candidate, in output order
    pub signatures: Vec<(PathBuf, Extraction)>,
    /// Files to include in full; `#`-prefixed entries are skipped
    pub files: Vec<String>,
    /// Text written before the tree
    pub prefix_file: Option<PathBuf>,
    /// Text written after the included files
    pub appendix_file: Option<PathBuf>,
}

/// Totals for a written context file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Files whose contents were included
    pub files_included: usize,
    /// Signature entries written
    pub signatures_written: usize,
    /// Bytes written to the output
    pub bytes_written: u64,
    /// Estimated LLM tokens in the output
    pub estimated_tokens: usize,
}

/// Writer that tallies what passes through it
struct TallyWriter<W: Write> {
    inner: W,
    bytes: u64,
    tokens: usize,
}

impl<W: Write> TallyWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            bytes: 0,
            tokens: 0,
        }
    }

    fn emit(&mut self, text: &str) -> Result<()> {
        self.inner.write_all(text.as_bytes())?;
        self.bytes += text.len() as u64;
        self.tokens += estimate_tokens(text);
        Ok(())
    }
}

/// Read a prefix or appendix file; a missing or unreadable one is skipped
fn read_context_file(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            warn!("Skipping context file {}: {}", path.display(), e);
            None
        }
    }
}

/// Writes project context files
pub struct ContextWriter {
    /// Output path
    output_file: PathBuf,
}

impl ContextWriter {
    /// Create a writer for `output_file`
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
        }
    }

    /// Write the context file to disk
    pub fn write(&self, context: &ProjectContext) -> Result<WriteSummary> {
        let file = File::create(&self.output_file)?;
        let mut writer = BufWriter::new(file);
        let summary = self.write_to(&mut writer, context)?;
        writer.flush()?;
        Ok(summary)
    }

    /// Write the context to any sink
    pub fn write_to<W: Write>(&self, out: W, context: &ProjectContext) -> Result<WriteSummary> {
        let mut out = TallyWriter::new(out);
        let mut summary = WriteSummary::default();

        self.write_header(&mut out, &context.project_path)?;
        if let Some(prefix) = context.prefix_file.as_deref().and_then(read_context_file) {
            out.emit(&format!("\n## Project Context\n{}\n", prefix.trim_end()))?;
        }
        out.emit(&format!("\n## Available Files\n\n{}\n\n", context.tree.join("\n")))?;

        if !context.signatures.is_empty() {
            out.emit("\n## File Signatures\nStructural outlines of tracked source files:\n\n")?;
            for (path, extraction) in &context.signatures {
                if self.write_signature(&mut out, &context.project_path, path, extraction)? {
                    summary.signatures_written += 1;
                }
            }
        }

        out.emit("\n## Included File Contents\nThe following files are included in full:\n\n")?;
        for entry in &context.files {
            if entry.trim().starts_with('#') {
                continue;
            }
            if self.write_file(&mut out, Path::new(entry))? {
                summary.files_included += 1;
            }
        }

        if let Some(appendix) = context.appendix_file.as_deref().and_then(read_context_file) {
            out.emit(&format!("\n## Additional Context\n{}\n", appendix.trim_end()))?;
        }

        summary.bytes_written = out.bytes;
        summary.estimated_tokens = out.tokens;
        Ok(summary)
    }

    fn write_header<W: Write>(&self, out: &mut TallyWriter<W>, project_path: &Path) -> Result<()> {
        out.emit(&format!(
            "# Project Context File
Generated on: {}
Project Path: {}

## How to Use This File
1. The tree structure below shows ALL available files in the project
2. Some key files are included in full after the tree
3. During conversation, you can request the contents of any file shown in the tree
",
            Local::now().format(TIMESTAMP_FORMAT),
            project_path.display()
        ))
    }

    /// Returns false when the entry produced no summary
    fn write_signature<W: Write>(
        &self,
        out: &mut TallyWriter<W>,
        root: &Path,
        path: &Path,
        extraction: &Extraction,
    ) -> Result<bool> {
        let body = match extraction {
            Extraction::Extracted(summary) => summary.clone(),
            Extraction::TimedOut => "(signature extraction timed out)".to_string(),
            Extraction::Failed(reason) => format!("(signature extraction failed: {})", reason),
            Extraction::Unsupported => return Ok(false),
        };

        let display = path.strip_prefix(root).unwrap_or(path);
        out.emit(&format!("### {}\n{}\n\n", display.display(), body))?;
        Ok(matches!(extraction, Extraction::Extracted(_)))
    }

    /// Returns false when the file was skipped
    fn write_file<W: Write>(&self, out: &mut TallyWriter<W>, path: &Path) -> Result<bool> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(_) => {
                warn!("File not found - {}", path.display());
                return Ok(false);
            }
        };

        let content = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!("Error reading file {}: {}", path.display(), e);
                return Ok(false);
            }
        };

        let modified = metadata
            .modified()
            .map(|time| DateTime::<Local>::from(time).format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let rule = "=".repeat(RULE_WIDTH);

        out.emit(&format!(
            "\n{rule}\nFile: {}\nSize: {} bytes\nLast modified: {}\n{rule}\n\n",
            path.display(),
            metadata.len(),
            modified,
        ))?;
        out.emit(&content)?;
        out.emit("\n\n")?;
        Ok(true)
    }
}
