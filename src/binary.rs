/*!
 * Binary file detection
 */

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Extensions classified as binary without opening the file
pub const BINARY_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".ico", ".svg", ".pdf", ".doc", ".docx", ".ppt",
    ".pptx", ".xls", ".xlsx", ".zip", ".tar", ".gz", ".rar", ".7z", ".bin", ".exe", ".dll", ".so",
    ".dylib", ".class", ".jar", ".pyc",
];

/// Number of leading bytes inspected for a null byte
pub const SNIFF_LEN: usize = 1024;

/// Classifies files as binary or text
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryDetector;

impl BinaryDetector {
    /// Create a new detector
    pub fn new() -> Self {
        Self
    }

    /// Whether the file name alone marks the file as binary
    pub fn has_binary_extension(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_lowercase();
        BINARY_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
    }

    /// Classify a file. Unreadable files count as binary.
    pub fn is_binary(&self, path: &Path) -> bool {
        if self.has_binary_extension(path) {
            return true;
        }

        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(_) => return true,
        };

        let mut buffer = [0u8; SNIFF_LEN];
        let mut filled = 0;
        // Short reads are legal, keep reading until the prefix is full or EOF
        while filled < SNIFF_LEN {
            match file.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => return true,
            }
        }

        buffer[..filled].contains(&0)
    }
}
