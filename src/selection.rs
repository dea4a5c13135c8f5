/*!
 * Smart selection of files worth including in full
 */

use std::path::{Path, PathBuf};

/// File names that usually explain a project: entry points, manifests and
/// top-level documentation. Compared case-insensitively.
const IMPORTANT_FILE_NAMES: &[&str] = &[
    // Documentation
    "readme",
    "readme.md",
    "readme.rst",
    "readme.txt",
    // Python
    "main.py",
    "app.py",
    "__main__.py",
    "manage.py",
    "setup.py",
    "pyproject.toml",
    "requirements.txt",
    // JavaScript / TypeScript
    "package.json",
    "index.js",
    "index.ts",
    "main.js",
    "main.ts",
    "app.js",
    "app.ts",
    "tsconfig.json",
    // Rust / Go
    "cargo.toml",
    "main.rs",
    "lib.rs",
    "go.mod",
    "main.go",
    // Build and deployment
    "makefile",
    "dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
];

/// Whether `path` names an entry point, manifest or README
pub fn is_important_file(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_lowercase();
    IMPORTANT_FILE_NAMES.contains(&name.as_str())
}

/// Important files among `files`, in their given order
pub fn select_important(files: &[PathBuf]) -> Vec<&PathBuf> {
    files.iter().filter(|path| is_important_file(path)).collect()
}
