/*!
 * Tests for ctxpack functionality
 */

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use git2::Repository;
use tempfile::tempdir;

use crate::config::Config;
use crate::patterns::PatternSet;
use crate::pipeline::build_context;
use crate::scanner::{scan, ProjectScanner, MAX_FILE_SIZE};
use crate::signatures::Extraction;
use crate::writer::ContextWriter;

// Helper function to create a test project structure
fn setup_test_project() -> io::Result<(tempfile::TempDir, PathBuf)> {
    let temp_dir = tempdir()?;
    let root = fs::canonicalize(temp_dir.path())?;

    fs::create_dir_all(root.join("src"))?;
    fs::create_dir_all(root.join("tests"))?;
    fs::create_dir_all(root.join("docs"))?;

    let files = [
        ("src/main.py", "print('main')\n"),
        ("src/utils.py", "def util():\n    pass\n"),
        ("tests/test_main.py", "def test_main():\n    pass\n"),
        ("docs/README.md", "# Documentation\n"),
        ("notes.txt", "plain notes\n"),
        (".gitignore", "*.log\n__pycache__/\n"),
    ];
    for (path, content) in files {
        fs::write(root.join(path), content)?;
    }

    // Binary by extension and by content
    fs::write(root.join("logo.png"), b"not really a png")?;
    fs::write(root.join("blob.dat"), [b'a', 0u8, b'b'])?;

    // Excluded by a user pattern
    fs::write(root.join("debug.log"), "trace\n")?;

    // Excluded by defaults
    fs::create_dir_all(root.join("node_modules").join("lib"))?;
    fs::write(root.join("node_modules").join("lib").join("index.js"), "x")?;

    Ok((temp_dir, root))
}

fn relative(paths: &[PathBuf], root: &Path) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
}

fn gitignore_patterns(root: &Path) -> PatternSet {
    PatternSet::from_sources(root, Some(&root.join(".gitignore")), None).unwrap()
}

// Test basic scanning functionality
#[test]
fn test_basic_scan() -> io::Result<()> {
    let (_temp_dir, root) = setup_test_project()?;

    let result = scan(&root, gitignore_patterns(&root), false)?;

    assert_eq!(
        relative(&result.all_files, &root),
        vec![
            ".gitignore",
            "docs/README.md",
            "notes.txt",
            "src/main.py",
            "src/utils.py",
            "tests/test_main.py",
        ]
    );
    assert_eq!(
        relative(&result.signature_candidates, &root),
        vec![
            "docs/README.md",
            "src/main.py",
            "src/utils.py",
            "tests/test_main.py",
        ]
    );
    assert!(result.tracked.is_empty());
    assert_eq!(result.statistics.binary_skipped, 2);
    assert_eq!(result.statistics.files_excluded, 1);
    assert_eq!(result.statistics.directories_pruned, 1);
    Ok(())
}

// Default exclusions apply with no user patterns at all
#[test]
fn test_defaults_without_user_patterns() -> io::Result<()> {
    let (_temp_dir, root) = setup_test_project()?;

    let result = scan(&root, PatternSet::defaults_only(), false)?;
    let files = relative(&result.all_files, &root);

    assert!(files.contains(&"debug.log".to_string()));
    assert!(!files.iter().any(|f| f.starts_with("node_modules/")));
    Ok(())
}

// Directory-prefix matching is segment-aware
#[test]
fn test_directory_prefix_matching() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = fs::canonicalize(temp_dir.path())?;
    fs::create_dir_all(root.join("build").join("dist"))?;
    fs::create_dir_all(root.join("build").join("temp"))?;
    fs::create_dir_all(root.join("buildtools"))?;
    fs::write(root.join("build").join("dist").join("output.js"), "x")?;
    fs::write(root.join("build").join("temp").join("cache.tmp"), "x")?;
    fs::write(root.join("buildtools").join("file.txt"), "x")?;

    let patterns = PatternSet::new(&root, vec!["build/".to_string()])?;
    assert!(patterns.excluded(&root.join("build"), &root));
    assert!(patterns.excluded(&root.join("build").join("dist").join("output.js"), &root));
    assert!(patterns.excluded(&root.join("build").join("temp").join("cache.tmp"), &root));
    assert!(!patterns.excluded(&root.join("buildtools").join("file.txt"), &root));

    let result = scan(&root, patterns, false)?;
    assert_eq!(relative(&result.all_files, &root), vec!["buildtools/file.txt"]);
    Ok(())
}

// Default directories only match from the project root
#[test]
fn test_nested_default_directory_names_stay_visible() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = fs::canonicalize(temp_dir.path())?;
    fs::create_dir_all(root.join("src").join("build"))?;
    fs::create_dir_all(root.join("build"))?;
    fs::write(root.join("src").join("build").join("helper.py"), "x = 1\n")?;
    fs::write(root.join("build").join("output.js"), "x")?;

    let result = scan(&root, PatternSet::defaults_only(), false)?;
    assert_eq!(relative(&result.all_files, &root), vec!["src/build/helper.py"]);
    assert_eq!(result.statistics.directories_pruned, 1);
    Ok(())
}

// Output lists use plain path-string order
#[test]
fn test_paths_sorted_as_strings() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = fs::canonicalize(temp_dir.path())?;
    fs::create_dir(root.join("a"))?;
    fs::write(root.join("a").join("b.txt"), "b")?;
    fs::write(root.join("a-c.txt"), "c")?;
    fs::create_dir(root.join("docs"))?;
    fs::write(root.join("docs").join("x.md"), "# X\n")?;
    fs::write(root.join("docs.md"), "# Docs\n")?;

    let result = scan(&root, PatternSet::defaults_only(), false)?;
    assert_eq!(
        relative(&result.all_files, &root),
        vec!["a-c.txt", "a/b.txt", "docs.md", "docs/x.md"]
    );
    assert_eq!(
        relative(&result.signature_candidates, &root),
        vec!["docs.md", "docs/x.md"]
    );
    Ok(())
}

// An excluded subtree of any depth is never entered
#[test]
fn test_excluded_subtree_is_pruned() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = fs::canonicalize(temp_dir.path())?;
    fs::write(root.join("app.js"), "export const app = 1;\n")?;

    let mut deep = root.join("node_modules");
    for level in 0..40 {
        deep = deep.join(format!("pkg{}", level));
        fs::create_dir_all(&deep)?;
        for i in 0..25 {
            fs::write(deep.join(format!("mod{}.js", i)), "module.exports = {};\n")?;
        }
    }

    let start = Instant::now();
    let result = scan(&root, PatternSet::defaults_only(), false)?;
    let elapsed = start.elapsed();

    assert_eq!(relative(&result.all_files, &root), vec!["app.js"]);
    assert_eq!(result.statistics.directories_visited, 1);
    assert_eq!(result.statistics.directories_pruned, 1);
    assert_eq!(result.statistics.files_excluded, 0);
    assert!(elapsed < Duration::from_secs(1), "scan took {:?}", elapsed);
    Ok(())
}

// Binary classification by extension and by content
#[test]
fn test_binary_exclusion() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = fs::canonicalize(temp_dir.path())?;

    let mut with_null = vec![b'x'; 600];
    with_null[10] = 0;
    fs::write(root.join("image.png"), vec![b'x'; 600])?;
    fs::write(root.join("payload"), &with_null)?;
    fs::write(root.join("plain"), vec![b'x'; 600])?;

    let result = scan(&root, PatternSet::defaults_only(), false)?;
    assert_eq!(relative(&result.all_files, &root), vec!["plain"]);
    assert_eq!(result.statistics.binary_skipped, 2);
    Ok(())
}

// Oversized files are skipped, not fatal
#[test]
fn test_large_file_is_skipped() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = fs::canonicalize(temp_dir.path())?;
    fs::write(root.join("small.txt"), "small\n")?;

    // Text prefix so the sniffed bytes are not null
    let mut file = File::create(root.join("huge.txt"))?;
    file.write_all(&[b'a'; 2048])?;
    file.set_len(MAX_FILE_SIZE + 1)?;
    drop(file);

    let result = scan(&root, PatternSet::defaults_only(), false)?;
    assert_eq!(relative(&result.all_files, &root), vec!["small.txt"]);
    assert_eq!(result.statistics.oversized_skipped, 1);
    Ok(())
}

// Signature candidates narrowed to tracked files
#[test]
fn test_signatures_require_tracking() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = fs::canonicalize(temp_dir.path())?;
    fs::create_dir(root.join("src"))?;
    fs::write(root.join("src").join("app.py"), "def app():\n    pass\n")?;
    fs::write(root.join("src").join("untracked.py"), "def other():\n    pass\n")?;

    let repo = Repository::init(&root).map_err(io::Error::other)?;
    let mut index = repo.index().map_err(io::Error::other)?;
    index
        .add_path(Path::new("src/app.py"))
        .map_err(io::Error::other)?;
    index.write().map_err(io::Error::other)?;

    let required = scan(&root, PatternSet::defaults_only(), true)?;
    assert_eq!(
        relative(&required.all_files, &root),
        vec!["src/app.py", "src/untracked.py"]
    );
    assert_eq!(
        relative(&required.signature_candidates, &root),
        vec!["src/app.py"]
    );
    assert!(required.tracked.contains(&root.join("src").join("app.py")));

    let relaxed = scan(&root, PatternSet::defaults_only(), false)?;
    assert_eq!(relaxed.signature_candidates.len(), 2);
    Ok(())
}

// Outside a repository, required tracking leaves no candidates
#[test]
fn test_tracking_required_outside_repository() -> io::Result<()> {
    let (_temp_dir, root) = setup_test_project()?;

    let result = ProjectScanner::new(gitignore_patterns(&root))
        .require_tracking(true)
        .scan(&root)?;

    assert!(!result.all_files.is_empty());
    assert!(result.signature_candidates.is_empty());
    assert!(result.tracked.is_empty());
    Ok(())
}

// Two scans of an unmodified tree agree exactly
#[test]
fn test_scan_is_deterministic() -> io::Result<()> {
    let (_temp_dir, root) = setup_test_project()?;

    let first = scan(&root, gitignore_patterns(&root), false)?;
    let second = scan(&root, gitignore_patterns(&root), false)?;

    assert_eq!(first.all_files, second.all_files);
    assert_eq!(first.signature_candidates, second.signature_candidates);
    assert_eq!(first.statistics, second.statistics);
    Ok(())
}

// Unreadable subdirectories are skipped without failing the scan
#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_skipped() -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir()?;
    let root = fs::canonicalize(temp_dir.path())?;
    let locked = root.join("locked");
    fs::create_dir(&locked)?;
    fs::write(locked.join("secret.txt"), "hidden")?;
    fs::write(root.join("open.txt"), "visible")?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // Privileged users can still list the directory
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let result = scan(&root, PatternSet::defaults_only(), false);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
    let result = result?;

    assert_eq!(relative(&result.all_files, &root), vec!["open.txt"]);
    assert_eq!(result.statistics.unreadable_skipped, 1);
    Ok(())
}

// End-to-end: configuration to context file
#[test]
fn test_context_file_end_to_end() -> io::Result<()> {
    let (_temp_dir, root) = setup_test_project()?;
    let output_dir = tempdir()?;
    let output_file = output_dir.path().join("context.txt");

    let mut config = Config::for_directory(&root);
    config.output_file = output_file.clone();
    config.require_tracking = false;
    config.files = vec![
        root.join("src").join("main.py").display().to_string(),
        root.join("docs").join("README.md").display().to_string(),
    ];
    config.validate()?;

    let (result, context) = build_context(&config, None)?;
    assert_eq!(result.signature_candidates.len(), 4);
    assert!(context
        .signatures
        .iter()
        .all(|(_, outcome)| matches!(outcome, Extraction::Extracted(_))));

    let summary = ContextWriter::new(&output_file).write(&context)?;
    assert_eq!(summary.files_included, 2);

    let content = fs::read_to_string(&output_file)?;
    assert!(content.contains("Project Context File"));
    assert!(content.contains(&format!("{}\n├── docs/\n", root.display())));
    assert!(content.contains("├── tests/\n"));
    assert!(content.contains("└── notes.txt"));
    assert!(content.contains("### src/utils.py\n# Python File\n\ndef util():"));
    assert!(content.contains("print('main')"));
    assert!(content.contains("# Documentation"));
    assert!(!content.contains(&format!(
        "File: {}",
        root.join("tests").join("test_main.py").display()
    )));
    assert!(!content.contains("node_modules"));
    assert!(!content.contains("debug.log"));
    Ok(())
}

// Smart selection adds entry points and manifests
#[test]
fn test_smart_select_adds_important_files() -> io::Result<()> {
    let (_temp_dir, root) = setup_test_project()?;
    fs::write(root.join("package.json"), "{}\n")?;

    let mut config = Config::for_directory(&root);
    config.include_signatures = false;
    config.smart_select = true;
    config.files = vec![root.join("src").join("main.py").display().to_string()];

    let (_, context) = build_context(&config, None)?;
    assert_eq!(
        context.files,
        vec![
            root.join("src").join("main.py").display().to_string(),
            root.join("docs").join("README.md").display().to_string(),
            root.join("package.json").display().to_string(),
        ]
    );
    Ok(())
}

// Ignore files can be switched off
#[test]
fn test_no_gitignore_keeps_user_excluded_files() -> io::Result<()> {
    let (_temp_dir, root) = setup_test_project()?;

    let mut config = Config::for_directory(&root);
    config.use_gitignore = false;
    config.include_signatures = false;

    let (result, context) = build_context(&config, None)?;
    assert!(relative(&result.all_files, &root).contains(&"debug.log".to_string()));
    assert!(context.signatures.is_empty());
    assert!(context.tree.iter().any(|line| line.ends_with("debug.log")));
    Ok(())
}
