/*!
 * Configuration handling for ctxpack
 */

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::Result;
use crate::git::{GitCommandTracker, GitIndexTracker, VcsTracker};
use crate::patterns::PatternSet;
use crate::utils::read_file_list;

/// Command-line arguments for ctxpack
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "ctxpack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Create a project context file for LLM conversations",
    long_about = "Writes a single text file containing a tree of the project's visible files, structural signatures of tracked source files, and the full contents of selected files."
)]
pub struct Args {
    /// Project directory to generate the context from
    #[clap(default_value = ".")]
    pub directory: String,

    /// Output file name
    #[clap(long, default_value = "project_context.txt")]
    pub output: String,

    /// Files to include in full
    #[clap(long, num_args = 1..)]
    pub files: Vec<String>,

    /// Text file containing a list of files to include in full
    #[clap(long)]
    pub files_list: Option<String>,

    /// Include every visible file in full
    #[clap(long)]
    pub include_all: bool,

    /// Also include entry points, manifests and READMEs found in the project
    #[clap(long)]
    pub smart_select: bool,

    /// Text file written before the project tree
    #[clap(long)]
    pub prefix_file: Option<String>,

    /// Text file written after the included files
    #[clap(long)]
    pub appendix_file: Option<String>,

    /// Disable .gitignore-based exclusions
    #[clap(long)]
    pub no_gitignore: bool,

    /// Path to the ignore file (defaults to <directory>/.gitignore)
    #[clap(long)]
    pub gitignore_path: Option<String>,

    /// File containing additional exclude patterns
    #[clap(long)]
    pub exclude_file: Option<String>,

    /// Skip the signature section
    #[clap(long)]
    pub no_signatures: bool,

    /// Extract signatures from untracked files too
    #[clap(long)]
    pub all_signatures: bool,

    /// List tracked files with the git executable instead of libgit2
    #[clap(long)]
    pub git_cli: bool,

    /// Per-file signature extraction timeout in seconds
    #[clap(long, default_value = "5")]
    pub signature_timeout: u64,

    /// Enable debug logging
    #[clap(short, long)]
    pub verbose: bool,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Project directory to process
    pub target_dir: PathBuf,

    /// Output file path
    pub output_file: PathBuf,

    /// Files to include in full, as given
    pub files: Vec<String>,

    /// Optional file listing more files to include
    pub files_list: Option<PathBuf>,

    /// Include every visible file
    pub include_all: bool,

    /// Add important files from the scan
    pub smart_select: bool,

    /// Context written before the tree
    pub prefix_file: Option<PathBuf>,

    /// Context written after the included files
    pub appendix_file: Option<PathBuf>,

    /// Whether to read the ignore file
    pub use_gitignore: bool,

    /// Explicit ignore file
    pub gitignore_path: Option<PathBuf>,

    /// Supplementary exclude-pattern file
    pub exclude_file: Option<PathBuf>,

    /// Whether to write the signature section
    pub include_signatures: bool,

    /// Only tracked files become signature candidates
    pub require_tracking: bool,

    /// Use the git executable for tracked files
    pub use_git_cli: bool,

    /// Per-file extraction budget
    pub signature_timeout: Duration,

    /// Debug logging
    pub verbose: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            target_dir: PathBuf::from(args.directory),
            output_file: PathBuf::from(args.output),
            files: args.files,
            files_list: args.files_list.map(PathBuf::from),
            include_all: args.include_all,
            smart_select: args.smart_select,
            prefix_file: args.prefix_file.map(PathBuf::from),
            appendix_file: args.appendix_file.map(PathBuf::from),
            use_gitignore: !args.no_gitignore,
            gitignore_path: args.gitignore_path.map(PathBuf::from),
            exclude_file: args.exclude_file.map(PathBuf::from),
            include_signatures: !args.no_signatures,
            require_tracking: !args.all_signatures,
            use_git_cli: args.git_cli,
            signature_timeout: Duration::from_secs(args.signature_timeout),
            verbose: args.verbose,
        }
    }

    /// Configuration for `target_dir` with every option at its default
    pub fn for_directory(target_dir: impl Into<PathBuf>) -> Self {
        Self::from_args(Args::parse_from(["ctxpack"])).with_target(target_dir)
    }

    fn with_target(mut self, target_dir: impl Into<PathBuf>) -> Self {
        self.target_dir = target_dir.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.target_dir.is_dir(),
            PathNotFound,
            "Target directory not found: {}",
            self.target_dir.display()
        );

        // Check if output file directory exists
        if let Some(parent) = self.output_file.parent() {
            crate::ensure!(
                parent.as_os_str().is_empty() || parent.exists(),
                PathNotFound,
                "Output directory not found: {}",
                parent.display()
            );
        }

        // An explicitly named pattern file must exist; the default .gitignore
        // may be absent. Missing file lists and context files are warned about
        // when read.
        let explicit = [self.gitignore_path.as_deref(), self.exclude_file.as_deref()];
        for path in explicit.into_iter().flatten() {
            crate::ensure!(
                path.exists(),
                PathNotFound,
                "File not found: {}",
                path.display()
            );
        }

        crate::ensure!(
            !self.signature_timeout.is_zero(),
            Config,
            "Signature timeout must be at least one second"
        );

        Ok(())
    }

    /// Ignore file to read, if ignore files are enabled
    pub fn ignore_file(&self) -> Option<PathBuf> {
        if !self.use_gitignore {
            return None;
        }
        Some(
            self.gitignore_path
                .clone()
                .unwrap_or_else(|| self.target_dir.join(".gitignore")),
        )
    }

    /// Build the exclusion rules from the configured pattern sources
    pub fn pattern_set(&self) -> Result<PatternSet> {
        let ignore_file = self.ignore_file();
        PatternSet::from_sources(
            &self.target_dir,
            ignore_file.as_deref(),
            self.exclude_file.as_deref(),
        )
    }

    /// Tracked-file source
    pub fn tracker(&self) -> Box<dyn VcsTracker> {
        if self.use_git_cli {
            Box::new(GitCommandTracker::new())
        } else {
            Box::new(GitIndexTracker::new())
        }
    }

    /// Files selected for inclusion: the list file when given, otherwise `files`
    pub fn selected_files(&self) -> Result<Vec<String>> {
        match &self.files_list {
            Some(list) => read_file_list(list),
            None => Ok(self.files.clone()),
        }
    }

    /// Output path for display
    pub fn output_display(&self) -> String {
        self.output_file.display().to_string()
    }
}
