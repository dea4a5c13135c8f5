/*!
 * Assembles a project context from configuration
 */

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::scanner::{ProjectScanner, ScanResult};
use crate::selection::select_important;
use crate::signatures::SignatureRegistry;
use crate::tree::TreeRenderer;
use crate::writer::ProjectContext;

/// Scan the configured project and gather everything the writer needs
pub fn build_context(
    config: &Config,
    progress: Option<Arc<ProgressBar>>,
) -> Result<(ScanResult, ProjectContext)> {
    let patterns = config.pattern_set()?;
    debug!("Loaded {} user patterns", patterns.user_patterns().len());

    let mut scanner = ProjectScanner::new(patterns)
        .with_tracker(config.tracker())
        .require_tracking(config.require_tracking);
    if let Some(progress) = progress {
        scanner = scanner.with_progress(progress);
    }

    let scan = scanner.scan(&config.target_dir)?;
    info!(
        "Found {} visible files, {} signature candidates",
        scan.all_files.len(),
        scan.signature_candidates.len()
    );

    let project_path = fs::canonicalize(&config.target_dir)?;
    let tree = TreeRenderer::new(scanner.patterns()).render(&project_path);

    let signatures = if config.include_signatures {
        let registry = SignatureRegistry::new(config.signature_timeout);
        scan.signature_candidates
            .iter()
            .map(|path| (path.clone(), registry.extract(path)))
            .collect()
    } else {
        Vec::new()
    };

    let mut files = config.selected_files()?;
    let extra: Vec<&PathBuf> = if config.include_all {
        scan.all_files.iter().collect()
    } else if config.smart_select {
        select_important(&scan.all_files)
    } else {
        Vec::new()
    };
    if !extra.is_empty() {
        // A previous run's output may sit inside the project
        let output = fs::canonicalize(&config.output_file).ok();
        for path in extra {
            let display = path.display().to_string();
            if output.as_ref() != Some(path) && !files.contains(&display) {
                files.push(display);
            }
        }
        debug!("{} files selected for inclusion", files.len());
    }

    let context = ProjectContext {
        project_path,
        tree,
        signatures,
        files,
        prefix_file: config.prefix_file.clone(),
        appendix_file: config.appendix_file.clone(),
    };
    Ok((scan, context))
}
