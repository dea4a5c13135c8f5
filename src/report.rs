/*!
 * Reporting functionality for ctxpack
 *
 * Renders a console summary of a run using the tabled library.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::scanner::ScanStatistics;
use crate::utils::format_file_size;
use crate::writer::WriteSummary;

/// Statistics for one context run
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to scan and write
    pub duration: Duration,
    /// Number of visible files
    pub visible_files: usize,
    /// Number of signature candidates
    pub signature_candidates: usize,
    /// Number of tracked paths
    pub tracked_files: usize,
    /// Scanner counters
    pub scan: ScanStatistics,
    /// Writer totals
    pub write: WriteSummary,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    key: String,

    #[tabled(rename = "Value")]
    value: String,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => {
                format!("✅  CONTEXT FILE CREATED\n{}", self.create_summary_table(report))
            }
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ScanReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        let row = |key: &str, value: String| SummaryRow {
            key: key.to_string(),
            value,
        };

        let skipped = report.scan.binary_skipped
            + report.scan.oversized_skipped
            + report.scan.unreadable_skipped;

        let rows = vec![
            row("📂 Output File", report.output_file.clone()),
            row("⏱️ Process Time", format!("{:.4?}", report.duration)),
            row("📄 Visible Files", self.format_number(report.visible_files)),
            row(
                "🧬 Signature Candidates",
                self.format_number(report.signature_candidates),
            ),
            row("🔖 Tracked Files", self.format_number(report.tracked_files)),
            row(
                "📥 Included Files",
                self.format_number(report.write.files_included),
            ),
            row("💾 Visible Size", format_file_size(report.scan.visible_bytes)),
            row("📝 Output Size", format_file_size(report.write.bytes_written)),
            row(
                "📦 LLM Tokens",
                format!(
                    "{} tokens (estimated)",
                    self.format_number(report.write.estimated_tokens)
                ),
            ),
            row(
                "✂️ Pruned Directories",
                self.format_number(report.scan.directories_pruned),
            ),
            row("🚫 Skipped Files", self.format_number(skipped)),
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        assert_eq!(reporter.format_number(999), "999");
        assert_eq!(reporter.format_number(1_500), "1.5K");
        assert_eq!(reporter.format_number(2_000_000), "2.0M");
    }

    #[test]
    fn test_report_contains_metrics() {
        let report = ScanReport {
            output_file: "project_context.txt".to_string(),
            visible_files: 12,
            signature_candidates: 4,
            write: WriteSummary {
                files_included: 2,
                estimated_tokens: 1_200,
                ..WriteSummary::default()
            },
            ..ScanReport::default()
        };

        let text = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);
        assert!(text.starts_with("✅  CONTEXT FILE CREATED"));
        assert!(text.contains("project_context.txt"));
        assert!(text.contains("Signature Candidates"));
        assert!(text.contains("1.2K tokens (estimated)"));
    }
}
