//! Run reports
//!
//! A finished [`RunSummary`] can be printed to the console or written to the
//! report directory as JSON or Markdown. Report files carry the run mode and
//! a timestamp in their name and are never overwritten.
//!
//! ```no_run
//! use content_fixer::report::{OutputFormat, Reporter};
//! use content_fixer::driver::RunSummary;
//!
//! # fn example(summary: RunSummary) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&summary)?;
//! let path = Reporter::new(OutputFormat::Markdown).write_report(&summary, "reports")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;
mod markdown;

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::driver::RunSummary;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

/// Output format for run reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    #[value(skip)]
    Json,
    /// Pretty-printed JSON
    #[value(name = "json")]
    JsonPretty,
    /// Plain-text summary for the terminal
    #[value(skip)]
    Console,
    /// Markdown for human review
    #[default]
    Markdown,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json | OutputFormat::JsonPretty => "json",
            OutputFormat::Console => "txt",
            OutputFormat::Markdown => "md",
        }
    }
}

pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the report to stdout
    pub fn report(&self, summary: &RunSummary) -> Result<()> {
        let output = self.format_summary(summary)?;
        print!("{}", output);
        io::stdout().flush()?;
        Ok(())
    }

    pub fn format_summary(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(summary, false),
            OutputFormat::JsonPretty => JsonReporter::format(summary, true),
            OutputFormat::Console => ConsoleReporter::format(summary),
            OutputFormat::Markdown => MarkdownReporter::format(summary),
        }
    }

    /// Write the report into `dir` under a fresh timestamped name
    pub fn write_report<P: AsRef<Path>>(&self, summary: &RunSummary, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        let output = self.format_summary(summary)?;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;

        let stem = format!(
            "content-fixer-{}-{}",
            summary.mode.as_str(),
            summary.started_at.format("%Y%m%d-%H%M%S")
        );
        let extension = self.format.extension();

        // Two runs in the same second get a numeric suffix
        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => format!("{}.{}", stem, extension),
                n => format!("{}-{}.{}", stem, n, extension),
            };
            let path = dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(output.as_bytes())
                        .with_context(|| format!("Failed to write report: {}", path.display()))?;
                    return Ok(path);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("Failed to create report: {}", path.display()))
                }
            }
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::driver::{DocumentFailure, DocumentReport, Passes, RunMode, RunSummary};
    use chrono::TimeZone;
    use shared_types::{
        ChangeRecord, FormatAction, FormatFix, IssueCategory, MarkdownIssue, MarkdownIssueKind,
        Severity,
    };

    pub fn summary() -> RunSummary {
        let mut summary = RunSummary::new(RunMode::Analyze, Passes::default());
        summary.started_at = chrono::Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        summary.finished_at = Some(summary.started_at);
        summary.documents_scanned = 2;
        summary.documents_with_findings = 1;
        summary.markdown_issues = 1;
        summary.format_fixes = 1;
        summary.changes_by_category.insert(IssueCategory::ClientNumbers, 1);
        summary.changes_by_severity.insert(Severity::High, 1);
        summary.documents.push(DocumentReport {
            id: "post-1".to_string(),
            title: Some("Quiz Nights That Fill the Bar".to_string()),
            slug: Some("quiz-nights".to_string()),
            markdown_issues: vec![MarkdownIssue {
                kind: MarkdownIssueKind::MarkdownBold,
                block_index: 0,
                excerpt: "**Step 1: Pick a night**".to_string(),
                suggested_fix: "Convert to h3".to_string(),
            }],
            format_fixes: vec![FormatFix {
                block_index: 0,
                action: FormatAction::RestyledHeading { level: 3 },
            }],
            changes: vec![ChangeRecord {
                field: "body".to_string(),
                block_index: 2,
                old_text: "hundreds of pubs".to_string(),
                new_text: "many pubs".to_string(),
                reason: "Client counts cannot be verified".to_string(),
                issue_type: IssueCategory::ClientNumbers,
                severity: Severity::High,
                rule_id: "N1".to_string(),
            }],
            committed: false,
        });
        summary.failures.push(DocumentFailure {
            id: "post-2".to_string(),
            title: Some("Sunday | Roasts".to_string()),
            error: "Malformed body: block 3 is not an object".to_string(),
        });
        summary
    }
}
