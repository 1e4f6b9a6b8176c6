//! Console reporter

use anyhow::Result;
use std::fmt::Write;

use crate::driver::{DocumentReport, RunSummary};

const RULE: &str = "────────────────────────────────────────────────────────────────";

pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn format(summary: &RunSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                   CONTENT FIXER SUMMARY                      ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Mode:       {}", summary.mode.as_str())?;
        writeln!(output, "Started:    {}", summary.started_at.to_rfc3339())?;
        writeln!(output, "Scanned:    {}", summary.documents_scanned)?;
        writeln!(output, "Findings:   {}", summary.documents_with_findings)?;
        writeln!(output, "Committed:  {}", summary.documents_changed)?;
        writeln!(output, "Markdown:   {} issue(s), {} fix(es)", summary.markdown_issues, summary.format_fixes)?;
        writeln!(output)?;

        if !summary.changes_by_category.is_empty() {
            writeln!(output, "Claims by category:")?;
            for (category, count) in &summary.changes_by_category {
                writeln!(output, "  {:<20} {}", category.to_string(), count)?;
            }
            writeln!(output, "Claims by severity:")?;
            for (severity, count) in &summary.changes_by_severity {
                writeln!(output, "  {:<20} {}", severity.to_string(), count)?;
            }
            writeln!(output)?;
        }

        for document in summary.documents.iter().filter(|doc| doc.has_findings()) {
            Self::format_document_into(&mut output, document)?;
        }

        writeln!(output, "{}", RULE)?;
        if let Some(err) = &summary.fetch_error {
            writeln!(output, "✗ Fetch failed: {}", err)?;
        }
        if !summary.failures.is_empty() {
            writeln!(output, "Failures:")?;
            for failure in &summary.failures {
                let title = failure.title.as_deref().unwrap_or("(untitled)");
                writeln!(output, "  • {} ({}): {}", title, failure.id, failure.error)?;
            }
        }
        let status = match summary.exit_code() {
            0 => "✓ OK",
            1 => "✗ HIGH-severity claims found",
            _ => "✗ FAILED",
        };
        writeln!(output, "Status: {}", status)?;
        writeln!(output)?;

        Ok(output)
    }

    /// Findings for a single document, as shown by `preview`
    pub fn format_document(document: &DocumentReport) -> Result<String> {
        let mut output = String::new();
        Self::format_document_into(&mut output, document)?;
        Ok(output)
    }

    fn format_document_into(output: &mut String, document: &DocumentReport) -> Result<()> {
        writeln!(output, "{}", RULE)?;
        writeln!(output, "{} ({})", document.label(), document.id)?;
        writeln!(output, "{}", RULE)?;

        for issue in &document.markdown_issues {
            writeln!(
                output,
                "  [markdown] block {}: {:?} -> {}",
                issue.block_index, issue.excerpt, issue.suggested_fix
            )?;
        }
        for fix in &document.format_fixes {
            writeln!(output, "  [fixed]    block {}: {}", fix.block_index, fix.action.label())?;
        }
        for change in &document.changes {
            writeln!(
                output,
                "  [{}] block {}: {:?} -> {:?} ({}, {})",
                change.severity, change.block_index, change.old_text, change.new_text,
                change.issue_type, change.rule_id
            )?;
        }
        if !document.has_findings() {
            writeln!(output, "  No issues")?;
        }
        if document.committed {
            writeln!(output, "  ✓ committed")?;
        }
        writeln!(output)?;
        Ok(())
    }
}
