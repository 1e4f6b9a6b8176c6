//! Markdown reporter, for review before or after a fix run

use anyhow::Result;
use std::fmt::Write;

use crate::driver::{DocumentReport, RunSummary};

pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn format(summary: &RunSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "# Content Fixer Report ({})", summary.mode.as_str())?;
        writeln!(output)?;
        writeln!(output, "- Started: {}", summary.started_at.to_rfc3339())?;
        if let Some(finished) = summary.finished_at {
            writeln!(output, "- Finished: {}", finished.to_rfc3339())?;
        }
        writeln!(output, "- Documents scanned: {}", summary.documents_scanned)?;
        writeln!(output, "- Documents with findings: {}", summary.documents_with_findings)?;
        writeln!(output, "- Documents committed: {}", summary.documents_changed)?;
        writeln!(output, "- Markdown issues: {}", summary.markdown_issues)?;
        writeln!(output, "- Formatting fixes: {}", summary.format_fixes)?;
        writeln!(output)?;

        if let Some(err) = &summary.fetch_error {
            writeln!(output, "> **Fetch failed:** {}", err)?;
            writeln!(output)?;
        }

        if !summary.changes_by_category.is_empty() {
            writeln!(output, "## Claims")?;
            writeln!(output)?;
            writeln!(output, "| Category | Count |")?;
            writeln!(output, "|----------|-------|")?;
            for (category, count) in &summary.changes_by_category {
                writeln!(output, "| {} | {} |", category, count)?;
            }
            writeln!(output)?;
            writeln!(output, "| Severity | Count |")?;
            writeln!(output, "|----------|-------|")?;
            for (severity, count) in &summary.changes_by_severity {
                writeln!(output, "| {} | {} |", severity, count)?;
            }
            writeln!(output)?;
        }

        let with_findings: Vec<&DocumentReport> = summary
            .documents
            .iter()
            .filter(|doc| doc.has_findings())
            .collect();
        if !with_findings.is_empty() {
            writeln!(output, "## Documents")?;
            writeln!(output)?;
            for document in with_findings {
                Self::format_document(&mut output, document)?;
            }
        }

        if !summary.failures.is_empty() {
            writeln!(output, "## Failures")?;
            writeln!(output)?;
            writeln!(output, "| Document | Id | Error |")?;
            writeln!(output, "|----------|----|-------|")?;
            for failure in &summary.failures {
                writeln!(
                    output,
                    "| {} | `{}` | {} |",
                    cell(failure.title.as_deref().unwrap_or("")),
                    failure.id,
                    cell(&failure.error)
                )?;
            }
            writeln!(output)?;
        }

        Ok(output)
    }

    fn format_document(output: &mut String, document: &DocumentReport) -> Result<()> {
        writeln!(output, "### {}", document.label())?;
        writeln!(output)?;
        write!(output, "Id: `{}`", document.id)?;
        if let Some(slug) = &document.slug {
            write!(output, ", slug: `{}`", slug)?;
        }
        if document.committed {
            write!(output, ", committed")?;
        }
        writeln!(output)?;
        writeln!(output)?;

        if !document.markdown_issues.is_empty() || !document.format_fixes.is_empty() {
            writeln!(output, "**Formatting**")?;
            writeln!(output)?;
            for issue in &document.markdown_issues {
                writeln!(
                    output,
                    "- block {}: `{}`, {}",
                    issue.block_index,
                    issue.excerpt.replace('`', "'"),
                    issue.suggested_fix
                )?;
            }
            for fix in &document.format_fixes {
                writeln!(output, "- block {}: fixed ({})", fix.block_index, fix.action.label())?;
            }
            writeln!(output)?;
        }

        if !document.changes.is_empty() {
            writeln!(output, "| Block | Rule | Severity | Before | After |")?;
            writeln!(output, "|-------|------|----------|--------|-------|")?;
            for change in &document.changes {
                writeln!(
                    output,
                    "| {} | {} ({}) | {} | {} | {} |",
                    change.block_index,
                    change.issue_type,
                    change.rule_id,
                    change.severity,
                    cell(&change.old_text),
                    cell(&change.new_text)
                )?;
            }
            writeln!(output)?;
        }
        Ok(())
    }
}

/// Table cell text: pipes escaped, newlines flattened
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
