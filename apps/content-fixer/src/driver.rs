//! Batch driver
//!
//! Walks every document of a type, one at a time: decode, normalize
//! formatting, rewrite policy claims block by block, and commit the whole body
//! back as a single patch when something changed. A failing document is
//! recorded and skipped; the run always ends with a [`RunSummary`].

use chrono::{DateTime, Utc};
use compliance_engine::{ComplianceEngine, Rewrite};
use richtext_core::bold::strip_bold_markers;
use richtext_core::{replace_text, NormalizeMode, Normalizer};
use serde::Serialize;
use shared_types::{
    Block, ChangeRecord, FormatFix, IssueCategory, MarkdownIssue, RichTextDocument, Severity,
    StoreDocument, TextBlock,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::store::{ContentStore, DocumentQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Report only, never writes
    Analyze,
    /// Apply fixes and commit changed documents
    Fix,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Analyze => "analyze",
            RunMode::Fix => "fix",
        }
    }
}

/// One of the two processing passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Pass {
    Formatting,
    Compliance,
}

/// Which passes run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Passes {
    pub formatting: bool,
    pub compliance: bool,
}

impl Default for Passes {
    fn default() -> Self {
        Self {
            formatting: true,
            compliance: true,
        }
    }
}

impl Passes {
    pub fn only(pass: Pass) -> Self {
        Self {
            formatting: pass == Pass::Formatting,
            compliance: pass == Pass::Compliance,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: RunMode,
    pub passes: Passes,
    /// Field name recorded in change logs and patched on commit
    pub body_field: String,
    /// Pause between documents
    pub delay: Duration,
}

impl RunOptions {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            passes: Passes::default(),
            body_field: "body".to_string(),
            delay: Duration::ZERO,
        }
    }
}

/// Findings for one document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub markdown_issues: Vec<MarkdownIssue>,
    pub format_fixes: Vec<FormatFix>,
    pub changes: Vec<ChangeRecord>,
    pub committed: bool,
}

impl DocumentReport {
    fn new(document: &RichTextDocument) -> Self {
        Self {
            id: document.id.clone(),
            title: document.title.clone(),
            slug: document.slug.clone(),
            markdown_issues: Vec::new(),
            format_fixes: Vec::new(),
            changes: Vec::new(),
            committed: false,
        }
    }

    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    pub fn has_findings(&self) -> bool {
        !self.markdown_issues.is_empty() || !self.format_fixes.is_empty() || !self.changes.is_empty()
    }
}

/// A document the run could not finish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub id: String,
    pub title: Option<String>,
    pub error: String,
}

/// A processed body, before any commit
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub report: DocumentReport,
    pub blocks: Vec<Block>,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub mode: RunMode,
    pub passes: Passes,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub documents_scanned: usize,
    /// Documents with at least one issue or change
    pub documents_with_findings: usize,
    /// Documents patched in the store
    pub documents_changed: usize,
    pub markdown_issues: usize,
    pub format_fixes: usize,
    pub changes_by_category: BTreeMap<IssueCategory, usize>,
    pub changes_by_severity: BTreeMap<Severity, usize>,
    pub documents: Vec<DocumentReport>,
    pub failures: Vec<DocumentFailure>,
    /// Set when the document list itself could not be fetched
    pub fetch_error: Option<String>,
}

impl RunSummary {
    pub fn new(mode: RunMode, passes: Passes) -> Self {
        Self {
            mode,
            passes,
            started_at: Utc::now(),
            finished_at: None,
            documents_scanned: 0,
            documents_with_findings: 0,
            documents_changed: 0,
            markdown_issues: 0,
            format_fixes: 0,
            changes_by_category: BTreeMap::new(),
            changes_by_severity: BTreeMap::new(),
            documents: Vec::new(),
            failures: Vec::new(),
            fetch_error: None,
        }
    }

    fn record(&mut self, report: DocumentReport) {
        self.documents_scanned += 1;
        self.markdown_issues += report.markdown_issues.len();
        self.format_fixes += report.format_fixes.len();
        for change in &report.changes {
            *self.changes_by_category.entry(change.issue_type).or_default() += 1;
            *self.changes_by_severity.entry(change.severity).or_default() += 1;
        }
        if report.has_findings() {
            self.documents_with_findings += 1;
        }
        if report.committed {
            self.documents_changed += 1;
        }
        self.documents.push(report);
    }

    fn fail(&mut self, failure: DocumentFailure) {
        self.documents_scanned += 1;
        self.failures.push(failure);
    }

    pub fn total_changes(&self) -> usize {
        self.changes_by_severity.values().sum()
    }

    pub fn count_for(&self, severity: Severity) -> usize {
        self.changes_by_severity.get(&severity).copied().unwrap_or(0)
    }

    /// 0 on success, 1 when an analyze run found HIGH-severity claims,
    /// 2 when the document list could not be fetched
    pub fn exit_code(&self) -> u8 {
        if self.fetch_error.is_some() {
            2
        } else if self.mode == RunMode::Analyze && self.count_for(Severity::High) > 0 {
            1
        } else {
            0
        }
    }
}

pub struct BatchDriver {
    store: Arc<dyn ContentStore>,
    normalizer: Normalizer,
    engine: ComplianceEngine,
    options: RunOptions,
}

impl BatchDriver {
    pub fn new(store: Arc<dyn ContentStore>, engine: ComplianceEngine, options: RunOptions) -> Self {
        let normalizer = Normalizer::new(match options.mode {
            RunMode::Analyze => NormalizeMode::ReportOnly,
            RunMode::Fix => NormalizeMode::ApplyFixes,
        });
        Self {
            store,
            normalizer,
            engine,
            options,
        }
    }

    /// Process every document matching `query`. Never fails: errors end up
    /// in the summary.
    pub async fn run(&self, query: &DocumentQuery) -> RunSummary {
        let mut summary = RunSummary::new(self.options.mode, self.options.passes);

        let documents = match self.store.fetch_documents(query).await {
            Ok(documents) => documents,
            Err(err) => {
                tracing::error!(document_type = %query.document_type, "Failed to fetch documents: {}", err);
                summary.fetch_error = Some(err.to_string());
                summary.finished_at = Some(Utc::now());
                return summary;
            }
        };

        let total = documents.len();
        tracing::info!(
            "Processing {} {} document(s) in {} mode",
            total,
            query.document_type,
            self.options.mode.as_str()
        );

        for (n, document) in documents.iter().enumerate() {
            if n > 0 && !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }
            let label = document.title.as_deref().unwrap_or(&document.id);
            tracing::info!("[{}/{}] {} ({})", n + 1, total, label, document.id);

            match self.process_document(document).await {
                Ok(report) => {
                    tracing::info!(
                        markdown_issues = report.markdown_issues.len(),
                        format_fixes = report.format_fixes.len(),
                        changes = report.changes.len(),
                        committed = report.committed,
                        "  done"
                    );
                    summary.record(report);
                }
                Err(err) => {
                    tracing::warn!(
                        id = %document.id,
                        title = label,
                        "Document failed: {}",
                        err
                    );
                    summary.fail(DocumentFailure {
                        id: document.id.clone(),
                        title: document.title.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        summary.finished_at = Some(Utc::now());
        tracing::info!(
            scanned = summary.documents_scanned,
            changed = summary.documents_changed,
            changes = summary.total_changes(),
            failures = summary.failures.len(),
            "Run complete"
        );
        summary
    }

    async fn process_document(&self, document: &StoreDocument) -> Result<DocumentReport> {
        let decoded = document.decode()?;
        let Processed {
            mut report,
            blocks,
            changed,
        } = self.process(decoded);

        if self.options.mode == RunMode::Fix && changed {
            self.store
                .commit_blocks(&report.id, &self.options.body_field, &blocks)
                .await?;
            report.committed = true;
        }
        Ok(report)
    }

    /// Run the enabled passes over one decoded document
    pub fn process(&self, document: RichTextDocument) -> Processed {
        let mut report = DocumentReport::new(&document);
        let mut blocks = document.blocks;
        let mut changed = false;

        if self.options.passes.formatting {
            let outcome = self.normalizer.run(blocks);
            changed |= outcome.changed();
            report.markdown_issues = outcome.issues;
            report.format_fixes = outcome.fixes;
            blocks = outcome.blocks;
        }

        if self.options.passes.compliance {
            for (block_index, block) in blocks.iter_mut().enumerate() {
                let Some(text_block) = block.as_text_mut() else {
                    continue;
                };
                let text = text_block.plain_text();
                let rewrite = match self.options.mode {
                    // Report what the claims read like once stray ** are gone
                    RunMode::Analyze => self.engine.rewrite(&strip_bold_markers(&text)),
                    RunMode::Fix => self.engine.rewrite(&text),
                };
                if !rewrite.changed() {
                    continue;
                }
                if self.options.mode == RunMode::Fix {
                    if !apply_rewrite(text_block, &rewrite) {
                        tracing::warn!(
                            id = %report.id,
                            block_index,
                            "Could not map claim rewrites onto the block's spans; left unchanged"
                        );
                        continue;
                    }
                    changed = true;
                }
                report
                    .changes
                    .extend(rewrite.hits.into_iter().map(|hit| ChangeRecord {
                        field: self.options.body_field.clone(),
                        block_index,
                        old_text: hit.old_text,
                        new_text: hit.new_text,
                        reason: hit.reason.to_string(),
                        issue_type: hit.category,
                        severity: hit.severity,
                        rule_id: hit.rule_id.to_string(),
                    }));
            }
        }

        Processed {
            report,
            blocks,
            changed: changed && self.options.mode == RunMode::Fix,
        }
    }
}

/// Replay a block-level rewrite onto the block's children. All or nothing:
/// the block is only replaced when the replay reproduces the rewritten text.
fn apply_rewrite(block: &mut TextBlock, rewrite: &Rewrite) -> bool {
    let mut edited = block.clone();
    for hit in &rewrite.hits {
        let range = hit.offset..hit.offset + hit.old_text.len();
        if !replace_text(&mut edited, range, &hit.new_text) {
            return false;
        }
    }
    if edited.plain_text() != rewrite.text {
        return false;
    }
    *block = edited;
    true
}
