//! Formatting normalizer: detection plus the structural repairs

use crate::bold::{normalize_children, EmphasisPolicy};
use crate::detector::{detect, hash_heading_level};
use crate::extractor::slice_children;
use crate::headers::{body_split_point, classify, promote, Classification};
use shared_types::{Block, BlockStyle, FormatAction, FormatFix, MarkdownIssue, TextBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeMode {
    /// Report issues, leave blocks untouched
    ReportOnly,
    #[default]
    ApplyFixes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOutcome {
    pub blocks: Vec<Block>,
    /// Issues found in the input blocks
    pub issues: Vec<MarkdownIssue>,
    /// Repairs made; empty in report-only mode
    pub fixes: Vec<FormatFix>,
}

impl NormalizeOutcome {
    pub fn changed(&self) -> bool {
        !self.fixes.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    mode: NormalizeMode,
}

impl Normalizer {
    pub fn new(mode: NormalizeMode) -> Self {
        Self { mode }
    }

    pub fn analyze(&self, blocks: &[Block]) -> Vec<MarkdownIssue> {
        detect(blocks)
    }

    /// Repair every text block. Non-text blocks pass through in place; a
    /// split block is replaced by its heading and body, in that order.
    pub fn apply(&self, blocks: Vec<Block>) -> NormalizeOutcome {
        let issues = detect(&blocks);
        let mut out = Vec::with_capacity(blocks.len());
        let mut fixes = Vec::new();

        for (block_index, block) in blocks.into_iter().enumerate() {
            let Block::Text(text_block) = block else {
                out.push(block);
                continue;
            };
            let (rebuilt, action) = fix_block(text_block);
            if let Some(action) = action {
                tracing::debug!(block_index, action = action.label(), "formatting fix");
                fixes.push(FormatFix {
                    block_index,
                    action,
                });
            }
            out.extend(rebuilt.into_iter().map(Block::Text));
        }

        NormalizeOutcome {
            blocks: out,
            issues,
            fixes,
        }
    }

    /// Analyze or apply depending on the configured mode
    pub fn run(&self, blocks: Vec<Block>) -> NormalizeOutcome {
        match self.mode {
            NormalizeMode::ReportOnly => NormalizeOutcome {
                issues: detect(&blocks),
                blocks,
                fixes: Vec::new(),
            },
            NormalizeMode::ApplyFixes => self.apply(blocks),
        }
    }
}

fn fix_block(block: TextBlock) -> (Vec<TextBlock>, Option<FormatAction>) {
    if let Some(fixed) = fix_heading_hashes(&block) {
        return fixed;
    }

    match classify(&block) {
        Classification::Heading { level, split_at } => {
            let action = match split_at {
                Some(_) => FormatAction::SplitHeading { level },
                None => FormatAction::RestyledHeading { level },
            };
            (promote(&block, level, split_at), Some(action))
        }
        Classification::Body | Classification::NotCandidate => match strip_bold(&block) {
            Some((fixed, action)) => (vec![fixed], Some(action)),
            None => (vec![block], None),
        },
    }
}

/// Remove `**` delimiters, keeping genuine emphasis in body text
fn strip_bold(block: &TextBlock) -> Option<(TextBlock, FormatAction)> {
    if !block.plain_text().contains("**") {
        return None;
    }
    let policy = if block.style.is_heading() {
        EmphasisPolicy::StripAll
    } else {
        EmphasisPolicy::Detect
    };
    let outcome = normalize_children(&block.children, &block.key, policy);
    let action = FormatAction::BoldNormalized {
        stripped_runs: outcome.stripped_runs,
        strong_runs: outcome.strong_runs,
    };
    let fixed = TextBlock {
        children: outcome.children,
        ..block.clone()
    };
    Some((fixed, action))
}

/// `## Title` typed into a block. A normal paragraph is promoted to a
/// heading; list items and already-styled blocks only lose the hashes.
fn fix_heading_hashes(block: &TextBlock) -> Option<(Vec<TextBlock>, Option<FormatAction>)> {
    let text = block.plain_text();
    let (level, prefix) = hash_heading_level(&text)?;
    let promotable = block.style == BlockStyle::Normal && !block.is_list_item();

    let stripped = block.derive(
        block.key.clone(),
        block.style.clone(),
        slice_children(&block.children, prefix..text.len()),
    );
    if !promotable {
        let stripped = strip_bold(&stripped).map_or(stripped, |(fixed, _)| fixed);
        return Some((vec![stripped], Some(FormatAction::HashesStripped { level })));
    }

    let split_at = body_split_point(&stripped.plain_text());
    let action = FormatAction::HeadingHashes {
        level,
        split: split_at.is_some(),
    };
    Some((promote(&stripped, level, split_at), Some(action)))
}
