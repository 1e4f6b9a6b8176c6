//! Markdown artifact detection (read-only)

use crate::bold::{find_bold_runs, has_bold_run};
use crate::headers::{classify, Classification};
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{Block, MarkdownIssue, MarkdownIssueKind, TextBlock};

/// Characters of block text quoted in an issue
pub const EXCERPT_CHARS: usize = 80;

lazy_static! {
    /// Leading `#`..`####` followed by spaces or tabs
    pub(crate) static ref HEADING_HASHES: Regex = Regex::new(r"^(#{1,4})[ \t]+").unwrap();
}

/// Heading level implied by leading hashes and the byte length of the
/// hash prefix. `None` when nothing but whitespace follows the hashes.
pub fn hash_heading_level(text: &str) -> Option<(u8, usize)> {
    let caps = HEADING_HASHES.captures(text)?;
    let hashes = caps.get(1)?.as_str().len();
    let prefix = caps.get(0)?.end();
    if text[prefix..].trim().is_empty() {
        return None;
    }
    Some((hashes as u8, prefix))
}

/// Find leaked markdown in a body. Never modifies anything.
///
/// Each text block yields at most one header issue and at most one bold
/// issue, in block order.
pub fn detect(blocks: &[Block]) -> Vec<MarkdownIssue> {
    let mut issues = Vec::new();
    for (block_index, block) in blocks.iter().enumerate() {
        let Some(text_block) = block.as_text() else {
            continue;
        };
        let text = text_block.plain_text();

        if let Some((level, _)) = hash_heading_level(&text) {
            issues.push(MarkdownIssue {
                kind: MarkdownIssueKind::MarkdownHeader { level },
                block_index,
                excerpt: excerpt(&text),
                suggested_fix: format!("Restyle as h{} and remove the leading '#' characters", level),
            });
        }

        if has_bold_run(&text) {
            issues.push(MarkdownIssue {
                kind: MarkdownIssueKind::MarkdownBold,
                block_index,
                excerpt: excerpt(&text),
                suggested_fix: bold_suggestion(text_block, &text),
            });
        }
    }
    issues
}

fn bold_suggestion(block: &TextBlock, text: &str) -> String {
    match classify(block) {
        Classification::Heading {
            level,
            split_at: Some(_),
        } => format!("Split into an h{} heading and a normal paragraph", level),
        Classification::Heading {
            level,
            split_at: None,
        } => format!("Restyle as an h{} heading", level),
        Classification::Body | Classification::NotCandidate => {
            if find_bold_runs(text).iter().any(|run| run.genuine) {
                "Keep figures and warnings as strong, strip the other ** markers".to_string()
            } else {
                "Strip the ** markers".to_string()
            }
        }
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}
