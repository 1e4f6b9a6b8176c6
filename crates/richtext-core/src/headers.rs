//! Header reclassification
//!
//! Writers mark up headings as bold paragraphs (`**Step 1: Plan**`), sometimes
//! with the following paragraph glued on after a newline. A bold-bearing
//! normal paragraph whose first line reads like a heading is restyled, or
//! split into a heading block followed by a normal block.

use crate::bold::{normalize_children, strip_bold_markers, EmphasisPolicy};
use crate::extractor::slice_children;
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::keys::derive_key;
use shared_types::{BlockStyle, TextBlock};

/// First lines longer than this are never headings
pub const MAX_HEADING_CHARS: usize = 100;

/// Fallback heading: shorter than this, in characters
pub const FALLBACK_MAX_CHARS: usize = 80;

/// Fallback heading: at most this many words
pub const FALLBACK_MAX_WORDS: usize = 10;

/// Long unpunctuated lines above this length read as section titles
pub const SECTION_TITLE_MIN_CHARS: usize = 30;

lazy_static! {
    /// Subsection labels, checked in order
    static ref SUBSECTION_PATTERNS: Vec<Regex> = vec![
        Regex::new(
            r"^(?:Step|Week|Day|Phase|Stage|Month|Tip|Part|Option|Rule|Mistake|Reason|Idea)\s+\d+\s*:"
        )
        .unwrap(),
        Regex::new(r"^The\s+[\w'’&-]+(?:\s+[\w'’&-]+){0,3}:").unwrap(),
        Regex::new(r"^[A-Z][\w'’&-]*(?:\s+[\w'’&-]+){0,3}:(?:\s|$)").unwrap(),
        Regex::new(r"^\d{1,2}\.\s+[A-Z]").unwrap(),
    ];

    /// Section titles, checked in order
    static ref SECTION_PATTERNS: Vec<Regex> = vec![
        Regex::new(
            r"(?i)\b(?:strateg(?:y|ies)|systems?|guide|plan|framework|checklist|playbook|blueprint|secrets?|mistakes|tips|ideas|ways|lessons)\b"
        )
        .unwrap(),
        Regex::new(r"\?$").unwrap(),
        Regex::new(r"^(?:How|Why|What|When|Where|Which|Who)\b").unwrap(),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not a normal paragraph, or no `**` in it
    NotCandidate,
    /// Bold noise inside body text
    Body,
    /// Heading at `level`; `split_at` is the byte offset of the newline that
    /// ends the heading when body text follows it
    Heading { level: u8, split_at: Option<usize> },
}

/// Heading level for a block's first line (markers already removed), or
/// `None` when it reads as body text.
pub fn classify_first_line(line: &str) -> Option<u8> {
    let line = line.trim();
    let chars = line.chars().count();
    if line.is_empty() || chars > MAX_HEADING_CHARS || line.ends_with(&['.', ',', ';'][..]) {
        return None;
    }

    if SUBSECTION_PATTERNS.iter().any(|re| re.is_match(line)) {
        return Some(3);
    }
    if SECTION_PATTERNS.iter().any(|re| re.is_match(line))
        || (chars > SECTION_TITLE_MIN_CHARS && !line.contains('.'))
    {
        return Some(2);
    }

    let starts_upper = line.chars().next().map_or(false, char::is_uppercase);
    if chars < FALLBACK_MAX_CHARS
        && !line.contains(&['.', ','][..])
        && line.split_whitespace().count() <= FALLBACK_MAX_WORDS
        && starts_upper
    {
        return Some(3);
    }
    None
}

/// Decide what a block is. Only normal, non-list paragraphs containing `**`
/// are candidates; existing headings are never reclassified.
pub fn classify(block: &TextBlock) -> Classification {
    if block.style != BlockStyle::Normal || block.is_list_item() {
        return Classification::NotCandidate;
    }
    let text = block.plain_text();
    if !text.contains("**") {
        return Classification::NotCandidate;
    }

    let clean = strip_bold_markers(&text);
    let first_line = clean.split('\n').next().unwrap_or_default();
    match classify_first_line(first_line) {
        Some(level) => Classification::Heading {
            level,
            split_at: body_split_point(&text),
        },
        None => Classification::Body,
    }
}

/// Offset of the newline ending the first line, when non-blank text follows it
pub fn body_split_point(text: &str) -> Option<usize> {
    let newline = text.find('\n')?;
    let rest = strip_bold_markers(&text[newline + 1..]);
    (!rest.trim().is_empty()).then_some(newline)
}

/// Turn a block into a heading, or a heading plus a body paragraph.
///
/// A restyled block keeps its key. A split produces two blocks whose keys
/// are derived from the original, so the result is the same on every run.
/// Heading text carries no `strong` marks; the body gets the normal bold
/// treatment.
pub fn promote(block: &TextBlock, level: u8, split_at: Option<usize>) -> Vec<TextBlock> {
    let text = block.plain_text();
    let style = BlockStyle::heading(level);

    let Some(newline) = split_at else {
        let head_end = text.find('\n').unwrap_or(text.len());
        let head = slice_children(&block.children, 0..head_end);
        let children = normalize_children(&head, &block.key, EmphasisPolicy::StripAll).children;
        return vec![block.derive(block.key.clone(), style, children)];
    };

    let heading_key = derive_key(&block.key, "heading");
    let body_key = derive_key(&block.key, "body");

    let head = slice_children(&block.children, 0..newline);
    let body = slice_children(&block.children, newline + 1..text.len());

    let heading = normalize_children(&head, &heading_key, EmphasisPolicy::StripAll).children;
    let body = normalize_children(&body, &body_key, EmphasisPolicy::Detect).children;

    vec![
        block.derive(heading_key, style, heading),
        block.derive(body_key, BlockStyle::Normal, body),
    ]
}
