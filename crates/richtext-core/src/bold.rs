//! Bold-marker normalization
//!
//! Copy pasted from chat tools arrives with literal `**` around anything the
//! writer wanted to stand out. Most of it is noise. A run is kept as real
//! emphasis only when it carries a figure (percentage, currency amount) or a
//! warning word; then it becomes a `strong` mark and everything else is
//! stripped. Edits are mapped back onto the original spans so marks, keys and
//! inline objects survive.

use crate::extractor::text_ranges;
use lazy_static::lazy_static;
use regex::Regex;
use shared_types::keys::span_key;
use shared_types::{Inline, Span, STRONG_MARK};
use std::ops::Range;

lazy_static! {
    /// `**...**` on a single line, shortest match
    static ref BOLD_RUN: Regex = Regex::new(r"\*\*([^\n]+?)\*\*").unwrap();

    static ref PERCENTAGE: Regex = Regex::new(r"\d+(?:\.\d+)?\s?%").unwrap();

    static ref CURRENCY: Regex = Regex::new(r"[£$€]\s?\d").unwrap();

    static ref WARNING_WORDS: Regex = Regex::new(
        r"\b(?:DO NOT|DON'T|DON’T|NEVER|ALWAYS|IMPORTANT|WARNING|MUST|CRITICAL|NOTE)\b"
    )
    .unwrap();
}

/// A `**...**` run in a block's rendered text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoldRun {
    /// Delimiters included
    pub outer: Range<usize>,
    /// Delimiters excluded
    pub inner: Range<usize>,
    pub genuine: bool,
}

/// What to do with runs that qualify as genuine emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisPolicy {
    /// Genuine runs become `strong`, the rest are stripped
    Detect,
    /// Strip every run and drop existing `strong` marks (headings)
    StripAll,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoldOutcome {
    pub children: Vec<Inline>,
    pub stripped_runs: usize,
    pub strong_runs: usize,
}

pub fn find_bold_runs(text: &str) -> Vec<BoldRun> {
    BOLD_RUN
        .captures_iter(text)
        .filter_map(|caps| {
            let outer = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(BoldRun {
                outer: outer.range(),
                inner: inner.range(),
                genuine: is_genuine_emphasis(inner.as_str()),
            })
        })
        .collect()
}

pub fn has_bold_run(text: &str) -> bool {
    BOLD_RUN.is_match(text)
}

/// Whether a run's inner text deserves to stay emphasized
pub fn is_genuine_emphasis(inner: &str) -> bool {
    PERCENTAGE.is_match(inner) || CURRENCY.is_match(inner) || WARNING_WORDS.is_match(inner)
}

/// Bytes of `text` that normalization removes: the delimiters of every run,
/// then any remaining `**` pairs (unbalanced or multi-line markers).
fn deletion_mask(text: &str, runs: &[BoldRun]) -> Vec<bool> {
    let bytes = text.as_bytes();
    let mut deleted = vec![false; bytes.len()];
    for run in runs {
        for i in (run.outer.start..run.inner.start).chain(run.inner.end..run.outer.end) {
            deleted[i] = true;
        }
    }

    let mut pending: Option<usize> = None;
    for (i, &byte) in bytes.iter().enumerate() {
        if deleted[i] {
            continue;
        }
        if byte == b'*' {
            match pending.take() {
                Some(first) => {
                    deleted[first] = true;
                    deleted[i] = true;
                }
                None => pending = Some(i),
            }
        } else {
            pending = None;
        }
    }
    deleted
}

/// Plain-text view of normalization: the text with every `**` removed
pub fn strip_bold_markers(text: &str) -> String {
    let runs = find_bold_runs(text);
    let deleted = deletion_mask(text, &runs);
    text.char_indices()
        .filter(|(i, _)| !deleted[*i])
        .map(|(_, ch)| ch)
        .collect()
}

/// Normalize the `**` markers across a block's children.
///
/// The first piece of a split span keeps its key; later pieces get
/// `{key}-{n}`. If nothing but markers was left the block still gets one
/// empty span keyed from `block_key`.
pub fn normalize_children(
    children: &[Inline],
    block_key: &str,
    policy: EmphasisPolicy,
) -> BoldOutcome {
    let text: String = children
        .iter()
        .filter_map(Inline::as_span)
        .map(|span| span.text.as_str())
        .collect();
    let runs = find_bold_runs(&text);
    let deleted = deletion_mask(&text, &runs);

    let strong: Vec<Range<usize>> = match policy {
        EmphasisPolicy::Detect if runs.iter().any(|run| run.genuine) => runs
            .iter()
            .filter(|run| run.genuine)
            .map(|run| run.inner.clone())
            .collect(),
        _ => Vec::new(),
    };

    let mut out = Vec::with_capacity(children.len());
    for (child, covered) in children.iter().zip(text_ranges(children)) {
        let span = match child {
            Inline::Object(_) => {
                out.push(child.clone());
                continue;
            }
            Inline::Span(span) => span,
        };

        let mut segments: Vec<(bool, String)> = Vec::new();
        for (i, ch) in span.text.char_indices() {
            let at = covered.start + i;
            if deleted[at] {
                continue;
            }
            let is_strong = strong.iter().any(|range| range.contains(&at));
            match segments.last_mut() {
                Some((flag, buf)) if *flag == is_strong => buf.push(ch),
                _ => segments.push((is_strong, ch.to_string())),
            }
        }

        for (n, (is_strong, segment)) in segments.into_iter().enumerate() {
            let mut piece = span.clone();
            piece.text = segment;
            if n > 0 {
                piece.key = span_key(&span.key, n);
            }
            if policy == EmphasisPolicy::StripAll {
                piece.marks.retain(|mark| mark != STRONG_MARK);
            }
            if is_strong && !piece.has_mark(STRONG_MARK) {
                piece.marks.push(STRONG_MARK.to_string());
            }
            out.push(Inline::Span(piece));
        }
    }

    if !out.iter().any(|child| child.as_span().is_some()) {
        out.push(Inline::Span(Span::plain(span_key(block_key, 0), "")));
    }

    BoldOutcome {
        children: out,
        stripped_runs: runs.len() - strong.len(),
        strong_runs: strong.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rendered(children: &[Inline]) -> String {
        children
            .iter()
            .filter_map(Inline::as_span)
            .map(|span| span.text.as_str())
            .collect()
    }

    fn single(text: &str) -> Vec<Inline> {
        vec![Inline::Span(Span::plain("s0", text))]
    }

    #[test]
    fn test_genuine_emphasis() {
        assert!(is_genuine_emphasis("up to 40%"));
        assert!(is_genuine_emphasis("£250 a week"));
        assert!(is_genuine_emphasis("DO NOT skip this"));
        assert!(!is_genuine_emphasis("really good"));
        assert!(!is_genuine_emphasis("Note that"));
    }

    #[test]
    fn test_noise_is_stripped() {
        let outcome = normalize_children(
            &single("We think **really good** food **matters**."),
            "b",
            EmphasisPolicy::Detect,
        );
        assert_eq!(rendered(&outcome.children), "We think really good food matters.");
        assert_eq!(outcome.stripped_runs, 2);
        assert_eq!(outcome.strong_runs, 0);
        assert!(outcome
            .children
            .iter()
            .filter_map(Inline::as_span)
            .all(|span| span.marks.is_empty()));
    }

    #[test]
    fn test_genuine_run_becomes_strong() {
        let outcome = normalize_children(
            &single("Quiz nights lift takings by **up to 30%** and **feel fun**."),
            "b",
            EmphasisPolicy::Detect,
        );
        let spans: Vec<&Span> = outcome.children.iter().filter_map(Inline::as_span).collect();
        assert_eq!(rendered(&outcome.children), "Quiz nights lift takings by up to 30% and feel fun.");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].key, "s0");
        assert_eq!(spans[1].text, "up to 30%");
        assert!(spans[1].has_mark(STRONG_MARK));
        assert_eq!(spans[1].key, "s0-1");
        assert!(!spans[2].has_mark(STRONG_MARK));
        assert_eq!(outcome.strong_runs, 1);
        assert_eq!(outcome.stripped_runs, 1);
    }

    #[test]
    fn test_strip_all_drops_existing_strong() {
        let children = vec![Inline::Span(
            Span::plain("s0", "**Save £500**").with_marks(&["strong", "em"]),
        )];
        let outcome = normalize_children(&children, "b", EmphasisPolicy::StripAll);
        let span = outcome.children[0].as_span().unwrap();
        assert_eq!(span.text, "Save £500");
        assert_eq!(span.marks, vec!["em".to_string()]);
    }

    #[test]
    fn test_markers_split_across_spans() {
        let children = vec![
            Inline::Span(Span::plain("a", "Start **bo")),
            Inline::Object(json!({"_type": "footnote", "_key": "f"})),
            Inline::Span(Span::plain("b", "ld** end")),
        ];
        let outcome = normalize_children(&children, "blk", EmphasisPolicy::Detect);
        assert_eq!(rendered(&outcome.children), "Start bold end");
        assert!(matches!(outcome.children[1], Inline::Object(_)));
    }

    #[test]
    fn test_stray_markers_removed() {
        assert_eq!(strip_bold_markers("a ** b"), "a  b");
        assert_eq!(strip_bold_markers("**x** and **"), "x and ");
        assert_eq!(strip_bold_markers("line one**\n**line two"), "line one\nline two");
        assert_eq!(strip_bold_markers("a * b"), "a * b");
    }

    #[test]
    fn test_markers_only_block_keeps_a_span() {
        let outcome = normalize_children(&single("****"), "blk", EmphasisPolicy::Detect);
        assert_eq!(outcome.children.len(), 1);
        let span = outcome.children[0].as_span().unwrap();
        assert_eq!(span.text, "");
        assert_eq!(span.key, "blk-0");
    }
}
