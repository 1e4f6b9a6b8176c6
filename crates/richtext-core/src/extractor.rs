//! Block extraction
//!
//! A text block's rendered text is the concatenation of its span texts; inline
//! objects sit at a byte offset in that text but contribute nothing to it.
//! Everything downstream works on that flat text and maps edits back onto the
//! children through the helpers here.

use shared_types::{Block, Inline, TextBlock};
use std::ops::Range;

/// One span's text, addressed by block and child position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub block_index: usize,
    pub span_index: usize,
    pub text: String,
}

/// Every span text in the body, in document order
pub fn leaves(blocks: &[Block]) -> Vec<Leaf> {
    let mut out = Vec::new();
    for (block_index, block) in blocks.iter().enumerate() {
        let Some(text_block) = block.as_text() else {
            continue;
        };
        for (span_index, child) in text_block.children.iter().enumerate() {
            if let Inline::Span(span) = child {
                out.push(Leaf {
                    block_index,
                    span_index,
                    text: span.text.clone(),
                });
            }
        }
    }
    out
}

/// Write leaf texts back onto the spans they were taken from.
///
/// Returns how many spans actually changed. Leaves that no longer point at a
/// span are ignored.
pub fn apply_leaves(blocks: &mut [Block], updated: &[Leaf]) -> usize {
    let mut changed = 0;
    for leaf in updated {
        let span = blocks
            .get_mut(leaf.block_index)
            .and_then(Block::as_text_mut)
            .and_then(|block| block.children.get_mut(leaf.span_index))
            .and_then(Inline::as_span_mut);
        if let Some(span) = span {
            if span.text != leaf.text {
                span.text = leaf.text.clone();
                changed += 1;
            }
        }
    }
    changed
}

/// Rendered text of any block; empty for non-text blocks
pub fn block_text(block: &Block) -> String {
    block.as_text().map(TextBlock::plain_text).unwrap_or_default()
}

/// Byte range each child covers in the block's rendered text.
/// Inline objects get an empty range at their position.
pub fn text_ranges(children: &[Inline]) -> Vec<Range<usize>> {
    let mut offset = 0;
    children
        .iter()
        .map(|child| {
            let len = child.as_span().map(|span| span.text.len()).unwrap_or(0);
            let range = offset..offset + len;
            offset += len;
            range
        })
        .collect()
}

/// Children restricted to `range` of the rendered text.
///
/// Spans are cut at the range edges and keep their key, marks and extra
/// attributes; spans left empty are dropped. Inline objects are kept when
/// their position lies within the range, end inclusive, so cutting at a
/// single point assigns an object to the left-hand side only.
pub fn slice_children(children: &[Inline], range: Range<usize>) -> Vec<Inline> {
    let mut out = Vec::new();
    for (child, covered) in children.iter().zip(text_ranges(children)) {
        match child {
            Inline::Object(_) => {
                if range.start <= covered.start && covered.start <= range.end {
                    out.push(child.clone());
                }
            }
            Inline::Span(span) => {
                let start = covered.start.max(range.start);
                let end = covered.end.min(range.end);
                if start >= end {
                    continue;
                }
                let local = (start - covered.start)..(end - covered.start);
                let Some(text) = span.text.get(local) else {
                    continue;
                };
                let mut piece = span.clone();
                piece.text = text.to_string();
                out.push(Inline::Span(piece));
            }
        }
    }
    out
}

/// Replace `range` of a block's rendered text with `replacement`.
///
/// The replacement takes the marks of the span the range starts in. Spans
/// the range swallows whole are dropped; the span it ends in keeps whatever
/// follows the range. Returns `false` and leaves the block alone when the
/// range does not start inside span text.
pub fn replace_text(block: &mut TextBlock, range: Range<usize>, replacement: &str) -> bool {
    let text = block.plain_text();
    if range.start > range.end || text.get(range.clone()).is_none() {
        return false;
    }
    let covered = text_ranges(&block.children);
    let Some(first) = block
        .children
        .iter()
        .zip(&covered)
        .position(|(child, span)| {
            child.as_span().is_some() && span.start <= range.start && range.start < span.end
        })
    else {
        return false;
    };

    let mut emptied = Vec::new();
    for (index, span_range) in covered.iter().enumerate().skip(first) {
        if index > first && span_range.start >= range.end {
            break;
        }
        let Some(span) = block.children[index].as_span_mut() else {
            continue;
        };
        let tail_from = range.end.clamp(span_range.start, span_range.end) - span_range.start;
        let tail = span.text[tail_from..].to_string();
        if index == first {
            span.text = format!(
                "{}{}{}",
                &span.text[..range.start - span_range.start],
                replacement,
                tail
            );
        } else {
            if tail.is_empty() {
                emptied.push(index);
            }
            span.text = tail;
        }
    }

    let mut index = 0;
    block.children.retain(|_| {
        let keep = !emptied.contains(&index);
        index += 1;
        keep
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use shared_types::{BlockStyle, Span};

    fn paragraph(key: &str, parts: &[&str]) -> Block {
        let children = parts
            .iter()
            .enumerate()
            .map(|(n, text)| Inline::Span(Span::plain(format!("{}-s{}", key, n), *text)))
            .collect();
        Block::Text(TextBlock::new(key, BlockStyle::Normal, children))
    }

    #[test]
    fn test_leaves_skip_non_text_blocks() {
        let blocks = vec![
            paragraph("a", &["one ", "two"]),
            Block::Unknown(json!({"_type": "youtube", "url": "x"})),
            paragraph("b", &["three"]),
        ];
        let found = leaves(&blocks);
        assert_eq!(found.len(), 3);
        assert_eq!(found[2].block_index, 2);
        assert_eq!(found[2].text, "three");
    }

    #[test]
    fn test_apply_leaves_counts_changes() {
        let mut blocks = vec![paragraph("a", &["one ", "two"])];
        let mut updated = leaves(&blocks);
        updated[1].text = "2".to_string();
        assert_eq!(apply_leaves(&mut blocks, &updated), 1);
        assert_eq!(block_text(&blocks[0]), "one 2");
    }

    #[test]
    fn test_slice_cuts_spans_and_keeps_marks() {
        let children = vec![
            Inline::Span(Span::plain("s0", "Heading\nBo")),
            Inline::Object(json!({"_type": "footnote"})),
            Inline::Span(Span::plain("s1", "dy text").with_marks(&["em"])),
        ];
        let head = slice_children(&children, 0..7);
        assert_eq!(head.len(), 1);
        assert_eq!(head[0].as_span().unwrap().text, "Heading");

        let body = slice_children(&children, 8..17);
        assert_eq!(body.len(), 3);
        assert_eq!(body[0].as_span().unwrap().text, "Bo");
        assert!(matches!(body[1], Inline::Object(_)));
        assert!(body[2].as_span().unwrap().has_mark("em"));
    }

    #[test]
    fn test_replace_inside_one_span() {
        let Block::Text(mut block) = paragraph("a", &["The Anchor", " increased sales"]) else {
            unreachable!()
        };
        assert!(replace_text(&mut block, 11..20, "could grow"));
        assert_eq!(block.plain_text(), "The Anchor could grow sales");
        assert_eq!(block.children.len(), 2);
        assert_eq!(block.children[0].as_span().unwrap().text, "The Anchor");
    }

    #[test]
    fn test_replace_across_spans_takes_first_marks() {
        let mut block = TextBlock::new(
            "b",
            BlockStyle::Normal,
            vec![
                Inline::Span(Span::plain("b-0", "We've helped ")),
                Inline::Span(Span::plain("b-1", "hundreds of pubs").with_marks(&["em"])),
                Inline::Span(Span::plain("b-2", " grow revenue.")),
            ],
        );
        // "helped hundreds of pubs grow" spans all three children
        let start = "We've ".len();
        let end = start + "helped hundreds of pubs grow".len();
        assert!(replace_text(&mut block, start..end, "seen pubs grow"));

        assert_eq!(block.plain_text(), "We've seen pubs grow revenue.");
        assert_eq!(block.children.len(), 2);
        let first = block.children[0].as_span().unwrap();
        assert_eq!(first.text, "We've seen pubs grow");
        assert!(!first.has_mark("em"));
        assert_eq!(block.children[1].as_span().unwrap().key, "b-2");
        assert_eq!(block.children[1].as_span().unwrap().text, " revenue.");
    }

    #[test]
    fn test_replace_rejects_bad_ranges() {
        let Block::Text(mut block) = paragraph("c", &["£20 off"]) else {
            unreachable!()
        };
        let before = block.clone();
        assert!(!replace_text(&mut block, 1..3, "x"));
        assert!(!replace_text(&mut block, 4..40, "x"));
        assert_eq!(block, before);
    }

    #[test]
    fn test_object_at_cut_point_goes_left() {
        let children = vec![
            Inline::Span(Span::plain("s0", "Title")),
            Inline::Object(json!({"_type": "anchor"})),
            Inline::Span(Span::plain("s1", "\nBody")),
        ];
        let head = slice_children(&children, 0..5);
        let body = slice_children(&children, 6..10);
        assert_eq!(head.len(), 2);
        assert_eq!(body.len(), 1);
    }
}
