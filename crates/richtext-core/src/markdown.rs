//! Markdown to Portable Text blocks
//!
//! Used for pages that exist only as markdown files on disk. Covers the
//! constructs the site's content uses: paragraphs, headings, block quotes,
//! nested lists, strong/em/code/strike marks and links.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use serde_json::{json, Value};
use shared_types::keys::span_key;
use shared_types::{Block, BlockStyle, Inline, Span, TextBlock};

pub fn to_blocks(markdown: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    for event in Parser::new(markdown) {
        builder.handle(event);
    }
    builder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Paragraph,
    Heading,
    Item,
    List,
    Quote,
    Mark,
    Other,
}

#[derive(Debug)]
struct Pending {
    style: BlockStyle,
    list: Option<(&'static str, u32)>,
    pieces: Vec<(String, Vec<String>)>,
    mark_defs: Vec<Value>,
}

#[derive(Debug, Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    current: Option<Pending>,
    frames: Vec<Frame>,
    marks: Vec<String>,
    lists: Vec<&'static str>,
    quote_depth: usize,
    links: usize,
}

impl BlockBuilder {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.push_text(&text, None),
            Event::Code(code) => self.push_text(&code, Some("code")),
            Event::SoftBreak => self.push_text(" ", None),
            Event::HardBreak => self.push_text("\n", None),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => {
                if self.current.is_none() {
                    self.open(self.default_style());
                }
                Frame::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.flush();
                self.open(BlockStyle::heading(heading_level(level)));
                Frame::Heading
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
                Frame::Quote
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(if start.is_some() { "number" } else { "bullet" });
                Frame::List
            }
            Tag::Item => {
                self.flush();
                self.open(self.default_style());
                Frame::Item
            }
            Tag::Strong => self.push_mark("strong"),
            Tag::Emphasis => self.push_mark("em"),
            Tag::Strikethrough => self.push_mark("strike-through"),
            Tag::Link { dest_url, .. } => {
                self.links += 1;
                let key = format!("link{}", self.links);
                if self.current.is_none() {
                    self.open(self.default_style());
                }
                if let Some(pending) = self.current.as_mut() {
                    pending.mark_defs.push(json!({
                        "_type": "link",
                        "_key": key,
                        "href": dest_url.to_string(),
                    }));
                }
                self.push_mark(&key)
            }
            _ => Frame::Other,
        };
        self.frames.push(frame);
    }

    fn end(&mut self) {
        match self.frames.pop() {
            Some(Frame::Paragraph) | Some(Frame::Heading) | Some(Frame::Item) => self.flush(),
            Some(Frame::Quote) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            Some(Frame::List) => {
                self.lists.pop();
            }
            Some(Frame::Mark) => {
                self.marks.pop();
            }
            Some(Frame::Other) | None => {}
        }
    }

    fn push_mark(&mut self, mark: &str) -> Frame {
        self.marks.push(mark.to_string());
        Frame::Mark
    }

    fn default_style(&self) -> BlockStyle {
        if self.quote_depth > 0 {
            BlockStyle::Blockquote
        } else {
            BlockStyle::Normal
        }
    }

    fn open(&mut self, style: BlockStyle) {
        let in_item = self.frames.contains(&Frame::Item) || self.frames.last() == Some(&Frame::List);
        let list = match (in_item, self.lists.last()) {
            (true, Some(kind)) => Some((*kind, self.lists.len() as u32)),
            _ => None,
        };
        self.current = Some(Pending {
            style,
            list,
            pieces: Vec::new(),
            mark_defs: Vec::new(),
        });
    }

    fn push_text(&mut self, text: &str, extra_mark: Option<&str>) {
        if self.current.is_none() {
            self.open(self.default_style());
        }
        let mut marks = self.marks.clone();
        if let Some(mark) = extra_mark {
            marks.push(mark.to_string());
        }
        let Some(pending) = self.current.as_mut() else {
            return;
        };
        match pending.pieces.last_mut() {
            Some((buf, existing)) if *existing == marks => buf.push_str(text),
            _ => pending.pieces.push((text.to_string(), marks)),
        }
    }

    fn flush(&mut self) {
        let Some(pending) = self.current.take() else {
            return;
        };
        if pending.pieces.iter().all(|(text, _)| text.trim().is_empty()) {
            return;
        }

        let key = format!("md{:04}", self.blocks.len());
        let children = pending
            .pieces
            .into_iter()
            .enumerate()
            .map(|(n, (text, marks))| {
                Inline::Span(Span {
                    marks,
                    ..Span::plain(span_key(&key, n), text)
                })
            })
            .collect();

        let mut block = TextBlock::new(key, pending.style, children);
        block.mark_defs = Some(pending.mark_defs);
        if let Some((kind, level)) = pending.list {
            block.list_item = Some(kind.to_string());
            block.level = Some(level);
        }
        self.blocks.push(Block::Text(block));
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
