//! Portable Text block model
//!
//! Bodies arrive from the content store as loosely-typed JSON. They are decoded
//! once, here, into [`Block`] and [`Inline`] variants so the rest of the
//! pipeline matches on variants instead of probing `_type` and optional fields.
//! Unknown attributes are carried in `extra` maps and written back unchanged.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Mark name used for strong emphasis
pub const STRONG_MARK: &str = "strong";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("body is not an array of blocks")]
    NotAnArray,

    #[error("block {index}: expected a JSON object")]
    NotAnObject { index: usize },

    #[error("block {index}: malformed `{kind}` block: {source}")]
    Malformed {
        index: usize,
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level rich-text unit
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Image(ImageBlock),
    /// Any other block type (embeds, tables, CTAs); passed through untouched
    Unknown(Value),
}

impl Block {
    pub fn from_value(index: usize, value: Value) -> Result<Self, DecodeError> {
        let Value::Object(mut map) = value else {
            return Err(DecodeError::NotAnObject { index });
        };
        let kind = map
            .get("_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let malformed = |source| DecodeError::Malformed {
            index,
            kind: kind.clone(),
            source,
        };

        match kind.as_str() {
            "block" => {
                map.remove("_type");
                serde_json::from_value(Value::Object(map))
                    .map(Block::Text)
                    .map_err(malformed)
            }
            "image" => {
                map.remove("_type");
                serde_json::from_value(Value::Object(map))
                    .map(Block::Image)
                    .map_err(malformed)
            }
            _ => Ok(Block::Unknown(Value::Object(map))),
        }
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Block::Text(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextBlock> {
        match self {
            Block::Text(block) => Some(block),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "_type")]
enum TaggedBlock<'a> {
    #[serde(rename = "block")]
    Text(&'a TextBlock),
    #[serde(rename = "image")]
    Image(&'a ImageBlock),
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Block::Text(block) => TaggedBlock::Text(block).serialize(serializer),
            Block::Image(block) => TaggedBlock::Image(block).serialize(serializer),
            Block::Unknown(value) => value.serialize(serializer),
        }
    }
}

/// Decode a document body into blocks. `null` decodes to an empty body.
pub fn decode_blocks(body: &Value) -> Result<Vec<Block>, DecodeError> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| Block::from_value(index, item.clone()))
            .collect(),
        _ => Err(DecodeError::NotAnArray),
    }
}

/// Encode blocks back into the JSON array stored in the document field
pub fn encode_blocks(blocks: &[Block]) -> Result<Value, serde_json::Error> {
    serde_json::to_value(blocks)
}

/// Paragraph, heading, quote or list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub style: BlockStyle,
    #[serde(rename = "listItem", default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default)]
    pub children: Vec<Inline>,
    /// `None` when the stored block had no `markDefs` field
    #[serde(rename = "markDefs", default, skip_serializing_if = "Option::is_none")]
    pub mark_defs: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextBlock {
    pub fn new(key: impl Into<String>, style: BlockStyle, children: Vec<Inline>) -> Self {
        Self {
            key: key.into(),
            style,
            list_item: None,
            level: None,
            children,
            mark_defs: Some(Vec::new()),
            extra: Map::new(),
        }
    }

    /// Rendered text: span texts concatenated in order
    pub fn plain_text(&self) -> String {
        self.spans().map(|span| span.text.as_str()).collect()
    }

    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.children.iter().filter_map(Inline::as_span)
    }

    pub fn is_list_item(&self) -> bool {
        self.list_item.is_some()
    }

    /// Copy of this block's metadata with different key, style and children
    pub fn derive(&self, key: String, style: BlockStyle, children: Vec<Inline>) -> Self {
        Self {
            key,
            style,
            list_item: self.list_item.clone(),
            level: self.level,
            children,
            mark_defs: self.mark_defs.clone(),
            extra: self.extra.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Semantic role of a text block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockStyle {
    #[default]
    Normal,
    /// `h1` through `h6`
    Heading(u8),
    Blockquote,
    Custom(String),
}

impl BlockStyle {
    pub fn heading(level: u8) -> Self {
        BlockStyle::Heading(level.clamp(1, 6))
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, BlockStyle::Heading(_))
    }

    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        match self {
            BlockStyle::Normal => "normal".into(),
            BlockStyle::Heading(level) => format!("h{}", level).into(),
            BlockStyle::Blockquote => "blockquote".into(),
            BlockStyle::Custom(name) => name.as_str().into(),
        }
    }
}

impl From<&str> for BlockStyle {
    fn from(style: &str) -> Self {
        match style {
            "normal" => BlockStyle::Normal,
            "blockquote" => BlockStyle::Blockquote,
            "h1" => BlockStyle::Heading(1),
            "h2" => BlockStyle::Heading(2),
            "h3" => BlockStyle::Heading(3),
            "h4" => BlockStyle::Heading(4),
            "h5" => BlockStyle::Heading(5),
            "h6" => BlockStyle::Heading(6),
            other => BlockStyle::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for BlockStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl Serialize for BlockStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let style = String::deserialize(deserializer)?;
        Ok(BlockStyle::from(style.as_str()))
    }
}

/// Child of a text block
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Span(Span),
    /// Inline object (footnote, inline image); contributes no text
    Object(Value),
}

impl Inline {
    pub fn as_span(&self) -> Option<&Span> {
        match self {
            Inline::Span(span) => Some(span),
            Inline::Object(_) => None,
        }
    }

    pub fn as_span_mut(&mut self) -> Option<&mut Span> {
        match self {
            Inline::Span(span) => Some(span),
            Inline::Object(_) => None,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "_type")]
enum TaggedInline<'a> {
    #[serde(rename = "span")]
    Span(&'a Span),
}

impl Serialize for Inline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Inline::Span(span) => TaggedInline::Span(span).serialize(serializer),
            Inline::Object(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Inline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let Value::Object(mut map) = value else {
            return Err(de::Error::custom("inline child must be a JSON object"));
        };
        if map.get("_type").and_then(Value::as_str) == Some("span") {
            map.remove("_type");
            serde_json::from_value(Value::Object(map))
                .map(Inline::Span)
                .map_err(de::Error::custom)
        } else {
            Ok(Inline::Object(Value::Object(map)))
        }
    }
}

/// Run of text with formatting marks
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Span {
    pub fn plain(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            marks: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_marks(mut self, marks: &[&str]) -> Self {
        self.marks = marks.iter().map(|mark| mark.to_string()).collect();
        self
    }

    pub fn has_mark(&self, mark: &str) -> bool {
        self.marks.iter().any(|m| m == mark)
    }
}

/// Document as returned by the content store, before the body is decoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub body: Value,
}

impl StoreDocument {
    pub fn decode(&self) -> Result<RichTextDocument, DecodeError> {
        Ok(RichTextDocument {
            id: self.id.clone(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            blocks: decode_blocks(&self.body)?,
        })
    }
}

/// A document's rich-text field, decoded
#[derive(Debug, Clone, PartialEq)]
pub struct RichTextDocument {
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub blocks: Vec<Block>,
}

impl RichTextDocument {
    /// Human-readable label for logs and reports
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}
