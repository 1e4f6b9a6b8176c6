pub mod keys;
pub mod portable_text;
pub mod types;

pub use portable_text::{
    decode_blocks, encode_blocks, Block, BlockStyle, DecodeError, ImageBlock, Inline,
    RichTextDocument, Span, StoreDocument, TextBlock, STRONG_MARK,
};
pub use types::{
    ChangeRecord, FormatAction, FormatFix, IssueCategory, MarkdownIssue, MarkdownIssueKind,
    Severity,
};
