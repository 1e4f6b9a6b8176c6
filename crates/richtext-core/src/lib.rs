//! Rich-text formatting normalizer
//!
//! Finds markdown that leaked into Portable Text bodies (`## Heading`,
//! `**bold**`) and repairs it:
//!
//! - [`extractor`] flattens blocks into addressable text leaves and rebuilds them
//! - [`detector`] reports leaked headings and bold runs without touching anything
//! - [`headers`] decides whether a bold-wrapped paragraph is really a heading,
//!   splitting mixed heading + body blocks
//! - [`bold`] strips incidental `**` noise and keeps genuine emphasis as `strong`
//! - [`normalizer`] ties the above together behind one report-only / apply switch
//! - [`markdown`] converts markdown files into blocks for the content-source fallback

pub mod bold;
pub mod detector;
pub mod extractor;
pub mod headers;
pub mod markdown;
pub mod normalizer;

pub use detector::detect;
pub use extractor::{apply_leaves, block_text, leaves, replace_text, Leaf};
pub use headers::{classify, Classification};
pub use normalizer::{NormalizeMode, NormalizeOutcome, Normalizer};
