//! Content fixer
//!
//! Batch tool that repairs leaked markdown and rewrites unverifiable
//! business claims in the rich-text bodies of a hosted content store.
//!
//! - [`config`]: TOML file, environment and validation
//! - [`store`]: the [`store::ContentStore`] seam with HTTP and in-memory backends
//! - [`driver`]: the sequential batch run and its summary
//! - [`report`]: console, JSON and Markdown reports
//! - [`source`]: single-page loading with an explicit cache and markdown fallback

pub mod config;
pub mod driver;
pub mod error;
pub mod report;
pub mod source;
pub mod store;

pub use config::FixerConfig;
pub use driver::{BatchDriver, Pass, Passes, RunMode, RunOptions, RunSummary};
pub use error::{ConfigError, FixerError};
pub use report::{OutputFormat, Reporter};
pub use source::{ContentCache, ContentSource, PageContent};
pub use store::{ContentStore, DocumentQuery, HttpContentStore, MemoryStore, StoreError};
