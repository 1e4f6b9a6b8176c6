//! Error types for the content fixer

use std::path::PathBuf;
use thiserror::Error;

use crate::store::StoreError;
use shared_types::DecodeError;

/// Problems found before any document is touched
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("No write access: {0} must be set to run fixes")]
    MissingCredential(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum FixerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Malformed body: {0}")]
    Decode(#[from] DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid slug: {0:?}")]
    InvalidSlug(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Invalid frontmatter in {}: {message}", path.display())]
    Frontmatter { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, FixerError>;
