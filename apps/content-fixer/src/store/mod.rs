//! Content store access
//!
//! [`ContentStore`] is the seam between the batch driver and the hosted
//! document store. [`HttpContentStore`] talks to the real API;
//! [`MemoryStore`] backs tests and dry runs.

mod http;
mod memory;

pub use http::HttpContentStore;
pub use memory::{Commit, MemoryStore};

use async_trait::async_trait;
use serde_json::{json, Value};
use shared_types::{Block, StoreDocument};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Content store rejected the credential (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("Commit conflict on document {0}")]
    Conflict(String),

    #[error("Content store returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Content store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not a valid field or type name: {0:?}")]
    InvalidField(String),

    #[error("No write credential configured")]
    ReadOnly,

    #[error("Failed to encode blocks: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Content store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Published documents matching `query`
    async fn fetch_documents(&self, query: &DocumentQuery)
        -> Result<Vec<StoreDocument>, StoreError>;

    /// Replace `field` on document `id` with `blocks`, as one patch
    async fn commit_blocks(&self, id: &str, field: &str, blocks: &[Block])
        -> Result<(), StoreError>;
}

/// Which documents a run covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    pub document_type: String,
    pub body_field: String,
    /// Empty means every document of the type
    pub slugs: Vec<String>,
}

impl DocumentQuery {
    pub fn new(document_type: impl Into<String>, body_field: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            body_field: body_field.into(),
            slugs: Vec::new(),
        }
    }

    pub fn with_slugs<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slugs = slugs.into_iter().map(Into::into).collect();
        self
    }

    /// GROQ query text. Type and slugs travel as `$type` / `$slugs`
    /// parameters; the body field has to be spliced in, so it is checked
    /// first.
    pub fn to_groq(&self) -> Result<String, StoreError> {
        let field = validate_identifier(&self.body_field)?;
        validate_identifier(&self.document_type)?;

        let slug_filter = if self.slugs.is_empty() {
            ""
        } else {
            " && slug.current in $slugs"
        };
        Ok(format!(
            r#"*[_type == $type && !(_id in path("drafts.**")){}] | order(_createdAt asc) {{ _id, title, "slug": slug.current, "body": {} }}"#,
            slug_filter, field
        ))
    }

    /// Query parameters, JSON-encoded as the query endpoint expects
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("$type".to_string(), json!(self.document_type).to_string())];
        if !self.slugs.is_empty() {
            params.push(("$slugs".to_string(), json!(self.slugs).to_string()));
        }
        params
    }
}

/// Field and type names: ASCII letters, digits and `_`, not starting with a digit
pub fn validate_identifier(name: &str) -> Result<&str, StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(name)
    } else {
        Err(StoreError::InvalidField(name.to_string()))
    }
}

/// Mutation body replacing one field with `blocks`
pub fn patch_body(id: &str, field: &str, blocks: &[Block]) -> Result<Value, StoreError> {
    let field = validate_identifier(field)?;
    let mut set = serde_json::Map::new();
    set.insert(field.to_string(), shared_types::encode_blocks(blocks)?);
    Ok(json!({
        "mutations": [
            { "patch": { "id": id, "set": Value::Object(set) } }
        ]
    }))
}
