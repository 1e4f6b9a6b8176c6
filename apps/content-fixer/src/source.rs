//! Page loading with an explicit cache
//!
//! [`ContentSource`] resolves a slug to blocks: cache first, then the store,
//! then a markdown file on disk. The cache is a plain object handed in at
//! construction; nothing is memoized behind the caller's back, and
//! [`ContentSource::refresh`] / [`ContentCache::invalidate`] are the only
//! ways entries change.

use serde::Deserialize;
use shared_types::{Block, StoreDocument};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{FixerError, Result};
use crate::store::{ContentStore, DocumentQuery};

const FRONTMATTER_FENCE: &str = "+++";

/// Where a page was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOrigin {
    Store { id: String },
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub slug: String,
    pub title: String,
    pub blocks: Vec<Block>,
    pub origin: PageOrigin,
}

impl PageContent {
    /// Store id, or the slug for file-backed pages
    pub fn id(&self) -> &str {
        match &self.origin {
            PageOrigin::Store { id } => id,
            PageOrigin::File(_) => &self.slug,
        }
    }
}

#[derive(Debug, Default)]
pub struct ContentCache {
    pages: RwLock<HashMap<String, PageContent>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, PageContent>> {
        self.pages.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, PageContent>> {
        self.pages.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, slug: &str) -> Option<PageContent> {
        self.read().get(slug).cloned()
    }

    pub fn insert(&self, page: PageContent) {
        self.write().insert(page.slug.clone(), page);
    }

    /// Drop one entry; returns whether it was cached
    pub fn invalidate(&self, slug: &str) -> bool {
        self.write().remove(slug).is_some()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    title: Option<String>,
    slug: Option<String>,
}

pub struct ContentSource {
    store: Arc<dyn ContentStore>,
    cache: Arc<ContentCache>,
    markdown_dir: Option<PathBuf>,
    query: DocumentQuery,
}

impl ContentSource {
    /// `query` supplies the document type and body field; its slugs are ignored
    pub fn new(
        store: Arc<dyn ContentStore>,
        cache: Arc<ContentCache>,
        markdown_dir: Option<PathBuf>,
        query: DocumentQuery,
    ) -> Self {
        Self {
            store,
            cache,
            markdown_dir,
            query,
        }
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub async fn page(&self, slug: &str) -> Result<PageContent> {
        validate_slug(slug)?;
        if let Some(page) = self.cache.get(slug) {
            tracing::debug!(slug, "page cache hit");
            return Ok(page);
        }
        let page = self.load(slug).await?;
        self.cache.insert(page.clone());
        Ok(page)
    }

    /// Reload `slug`, replacing any cached copy
    pub async fn refresh(&self, slug: &str) -> Result<PageContent> {
        validate_slug(slug)?;
        self.cache.invalidate(slug);
        self.page(slug).await
    }

    async fn load(&self, slug: &str) -> Result<PageContent> {
        let query = self.query.clone().with_slugs([slug]);
        let store_error = match self.store.fetch_documents(&query).await {
            Ok(documents) => match documents.into_iter().next() {
                Some(document) => return from_store(slug, document),
                None => None,
            },
            Err(err) => {
                tracing::warn!(slug, "Store lookup failed, trying markdown: {}", err);
                Some(err)
            }
        };

        if let Some(path) = self.markdown_path(slug) {
            if path.is_file() {
                return load_markdown(slug, &path).await;
            }
        }
        match store_error {
            Some(err) => Err(err.into()),
            None => Err(FixerError::PageNotFound(slug.to_string())),
        }
    }

    fn markdown_path(&self, slug: &str) -> Option<PathBuf> {
        self.markdown_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.md", slug)))
    }
}

fn from_store(slug: &str, document: StoreDocument) -> Result<PageContent> {
    let decoded = document.decode()?;
    Ok(PageContent {
        slug: slug.to_string(),
        title: decoded.label().to_string(),
        blocks: decoded.blocks,
        origin: PageOrigin::Store { id: decoded.id },
    })
}

async fn load_markdown(slug: &str, path: &Path) -> Result<PageContent> {
    let content = tokio::fs::read_to_string(path).await?;
    let (frontmatter, body) = split_frontmatter(&content).map_err(|message| {
        FixerError::Frontmatter {
            path: path.to_path_buf(),
            message,
        }
    })?;
    if let Some(declared) = frontmatter.slug.as_deref() {
        if declared != slug {
            tracing::warn!(slug, declared, path = %path.display(), "frontmatter slug differs from file name");
        }
    }
    Ok(PageContent {
        slug: slug.to_string(),
        title: frontmatter.title.unwrap_or_else(|| slug.to_string()),
        blocks: richtext_core::markdown::to_blocks(body),
        origin: PageOrigin::File(path.to_path_buf()),
    })
}

/// Split `+++` TOML frontmatter from the markdown body
fn split_frontmatter(content: &str) -> std::result::Result<(Frontmatter, &str), String> {
    let content = content.trim_start_matches('\u{feff}');
    let Some(rest) = content.strip_prefix(FRONTMATTER_FENCE) else {
        return Ok((Frontmatter::default(), content));
    };
    let rest = rest.trim_start_matches(&[' ', '\t'][..]);
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .ok_or_else(|| "opening +++ must be on its own line".to_string())?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONTMATTER_FENCE {
            let frontmatter = toml::from_str(&rest[..offset]).map_err(|e| e.to_string())?;
            return Ok((frontmatter, &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err("missing closing +++".to_string())
}

/// Slugs become file names, so only `[a-z0-9_-]` is accepted
fn validate_slug(slug: &str) -> Result<()> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(FixerError::InvalidSlug(slug.to_string()))
    }
}
