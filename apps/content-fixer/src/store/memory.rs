//! In-memory content store

use async_trait::async_trait;
use shared_types::{encode_blocks, Block, StoreDocument};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use super::{validate_identifier, ContentStore, DocumentQuery, StoreError};

/// One recorded patch
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub id: String,
    pub field: String,
    pub blocks: Vec<Block>,
}

/// Holds documents of a single type. Commits are recorded and also written
/// back to the stored body, so a second run sees the fixed content.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Vec<StoreDocument>>,
    commits: Mutex<Vec<Commit>>,
    fetch_failure: Option<String>,
    commit_failures: HashSet<String>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryStore {
    pub fn new(documents: Vec<StoreDocument>) -> Self {
        Self {
            documents: Mutex::new(documents),
            ..Self::default()
        }
    }

    /// Every fetch fails with `message`
    pub fn with_fetch_failure(mut self, message: impl Into<String>) -> Self {
        self.fetch_failure = Some(message.into());
        self
    }

    /// Commits to document `id` fail with a conflict
    pub fn with_commit_failure(mut self, id: impl Into<String>) -> Self {
        self.commit_failures.insert(id.into());
        self
    }

    pub fn commits(&self) -> Vec<Commit> {
        lock(&self.commits).clone()
    }

    pub fn document(&self, id: &str) -> Option<StoreDocument> {
        lock(&self.documents).iter().find(|doc| doc.id == id).cloned()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch_documents(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<StoreDocument>, StoreError> {
        if let Some(message) = &self.fetch_failure {
            return Err(StoreError::Unavailable(message.clone()));
        }
        query.to_groq()?;

        let documents = lock(&self.documents);
        Ok(documents
            .iter()
            .filter(|doc| !doc.id.starts_with("drafts."))
            .filter(|doc| {
                query.slugs.is_empty()
                    || doc
                        .slug
                        .as_ref()
                        .is_some_and(|slug| query.slugs.contains(slug))
            })
            .cloned()
            .collect())
    }

    async fn commit_blocks(
        &self,
        id: &str,
        field: &str,
        blocks: &[Block],
    ) -> Result<(), StoreError> {
        validate_identifier(field)?;
        if self.commit_failures.contains(id) {
            return Err(StoreError::Conflict(id.to_string()));
        }

        let body = encode_blocks(blocks)?;
        {
            let mut documents = lock(&self.documents);
            let Some(document) = documents.iter_mut().find(|doc| doc.id == id) else {
                return Err(StoreError::Http {
                    status: 404,
                    body: format!("document {} not found", id),
                });
            };
            document.body = body;
        }

        lock(&self.commits).push(Commit {
            id: id.to_string(),
            field: field.to_string(),
            blocks: blocks.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, slug: &str) -> StoreDocument {
        StoreDocument {
            id: id.to_string(),
            title: Some(format!("Title {}", id)),
            slug: Some(slug.to_string()),
            body: json!([]),
        }
    }

    #[tokio::test]
    async fn test_filters_drafts_and_slugs() {
        let store = MemoryStore::new(vec![
            doc("a", "quiz-nights"),
            doc("drafts.a", "quiz-nights"),
            doc("b", "sunday-roasts"),
        ]);
        let all = store
            .fetch_documents(&DocumentQuery::new("blogPost", "body"))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let one = store
            .fetch_documents(&DocumentQuery::new("blogPost", "body").with_slugs(["sunday-roasts"]))
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, "b");
    }

    #[tokio::test]
    async fn test_commit_failure_is_a_conflict() {
        let store = MemoryStore::new(vec![doc("a", "x")]).with_commit_failure("a");
        let err = store.commit_blocks("a", "body", &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(id) if id == "a"));
        assert!(store.commits().is_empty());
    }
}
