//! HTTP client for the hosted content store

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use shared_types::{Block, StoreDocument};
use std::time::Duration;

use super::{patch_body, ContentStore, DocumentQuery, StoreError};
use crate::config::StoreSettings;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Content store reached over its query and mutate endpoints
pub struct HttpContentStore {
    client: Client,
    base_url: String,
    dataset: String,
    api_version: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Vec<StoreDocument>,
}

impl HttpContentStore {
    pub fn new(settings: &StoreSettings) -> Result<Self, StoreError> {
        let client = Client::builder()
            .user_agent(concat!("content-fixer/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            dataset: settings.dataset.clone(),
            api_version: settings.api_version.clone(),
            token: settings.token.clone(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v{}/data/{}/{}",
            self.base_url, self.api_version, action, self.dataset
        )
    }

    /// Map non-2xx statuses onto [`StoreError`]
    async fn check(response: Response, id: Option<&str>) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Unauthorized {
                status: status.as_u16(),
            }),
            StatusCode::CONFLICT => Err(StoreError::Conflict(id.unwrap_or_default().to_string())),
            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(StoreError::Http {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn fetch_documents(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<StoreDocument>, StoreError> {
        let groq = query.to_groq()?;
        let mut params = vec![("query".to_string(), groq)];
        params.extend(query.params());

        let mut request = self.client.get(self.endpoint("query")).query(&params);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = Self::check(request.send().await?, None).await?;
        let body: QueryResponse = response.json().await?;
        tracing::debug!(
            count = body.result.len(),
            document_type = %query.document_type,
            "fetched documents"
        );
        Ok(body.result)
    }

    async fn commit_blocks(
        &self,
        id: &str,
        field: &str,
        blocks: &[Block],
    ) -> Result<(), StoreError> {
        let token = self.token.as_deref().ok_or(StoreError::ReadOnly)?;
        let body = patch_body(id, field, blocks)?;

        let response = self
            .client
            .post(self.endpoint("mutate"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::check(response, Some(id)).await?;
        tracing::debug!(id, field, blocks = blocks.len(), "committed patch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(token: Option<&str>) -> StoreSettings {
        StoreSettings {
            url: "https://store.example.com/".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_endpoints() {
        let store = HttpContentStore::new(&settings(None)).unwrap();
        assert_eq!(
            store.endpoint("query"),
            "https://store.example.com/v2024-01-01/data/query/production"
        );
        assert_eq!(
            store.endpoint("mutate"),
            "https://store.example.com/v2024-01-01/data/mutate/production"
        );
    }

    #[tokio::test]
    async fn test_commit_without_token_is_refused() {
        let store = HttpContentStore::new(&settings(None)).unwrap();
        let err = store.commit_blocks("post-1", "body", &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::ReadOnly));
    }
}
