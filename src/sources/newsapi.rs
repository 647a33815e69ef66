//! NewsAPI search client.
//!
//! Queries the [NewsAPI](https://newsapi.org) `v2/everything` endpoint for
//! articles mentioning a company. The endpoint authenticates with an API key
//! (sent as the `X-Api-Key` header) and returns at most `pageSize` hits.
//!
//! Hits without a URL and hits NewsAPI has redacted (title `[Removed]`) are
//! discarded; duplicate URLs are collapsed.

use super::NewsSearch;
use crate::error::PipelineError;
use crate::models::ArticleReference;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org/v2/everything";

/// NewsAPI caps `pageSize` at 100.
const MAX_PAGE_SIZE: usize = 100;

const REMOVED_MARKER: &str = "[Removed]";

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    max_articles: usize,
}

impl NewsApiClient {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        max_articles: usize,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            max_articles: max_articles.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

impl NewsSearch for NewsApiClient {
    #[instrument(level = "info", skip(self), fields(max_articles = self.max_articles))]
    async fn search(&self, company: &str) -> Result<Vec<ArticleReference>, PipelineError> {
        if self.api_key.trim().is_empty() {
            return Err(PipelineError::Fetch("NEWS_API_KEY is not set".into()));
        }

        let page_size = self.max_articles.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .header("X-Api-Key", &self.api_key)
            .query(&[("q", company), ("pageSize", page_size.as_str())])
            .send()
            .await
            .map_err(|e| PipelineError::Fetch(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PipelineError::Fetch(e.to_string()))?;
        debug!(status = status.as_u16(), body = %truncate_for_log(&body, 300), "NewsAPI response");

        if !status.is_success() {
            warn!(status = status.as_u16(), "NewsAPI returned non-success status");
            let detail = serde_json::from_str::<NewsApiResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| truncate_for_log(&body, 200));
            return Err(PipelineError::Fetch(format!(
                "HTTP {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let references = parse_references(&body, self.max_articles)?;
        info!(count = references.len(), %company, "Indexed article references");
        Ok(references)
    }
}

/// Turn a NewsAPI response body into at most `limit` usable references.
pub fn parse_references(body: &str, limit: usize) -> Result<Vec<ArticleReference>, PipelineError> {
    let parsed: NewsApiResponse = serde_json::from_str(body)
        .map_err(|e| PipelineError::Fetch(format!("undecodable NewsAPI response: {e}")))?;

    if parsed.status != "ok" {
        return Err(PipelineError::Fetch(format!(
            "NewsAPI error {}: {}",
            parsed.code.as_deref().unwrap_or("unknown"),
            parsed.message.as_deref().unwrap_or("no message")
        )));
    }

    Ok(parsed
        .articles
        .into_iter()
        .filter(|a| a.title.as_deref() != Some(REMOVED_MARKER))
        .filter_map(|a| {
            let url = a.url.filter(|u| !u.trim().is_empty())?;
            Some(ArticleReference {
                url,
                title: a.title,
                description: a.description.filter(|d| !d.trim().is_empty()),
            })
        })
        .unique_by(|r| r.url.clone())
        .take(limit)
        .collect())
}
