//! Article discovery and retrieval.
//!
//! Like every news source, retrieval runs in two phases:
//!
//! 1. **Searching**: find article references for a company ([`NewsSearch`])
//! 2. **Fetching**: download each page and extract its text ([`PageExtractor`])
//!
//! | Phase | Trait | Implementation | Failure scope |
//! |-------|-------|----------------|---------------|
//! | Search | [`NewsSearch`] | [`newsapi::NewsApiClient`] | whole request |
//! | Fetch | [`PageExtractor`] | [`extract::HtmlExtractor`] | one article |

pub mod extract;
pub mod newsapi;

use crate::error::{ArticleError, PipelineError};
use crate::models::{ArticleFailure, ArticleReference, ExtractedArticle};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

/// Finds candidate articles about a company.
pub trait NewsSearch {
    async fn search(&self, company: &str) -> Result<Vec<ArticleReference>, PipelineError>;
}

/// Downloads one article and extracts its title and body text.
pub trait PageExtractor {
    async fn extract(&self, reference: &ArticleReference) -> Result<ExtractedArticle, ArticleError>;
}

/// Fetch all referenced articles concurrently.
///
/// Failed fetches are logged and reported back without failing the batch.
/// Successful articles keep the order of `references`.
#[instrument(level = "info", skip_all, fields(count = references.len()))]
pub async fn fetch_articles<E: PageExtractor>(
    extractor: &E,
    references: &[ArticleReference],
    concurrency: usize,
) -> (Vec<ExtractedArticle>, Vec<ArticleFailure>) {
    let results: Vec<(&ArticleReference, Result<ExtractedArticle, ArticleError>)> =
        stream::iter(references)
            .map(|reference| async move { (reference, extractor.extract(reference).await) })
            .buffered(concurrency.max(1))
            .collect()
            .await;

    let mut articles = Vec::new();
    let mut failures = Vec::new();
    for (reference, result) in results {
        match result {
            Ok(article) => {
                debug!(url = %reference.url, bytes = article.text.len(), "Fetched article");
                articles.push(article);
            }
            Err(e) => {
                warn!(url = %reference.url, error = %e, "Article fetch failed; skipping");
                failures.push(ArticleFailure {
                    url: reference.url.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        fetched = articles.len(),
        failed = failures.len(),
        "Fetched article contents"
    );
    (articles, failures)
}
