//! Per-article analysis: summary, sentiment, and topics.
//!
//! [`ArticleAnalyzer`] owns three collaborators, each behind a trait so the
//! engine can be chosen at startup and replaced in tests:
//!
//! | Concern | Trait | Local engine | LLM engine |
//! |---------|-------|--------------|------------|
//! | Summary | [`Summarizer`] | [`summary::LeadSummarizer`] | [`summary::LlmSummarizer`] |
//! | Sentiment | [`SentimentClassifier`] | [`sentiment::VaderClassifier`] | [`sentiment::LlmSentimentClassifier`] |
//! | Topics | [`TopicRanker`] | [`rake::RakeRanker`] | n/a |
//!
//! Collaborators are built once in `main` and borrowed for every article.

pub mod rake;
pub mod sentiment;
pub mod summary;

use crate::error::ArticleError;
use crate::models::{source_tag, ArticleAnalysis, ArticleFailure, ExtractedArticle, SentimentLabel};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

/// Produces a short summary of an article body.
pub trait Summarizer {
    async fn summarize(&self, text: &str, max_length: usize) -> Result<String, ArticleError>;
}

/// Assigns a sentiment label to an article body.
pub trait SentimentClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentLabel, ArticleError>;
}

/// Ranks key phrases of an article body, best first.
pub trait TopicRanker {
    fn rank(&self, text: &str, top_k: usize) -> Vec<String>;
}

/// Tunables for [`ArticleAnalyzer`].
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerSettings {
    /// Maximum summary length in characters.
    pub summary_length: usize,
    /// Number of topic phrases kept per article.
    pub top_topics: usize,
    /// Articles analyzed concurrently.
    pub concurrency: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            summary_length: 200,
            top_topics: 3,
            concurrency: 4,
        }
    }
}

/// Result of analyzing a batch: successes and failures, never mixed.
#[derive(Debug, Default)]
pub struct AnalysisBatch {
    pub analyses: Vec<ArticleAnalysis>,
    pub failures: Vec<ArticleFailure>,
}

#[derive(Debug)]
pub struct ArticleAnalyzer<S, C, R> {
    summarizer: S,
    classifier: C,
    ranker: R,
    settings: AnalyzerSettings,
}

impl<S, C, R> ArticleAnalyzer<S, C, R>
where
    S: Summarizer,
    C: SentimentClassifier,
    R: TopicRanker,
{
    pub fn new(summarizer: S, classifier: C, ranker: R, settings: AnalyzerSettings) -> Self {
        Self {
            summarizer,
            classifier,
            ranker,
            settings,
        }
    }

    /// Analyze a single extracted article.
    #[instrument(level = "info", skip_all, fields(url = %article.url))]
    pub async fn analyze(&self, article: &ExtractedArticle) -> Result<ArticleAnalysis, ArticleError> {
        let text = article.text.trim();
        if text.is_empty() {
            return Err(ArticleError::EmptyContent);
        }

        let summary = self
            .summarizer
            .summarize(text, self.settings.summary_length)
            .await?;
        let sentiment = self.classifier.classify(text).await?;
        let topics = self.ranker.rank(text, self.settings.top_topics);
        debug!(%sentiment, ?topics, "Analyzed article");

        Ok(ArticleAnalysis {
            title: article.title.clone(),
            summary,
            sentiment,
            topics,
            source: source_tag(&article.url),
        })
    }

    /// Analyze every article independently.
    ///
    /// Output order follows input order. A failing article is logged, recorded
    /// in [`AnalysisBatch::failures`], and left out of the analyses.
    #[instrument(level = "info", skip_all, fields(count = articles.len()))]
    pub async fn analyze_batch(&self, articles: &[ExtractedArticle]) -> AnalysisBatch {
        let results: Vec<(&ExtractedArticle, Result<ArticleAnalysis, ArticleError>)> =
            stream::iter(articles)
                .map(|article| async move { (article, self.analyze(article).await) })
                .buffered(self.settings.concurrency.max(1))
                .collect()
                .await;

        let mut batch = AnalysisBatch::default();
        for (article, result) in results {
            match result {
                Ok(analysis) => batch.analyses.push(analysis),
                Err(e) => {
                    warn!(url = %article.url, error = %e, "Analysis failed; skipping article");
                    batch.failures.push(ArticleFailure {
                        url: article.url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            successful = batch.analyses.len(),
            failed = batch.failures.len(),
            "Completed article analysis"
        );
        batch
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! Canned collaborators shared by tests in this crate.

    use super::*;

    #[derive(Debug, Default)]
    pub struct FirstSentence;

    impl Summarizer for FirstSentence {
        async fn summarize(&self, text: &str, _max_length: usize) -> Result<String, ArticleError> {
            Ok(text.split('.').next().unwrap_or_default().to_string())
        }
    }

    /// Positive when the text mentions "record", Negative for "recall",
    /// Neutral otherwise. Text containing "boom" fails.
    #[derive(Debug, Default)]
    pub struct KeywordSentiment;

    impl SentimentClassifier for KeywordSentiment {
        async fn classify(&self, text: &str) -> Result<SentimentLabel, ArticleError> {
            if text.contains("boom") {
                return Err(ArticleError::Llm("classifier unavailable".into()));
            }
            Ok(if text.contains("record") {
                SentimentLabel::Positive
            } else if text.contains("recall") {
                SentimentLabel::Negative
            } else {
                SentimentLabel::Neutral
            })
        }
    }

    /// Capitalized words, in order of appearance.
    #[derive(Debug, Default)]
    pub struct CapitalWords;

    impl TopicRanker for CapitalWords {
        fn rank(&self, text: &str, top_k: usize) -> Vec<String> {
            text.split_whitespace()
                .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
                .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
                .map(str::to_string)
                .take(top_k)
                .collect()
        }
    }

    pub fn analyzer() -> ArticleAnalyzer<FirstSentence, KeywordSentiment, CapitalWords> {
        ArticleAnalyzer::new(
            FirstSentence,
            KeywordSentiment,
            CapitalWords,
            AnalyzerSettings::default(),
        )
    }
}
