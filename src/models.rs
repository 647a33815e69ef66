//! Data models for article references, per-article analyses, and reports.
//!
//! This module defines the data that flows through the pipeline:
//! - [`ArticleReference`]: a search hit before the page is downloaded
//! - [`ExtractedArticle`]: title and body text pulled from the page
//! - [`ArticleAnalysis`]: summary, sentiment, and topics for one article
//! - [`ComparativeReport`]: sentiment distribution and topic overlap across articles
//! - [`CompanyReport`]: everything returned for one company request
//!
//! All of these are built per request and never shared between requests.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A news search hit.
///
/// Only the URL is required; the remaining fields are whatever the search
/// provider happened to return. The headline backs up a page without a title
/// and the teaser backs up a page without body text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleReference {
    /// Canonical URL of the article.
    pub url: String,
    /// Headline as reported by the search provider.
    pub title: Option<String>,
    /// Short teaser text from the search provider.
    pub description: Option<String>,
}

/// Title and body text extracted from a downloaded article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub url: String,
    pub title: String,
    pub text: String,
}

/// Sentiment label attached to an article.
///
/// The three well-known labels get their own variants; anything else a
/// classifier returns is kept verbatim in [`SentimentLabel::Other`] so the
/// distribution never loses a label. Serialized as the plain label string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Other(String),
}

impl SentimentLabel {
    pub fn as_str(&self) -> &str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Other(label) => label,
        }
    }
}

impl From<&str> for SentimentLabel {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches(|c: char| c == '"' || c == '.');
        match trimmed.to_ascii_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            "neutral" => SentimentLabel::Neutral,
            _ => SentimentLabel::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for SentimentLabel {
    fn from(raw: String) -> Self {
        SentimentLabel::from(raw.as_str())
    }
}

impl From<SentimentLabel> for String {
    fn from(label: SentimentLabel) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The analysis of a single article. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleAnalysis {
    pub title: String,
    pub summary: String,
    pub sentiment: SentimentLabel,
    /// Topic phrases, best-ranked first.
    pub topics: Vec<String>,
    /// Publisher tag derived from the article URL (see [`source_tag`]).
    pub source: Option<String>,
}

/// Topics shared by most articles versus topics seen in exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TopicOverlap {
    pub common_topics: BTreeSet<String>,
    pub unique_topics: BTreeSet<String>,
}

/// Aggregate view over all successfully analyzed articles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ComparativeReport {
    pub sentiment_distribution: BTreeMap<SentimentLabel, usize>,
    pub topic_overlap: TopicOverlap,
}

/// An article that was dropped from the report, with the reason why.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleFailure {
    pub url: String,
    pub reason: String,
}

/// The response for one company request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanyReport {
    pub company: String,
    pub articles: Vec<ArticleAnalysis>,
    pub comparative_sentiment: ComparativeReport,
    /// One-line verdict, e.g. "Tesla's news coverage shows Positive sentiment overall".
    pub final_sentiment_analysis: String,
    pub audio_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<ArticleFailure>,
}

/// Publisher tag for an article URL: the first label of the host once a
/// leading `www.` is dropped.
///
/// For example: "https://www.bbc.co.uk/news" -> "bbc". Single-label hosts
/// such as `localhost` have no tag.
pub fn source_tag(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    match host.split_once('.') {
        Some((name, _)) if !name.is_empty() => Some(name.to_lowercase()),
        _ => None,
    }
}
