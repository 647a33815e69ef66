//! Comparative analysis across all analyzed articles.
//!
//! [`aggregate`] folds per-article analyses into a sentiment distribution and
//! a topic overlap. It is a pure function of its input, total over the empty
//! list, and independent of article order.
//!
//! A topic is *common* when its frequency reaches `floor(N / 2)` and *unique*
//! when it appears exactly once. For tiny batches both rules can match the
//! same topic (N = 1 gives a threshold of 0), so a topic seen once is always
//! unique and never common.

use crate::models::{ArticleAnalysis, ComparativeReport, SentimentLabel, TopicOverlap};
use std::collections::{BTreeMap, HashMap};

/// Build the comparative report for a batch of article analyses.
pub fn aggregate(articles: &[ArticleAnalysis]) -> ComparativeReport {
    let mut sentiment_distribution: BTreeMap<SentimentLabel, usize> = BTreeMap::new();
    let mut topic_counts: HashMap<&str, usize> = HashMap::new();

    for article in articles {
        *sentiment_distribution
            .entry(article.sentiment.clone())
            .or_insert(0) += 1;
        for topic in &article.topics {
            *topic_counts.entry(topic.as_str()).or_insert(0) += 1;
        }
    }

    let threshold = articles.len() / 2;
    let mut topic_overlap = TopicOverlap::default();
    for (topic, count) in topic_counts {
        if count == 1 {
            topic_overlap.unique_topics.insert(topic.to_string());
        } else if count >= threshold {
            topic_overlap.common_topics.insert(topic.to_string());
        }
    }

    ComparativeReport {
        sentiment_distribution,
        topic_overlap,
    }
}

/// The most frequent sentiment label.
///
/// Ties resolve to the label that sorts first (Positive, Negative, Neutral,
/// then provider labels alphabetically). An empty distribution is Neutral.
pub fn dominant_sentiment(report: &ComparativeReport) -> SentimentLabel {
    report
        .sentiment_distribution
        .iter()
        .fold(None::<(&SentimentLabel, usize)>, |best, (label, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        })
        .map(|(label, _)| label.clone())
        .unwrap_or(SentimentLabel::Neutral)
}

/// One-line verdict for the whole coverage of `company`.
pub fn final_sentiment_analysis(company: &str, report: &ComparativeReport) -> String {
    format!(
        "{}'s news coverage shows {} sentiment overall",
        company,
        dominant_sentiment(report)
    )
}
