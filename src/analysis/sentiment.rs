//! Sentiment classification engines.
//!
//! [`VaderClassifier`] scores text with VADER and nudges the compound score
//! with a small table of company-news keywords that VADER's general lexicon
//! under-weights ("recall", "layoffs", "record"). The combined score maps to a
//! label with a ±0.1 dead zone.

use super::SentimentClassifier;
use crate::api::{AskAsync, TemplateAsk};
use crate::error::ArticleError;
use crate::models::SentimentLabel;
use crate::utils::take_chars;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Score above which text is Positive (and below whose negation it is Negative).
pub const POLARITY_THRESHOLD: f64 = 0.1;

/// Characters of article text sent to the LLM for classification.
pub const LLM_INPUT_CHARS: usize = 512;

/// Weight of the keyword boost relative to the VADER compound score.
const BOOST_WEIGHT: f64 = 0.5;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:-[\p{L}]+)?").unwrap());

/// Company-news vocabulary and its polarity.
static NEWS_KEYWORDS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        // bullish
        ("record", 0.3),
        ("profit", 0.3),
        ("profitable", 0.3),
        ("growth", 0.3),
        ("surge", 0.4),
        ("surges", 0.4),
        ("surged", 0.4),
        ("soar", 0.4),
        ("soars", 0.4),
        ("soared", 0.4),
        ("rally", 0.3),
        ("rallied", 0.3),
        ("beat", 0.2),
        ("beats", 0.2),
        ("upgrade", 0.3),
        ("upgraded", 0.3),
        ("breakthrough", 0.4),
        ("expansion", 0.2),
        ("partnership", 0.2),
        // bearish
        ("recall", -0.4),
        ("recalls", -0.4),
        ("lawsuit", -0.4),
        ("layoffs", -0.4),
        ("plunge", -0.5),
        ("plunges", -0.5),
        ("plunged", -0.5),
        ("slump", -0.4),
        ("slumped", -0.4),
        ("downgrade", -0.3),
        ("downgraded", -0.3),
        ("inquiry", -0.3),
        ("investigation", -0.3),
        ("fraud", -0.5),
        ("sell-off", -0.4),
        ("selloff", -0.4),
        ("bankruptcy", -0.6),
        ("fined", -0.3),
    ])
});

/// VADER scorer with a company-news keyword boost.
pub struct VaderClassifier {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderClassifier {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Sum of the keyword polarities of every word in `text`.
    fn news_boost(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        WORD.find_iter(&lower)
            .filter_map(|m| NEWS_KEYWORDS.get(m.as_str()))
            .sum()
    }

    /// Combined score in `[-1.0, 1.0]`. Blank text scores 0.0.
    pub fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let compound = self.analyzer.polarity_scores(text)["compound"];
        (compound + self.news_boost(text) * BOOST_WEIGHT).clamp(-1.0, 1.0)
    }
}

impl Default for VaderClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VaderClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaderClassifier").finish_non_exhaustive()
    }
}

impl SentimentClassifier for VaderClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentLabel, ArticleError> {
        let score = self.score(text);
        Ok(if score > POLARITY_THRESHOLD {
            SentimentLabel::Positive
        } else if score < -POLARITY_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        })
    }
}

/// Asks an LLM for a one-word label.
///
/// The reply is parsed leniently: its first line becomes the label, so
/// "positive", "POSITIVE" and "Positive." are all Positive. Anything else is
/// kept as a provider label.
#[derive(Debug)]
pub struct LlmSentimentClassifier<A> {
    client: A,
}

impl<A: AskAsync> LlmSentimentClassifier<A> {
    pub fn new(client: A) -> Self {
        Self { client }
    }
}

impl<A: AskAsync> SentimentClassifier for LlmSentimentClassifier<A> {
    async fn classify(&self, text: &str) -> Result<SentimentLabel, ArticleError> {
        let reply = self.client.ask(take_chars(text, LLM_INPUT_CHARS)).await?;
        let label = reply.lines().map(str::trim).find(|l| !l.is_empty());
        match label {
            Some(label) => Ok(SentimentLabel::from(label)),
            None => Err(ArticleError::Llm("empty sentiment label".into())),
        }
    }
}

/// Sentiment classifier chosen at startup.
#[derive(Debug)]
pub enum SentimentEngine {
    Vader(VaderClassifier),
    Llm(LlmSentimentClassifier<TemplateAsk>),
}

impl SentimentClassifier for SentimentEngine {
    async fn classify(&self, text: &str) -> Result<SentimentLabel, ArticleError> {
        match self {
            SentimentEngine::Vader(c) => c.classify(text).await,
            SentimentEngine::Llm(c) => c.classify(text).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reply(&'static str);

    impl AskAsync for Reply {
        async fn ask(&self, _text: &str) -> Result<String, ArticleError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_positive_text() {
        let classifier = VaderClassifier::new();
        for text in [
            "Tesla reported record profit and strong growth this quarter.",
            "Tesla delivered an outstanding, remarkable quarter; investors were thrilled.",
        ] {
            let label = classifier.classify(text).await.unwrap();
            assert_eq!(label, SentimentLabel::Positive, "{text}");
        }
    }

    #[tokio::test]
    async fn test_negative_text() {
        let classifier = VaderClassifier::new();
        for text in [
            "Regulators open an investigation after the recall; shares plunged on fraud fears.",
            "Tesla had a terrible, disappointing quarter as sales slumped and investors panicked.",
        ] {
            let label = classifier.classify(text).await.unwrap();
            assert_eq!(label, SentimentLabel::Negative, "{text}");
        }
    }

    #[tokio::test]
    async fn test_neutral_text() {
        let label = VaderClassifier::new()
            .classify("The company will hold its annual meeting in Austin on Tuesday.")
            .await
            .unwrap();
        assert_eq!(label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_news_keywords_push_score() {
        let classifier = VaderClassifier::new();
        let plain = classifier.score("The automaker announced a change to its lineup.");
        let recall = classifier.score("The automaker announced a recall of its lineup.");
        assert!(recall < plain);
    }

    #[test]
    fn test_score_is_bounded() {
        let classifier = VaderClassifier::new();
        let s = classifier.score(
            "Record profit! Shares soared and surged in a breakthrough rally. Amazing, excellent!",
        );
        assert!(s <= 1.0);
        assert_eq!(classifier.score(""), 0.0);
        assert_eq!(classifier.score("   "), 0.0);
    }

    #[tokio::test]
    async fn test_llm_label_parsing() {
        let classifier = LlmSentimentClassifier::new(Reply("\n  NEGATIVE\nbecause of the recall"));
        assert_eq!(
            classifier.classify("text").await.unwrap(),
            SentimentLabel::Negative
        );

        let classifier = LlmSentimentClassifier::new(Reply("Mixed"));
        assert_eq!(
            classifier.classify("text").await.unwrap(),
            SentimentLabel::Other("Mixed".into())
        );
    }

    #[tokio::test]
    async fn test_llm_empty_reply() {
        let classifier = LlmSentimentClassifier::new(Reply("  \n "));
        assert!(matches!(
            classifier.classify("text").await,
            Err(ArticleError::Llm(_))
        ));
    }
}
