//! Summarization engines.

use super::Summarizer;
use crate::api::{AskAsync, TemplateAsk};
use crate::error::ArticleError;
use crate::utils::take_chars;

/// Characters of article text sent to the LLM for summarization.
pub const LLM_INPUT_CHARS: usize = 1024;

/// Cut `text` to `max_length` characters and mark the cut with "...".
fn clip(text: &str, max_length: usize) -> String {
    let head = take_chars(text, max_length);
    if head.len() == text.len() {
        text.to_string()
    } else {
        format!("{}...", head.trim_end())
    }
}

/// Uses the first `max_length` characters of the article as its summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadSummarizer;

impl Summarizer for LeadSummarizer {
    async fn summarize(&self, text: &str, max_length: usize) -> Result<String, ArticleError> {
        Ok(clip(text.trim(), max_length))
    }
}

/// Asks an LLM for the summary.
///
/// Only the first [`LLM_INPUT_CHARS`] characters are sent. The reply is
/// clipped to `max_length` characters.
#[derive(Debug)]
pub struct LlmSummarizer<A> {
    client: A,
}

impl<A: AskAsync> LlmSummarizer<A> {
    pub fn new(client: A) -> Self {
        Self { client }
    }
}

impl<A: AskAsync> Summarizer for LlmSummarizer<A> {
    async fn summarize(&self, text: &str, max_length: usize) -> Result<String, ArticleError> {
        let reply = self.client.ask(take_chars(text, LLM_INPUT_CHARS)).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(ArticleError::Llm("empty summary".into()));
        }
        Ok(clip(reply, max_length))
    }
}

/// Summarizer chosen at startup.
#[derive(Debug)]
pub enum SummaryEngine {
    Lead(LeadSummarizer),
    Llm(LlmSummarizer<TemplateAsk>),
}

impl Summarizer for SummaryEngine {
    async fn summarize(&self, text: &str, max_length: usize) -> Result<String, ArticleError> {
        match self {
            SummaryEngine::Lead(s) => s.summarize(text, max_length).await,
            SummaryEngine::Llm(s) => s.summarize(text, max_length).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Returns a fixed reply and remembers the prompt it was given.
    struct Canned {
        reply: Result<String, String>,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl AskAsync for Canned {
        async fn ask(&self, text: &str) -> Result<String, ArticleError> {
            self.seen.lock().unwrap().push(text.to_string());
            self.reply.clone().map_err(ArticleError::Llm)
        }
    }

    #[tokio::test]
    async fn test_lead_summary_short_text_unchanged() {
        let summary = LeadSummarizer.summarize("  Tesla opens a plant.  ", 200).await.unwrap();
        assert_eq!(summary, "Tesla opens a plant.");
    }

    #[tokio::test]
    async fn test_lead_summary_clips_long_text() {
        let text = "word ".repeat(100);
        let summary = LeadSummarizer.summarize(&text, 20).await.unwrap();
        assert_eq!(summary, "word word word word...");
    }

    #[tokio::test]
    async fn test_llm_summary_sends_prefix_only() {
        let summarizer = LlmSummarizer::new(Canned::ok("  A concise summary.\n"));
        let text = "x".repeat(5000);

        let summary = summarizer.summarize(&text, 200).await.unwrap();
        assert_eq!(summary, "A concise summary.");

        let seen = summarizer.client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), LLM_INPUT_CHARS);
    }

    #[tokio::test]
    async fn test_llm_summary_empty_reply_is_error() {
        let summarizer = LlmSummarizer::new(Canned::ok("   "));
        let err = summarizer.summarize("text", 200).await.unwrap_err();
        assert!(matches!(err, ArticleError::Llm(_)));
    }

    #[tokio::test]
    async fn test_llm_summary_propagates_failure() {
        let summarizer = LlmSummarizer::new(Canned {
            reply: Err("timeout".into()),
            seen: Mutex::new(Vec::new()),
        });
        let err = summarizer.summarize("text", 200).await.unwrap_err();
        assert_eq!(err.to_string(), "language model call failed: timeout");
    }
}
