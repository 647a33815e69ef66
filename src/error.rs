//! Error types for the report pipeline.
//!
//! Failures are split by blast radius:
//! - [`PipelineError`]: aborts the whole request (search unreachable, speech
//!   synthesis failed, bad input).
//! - [`ArticleError`]: scoped to one article; the article is dropped and the
//!   batch carries on.

use thiserror::Error;

/// A request-level failure. The pipeline stops and nothing is reported.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("company name must contain a letter or digit")]
    InvalidCompany,

    #[error("news search failed: {0}")]
    Fetch(String),

    #[error("speech synthesis failed: {0}")]
    Speech(String),

    #[error("invalid audio host {host:?}: {reason}")]
    AudioHost { host: String, reason: String },
}

/// A failure confined to a single article.
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("no article text could be extracted")]
    EmptyContent,

    #[error("language model call failed: {0}")]
    Llm(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
