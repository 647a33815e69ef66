//! End-to-end report generation for one company.
//!
//! [`Pipeline::run`] is a single pass with no retries:
//!
//! 1. **Search**: find article references; failure aborts the request
//! 2. **Fetch**: download and extract each article; failures drop the article
//! 3. **Analyze**: summary, sentiment, topics; failures drop the article
//! 4. **Aggregate**: comparative report over whatever survived (possibly nothing)
//! 5. **Narrate**: render the spoken summary and synthesize audio
//!
//! Dropped articles are listed in [`CompanyReport::skipped`].

use crate::analysis::{ArticleAnalyzer, SentimentClassifier, Summarizer, TopicRanker};
use crate::comparative::{aggregate, final_sentiment_analysis};
use crate::error::{PipelineError, Result};
use crate::models::CompanyReport;
use crate::narration::{Language, NarrationBuilder};
use crate::sources::{fetch_articles, NewsSearch, PageExtractor};
use crate::speech::{audio_url, SpeechSynthesizer};
use crate::utils::{slugify_title, truncate_for_log};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

pub struct Pipeline<'a, N, E, S, C, R, T> {
    pub search: &'a N,
    pub extractor: &'a E,
    pub analyzer: &'a ArticleAnalyzer<S, C, R>,
    pub narrator: NarrationBuilder,
    pub speech: &'a T,
    /// Host (optionally with scheme) the audio directory is served from.
    pub audio_host: &'a str,
    /// Concurrent page downloads.
    pub fetch_concurrency: usize,
}

impl<N, E, S, C, R, T> Pipeline<'_, N, E, S, C, R, T>
where
    N: NewsSearch,
    E: PageExtractor,
    S: Summarizer,
    C: SentimentClassifier,
    R: TopicRanker,
    T: SpeechSynthesizer,
{
    /// Produce the full report for `company`.
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, company: &str) -> Result<CompanyReport> {
        let company = company.trim();
        // The slug names the audio and report files.
        let file_stem = slugify_title(company);
        if file_stem.is_empty() {
            return Err(PipelineError::InvalidCompany);
        }
        let t0 = Instant::now();

        let references = self.search.search(company).await?;
        info!(count = references.len(), "Search completed");

        let (articles, mut skipped) =
            fetch_articles(self.extractor, &references, self.fetch_concurrency).await;

        let batch = self.analyzer.analyze_batch(&articles).await;
        skipped.extend(batch.failures);
        let analyses = batch.analyses;
        if analyses.is_empty() {
            warn!(%company, "No usable articles; reporting empty comparison");
        }

        let comparative = aggregate(&analyses);
        let verdict = final_sentiment_analysis(company, &comparative);
        debug!(?comparative, %verdict, "Aggregated articles");

        let narration = self.narrator.render(&comparative, analyses.len(), company);
        info!(narration = %truncate_for_log(&narration, 120), "Rendered narration");

        let artifact = self
            .speech
            .synthesize(&narration, self.narrator.language().code(), &file_stem)
            .await?;
        let audio_url = audio_url(self.audio_host, &artifact)?;

        info!(
            articles = analyses.len(),
            skipped = skipped.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            %audio_url,
            "Report ready"
        );

        Ok(CompanyReport {
            company: company.to_string(),
            articles: analyses,
            comparative_sentiment: comparative,
            final_sentiment_analysis: verdict,
            audio_url,
            skipped,
        })
    }
}

/// Owned collaborators, built once at startup and lent to a [`Pipeline`] per
/// request.
pub struct Services<N, E, S, C, R, T> {
    pub search: N,
    pub extractor: E,
    pub analyzer: ArticleAnalyzer<S, C, R>,
    pub speech: T,
    pub language: Language,
    pub audio_host: String,
    pub fetch_concurrency: usize,
}

impl<N, E, S, C, R, T> Services<N, E, S, C, R, T> {
    pub fn pipeline(&self) -> Pipeline<'_, N, E, S, C, R, T> {
        Pipeline {
            search: &self.search,
            extractor: &self.extractor,
            analyzer: &self.analyzer,
            narrator: NarrationBuilder::new(self.language),
            speech: &self.speech,
            audio_host: &self.audio_host,
            fetch_concurrency: self.fetch_concurrency,
        }
    }
}
