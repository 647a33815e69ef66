//! # Company News Report
//!
//! Fetches recent news about a company, analyzes each article for summary,
//! sentiment and topics, compares the articles with each other, and narrates
//! the result as an MP3.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... company_news_report report --company Tesla -j ./json -m ./markdown -a ./audio
//! NEWS_API_KEY=... company_news_report serve --bind 0.0.0.0:8000 -a ./audio
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Search**: Find article URLs for the company (NewsAPI)
//! 2. **Fetching**: Download and extract article text (bounded concurrency)
//! 3. **Analysis**: Summary, sentiment and topic phrases per article
//! 4. **Comparison**: Sentiment distribution and topic overlap across articles
//! 5. **Narration**: Spoken summary rendered to audio
//! 6. **Output**: Write JSON and Markdown reports, or answer the HTTP request

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod analysis;
mod api;
mod cli;
mod comparative;
mod error;
mod models;
mod narration;
mod outputs;
mod pipeline;
mod server;
mod sources;
mod speech;
mod utils;

use analysis::rake::RakeRanker;
use analysis::sentiment::{LlmSentimentClassifier, SentimentEngine, VaderClassifier};
use analysis::summary::{LeadSummarizer, LlmSummarizer, SummaryEngine};
use analysis::{AnalyzerSettings, ArticleAnalyzer};
use api::TemplateAsk;
use cli::{Cli, Command, Engine, ReportArgs, Settings};
use outputs::{json, markdown};
use pipeline::Services;
use sources::extract::HtmlExtractor;
use sources::newsapi::NewsApiClient;
use speech::GoogleTranslateTts;
use utils::ensure_writable_dir;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

type AppServices = Services<
    NewsApiClient,
    HtmlExtractor,
    SummaryEngine,
    SentimentEngine,
    RakeRanker,
    GoogleTranslateTts,
>;

/// Build the summarizer and classifier for the selected engine.
///
/// The LLM engine loads the awful_aj configuration and its two templates
/// once; both clients share the configuration.
#[instrument(level = "info", skip(config_path))]
async fn build_engines(
    engine: Engine,
    config_path: Option<&str>,
) -> Result<(SummaryEngine, SentimentEngine), Box<dyn Error>> {
    match engine {
        Engine::Local => Ok((
            SummaryEngine::Lead(LeadSummarizer),
            SentimentEngine::Vader(VaderClassifier::new()),
        )),
        Engine::Llm => {
            let config = Arc::new(api::load_config(config_path)?);
            let summarizer = TemplateAsk::load(Arc::clone(&config), "news_summarizer").await?;
            let classifier = TemplateAsk::load(config, "sentiment_classifier").await?;
            Ok((
                SummaryEngine::Llm(LlmSummarizer::new(summarizer)),
                SentimentEngine::Llm(LlmSentimentClassifier::new(classifier)),
            ))
        }
    }
}

/// Build every collaborator once from the shared settings.
async fn build_services(settings: &Settings) -> Result<AppServices, Box<dyn Error>> {
    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(settings.http_timeout_secs))
        .build()?;

    let (summarizer, classifier) =
        build_engines(settings.engine, settings.config.as_deref()).await?;

    Ok(Services {
        search: NewsApiClient::new(
            http.clone(),
            settings.news_api_url.clone(),
            settings.news_api_key.clone().unwrap_or_default(),
            settings.max_articles,
        ),
        extractor: HtmlExtractor::new(http.clone()),
        analyzer: ArticleAnalyzer::new(
            summarizer,
            classifier,
            RakeRanker::default(),
            AnalyzerSettings {
                summary_length: settings.summary_length,
                top_topics: settings.top_topics,
                concurrency: settings.concurrency,
            },
        ),
        speech: GoogleTranslateTts::new(http, settings.tts_url.clone(), settings.audio_dir.clone()),
        language: settings.language,
        audio_host: settings.host.clone(),
        fetch_concurrency: settings.concurrency,
    })
}

/// Check every output dir is writable before any network work.
async fn check_output_dirs(dirs: &[&str]) -> Result<(), Box<dyn Error>> {
    for dir in dirs {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "Output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }
    Ok(())
}

/// Generate one report and write it to disk.
async fn run_report(services: &AppServices, args: &ReportArgs) -> Result<(), Box<dyn Error>> {
    let report = match services.pipeline().run(&args.company).await {
        Ok(report) => report,
        Err(e) => {
            error!(company = %args.company, error = %e, "Report generation failed");
            return Err(e.into());
        }
    };

    let local_date = Local::now().date_naive().to_string();
    json::write_report(&report, &args.json_output_dir, &local_date).await?;
    if let Some(markdown_output_dir) = &args.markdown_output_dir {
        markdown::write_report(&report, markdown_output_dir, &local_date).await?;
    }

    info!(
        articles = report.articles.len(),
        skipped = report.skipped.len(),
        verdict = %report.final_sentiment_analysis,
        audio_url = %report.audio_url,
        "Report complete"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("company_news_report starting up");

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => return Err(e.into()),
    }

    // Parse CLI
    let args = Cli::parse();
    let settings = &args.settings;
    debug!(
        command = ?args.command,
        audio_dir = %settings.audio_dir,
        host = %settings.host,
        engine = ?settings.engine,
        language = ?settings.language,
        "Parsed CLI arguments"
    );

    let mut output_dirs = vec![settings.audio_dir.as_str()];
    if let Command::Report(report_args) = &args.command {
        output_dirs.push(report_args.json_output_dir.as_str());
        if let Some(dir) = report_args.markdown_output_dir.as_deref() {
            output_dirs.push(dir);
        }
    }
    check_output_dirs(&output_dirs).await?;

    let services = build_services(settings).await?;

    match &args.command {
        Command::Report(report_args) => run_report(&services, report_args).await?,
        Command::Serve(serve_args) => {
            server::serve(services, &settings.audio_dir, &serve_args.bind).await?
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
