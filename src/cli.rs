//! Command-line interface definitions for Company News Report.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can also be supplied through an environment variable, and a
//! `.env` file in the working directory is loaded before parsing.
//!
//! Two subcommands share the same settings:
//! - `report`: build one report and write it to disk
//! - `serve`: answer `POST /analyze` over HTTP and serve the narration audio

use crate::narration::Language;
use crate::sources::newsapi::DEFAULT_NEWS_API_URL;
use crate::speech::DEFAULT_TTS_URL;
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Which engines summarize and classify articles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Engine {
    /// Leading-characters summary and VADER sentiment; no LLM needed.
    #[default]
    Local,
    /// Summary and sentiment from an OpenAI-compatible LLM via awful_aj.
    Llm,
}

/// Command-line arguments for the Company News Report application.
///
/// # Examples
///
/// ```sh
/// # One report on disk
/// company_news_report report --company Tesla -j ./json -a ./audio
///
/// # English narration, Markdown output, LLM analysis
/// company_news_report report --company Tesla -j ./json -m ./markdown -a ./audio \
///     --language en --engine llm
///
/// # HTTP service on port 8000, audio served from ./audio
/// company_news_report serve --bind 0.0.0.0:8000 -a ./audio --host news.example.com:8000
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub settings: Settings,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build one report and write it as JSON (and optionally Markdown)
    Report(ReportArgs),
    /// Serve `POST /analyze` and the audio directory over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Company to report on
    #[arg(long, env = "COMPANY")]
    pub company: String,

    /// Output directory for the JSON report
    #[arg(short, long, env = "JSON_OUTPUT_DIR")]
    pub json_output_dir: String,

    /// Output directory for the Markdown report (skipped when absent)
    #[arg(short, long, env = "MARKDOWN_OUTPUT_DIR")]
    pub markdown_output_dir: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind: String,
}

/// Settings shared by every subcommand.
#[derive(Args, Debug)]
pub struct Settings {
    /// Directory the narration audio is written to
    #[arg(short, long, global = true, env = "AUDIO_DIR", default_value = "audio")]
    pub audio_dir: String,

    /// Host the audio directory is served from, used to build `audio_url`
    #[arg(long, global = true, env = "HOST", default_value = "localhost:8000")]
    pub host: String,

    /// NewsAPI key
    #[arg(long, global = true, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// NewsAPI search endpoint
    #[arg(long, global = true, env = "NEWS_API_URL", default_value = DEFAULT_NEWS_API_URL)]
    pub news_api_url: String,

    /// Maximum number of articles requested from the search
    #[arg(
        long,
        global = true,
        env = "MAX_ARTICLES",
        default_value_t = 10,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_articles: usize,

    /// Topic phrases kept per article
    #[arg(
        long,
        global = true,
        env = "TOP_TOPICS",
        default_value_t = 3,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub top_topics: usize,

    /// Maximum summary length in characters
    #[arg(
        long,
        global = true,
        env = "SUMMARY_LENGTH",
        default_value_t = 200,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub summary_length: usize,

    /// Narration language
    #[arg(long, global = true, env = "NEWS_LANGUAGE", value_enum, default_value_t = Language::Hindi)]
    pub language: Language,

    /// Analysis engine
    #[arg(long, global = true, env = "NEWS_ENGINE", value_enum, default_value_t = Engine::Local)]
    pub engine: Engine,

    /// Optional path to the awful_aj config.yaml file (LLM engine only)
    #[arg(short, long, global = true, env = "AWFUL_AJ_CONFIG")]
    pub config: Option<String>,

    /// Articles fetched and analyzed concurrently
    #[arg(
        long,
        global = true,
        env = "CONCURRENCY",
        default_value_t = 4,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub concurrency: usize,

    /// Timeout for every outbound HTTP request, in seconds
    #[arg(
        long,
        global = true,
        env = "HTTP_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub http_timeout_secs: u64,

    /// Text-to-speech endpoint
    #[arg(long, global = true, env = "TTS_URL", default_value = DEFAULT_TTS_URL)]
    pub tts_url: String,
}
