//! Markdown rendering of company reports.
//!
//! The document lists every analyzed article, then the comparative analysis,
//! then the skipped articles (if any) and a link to the narration audio.

use crate::models::CompanyReport;
use crate::utils::slugify_title;
use itertools::Itertools;
use std::error::Error;
use std::fmt::Write;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `report` to `{markdown_output_dir}/{local_date}_{company-slug}.md`.
///
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(markdown_output_dir = %markdown_output_dir, company = %report.company))]
pub async fn write_report(
    report: &CompanyReport,
    markdown_output_dir: &str,
    local_date: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let md = report_to_markdown(report);
    let output_markdown_filename = PathBuf::from(markdown_output_dir)
        .join(format!("{}_{}.md", local_date, slugify_title(&report.company)));

    info!(path = %output_markdown_filename.display(), "Writing Markdown");
    if let Err(e) = fs::write(&output_markdown_filename, md).await {
        error!(path = %output_markdown_filename.display(), error = %e, "Failed writing Markdown");
        return Err(e.into());
    }
    info!(path = %output_markdown_filename.display(), "Wrote Markdown report");
    Ok(output_markdown_filename)
}

/// Render `report` as a Markdown document.
pub fn report_to_markdown(report: &CompanyReport) -> String {
    let mut md = String::new();

    writeln!(md, "# News report: {}\n", report.company).unwrap();
    writeln!(md, "_{}_\n", report.final_sentiment_analysis).unwrap();

    writeln!(md, "## Articles\n").unwrap();
    if report.articles.is_empty() {
        writeln!(md, "No articles could be analyzed.\n").unwrap();
    }
    for article in &report.articles {
        writeln!(md, "### {}\n", article.title).unwrap();
        if let Some(source) = &article.source {
            writeln!(md, "- **Source**: {}", source).unwrap();
        }
        writeln!(md, "- **Sentiment**: {}", article.sentiment).unwrap();
        writeln!(md, "- **Topics**: {}\n", article.topics.join(", ")).unwrap();
        writeln!(md, "{}\n", article.summary).unwrap();
        writeln!(md, "---\n").unwrap();
    }

    let comparative = &report.comparative_sentiment;
    writeln!(md, "## Comparative Analysis\n").unwrap();
    writeln!(md, "### Sentiment Distribution\n").unwrap();
    writeln!(md, "| Sentiment | Articles |").unwrap();
    writeln!(md, "|-----------|----------|").unwrap();
    for (label, count) in &comparative.sentiment_distribution {
        writeln!(md, "| {} | {} |", label, count).unwrap();
    }
    writeln!(md).unwrap();

    writeln!(md, "### Topic Overview\n").unwrap();
    writeln!(
        md,
        "- **Common Topics**: {}",
        comparative.topic_overlap.common_topics.iter().join(", ")
    )
    .unwrap();
    writeln!(
        md,
        "- **Unique Topics**: {}\n",
        comparative.topic_overlap.unique_topics.iter().join(", ")
    )
    .unwrap();

    if !report.skipped.is_empty() {
        writeln!(md, "## Skipped Articles\n").unwrap();
        for failure in &report.skipped {
            writeln!(md, "- <{}>: {}", failure.url, failure.reason).unwrap();
        }
        writeln!(md).unwrap();
    }

    writeln!(md, "## Audio Summary\n").unwrap();
    writeln!(md, "[Listen]({})", report.audio_url).unwrap();

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparative::aggregate;
    use crate::models::{ArticleAnalysis, ArticleFailure, SentimentLabel};

    fn report() -> CompanyReport {
        let articles = vec![
            ArticleAnalysis {
                title: "Tesla deliveries beat estimates".to_string(),
                summary: "Deliveries rose 20%...".to_string(),
                sentiment: SentimentLabel::Positive,
                topics: vec!["deliveries".to_string(), "china".to_string()],
                source: Some("reuters".to_string()),
            },
            ArticleAnalysis {
                title: "Tesla recalls Cybertruck".to_string(),
                summary: "A recall covers...".to_string(),
                sentiment: SentimentLabel::Negative,
                topics: vec!["deliveries".to_string(), "recall".to_string()],
                source: None,
            },
        ];
        CompanyReport {
            company: "Tesla".to_string(),
            comparative_sentiment: aggregate(&articles),
            articles,
            final_sentiment_analysis: "Tesla's news coverage shows Positive sentiment overall"
                .to_string(),
            audio_url: "http://localhost:8000/audio/tesla.mp3".to_string(),
            skipped: vec![ArticleFailure {
                url: "https://paywalled.example.com/x".to_string(),
                reason: "unexpected HTTP status 403".to_string(),
            }],
        }
    }

    #[test]
    fn test_markdown_sections() {
        let md = report_to_markdown(&report());
        assert!(md.starts_with("# News report: Tesla\n"));
        assert!(md.contains("### Tesla deliveries beat estimates"));
        assert!(md.contains("- **Source**: reuters"));
        assert!(md.contains("- **Sentiment**: Negative"));
        assert!(md.contains("- **Topics**: deliveries, recall"));
        assert!(md.contains("| Positive | 1 |"));
        assert!(md.contains("| Negative | 1 |"));
        assert!(md.contains("- **Common Topics**: deliveries"));
        assert!(md.contains("- **Unique Topics**: china, recall"));
        assert!(md.contains("- <https://paywalled.example.com/x>: unexpected HTTP status 403"));
        assert!(md.ends_with("[Listen](http://localhost:8000/audio/tesla.mp3)\n"));
    }

    #[tokio::test]
    async fn test_write_report_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_report(&report(), dir.path().to_str().unwrap(), "2026-10-19")
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("2026-10-19_tesla.md"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# News report: Tesla\n"));
    }

    #[tokio::test]
    async fn test_write_report_error_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("taken");
        std::fs::write(&not_a_dir, "plain file").unwrap();

        let res = write_report(&report(), not_a_dir.to_str().unwrap(), "2026-10-19").await;
        assert!(res.is_err());
    }

    #[test]
    fn test_markdown_without_articles() {
        let mut report = report();
        report.articles.clear();
        report.skipped.clear();
        let md = report_to_markdown(&report);
        assert!(md.contains("No articles could be analyzed."));
        assert!(!md.contains("Skipped Articles"));
    }
}
