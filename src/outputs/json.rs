//! JSON output of company reports.
//!
//! # Output Structure
//!
//! Reports are grouped by the local date they were produced on:
//! ```text
//! json_output_dir/
//! └── 2026-10-19/
//!     ├── tesla.json
//!     └── rolls-royce.json
//! ```
//!
//! A second run for the same company on the same day replaces the file.

use crate::models::CompanyReport;
use crate::utils::slugify_title;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `report` to `{json_output_dir}/{local_date}/{company-slug}.json`.
///
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, company = %report.company))]
pub async fn write_report(
    report: &CompanyReport,
    json_output_dir: &str,
    local_date: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    let full_json_dir = PathBuf::from(json_output_dir).join(local_date);
    info!(full_json_dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(full_json_dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let output_json_filename = full_json_dir.join(format!("{}.json", slugify_title(&report.company)));
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename.display(), "Wrote JSON report");

    Ok(output_json_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComparativeReport;

    #[tokio::test]
    async fn test_write_report_layout() {
        let dir = tempfile::tempdir().unwrap();
        let report = CompanyReport {
            company: "Rolls Royce".to_string(),
            articles: vec![],
            comparative_sentiment: ComparativeReport::default(),
            final_sentiment_analysis: "Rolls Royce's news coverage shows Neutral sentiment overall"
                .to_string(),
            audio_url: "http://localhost:8000/audio/rolls-royce.mp3".to_string(),
            skipped: vec![],
        };

        let path = write_report(&report, dir.path().to_str().unwrap(), "2026-10-19")
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("2026-10-19").join("rolls-royce.json"));

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: CompanyReport = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.company, "Rolls Royce");
        assert_eq!(parsed.audio_url, report.audio_url);
    }
}
