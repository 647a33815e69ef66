//! Spoken summary text for a comparative report.
//!
//! [`NarrationBuilder`] only produces text. Turning it into audio is the job
//! of a [`crate::speech::SpeechSynthesizer`].

use crate::models::{ComparativeReport, SentimentLabel};
use clap::ValueEnum;
use itertools::Itertools;

/// Language the narration is written and spoken in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Language {
    #[default]
    #[value(name = "hi")]
    Hindi,
    #[value(name = "en")]
    English,
}

impl Language {
    /// ISO 639-1 code handed to the speech engine.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Hindi => "hi",
            Language::English => "en",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NarrationBuilder {
    language: Language,
}

impl NarrationBuilder {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Render the narration sentence(s) for `subject`.
    ///
    /// The topic sentence is dropped when no topic is common to the batch.
    pub fn render(&self, report: &ComparativeReport, article_count: usize, subject: &str) -> String {
        let distribution = render_distribution(report);
        let topics = report.topic_overlap.common_topics.iter().join(", ");

        let mut text = match self.language {
            Language::Hindi => format!(
                "{subject} के बारे में {article_count} समाचार लेख मिले। समग्र भावना {distribution} है।"
            ),
            Language::English => format!(
                "Found {article_count} news articles about {subject}. Overall sentiment is {distribution}."
            ),
        };

        if !topics.is_empty() {
            match self.language {
                Language::Hindi => text.push_str(&format!(" मुख्य विषय हैं: {topics}")),
                Language::English => text.push_str(&format!(" Key topics are: {topics}")),
            }
        }
        text
    }
}

/// `Label: count` pairs, most frequent first.
fn render_distribution(report: &ComparativeReport) -> String {
    report
        .sentiment_distribution
        .iter()
        .sorted_by(|(a_label, a_count), (b_label, b_count)| {
            b_count.cmp(a_count).then_with(|| a_label.cmp(b_label))
        })
        .map(|(label, count): (&SentimentLabel, &usize)| format!("{label}: {count}"))
        .join(", ")
}
