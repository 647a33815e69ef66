//! Text-to-speech collaborator and audio URL derivation.
//!
//! The default engine, [`GoogleTranslateTts`], talks to the public Google
//! Translate TTS endpoint. That endpoint accepts short texts only, so the
//! narration is split into chunks of at most [`MAX_CHUNK_CHARS`] characters and
//! the returned MP3 payloads are concatenated into one file.

use crate::error::PipelineError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

/// Longest text sent in a single TTS request.
pub const MAX_CHUNK_CHARS: usize = 200;

pub const DEFAULT_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// An audio file written by a [`SpeechSynthesizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    /// Full path of the file on disk.
    pub path: PathBuf,
    /// File name relative to the audio directory, used to build the public URL.
    pub file_name: String,
}

/// Anything that can turn text into a stored audio file.
pub trait SpeechSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        language_code: &str,
        file_stem: &str,
    ) -> Result<AudioArtifact, PipelineError>;
}

#[derive(Debug, Clone)]
pub struct GoogleTranslateTts {
    client: Client,
    endpoint: String,
    audio_dir: PathBuf,
}

impl GoogleTranslateTts {
    pub fn new(client: Client, endpoint: impl Into<String>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            audio_dir: audio_dir.into(),
        }
    }

    fn chunk_url(&self, chunk: &str, language_code: &str, index: usize, total: usize) -> String {
        format!(
            "{}?ie=UTF-8&client=tw-ob&tl={}&total={}&idx={}&textlen={}&q={}",
            self.endpoint,
            urlencoding::encode(language_code),
            total,
            index,
            chunk.chars().count(),
            urlencoding::encode(chunk)
        )
    }
}

impl SpeechSynthesizer for GoogleTranslateTts {
    #[instrument(level = "info", skip_all, fields(language_code = %language_code, file_stem = %file_stem))]
    async fn synthesize(
        &self,
        text: &str,
        language_code: &str,
        file_stem: &str,
    ) -> Result<AudioArtifact, PipelineError> {
        let chunks = split_for_tts(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(PipelineError::Speech("nothing to synthesize".into()));
        }

        let mut audio = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let url = self.chunk_url(chunk, language_code, index, chunks.len());
            debug!(index, chunk = %truncate_for_log(chunk, 60), "Requesting TTS chunk");

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| PipelineError::Speech(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(PipelineError::Speech(format!(
                    "TTS endpoint returned HTTP {}",
                    status.as_u16()
                )));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| PipelineError::Speech(e.to_string()))?;
            audio.extend_from_slice(&bytes);
        }

        let file_name = format!("{file_stem}.mp3");
        let path = self.audio_dir.join(&file_name);
        fs::create_dir_all(&self.audio_dir)
            .await
            .map_err(|e| PipelineError::Speech(e.to_string()))?;
        fs::write(&path, &audio)
            .await
            .map_err(|e| PipelineError::Speech(e.to_string()))?;

        info!(path = %path.display(), bytes = audio.len(), chunks = chunks.len(), "Wrote narration audio");
        Ok(AudioArtifact { path, file_name })
    }
}

/// Split `text` into whitespace-delimited chunks of at most `max_chars`
/// characters. A single word longer than `max_chars` is cut on a character
/// boundary.
pub fn split_for_tts(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };

        if needed <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = needed;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        if word_len <= max_chars {
            current.push_str(word);
            current_len = word_len;
        } else {
            let chars: Vec<char> = word.chars().collect();
            let pieces = chars.chunks(max_chars).map(|c| c.iter().collect::<String>());
            let mut last = String::new();
            for piece in pieces {
                if !last.is_empty() {
                    chunks.push(std::mem::take(&mut last));
                }
                last = piece;
            }
            current_len = last.chars().count();
            current = last;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Public URL for an audio artifact: `http://{host}/audio/{file_name}`.
///
/// `host` may be a bare `host:port` or a full base URL with scheme.
pub fn audio_url(host: &str, artifact: &AudioArtifact) -> Result<String, PipelineError> {
    let host = host.trim().trim_end_matches('/');
    let base = if host.contains("://") {
        format!("{host}/")
    } else {
        format!("http://{host}/")
    };
    let invalid = |e: url::ParseError| PipelineError::AudioHost {
        host: host.to_string(),
        reason: e.to_string(),
    };

    let url = Url::parse(&base)
        .and_then(|u| u.join("audio/"))
        .and_then(|u| u.join(&artifact.file_name))
        .map_err(invalid)?;
    Ok(url.to_string())
}
