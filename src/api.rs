//! LLM API interaction.
//!
//! This module wraps the `awful_aj` client for an OpenAI-compatible LLM API.
//! The LLM-backed summarizer and sentiment classifier both go through it.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait defining async LLM interaction
//! - [`TemplateAsk`]: sends text through one `awful_aj` chat template
//!
//! Every request is attempted exactly once. A failed call fails the article it
//! was made for and nothing else.

use awful_aj::api::ask;
use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::error::ArticleError;

/// Trait for async LLM interaction.
///
/// Implementors send text to an LLM and receive its reply. Tests substitute
/// canned implementations.
pub trait AskAsync {
    /// Send text to the LLM and receive a response.
    async fn ask(&self, text: &str) -> Result<String, ArticleError>;
}

/// An `awful_aj` configuration paired with one chat template.
///
/// The configuration is shared between every template client built at
/// startup; only the template differs between the summarizer and the
/// classifier.
pub struct TemplateAsk {
    /// LLM configuration (API keys, endpoints, model settings).
    config: Arc<AwfulJadeConfig>,
    /// Chat template defining the conversation structure.
    template: ChatTemplate,
    /// Template name, kept for logging.
    name: String,
}

impl TemplateAsk {
    pub fn new(config: Arc<AwfulJadeConfig>, template: ChatTemplate, name: impl Into<String>) -> Self {
        Self {
            config,
            template,
            name: name.into(),
        }
    }

    /// Load `template_name` from the `awful_aj` template directory.
    #[instrument(level = "info", skip(config))]
    pub async fn load(
        config: Arc<AwfulJadeConfig>,
        template_name: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let template = awful_aj::template::load_template(template_name).await?;
        info!(template = template_name, "Loaded template");
        Ok(Self::new(config, template, template_name))
    }
}

impl fmt::Debug for TemplateAsk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateAsk")
            .field("template", &self.name)
            .finish()
    }
}

impl AskAsync for TemplateAsk {
    #[instrument(level = "info", skip_all, fields(template = %self.name))]
    async fn ask(&self, text: &str) -> Result<String, ArticleError> {
        let t0 = Instant::now();
        let res = ask(&self.config, text.to_string(), &self.template, None, None).await;
        let dt = t0.elapsed();

        match res {
            Ok(reply) => {
                info!(elapsed_ms = dt.as_millis() as u128, "LLM call succeeded");
                Ok(reply)
            }
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "LLM call failed");
                Err(ArticleError::Llm(e.to_string()))
            }
        }
    }
}

/// Load the `awful_aj` configuration from `path`, or from `config.yaml` in the
/// `awful_aj` config directory when no path is given.
pub fn load_config(path: Option<&str>) -> Result<AwfulJadeConfig, Box<dyn std::error::Error>> {
    let conf_file = match path {
        Some(p) => std::path::PathBuf::from(p),
        None => awful_aj::config_dir()?.join("config.yaml"),
    };
    let config_path = conf_file
        .to_str()
        .ok_or("config path is not valid UTF-8")?;
    let config = awful_aj::config::load_config(config_path)?;
    info!(config_path, "Loaded configuration");
    Ok(config)
}
