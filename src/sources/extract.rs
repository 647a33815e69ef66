//! Generic HTML article extraction.
//!
//! Publishers do not share markup, so extraction is heuristic:
//!
//! - **Title**: `og:title` meta tag, then `<title>`, then the first `<h1>`,
//!   then the headline the search provider reported.
//! - **Body**: paragraphs inside `<article>`; when there are none, every `<p>`
//!   on the page; when the page has no paragraph text at all, the teaser the
//!   search provider reported. Whitespace inside a paragraph is collapsed and
//!   paragraphs are joined with newlines.

use super::PageExtractor;
use crate::error::ArticleError;
use crate::models::{ArticleReference, ExtractedArticle};
use once_cell::sync::Lazy;
use reqwest::Client;
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("valid selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid selector"));
static ARTICLE_P: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article p").expect("valid selector"));
static ANY_P: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("valid selector"));

#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    client: Client,
}

impl HtmlExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PageExtractor for HtmlExtractor {
    #[instrument(level = "info", skip_all, fields(url = %reference.url))]
    async fn extract(&self, reference: &ArticleReference) -> Result<ExtractedArticle, ArticleError> {
        let response = self.client.get(&reference.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ArticleError::Status(status.as_u16()));
        }
        let body = response.text().await?;

        let article = parse_article_html(reference, &body)?;
        info!(bytes = article.text.len(), "Parsed article");
        Ok(article)
    }
}

/// Text of `element` with whitespace runs collapsed. Inline markup
/// (`<a>`, `<b>`, `<i>`) does not split words.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().split_whitespace().join(" ")
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(element_text)
        .find(|t| !t.is_empty())
}

fn paragraphs(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Extract title and body text from an article page.
pub fn parse_article_html(
    reference: &ArticleReference,
    html: &str,
) -> Result<ExtractedArticle, ArticleError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&OG_TITLE)
        .filter_map(|m| m.value().attr("content"))
        .map(|c| c.trim().to_string())
        .find(|c| !c.is_empty())
        .or_else(|| first_text(&document, &TITLE))
        .or_else(|| first_text(&document, &H1))
        .or_else(|| reference.title.clone())
        .unwrap_or_else(|| reference.url.clone());

    let mut body = paragraphs(&document, &ARTICLE_P);
    if body.is_empty() {
        body = paragraphs(&document, &ANY_P);
    }
    let text = if body.is_empty() {
        match reference.description.as_deref().map(str::trim) {
            Some(teaser) if !teaser.is_empty() => {
                debug!("No paragraph text; using the search teaser");
                teaser.to_string()
            }
            _ => return Err(ArticleError::EmptyContent),
        }
    } else {
        body.join("\n")
    };

    Ok(ExtractedArticle {
        url: reference.url.clone(),
        title,
        text,
    })
}
