//! HTTP surface for report generation.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /analyze` | `{"company": "Tesla"}` → [`CompanyReport`] |
//! | `GET /audio/{file}` | narration MP3s from the audio directory |
//! | `GET /health` | liveness check |
//!
//! The `audio_url` of every report points at `/audio/`, so the audio
//! directory given here must be the one the speech engine writes to.

use crate::analysis::{SentimentClassifier, Summarizer, TopicRanker};
use crate::error::PipelineError;
use crate::models::CompanyReport;
use crate::pipeline::Services;
use crate::sources::{NewsSearch, PageExtractor};
use crate::speech::SpeechSynthesizer;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::error::Error;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub company: String,
}

/// Request failure rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        let status = match &e {
            PipelineError::InvalidCompany => StatusCode::BAD_REQUEST,
            PipelineError::Fetch(_) | PipelineError::Speech(_) => StatusCode::BAD_GATEWAY,
            PipelineError::AudioHost { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Build the router over shared collaborators.
pub fn router<N, E, S, C, R, T>(services: Arc<Services<N, E, S, C, R, T>>, audio_dir: &str) -> Router
where
    N: NewsSearch + Send + Sync + 'static,
    E: PageExtractor + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    C: SentimentClassifier + Send + Sync + 'static,
    R: TopicRanker + Send + Sync + 'static,
    T: SpeechSynthesizer + Send + Sync + 'static,
{
    Router::new()
        .route("/analyze", post(analyze::<N, E, S, C, R, T>))
        .route("/health", get(health))
        .nest_service("/audio", ServeDir::new(audio_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(services)
}

/// Run one pipeline request.
///
/// The collaborator futures are not required to be `Send`, so the pipeline is
/// driven to completion on a blocking-pool thread.
async fn analyze<N, E, S, C, R, T>(
    State(services): State<Arc<Services<N, E, S, C, R, T>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<CompanyReport>, ApiError>
where
    N: NewsSearch + Send + Sync + 'static,
    E: PageExtractor + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    C: SentimentClassifier + Send + Sync + 'static,
    R: TopicRanker + Send + Sync + 'static,
    T: SpeechSynthesizer + Send + Sync + 'static,
{
    let handle = tokio::runtime::Handle::current();
    let result = tokio::task::spawn_blocking(move || {
        handle.block_on(services.pipeline().run(&request.company))
    })
    .await
    .map_err(|e| ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: format!("report task failed: {e}"),
    })?;

    match result {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            warn!(error = %e, "Analyze request failed");
            Err(e.into())
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Listen on `bind` until the process is stopped.
pub async fn serve<N, E, S, C, R, T>(
    services: Services<N, E, S, C, R, T>,
    audio_dir: &str,
    bind: &str,
) -> Result<(), Box<dyn Error>>
where
    N: NewsSearch + Send + Sync + 'static,
    E: PageExtractor + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    C: SentimentClassifier + Send + Sync + 'static,
    R: TopicRanker + Send + Sync + 'static,
    T: SpeechSynthesizer + Send + Sync + 'static,
{
    let app = router(Arc::new(services), audio_dir);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, audio_dir, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fakes::analyzer;
    use crate::error::ArticleError;
    use crate::models::{ArticleReference, ExtractedArticle};
    use crate::narration::Language;
    use crate::speech::AudioArtifact;
    use axum::body::Body;
    use axum::http::Request;
    use std::path::PathBuf;
    use tower::ServiceExt;

    struct OneHit;

    impl NewsSearch for OneHit {
        async fn search(&self, _company: &str) -> Result<Vec<ArticleReference>, PipelineError> {
            Ok(vec![ArticleReference {
                url: "https://www.reuters.com/tesla".to_string(),
                title: Some("Tesla sets a record".to_string()),
                description: None,
            }])
        }
    }

    struct NoSearch;

    impl NewsSearch for NoSearch {
        async fn search(&self, _company: &str) -> Result<Vec<ArticleReference>, PipelineError> {
            Err(PipelineError::Fetch("HTTP 500".into()))
        }
    }

    struct Echo;

    impl PageExtractor for Echo {
        async fn extract(&self, reference: &ArticleReference) -> Result<ExtractedArticle, ArticleError> {
            Ok(ExtractedArticle {
                url: reference.url.clone(),
                title: reference.title.clone().unwrap_or_default(),
                text: "Tesla sets a record. Deliveries rose.".to_string(),
            })
        }
    }

    struct NamedAudio;

    impl SpeechSynthesizer for NamedAudio {
        async fn synthesize(
            &self,
            _text: &str,
            _language_code: &str,
            file_stem: &str,
        ) -> Result<AudioArtifact, PipelineError> {
            Ok(AudioArtifact {
                path: PathBuf::from(format!("/srv/audio/{file_stem}.mp3")),
                file_name: format!("{file_stem}.mp3"),
            })
        }
    }

    fn app<N>(search: N, audio_dir: &str) -> Router
    where
        N: NewsSearch + Send + Sync + 'static,
    {
        let services = Services {
            search,
            extractor: Echo,
            analyzer: analyzer(),
            speech: NamedAudio,
            language: Language::English,
            audio_host: "localhost:8000".to_string(),
            fetch_concurrency: 2,
        };
        router(Arc::new(services), audio_dir)
    }

    fn analyze_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_analyze_returns_report() {
        let resp = app(OneHit, "audio")
            .oneshot(analyze_request(r#"{"company": "Tesla"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = json_body(resp).await;
        assert_eq!(json["company"], "Tesla");
        assert_eq!(json["articles"].as_array().unwrap().len(), 1);
        assert_eq!(json["articles"][0]["sentiment"], "Positive");
        assert_eq!(json["articles"][0]["source"], "reuters");
        assert_eq!(json["comparative_sentiment"]["sentiment_distribution"]["Positive"], 1);
        assert_eq!(json["audio_url"], "http://localhost:8000/audio/tesla.mp3");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_analyze_rejects_bad_company() {
        let resp = app(OneHit, "audio")
            .oneshot(analyze_request(r#"{"company": "???"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        assert!(json["error"].as_str().unwrap().contains("company name"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_analyze_search_failure_is_bad_gateway() {
        let resp = app(NoSearch, "audio")
            .oneshot(analyze_request(r#"{"company": "Tesla"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_audio_directory_is_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tesla.mp3"), b"ID3fake").unwrap();

        let req = Request::builder()
            .uri("/audio/tesla.mp3")
            .body(Body::empty())
            .unwrap();
        let resp = app(OneHit, dir.path().to_str().unwrap())
            .oneshot(req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), 1_000).await.unwrap();
        assert_eq!(&body[..], b"ID3fake");

        let req = Request::builder()
            .uri("/audio/missing.mp3")
            .body(Body::empty())
            .unwrap();
        let resp = app(OneHit, dir.path().to_str().unwrap())
            .oneshot(req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app(OneHit, "audio").oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["status"], "ok");
    }
}
