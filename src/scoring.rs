//! Client for the external mood-scoring service.
//!
//! The service takes `{content, title}` and answers `{moodScore, advice}`.
//! Transport failures, timeouts, non-2xx answers and malformed bodies all map
//! to a [`ScoringError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const MAX_MOOD_SCORE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MoodAnalysis {
    pub mood_score: f64,
    pub advice: String,
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ScoreProvider: Send + Sync {
    async fn analyze(&self, content: &str, title: &str) -> Result<MoodAnalysis, ScoringError>;
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    content: &'a str,
    title: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    mood_score: Option<f64>,
    advice: Option<String>,
}

/// Scorer that POSTs JSON to one endpoint with a bounded timeout.
pub struct HttpScoreProvider {
    client: Client,
    endpoint: Url,
}

impl HttpScoreProvider {
    pub fn new(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl ScoreProvider for HttpScoreProvider {
    async fn analyze(&self, content: &str, title: &str) -> Result<MoodAnalysis, ScoringError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&AnalyzeRequest { content, title })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoringError::Status(status));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        let analysis = parse_analysis(body.as_ref())?;
        debug!(mood_score = analysis.mood_score, "entry scored");
        Ok(analysis)
    }
}

fn map_transport_error(error: reqwest::Error) -> ScoringError {
    if error.is_timeout() {
        ScoringError::Timeout
    } else {
        ScoringError::Transport(error.to_string())
    }
}

fn parse_analysis(body: &[u8]) -> Result<MoodAnalysis, ScoringError> {
    let raw: AnalyzeResponse =
        serde_json::from_slice(body).map_err(|e| ScoringError::Malformed(e.to_string()))?;
    let mood_score = raw
        .mood_score
        .ok_or_else(|| ScoringError::Malformed("moodScore missing".into()))?;
    if !mood_score.is_finite() || !(0.0..=MAX_MOOD_SCORE).contains(&mood_score) {
        return Err(ScoringError::Malformed(format!(
            "moodScore {mood_score} out of range"
        )));
    }
    let advice = raw
        .advice
        .ok_or_else(|| ScoringError::Malformed("advice missing".into()))?;
    Ok(MoodAnalysis { mood_score, advice })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_response() {
        let body = br#"{"moodScore": 6.4, "advice": "Go for a walk."}"#;
        let analysis = parse_analysis(body).expect("parse");
        assert_eq!(analysis.mood_score, 6.4);
        assert_eq!(analysis.advice, "Go for a walk.");
    }

    #[test]
    fn rejects_missing_score() {
        let err = parse_analysis(br#"{"advice": "hi"}"#).unwrap_err();
        assert!(matches!(err, ScoringError::Malformed(_)));
    }

    #[test]
    fn rejects_out_of_range_score() {
        let err = parse_analysis(br#"{"moodScore": 11.5, "advice": "hi"}"#).unwrap_err();
        assert!(matches!(err, ScoringError::Malformed(_)));
        let err = parse_analysis(br#"{"moodScore": -1, "advice": "hi"}"#).unwrap_err();
        assert!(matches!(err, ScoringError::Malformed(_)));
    }

    #[test]
    fn rejects_non_json() {
        let err = parse_analysis(b"<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ScoringError::Malformed(_)));
    }

    #[test]
    fn new_rejects_invalid_endpoint() {
        assert!(HttpScoreProvider::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let scorer = HttpScoreProvider::new("http://127.0.0.1:9/analyze", Duration::from_secs(2))
            .expect("client");
        let err = scorer.analyze("content", "title").await.unwrap_err();
        assert!(matches!(err, ScoringError::Transport(_) | ScoringError::Timeout));
    }

    /// Local stand-in for the scoring service.
    async fn spawn_scoring_stub() -> String {
        use axum::{http::StatusCode as AxumStatus, routing::post, Json, Router};
        use serde_json::{json, Value};

        let app = Router::new()
            .route("/down", post(|| async { AxumStatus::BAD_GATEWAY }))
            .route(
                "/slow",
                post(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Json(json!({"moodScore": 5, "advice": "late"}))
                }),
            )
            .route(
                "/echo",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({"moodScore": 4.5, "advice": body.to_string()}))
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let base = spawn_scoring_stub().await;
        let scorer =
            HttpScoreProvider::new(&format!("{base}/down"), Duration::from_secs(2)).unwrap();
        let err = scorer.analyze("content", "title").await.unwrap_err();
        assert!(matches!(err, ScoringError::Status(s) if s == StatusCode::BAD_GATEWAY));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let base = spawn_scoring_stub().await;
        let scorer =
            HttpScoreProvider::new(&format!("{base}/slow"), Duration::from_millis(200)).unwrap();
        let err = scorer.analyze("content", "title").await.unwrap_err();
        assert!(matches!(err, ScoringError::Timeout), "got {err:?}");
    }

    #[tokio::test]
    async fn request_body_carries_content_and_title() {
        let base = spawn_scoring_stub().await;
        let scorer =
            HttpScoreProvider::new(&format!("{base}/echo"), Duration::from_secs(2)).unwrap();
        let analysis = scorer.analyze("Slept well", "Morning").await.unwrap();
        assert_eq!(analysis.mood_score, 4.5);
        let sent: serde_json::Value = serde_json::from_str(&analysis.advice).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({"content": "Slept well", "title": "Morning"})
        );
    }
}
