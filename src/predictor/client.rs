use std::time::Duration;

use async_trait::async_trait;

/// Source of raw prediction responses
#[async_trait]
pub trait PredictionSource: Send + Sync {
    /// Fetch and decode the latest response body
    async fn fetch(&self) -> Result<serde_json::Value, PredictorError>;
}

/// Fetches predictions over HTTP
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    http_client: reqwest::Client,
    url: String,
}

impl HttpPredictor {
    /// Client with reqwest's default (unbounded) timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, PredictorError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictorError::Network(e.to_string()))?;
        Ok(Self {
            http_client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PredictionSource for HttpPredictor {
    async fn fetch(&self) -> Result<serde_json::Value, PredictorError> {
        // The status code is not checked; a JSON error body still goes
        // through shape validation.
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| PredictorError::Network(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| PredictorError::Decode(e.to_string()))
    }
}

/// Predictor client errors
#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use tokio::net::TcpListener;

    async fn spawn_predictor(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/predict", addr)
    }

    #[tokio::test]
    async fn test_fetch_json() {
        let app = Router::new().route(
            "/predict",
            get(|| async {
                Json(serde_json::json!({
                    "prediction": "Abnormal",
                    "latest_values": [34.0, 0.3]
                }))
            }),
        );
        let predictor = HttpPredictor::new(spawn_predictor(app).await);

        let body = predictor.fetch().await.unwrap();
        assert_eq!(body["prediction"], "Abnormal");
        assert_eq!(body["latest_values"][1], 0.3);
    }

    #[tokio::test]
    async fn test_error_status_still_decoded() {
        let app = Router::new().route(
            "/predict",
            get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(serde_json::json!({ "error": "model not loaded" })),
                )
            }),
        );
        let predictor = HttpPredictor::new(spawn_predictor(app).await);

        let body = predictor.fetch().await.unwrap();
        assert_eq!(body["error"], "model not loaded");
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let app = Router::new().route("/predict", get(|| async { "<html>oops</html>" }));
        let predictor = HttpPredictor::new(spawn_predictor(app).await);

        let err = predictor.fetch().await.unwrap_err();
        assert!(matches!(err, PredictorError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let predictor =
            HttpPredictor::with_timeout(format!("http://{}/predict", addr), Duration::from_secs(2))
                .unwrap();
        let err = predictor.fetch().await.unwrap_err();
        assert!(matches!(err, PredictorError::Network(_)));
    }
}
