use axum::{routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{alert_status, health_check, AppState};

/// Build the status router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(alert_status))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the status API until `shutdown` resolves
pub async fn run_status_server<F>(
    addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Status API listening on {}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertState;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use parking_lot::RwLock;
    use tower::util::ServiceExt;

    fn create_test_app(alert_state: AlertState) -> Router {
        build_router(Arc::new(AppState {
            alert_state: Arc::new(RwLock::new(alert_state)),
        }))
    }

    #[tokio::test]
    async fn test_health() {
        let response = create_test_app(AlertState::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_status_snapshot() {
        let state = AlertState {
            last_status: Some("Abnormal".to_string()),
            alerts_sent: 2,
            polls: 5,
            ..Default::default()
        };
        let response = create_test_app(state)
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let snapshot: AlertState = serde_json::from_slice(&body).unwrap();
        assert_eq!(snapshot.last_status.as_deref(), Some("Abnormal"));
        assert_eq!(snapshot.alerts_sent, 2);
        assert_eq!(snapshot.polls, 5);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = create_test_app(AlertState::default())
            .oneshot(Request::get("/predict").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
