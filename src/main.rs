//! Eyealert daemon
//!
//! Run with: cargo run
//!
//! Environment variables (a `.env` file in the working directory is honored):
//! - ALERT_EMAIL: Sending account on the mail relay (required)
//! - ALERT_EMAIL_PASS: Credential for ALERT_EMAIL (required)
//! - DOCTOR_EMAIL: Alert recipient (required)
//! - EYEALERT_PREDICTOR_URL: Prediction endpoint (default: http://localhost:8000/predict)
//! - EYEALERT_POLL_INTERVAL_SECS: Seconds between polls (default: 60)
//! - EYEALERT_SMTP_HOST: SMTP relay host (default: smtp.gmail.com)
//! - EYEALERT_HTTP_TIMEOUT_SECS: Predictor request timeout (default: none)
//! - EYEALERT_STATUS_ADDR: Bind address for the status API, e.g. 127.0.0.1:9090 (default: disabled)
//! - RUST_LOG: Log level (default: info)

use std::sync::Arc;

use eyealert::alerts::{AlertChecker, PollWorker, SmtpMailer};
use eyealert::api::{run_status_server, AppState};
use eyealert::predictor::HttpPredictor;
use eyealert::ServiceConfig;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Missing .env is fine; real deployments set the environment directly
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eyealert=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = ServiceConfig::from_env()?;

    tracing::info!("Eyealert configuration:");
    tracing::info!("  Predictor: {}", config.predictor_url);
    tracing::info!("  Poll interval: {:?}", config.poll_interval);
    tracing::info!("  SMTP relay: {}", config.mail.smtp_host);
    tracing::info!("  Recipient: {}", config.mail.recipient);
    match config.status_addr {
        Some(addr) => tracing::info!("  Status API: {}", addr),
        None => tracing::info!("  Status API: DISABLED"),
    }

    let predictor = match config.http_timeout {
        Some(timeout) => HttpPredictor::with_timeout(&config.predictor_url, timeout)?,
        None => HttpPredictor::new(&config.predictor_url),
    };
    let mailer = SmtpMailer::new(&config.mail)?;
    let checker = Arc::new(AlertChecker::new(Arc::new(predictor), Arc::new(mailer)));

    let mut worker = PollWorker::new(Arc::clone(&checker), config.poll_interval);
    let worker_handle = worker.start();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server_handle = config.status_addr.map(|addr| {
        let state = Arc::new(AppState {
            alert_state: checker.state_handle(),
        });
        let mut rx = shutdown_rx.clone();
        tokio::spawn(async move {
            let shutdown = async move {
                let _ = rx.changed().await;
            };
            if let Err(e) = run_status_server(addr, state, shutdown).await {
                tracing::error!(error = %e, "Status API failed");
            }
        })
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping worker...");

    worker.stop().await;
    let _ = shutdown_tx.send(true);

    worker_handle.await?;
    if let Some(handle) = server_handle {
        handle.await?;
    }

    let state = checker.state();
    tracing::info!(
        polls = state.polls,
        alerts_sent = state.alerts_sent,
        "Eyealert stopped"
    );
    Ok(())
}
