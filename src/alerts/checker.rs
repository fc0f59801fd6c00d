//! Alert checker and its polling worker

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, MissedTickBehavior};

use super::config::{AlertState, ABNORMAL};
use super::notifier::{render_and_send, Mailer, NotifierError};
use crate::predictor::{Malformed, PredictionReading, PredictionSource, PredictorError};

/// Result of a single poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Second consecutive abnormal reading; an alert email was sent
    Alerted,
    /// Reading stored, no alert due
    Recorded,
    /// Response had the wrong shape; state untouched
    Skipped(Malformed),
    /// Fetch, decode or send failed; state untouched
    Failed(String),
}

/// Whether a reading should fire an alert given the previously stored label.
/// Requires two consecutive abnormal observations.
pub fn should_alert(current: &str, previous: Option<&str>) -> bool {
    current == ABNORMAL && previous == Some(ABNORMAL)
}

/// Polls the predictor and emails on consecutive abnormal readings
pub struct AlertChecker {
    source: Arc<dyn PredictionSource>,
    mailer: Arc<dyn Mailer>,
    /// Latch plus bookkeeping, shared with the status API
    state: Arc<RwLock<AlertState>>,
    /// Serializes polls so overlapping ticks cannot interleave read and write of the latch
    poll_lock: Mutex<()>,
}

impl AlertChecker {
    /// Create a checker with an unset latch
    pub fn new(source: Arc<dyn PredictionSource>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            source,
            mailer,
            state: Arc::new(RwLock::new(AlertState::default())),
            poll_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> AlertState {
        self.state.read().clone()
    }

    /// Shared handle to the state, for read-only consumers
    pub fn state_handle(&self) -> Arc<RwLock<AlertState>> {
        Arc::clone(&self.state)
    }

    /// Last prediction label recorded by a successful poll
    pub fn last_status(&self) -> Option<String> {
        self.state.read().last_status.clone()
    }

    /// Run one poll. Never fails: errors are logged and reported in the outcome.
    pub async fn poll_and_maybe_alert(&self) -> PollOutcome {
        let _guard = self.poll_lock.lock().await;

        let outcome = match self.check().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Alert check failed");
                PollOutcome::Failed(e.to_string())
            }
        };

        self.record(&outcome);
        outcome
    }

    async fn check(&self) -> Result<PollOutcome, CheckError> {
        let body = self.source.fetch().await?;

        let reading = match PredictionReading::from_json(&body) {
            Ok(reading) => reading,
            Err(reason) => {
                tracing::warn!(reason = %reason, "Skipping malformed prediction response");
                return Ok(PollOutcome::Skipped(reason));
            }
        };

        let previous = self.state.read().last_status.clone();
        let alert = should_alert(&reading.prediction, previous.as_deref());

        if alert {
            render_and_send(self.mailer.as_ref(), &reading.prediction, &reading.values).await?;
            tracing::warn!(prediction = %reading.prediction, "Alert email sent");
        } else {
            tracing::debug!(
                prediction = %reading.prediction,
                previous = ?previous,
                "No alert due"
            );
        }

        self.state.write().last_status = Some(reading.prediction);

        Ok(if alert {
            PollOutcome::Alerted
        } else {
            PollOutcome::Recorded
        })
    }

    fn record(&self, outcome: &PollOutcome) {
        let now = chrono::Utc::now().timestamp_millis();
        let mut state = self.state.write();
        state.polls += 1;
        state.last_checked = Some(now);

        match outcome {
            PollOutcome::Alerted => {
                state.alerts_sent += 1;
                state.last_alert_sent = Some(now);
                state.last_error = None;
            }
            PollOutcome::Recorded => {
                state.last_error = None;
            }
            PollOutcome::Skipped(_) => {
                state.skipped += 1;
            }
            PollOutcome::Failed(message) => {
                state.last_error = Some(message.clone());
            }
        }
    }
}

/// Shortest period accepted by [`PollWorker`]; `tokio::time::interval` panics on zero
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Drives an [`AlertChecker`] on a fixed interval
pub struct PollWorker {
    checker: Arc<AlertChecker>,
    interval: Duration,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl PollWorker {
    /// Create a worker. Periods below [`MIN_POLL_INTERVAL`] are clamped to it.
    pub fn new(checker: Arc<AlertChecker>, interval: Duration) -> Self {
        if interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                "Poll interval {:?} too short, using {:?}",
                interval,
                MIN_POLL_INTERVAL
            );
        }
        Self {
            checker,
            interval: interval.max(MIN_POLL_INTERVAL),
            shutdown_tx: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling in the background. The first poll runs immediately.
    pub fn start(&mut self) -> tokio::task::JoinHandle<()> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        self.shutdown_tx = Some(shutdown_tx);

        let checker = Arc::clone(&self.checker);
        let period = self.interval;

        tokio::spawn(async move {
            tracing::info!("Poll worker started with interval {:?}", period);

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        checker.poll_and_maybe_alert().await;
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Poll worker shutting down");
                        break;
                    }
                }
            }
        })
    }

    /// Stop the background worker
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
    }
}

/// Alert check errors
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Predictor error: {0}")]
    Predictor(#[from] PredictorError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifierError),
}
