//! Eyealert: Eye-Health Prediction Alerting
//!
//! Periodically polls an eye-health prediction service and emails an HTML
//! alert to a single recipient when the prediction is "Abnormal" on two
//! consecutive checks.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use eyealert::alerts::{AlertChecker, MailConfig, SmtpMailer};
//! use eyealert::predictor::HttpPredictor;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mail = MailConfig::from_lookup("smtp.gmail.com", |key| std::env::var(key).ok())?;
//! let checker = AlertChecker::new(
//!     Arc::new(HttpPredictor::new("http://localhost:8000/predict")),
//!     Arc::new(SmtpMailer::new(&mail)?),
//! );
//!
//! // Call on whatever schedule suits; polls are serialized internally
//! let outcome = checker.poll_and_maybe_alert().await;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod api;
pub mod config;
pub mod predictor;

// Re-export commonly used types
pub use alerts::{AlertChecker, AlertState, PollOutcome, PollWorker};
pub use config::{ConfigError, ServiceConfig};
pub use predictor::{HttpPredictor, PredictionReading, PredictionSource};
