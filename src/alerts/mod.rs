//! Eye-health alerting
//!
//! Polls the predictor, debounces on two consecutive abnormal readings and
//! emails a rendered parameter table to the configured recipient.

pub mod checker;
pub mod config;
pub mod notifier;
pub mod render;

pub use checker::{should_alert, AlertChecker, CheckError, PollOutcome, PollWorker};
pub use config::{AlertState, MailConfig, ParameterDefinition, PARAMETERS};
pub use notifier::{render_and_send, AlertEmail, Mailer, NotifierError, SmtpMailer};
pub use render::{classify, render_alert_html, ParameterRow, RowStatus};
