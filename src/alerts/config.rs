//! Alert configuration types

use serde::{Deserialize, Serialize};

use crate::config::{require, ConfigError};

/// Prediction label that arms and fires the alert latch
pub const ABNORMAL: &str = "Abnormal";

/// Subject line of every alert email
pub const ALERT_SUBJECT: &str = "🚨 Eye Health Alert – Abnormal Reading";

/// Display name used for the sending mailbox
pub const SENDER_NAME: &str = "Eye Monitor";

/// Definition of one monitored eye metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterDefinition {
    pub name: &'static str,
    /// Display unit, empty for dimensionless indices
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
}

impl ParameterDefinition {
    /// Whether a measured value falls inside the inclusive normal range.
    /// A missing value is never normal.
    pub fn is_normal(&self, value: Option<f64>) -> bool {
        matches!(value, Some(v) if v >= self.min && v <= self.max)
    }
}

/// Fixed parameter table. Index `i` of a prediction's `latest_values`
/// always refers to entry `i` here.
pub const PARAMETERS: [ParameterDefinition; 7] = [
    ParameterDefinition { name: "Eye Surface Temperature", unit: "°C", min: 33.0, max: 36.0 },
    ParameterDefinition { name: "Ocular Redness Index", unit: "", min: 0.0, max: 1.5 },
    ParameterDefinition { name: "Tear Film Stability", unit: "sec", min: 10.0, max: 30.0 },
    ParameterDefinition { name: "Perfusion Index", unit: "%", min: 3.0, max: 20.0 },
    ParameterDefinition { name: "Ocular Oxygenation Level", unit: "%", min: 92.0, max: 100.0 },
    ParameterDefinition { name: "Tissue Health Index", unit: "", min: 70.0, max: 100.0 },
    ParameterDefinition { name: "Ocular Hydration Index", unit: "%", min: 60.0, max: 100.0 },
];

/// Mail relay settings
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP relay hostname
    pub smtp_host: String,
    /// Sending account, also used as the From address
    pub account: String,
    /// Credential for the sending account
    pub password: String,
    /// Single alert recipient
    pub recipient: String,
}

impl MailConfig {
    /// Read the relay credentials and recipient:
    /// ALERT_EMAIL, ALERT_EMAIL_PASS and DOCTOR_EMAIL
    pub fn from_lookup<F>(smtp_host: impl Into<String>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            smtp_host: smtp_host.into(),
            account: require(&lookup, "ALERT_EMAIL")?,
            password: require(&lookup, "ALERT_EMAIL_PASS")?,
            recipient: require(&lookup, "DOCTOR_EMAIL")?,
        })
    }
}

/// In-memory alert state. `last_status` is the latch; the rest is bookkeeping
/// for the status endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertState {
    /// Prediction label seen by the last successful poll
    pub last_status: Option<String>,
    /// Last completed poll, successful or not (unix millis)
    pub last_checked: Option<i64>,
    /// Last time an alert email went out (unix millis)
    pub last_alert_sent: Option<i64>,
    /// Alert emails sent since start
    pub alerts_sent: u64,
    /// Polls attempted since start
    pub polls: u64,
    /// Polls dropped because of a malformed response
    pub skipped: u64,
    /// Message of the most recent failed poll
    pub last_error: Option<String>,
}
