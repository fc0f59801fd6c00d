//! Service configuration
//!
//! Everything is read from the process environment, after an optional `.env`
//! file has been loaded by the binary.
//!
//! | Variable                      | Default                          |
//! |-------------------------------|----------------------------------|
//! | `ALERT_EMAIL`                 | required                         |
//! | `ALERT_EMAIL_PASS`            | required                         |
//! | `DOCTOR_EMAIL`                | required                         |
//! | `EYEALERT_PREDICTOR_URL`      | `http://localhost:8000/predict`  |
//! | `EYEALERT_POLL_INTERVAL_SECS` | `60`                             |
//! | `EYEALERT_SMTP_HOST`          | `smtp.gmail.com`                 |
//! | `EYEALERT_HTTP_TIMEOUT_SECS`  | none                             |
//! | `EYEALERT_STATUS_ADDR`        | none (status API disabled)       |

use std::net::SocketAddr;
use std::time::Duration;

use crate::alerts::config::MailConfig;

pub const DEFAULT_PREDICTOR_URL: &str = "http://localhost:8000/predict";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Top-level configuration for the alert daemon
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub predictor_url: String,
    pub poll_interval: Duration,
    /// Request timeout for the predictor client; `None` keeps the client default
    pub http_timeout: Option<Duration>,
    /// Bind address of the status API, if enabled
    pub status_addr: Option<SocketAddr>,
    pub mail: MailConfig,
}

impl ServiceConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let predictor_url = lookup("EYEALERT_PREDICTOR_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PREDICTOR_URL.to_string());

        let poll_secs = parse_optional::<u64, _>(&lookup, "EYEALERT_POLL_INTERVAL_SECS")?
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if poll_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "EYEALERT_POLL_INTERVAL_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let http_timeout = parse_optional::<u64, _>(&lookup, "EYEALERT_HTTP_TIMEOUT_SECS")?
            .map(Duration::from_secs);
        let status_addr = parse_optional::<SocketAddr, _>(&lookup, "EYEALERT_STATUS_ADDR")?;

        let smtp_host = lookup("EYEALERT_SMTP_HOST")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());
        let mail = MailConfig::from_lookup(smtp_host, &lookup)?;

        Ok(Self {
            predictor_url,
            poll_interval: Duration::from_secs(poll_secs),
            http_timeout,
            status_addr,
            mail,
        })
    }
}

/// Fetch a required, non-empty value
pub(crate) fn require<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn parse_optional<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const SECRETS: [(&str, &str); 3] = [
        ("ALERT_EMAIL", "monitor@example.com"),
        ("ALERT_EMAIL_PASS", "app-password"),
        ("DOCTOR_EMAIL", "doctor@example.com"),
    ];

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup_from(&SECRETS)).unwrap();
        assert_eq!(config.predictor_url, DEFAULT_PREDICTOR_URL);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert!(config.http_timeout.is_none());
        assert!(config.status_addr.is_none());
        assert_eq!(config.mail.smtp_host, "smtp.gmail.com");
        assert_eq!(config.mail.recipient, "doctor@example.com");
    }

    #[test]
    fn test_overrides() {
        let mut pairs = SECRETS.to_vec();
        pairs.extend([
            ("EYEALERT_PREDICTOR_URL", "http://predictor:9000/predict"),
            ("EYEALERT_POLL_INTERVAL_SECS", "15"),
            ("EYEALERT_HTTP_TIMEOUT_SECS", "5"),
            ("EYEALERT_STATUS_ADDR", "127.0.0.1:9090"),
            ("EYEALERT_SMTP_HOST", "mail.example.com"),
        ]);
        let config = ServiceConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.predictor_url, "http://predictor:9000/predict");
        assert_eq!(config.poll_interval, Duration::from_secs(15));
        assert_eq!(config.http_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.status_addr, Some("127.0.0.1:9090".parse().unwrap()));
        assert_eq!(config.mail.smtp_host, "mail.example.com");
    }

    #[test]
    fn test_missing_secret() {
        let err = ServiceConfig::from_lookup(lookup_from(&SECRETS[..2])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DOCTOR_EMAIL")));
    }

    #[test]
    fn test_invalid_interval() {
        let mut pairs = SECRETS.to_vec();
        pairs.push(("EYEALERT_POLL_INTERVAL_SECS", "soon"));
        let err = ServiceConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { key: "EYEALERT_POLL_INTERVAL_SECS", .. }
        ));

        let mut pairs = SECRETS.to_vec();
        pairs.push(("EYEALERT_POLL_INTERVAL_SECS", "0"));
        assert!(ServiceConfig::from_lookup(lookup_from(&pairs)).is_err());
    }
}
