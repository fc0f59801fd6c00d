//! Notification delivery for alerts

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::config::{MailConfig, ALERT_SUBJECT, SENDER_NAME};
use super::render::render_alert_html;

/// A composed alert, ready to hand to a mailer
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEmail {
    pub subject: String,
    pub html: String,
}

impl AlertEmail {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            subject: ALERT_SUBJECT.to_string(),
            html: html.into(),
        }
    }
}

/// Outbound channel for alert emails
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one email to the configured recipient
    async fn send(&self, email: &AlertEmail) -> Result<(), NotifierError>;
}

/// Sends alerts through an authenticated SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Build the relay transport. No connection is opened until the first send.
    pub fn new(config: &MailConfig) -> Result<Self, NotifierError> {
        let from = Mailbox::new(Some(SENDER_NAME.to_string()), config.account.parse()?);
        let to = Mailbox::new(None, config.recipient.parse()?);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .credentials(Credentials::new(
                config.account.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from, to })
    }

    fn build_message(&self, email: &AlertEmail) -> Result<Message, NotifierError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| NotifierError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &AlertEmail) -> Result<(), NotifierError> {
        let message = self.build_message(email)?;
        self.transport.send(message).await?;

        tracing::debug!(to = %self.to, "Alert email delivered to relay");
        Ok(())
    }
}

/// Render the alert for a reading and send it through `mailer`.
/// Exactly one email per call; failures are returned, never retried.
pub async fn render_and_send(
    mailer: &dyn Mailer,
    prediction: &str,
    values: &[Option<f64>],
) -> Result<(), NotifierError> {
    let email = AlertEmail::new(render_alert_html(prediction, values));
    mailer.send(&email).await
}

/// Notifier errors
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}
