#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Email alerts for high-severity predictions.
//!
//! Alerts are fire-and-forget: [`Notifier::send_alert`] never fails. Any
//! delivery problem (bad credentials, unreachable relay, rejected message)
//! is classified, logged and dropped so it can never break the request
//! that triggered it.
//!
//! [`SmtpNotifier`] submits through an authenticated STARTTLS relay
//! configured from the environment (see [`config::SmtpConfig`]). When no
//! relay is configured, [`DisabledNotifier`] logs alerts instead.

pub mod config;
pub mod smtp;

use async_trait::async_trait;
use thiserror::Error;

pub use config::{SmtpConfig, SmtpTls};
pub use smtp::SmtpNotifier;

/// Subject used for high tsunami severity alerts.
pub const TSUNAMI_ALERT_SUBJECT: &str = "Tsunami Alert";

/// Body used for high tsunami severity alerts.
pub const TSUNAMI_ALERT_BODY: &str = "Warning: High Tsunami Vulnerability Detected!";

/// An alert email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Recipient address.
    pub recipient: String,
}

impl Alert {
    /// Creates an alert.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            recipient: recipient.into(),
        }
    }

    /// The standard high tsunami severity alert.
    #[must_use]
    pub fn tsunami_high(recipient: impl Into<String>) -> Self {
        Self::new(TSUNAMI_ALERT_SUBJECT, TSUNAMI_ALERT_BODY, recipient)
    }
}

/// Why an alert could not be delivered.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The relay rejected the credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The relay could not be reached or the TLS/SMTP session broke.
    #[error("Failed to connect to the mail relay: {0}")]
    Connection(String),

    /// The relay answered but refused the message.
    #[error("Mail relay rejected the message: {0}")]
    Rejected(String),

    /// A sender or recipient address is malformed.
    #[error("Invalid address '{address}': {message}")]
    Address {
        /// The offending address.
        address: String,
        /// Parser message.
        message: String,
    },

    /// The message could not be assembled.
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP settings are incomplete or malformed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },
}

/// Delivers alerts on a best-effort basis.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Address alerts go to when the caller has no specific recipient.
    fn default_recipient(&self) -> &str;

    /// Attempts delivery once. Failures are logged, never returned.
    async fn send_alert(&self, alert: &Alert);
}

/// Notifier used when no mail relay is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledNotifier {
    recipient: String,
}

impl DisabledNotifier {
    /// Creates a notifier that only logs.
    #[must_use]
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }
}

#[async_trait]
impl Notifier for DisabledNotifier {
    fn default_recipient(&self) -> &str {
        &self.recipient
    }

    async fn send_alert(&self, alert: &Alert) {
        log::warn!(
            "Email alerts are disabled; dropping alert '{}' for {}",
            alert.subject,
            alert.recipient
        );
    }
}

/// Logs a delivery failure with a hint matching its class.
pub(crate) fn log_failure(alert: &Alert, err: &NotifyError) {
    match err {
        NotifyError::Auth(_) => log::error!(
            "Alert '{}' not sent: {err}. Check SMTP_USERNAME and SMTP_PASSWORD.",
            alert.subject
        ),
        NotifyError::Connection(_) => log::error!(
            "Alert '{}' not sent: {err}. Check SMTP_HOST and SMTP_PORT.",
            alert.subject
        ),
        _ => log::error!("Alert '{}' not sent: {err}", alert.subject),
    }
}
