//! Authenticated STARTTLS submission through `lettre`.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{SmtpConfig, SmtpTls};
use crate::{Alert, Notifier, NotifyError, log_failure};

/// Sends alerts through an SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: String,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from.to_string())
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

impl SmtpNotifier {
    /// Builds a notifier for the configured relay.
    ///
    /// No connection is made until the first alert is sent.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Address`] if the sender or default recipient
    /// is malformed, or [`NotifyError::Connection`] if the relay host is
    /// unusable for TLS.
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let from = parse_mailbox(&config.from)?;
        parse_mailbox(&config.to)?;

        let builder = match config.tls {
            SmtpTls::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| NotifyError::Connection(e.to_string()))?
            }
            SmtpTls::None => {
                log::warn!("SMTP_TLS=none: alerts to {} are sent unencrypted", config.host);
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();

        Ok(Self {
            transport,
            from,
            to: config.to.clone(),
        })
    }

    /// Sends one alert and reports the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] describing why delivery failed.
    pub async fn try_send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let message = build_message(&self.from, alert)?;
        self.transport.send(message).await.map_err(classify)?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    fn default_recipient(&self) -> &str {
        &self.to
    }

    async fn send_alert(&self, alert: &Alert) {
        match self.try_send(alert).await {
            Ok(()) => log::info!("Alert '{}' sent to {}", alert.subject, alert.recipient),
            Err(e) => log_failure(alert, &e),
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|e: lettre::address::AddressError| NotifyError::Address {
        address: address.to_string(),
        message: e.to_string(),
    })
}

/// Assembles a plain-text message.
pub(crate) fn build_message(from: &Mailbox, alert: &Alert) -> Result<Message, NotifyError> {
    Ok(Message::builder()
        .from(from.clone())
        .to(parse_mailbox(&alert.recipient)?)
        .subject(alert.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(alert.body.clone())?)
}

/// Maps a transport error onto the alert failure classes.
///
/// SMTP 53x replies are authentication failures. Any other reply from the
/// relay is a rejection. Errors without a reply (DNS, TCP, TLS, timeouts)
/// are connection failures.
fn classify(err: lettre::transport::smtp::Error) -> NotifyError {
    match err.status() {
        Some(code) if code.to_string().starts_with("53") => NotifyError::Auth(err.to_string()),
        Some(_) => NotifyError::Rejected(err.to_string()),
        None if err.is_permanent() || err.is_transient() => NotifyError::Rejected(err.to_string()),
        None => NotifyError::Connection(err.to_string()),
    }
}
