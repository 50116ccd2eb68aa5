//! SMTP relay settings.
//!
//! Read from the environment so credentials never live in source:
//!
//! | Variable             | Meaning                        | Default |
//! |----------------------|--------------------------------|---------|
//! | `SMTP_HOST`          | relay host; unset disables mail | -       |
//! | `SMTP_PORT`          | submission port                 | 587     |
//! | `SMTP_USERNAME`      | login user                      | -       |
//! | `SMTP_PASSWORD`      | login password / app password   | -       |
//! | `ALERT_FROM`         | sender address                  | `SMTP_USERNAME` |
//! | `ALERT_TO`           | default recipient               | -       |
//! | `SMTP_TIMEOUT_SECS`  | connect/command timeout         | 10      |
//! | `SMTP_TLS`           | `starttls` or `none`            | `starttls` |
//!
//! `SMTP_TLS=none` talks plain SMTP and is only meant for local relays
//! such as a development mail catcher.

use std::time::Duration;

use crate::NotifyError;

const DEFAULT_PORT: u16 = 587;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Transport security for the relay connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SmtpTls {
    /// Upgrade with `STARTTLS` before authenticating.
    #[default]
    StartTls,
    /// Plain SMTP without encryption.
    None,
}

/// Connection and addressing settings for [`crate::SmtpNotifier`].
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    /// Relay host name.
    pub host: String,
    /// Submission port (STARTTLS).
    pub port: u16,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Sender address.
    pub from: String,
    /// Default recipient address.
    pub to: String,
    /// Timeout applied to the SMTP session.
    pub timeout: Duration,
    /// Transport security.
    pub tls: SmtpTls,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("timeout", &self.timeout)
            .field("tls", &self.tls)
            .finish()
    }
}

impl SmtpConfig {
    /// Reads settings from the process environment.
    ///
    /// Returns `Ok(None)` when `SMTP_HOST` is unset, meaning alerts are
    /// disabled.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Config`] if the relay is configured but a
    /// required value is missing or malformed.
    pub fn from_env() -> Result<Option<Self>, NotifyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`SmtpConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<Self>, NotifyError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(host) = get("SMTP_HOST") else {
            return Ok(None);
        };

        let port = match get("SMTP_PORT") {
            Some(p) => p.trim().parse().map_err(|_| config_error(format!(
                "SMTP_PORT must be a port number, got '{p}'"
            )))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("SMTP_TIMEOUT_SECS") {
            Some(s) => s.trim().parse().map_err(|_| config_error(format!(
                "SMTP_TIMEOUT_SECS must be an integer, got '{s}'"
            )))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let tls = match get("SMTP_TLS").map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("starttls") => SmtpTls::StartTls,
            Some("none") => SmtpTls::None,
            Some(other) => {
                return Err(config_error(format!(
                    "SMTP_TLS must be 'starttls' or 'none', got '{other}'"
                )));
            }
        };

        let username =
            get("SMTP_USERNAME").ok_or_else(|| config_error("SMTP_USERNAME is required".into()))?;
        let password =
            get("SMTP_PASSWORD").ok_or_else(|| config_error("SMTP_PASSWORD is required".into()))?;
        let from = get("ALERT_FROM").unwrap_or_else(|| username.clone());
        let to = get("ALERT_TO").ok_or_else(|| config_error("ALERT_TO is required".into()))?;

        Ok(Some(Self {
            host,
            port,
            username,
            password,
            from,
            to,
            timeout: Duration::from_secs(timeout_secs),
            tls,
        }))
    }
}

const fn config_error(message: String) -> NotifyError {
    NotifyError::Config { message }
}
