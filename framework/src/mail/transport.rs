//! Transport trait and the SMTP implementation.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as LettreAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;

use super::{MailError, OutgoingMail};

/// Delivers a composed mail.
///
/// Implement this to plug in another backend (an HTTP mail API, a test
/// recorder). Implementations must be safe to share across concurrent sends.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// SMTP connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_host")]
    pub host: String,

    /// Default: 587.
    #[serde(default = "default_port")]
    pub port: u16,

    pub username: Option<String>,

    pub password: Option<String>,

    /// `starttls` (default), `tls`, or `none`.
    #[serde(default = "default_tls")]
    pub tls: String,

    /// Connection timeout in seconds. Default: 10.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    587
}

fn default_tls() -> String {
    "starttls".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for SmtpConfig {
    fn default() -> Self {
        SmtpConfig {
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
            tls: default_tls(),
            timeout: default_timeout(),
        }
    }
}

/// SMTP transport on lettre's pooled async client.
#[derive(Clone)]
pub struct SmtpTransport {
    inner: Arc<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpTransport {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = match config.tls.as_str() {
            "none" => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
            "tls" => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            "starttls" => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            other => {
                return Err(MailError::MissingConfig(format!(
                    "smtp.tls must be starttls, tls or none (got {other:?})"
                )))
            }
        };

        builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout)));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        tracing::debug!(host = %config.host, port = config.port, tls = %config.tls, "smtp transport configured");

        Ok(SmtpTransport {
            inner: Arc::new(builder.build()),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = build_message(mail)?;

        self.inner
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        Ok(())
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

/// Compose the MIME message: a single HTML part, or `multipart/mixed` when
/// there are attachments.
pub(crate) fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    let mut builder = Message::builder().from(mailbox(&mail.from)?);

    for to in &mail.to {
        builder = builder.to(mailbox(to)?);
    }
    for cc in mail.cc.iter().flatten() {
        builder = builder.cc(mailbox(cc)?);
    }
    for bcc in mail.bcc.iter().flatten() {
        builder = builder.bcc(mailbox(bcc)?);
    }

    if let Some(subject) = &mail.subject {
        builder = builder.subject(subject);
    }
    if let Some(at) = mail.send_at {
        builder = builder.date(SystemTime::from(at));
    }

    let html = SinglePart::html(mail.content.clone());
    let message = if mail.attachments.is_empty() {
        builder.singlepart(html)
    } else {
        let mut parts = MultiPart::mixed().singlepart(html);
        for attachment in &mail.attachments {
            let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                MailError::Build(format!(
                    "content type {} of {}: {e}",
                    attachment.content_type, attachment.name
                ))
            })?;
            parts = parts.singlepart(
                LettreAttachment::new(attachment.name.clone())
                    .body(attachment.bytes.clone(), content_type),
            );
        }
        builder.multipart(parts)
    };

    message.map_err(|e| MailError::Build(e.to_string()))
}
