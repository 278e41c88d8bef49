//! Mail dispatch: validation, address filtering, templates and SMTP delivery.
//!
//! # Quick Start
//!
//! ```ignore
//! // 1. Build from configuration (None when `mail.enable` is false)
//! let Some(mailer) = MailDispatcher::from_config(&settings.mail)? else { return Ok(()) };
//!
//! // 2. Send; the result is a value, never an error
//! let result = mailer.send("a@b.com,c@d.com", "<p>Hi</p>", "Greetings").await;
//! assert!(result.success);
//!
//! // 3. Or send a rendered template
//! let result = mailer
//!     .send_template("a@b.com", &json!({"name": "Ada"}), "welcome", "Welcome")
//!     .await;
//! ```
//!
//! # Configuration
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `mail.enable` | `false` | Build a dispatcher at all |
//! | `mail.from` | | Sender address, required when enabled |
//! | `mail.smtp.host` | `localhost` | SMTP server hostname |
//! | `mail.smtp.port` | `587` | SMTP port |
//! | `mail.smtp.username` / `password` | | Credentials, used when both are set |
//! | `mail.smtp.tls` | `starttls` | `starttls`, `tls`, or `none` |
//! | `mail.smtp.timeout` | `10` | Seconds |
//! | `mail.templates.dir` | | Directory of Handlebars templates |
//! | `mail.templates.extension` | `.hbs` | Template file extension |

pub mod address;
mod dispatcher;
mod message;
mod request;
mod template;
mod transport;

pub use dispatcher::{DispatchError, DispatchResult, MailDispatcher};
pub use message::{Attachment, OutgoingMail};
pub use request::{MailRequest, MailRequestBuilder};
pub use template::{HandlebarsRenderer, TemplateConfig, TemplateRenderer};
pub use transport::{MailTransport, SmtpConfig, SmtpTransport};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing required config: {0}")]
    MissingConfig(String),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("attachment {path}: {reason}")]
    Attachment { path: String, reason: String },

    #[error("template error: {0}")]
    Template(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// Mail settings, usually the `mail` table of the application config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub enable: bool,

    pub from: Option<String>,

    #[serde(default)]
    pub smtp: SmtpConfig,

    #[serde(default)]
    pub templates: TemplateConfig,
}
