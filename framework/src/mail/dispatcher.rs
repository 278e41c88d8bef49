//! Validates mail requests and hands them to a transport.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::address::{filter_addresses, filter_optional};
use super::{
    Attachment, HandlebarsRenderer, MailConfig, MailError, MailRequest, MailTransport,
    OutgoingMail, SmtpTransport, TemplateRenderer,
};

/// Outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DispatchResult {
    pub fn success() -> Self {
        DispatchResult {
            success: true,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        DispatchResult {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Why a dispatch failed. Always reported through [`DispatchResult`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("recipients and content must not be blank")]
    BlankField,

    #[error("send failed: malformed recipient addresses")]
    MalformedRecipients,

    #[error("send exception: {0}")]
    Transport(#[from] MailError),
}

impl From<Result<(), DispatchError>> for DispatchResult {
    fn from(result: Result<(), DispatchError>) -> Self {
        match result {
            Ok(()) => DispatchResult::success(),
            Err(err) => DispatchResult::error(err.to_string()),
        }
    }
}

/// Sends mail through an injected [`MailTransport`], rendering template
/// bodies with an injected [`TemplateRenderer`].
///
/// Cheap to clone; clones share the transport and renderer.
#[derive(Clone)]
pub struct MailDispatcher {
    from: String,
    transport: Arc<dyn MailTransport>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl MailDispatcher {
    pub fn new(
        from: impl Into<String>,
        transport: Arc<dyn MailTransport>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        MailDispatcher {
            from: from.into(),
            transport,
            renderer,
        }
    }

    /// Build an SMTP + Handlebars dispatcher, or `None` when mail is disabled.
    pub fn from_config(config: &MailConfig) -> Result<Option<Self>, MailError> {
        if !config.enable {
            tracing::info!("mail dispatch disabled by configuration");
            return Ok(None);
        }

        let from = config
            .from
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .ok_or_else(|| MailError::MissingConfig("mail.from".into()))?;
        from.parse::<lettre::message::Mailbox>()
            .map_err(|_| MailError::InvalidAddress(from.to_string()))?;

        let transport = SmtpTransport::from_config(&config.smtp)?;
        let renderer = HandlebarsRenderer::from_config(&config.templates)?;
        Ok(Some(Self::new(from, Arc::new(transport), Arc::new(renderer))))
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }

    /// Validate, filter and send one request. Never fails: every error is
    /// folded into the returned [`DispatchResult`].
    pub async fn dispatch(&self, request: MailRequest) -> DispatchResult {
        let result = self.try_dispatch(request).await;
        match &result {
            Ok(()) => tracing::debug!("mail sent"),
            Err(err @ DispatchError::Transport(_)) => tracing::error!("{err}"),
            Err(err) => tracing::warn!("{err}"),
        }
        result.into()
    }

    async fn try_dispatch(&self, request: MailRequest) -> Result<(), DispatchError> {
        if request.to.trim().is_empty() || request.content.trim().is_empty() {
            return Err(DispatchError::BlankField);
        }

        let to = filter_addresses(&request.to);
        if to.is_empty() {
            tracing::warn!(to = %request.to, "no well-formed recipient address");
            return Err(DispatchError::MalformedRecipients);
        }

        let mail = OutgoingMail {
            from: self.from.clone(),
            to,
            cc: filter_optional(request.cc.as_deref()),
            bcc: filter_optional(request.bcc.as_deref()),
            subject: request.subject,
            content: request.content,
            attachments: resolve_attachments(&request.attachments).await?,
            send_at: request.send_at,
        };

        tracing::debug!(
            to = ?mail.to,
            cc = mail.cc.as_ref().map_or(0, Vec::len),
            bcc = mail.bcc.as_ref().map_or(0, Vec::len),
            attachments = mail.attachments.len(),
            "dispatching mail"
        );
        self.transport.send(&mail).await?;
        Ok(())
    }

    /// Send `content` to `to` with a subject.
    pub async fn send(&self, to: &str, content: &str, subject: &str) -> DispatchResult {
        self.dispatch(
            MailRequest::builder()
                .to(to)
                .content(content)
                .subject(subject)
                .build(),
        )
        .await
    }

    /// Like [`send`](Self::send), with carbon-copy recipients.
    pub async fn send_with_cc(
        &self,
        to: &str,
        content: &str,
        subject: &str,
        cc: &str,
    ) -> DispatchResult {
        self.dispatch(
            MailRequest::builder()
                .to(to)
                .content(content)
                .subject(subject)
                .cc(cc)
                .build(),
        )
        .await
    }

    /// Render `template` with `model` and send it as the body.
    pub async fn send_template(
        &self,
        to: &str,
        model: &Value,
        template: &str,
        subject: &str,
    ) -> DispatchResult {
        let content = self.render_template(model, template);
        self.send(to, &content, subject).await
    }

    /// Like [`send_template`](Self::send_template), with carbon-copy recipients.
    pub async fn send_template_with_cc(
        &self,
        to: &str,
        model: &Value,
        template: &str,
        subject: &str,
        cc: &str,
    ) -> DispatchResult {
        let content = self.render_template(model, template);
        self.send_with_cc(to, &content, subject, cc).await
    }

    /// Render a template, or `""` if rendering fails for any reason.
    ///
    /// An empty body is then rejected by the blank-content check.
    pub fn render_template(&self, model: &Value, template: &str) -> String {
        match self.renderer.render(template, model) {
            Ok(content) => content,
            Err(err) => {
                tracing::error!(template, "failed to render mail template: {err}");
                String::new()
            }
        }
    }
}

async fn resolve_attachments(
    paths: &[std::path::PathBuf],
) -> Result<Vec<Attachment>, MailError> {
    let mut attachments = Vec::with_capacity(paths.len());
    for path in paths {
        attachments.push(Attachment::from_path(path).await?);
    }
    Ok(attachments)
}
