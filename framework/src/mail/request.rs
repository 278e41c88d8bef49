//! The caller-facing mail request and its builder.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A request to send one mail.
///
/// `to`, `cc` and `bcc` are comma-separated address lists. Only `to` and
/// `content` are required, and that is checked at dispatch time rather than
/// here, so a request can always be built and its failure reported as a
/// [`DispatchResult`](super::DispatchResult).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub cc: Option<String>,
    #[serde(default)]
    pub bcc: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    /// Body, sent as HTML.
    #[serde(default)]
    pub content: String,
    /// Files attached by path; each is read when the mail is dispatched.
    /// Never taken from serialized input, only set by in-process callers.
    #[serde(skip)]
    pub attachments: Vec<PathBuf>,
    /// Passed through as the message `Date` header. Nothing is scheduled locally.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub send_at: Option<OffsetDateTime>,
}

impl MailRequest {
    pub fn builder() -> MailRequestBuilder {
        MailRequestBuilder::default()
    }
}

/// Builder for [`MailRequest`]. Unset fields stay empty.
#[derive(Debug, Default)]
pub struct MailRequestBuilder {
    request: MailRequest,
}

impl MailRequestBuilder {
    /// Comma-separated primary recipients.
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.request.to = to.into();
        self
    }

    pub fn cc(mut self, cc: impl Into<String>) -> Self {
        self.request.cc = Some(cc.into());
        self
    }

    pub fn bcc(mut self, bcc: impl Into<String>) -> Self {
        self.request.bcc = Some(bcc.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.request.subject = Some(subject.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.request.content = content.into();
        self
    }

    pub fn attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.request.attachments.push(path.into());
        self
    }

    pub fn attachments(mut self, paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.request
            .attachments
            .extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn send_at(mut self, at: OffsetDateTime) -> Self {
        self.request.send_at = Some(at);
        self
    }

    pub fn build(self) -> MailRequest {
        self.request
    }
}
