//! The validated message handed to a [`MailTransport`](super::MailTransport).

use std::path::Path;

use time::OffsetDateTime;

use super::MailError;

/// A composed mail that passed validation and filtering.
///
/// `to` is never empty. `cc` and `bcc` are `None` when the field was blank
/// or had no well-formed address, and the header must then be omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Option<Vec<String>>,
    pub bcc: Option<Vec<String>>,
    pub subject: Option<String>,
    /// HTML body.
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub send_at: Option<OffsetDateTime>,
}

/// An attachment resolved to its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name shown to the recipient.
    pub name: String,
    /// MIME type, guessed from the file extension.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Attachment {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file into an attachment named after its final path component.
    pub async fn from_path(path: &Path) -> Result<Self, MailError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MailError::Attachment {
                path: path.display().to_string(),
                reason: "path has no file name".into(),
            })?
            .to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| MailError::Attachment {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Attachment::new(name, content_type, bytes))
    }
}
