use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use courier::mail::{
    HandlebarsRenderer, MailDispatcher, MailError, MailRequest, MailTransport, OutgoingMail,
};
use serde_json::json;
use time::macros::datetime;

/// Records every mail instead of delivering it.
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<OutgoingMail>>,
    fail_with: Option<String>,
}

impl RecordingTransport {
    fn failing(reason: &str) -> Self {
        RecordingTransport {
            fail_with: Some(reason.to_string()),
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if let Some(reason) = &self.fail_with {
            return Err(MailError::Smtp(reason.clone()));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

fn dispatcher(transport: Arc<RecordingTransport>) -> MailDispatcher {
    let mut renderer = HandlebarsRenderer::new();
    renderer
        .register("welcome", "<h1>Welcome {{name}}</h1>")
        .unwrap();
    MailDispatcher::new("noreply@example.com", transport, Arc::new(renderer))
}

fn setup() -> (Arc<RecordingTransport>, MailDispatcher) {
    let transport = Arc::new(RecordingTransport::default());
    (transport.clone(), dispatcher(transport))
}

#[tokio::test]
async fn simple_send_reaches_transport() {
    let (transport, mailer) = setup();

    let result = mailer.send("a@b.com", "hi", "test").await;

    assert!(result.success);
    assert_eq!(result.message, None);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].from, "noreply@example.com");
    assert_eq!(sent[0].to, vec!["a@b.com"]);
    assert_eq!(sent[0].subject.as_deref(), Some("test"));
    assert_eq!(sent[0].content, "hi");
    assert_eq!(sent[0].cc, None);
    assert_eq!(sent[0].bcc, None);
}

#[tokio::test]
async fn blank_to_or_content_fails_without_sending() {
    let (transport, mailer) = setup();

    for (to, content) in [("", "hi"), ("   ", "hi"), ("a@b.com", ""), ("a@b.com", " \n\t")] {
        let result = mailer.send(to, content, "test").await;
        assert!(!result.success, "to={to:?} content={content:?}");
        assert_eq!(
            result.message.as_deref(),
            Some("recipients and content must not be blank")
        );
    }
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn no_well_formed_recipient_fails() {
    let (transport, mailer) = setup();

    let result = mailer.send("not-an-email", "hi", "test").await;

    assert!(!result.success);
    assert!(result
        .message
        .unwrap()
        .contains("malformed recipient addresses"));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn malformed_recipients_are_dropped() {
    let (transport, mailer) = setup();

    let result = mailer.send("a@b.com,bad", "hi", "test").await;

    assert!(result.success);
    assert_eq!(transport.sent()[0].to, vec!["a@b.com"]);
}

#[tokio::test]
async fn cc_and_bcc_keep_only_well_formed_addresses() {
    let (transport, mailer) = setup();

    let request = MailRequest::builder()
        .to("a@b.com")
        .content("hi")
        .cc("c@d.com,nope,e@f.org")
        .bcc("x.y@z.com,g@h.net")
        .build();
    let result = mailer.dispatch(request).await;

    assert!(result.success);
    let sent = transport.sent();
    assert_eq!(
        sent[0].cc,
        Some(vec!["c@d.com".to_string(), "e@f.org".to_string()])
    );
    assert_eq!(sent[0].bcc, Some(vec!["g@h.net".to_string()]));
}

#[tokio::test]
async fn fully_malformed_cc_and_bcc_are_omitted() {
    let (transport, mailer) = setup();

    let result = mailer.send_with_cc("a@b.com", "hi", "test", "bad,worse").await;

    assert!(result.success);
    assert_eq!(transport.sent()[0].cc, None);
}

#[tokio::test]
async fn convenience_send_matches_full_request() {
    let (short_transport, short) = setup();
    let (full_transport, full) = setup();

    let a = short.send("a@b.com,bad", "hi", "test").await;
    let b = full
        .dispatch(
            MailRequest::builder()
                .to("a@b.com,bad")
                .content("hi")
                .subject("test")
                .build(),
        )
        .await;

    assert_eq!(a, b);
    assert_eq!(short_transport.sent(), full_transport.sent());
}

#[tokio::test]
async fn transport_failure_becomes_send_exception() {
    let transport = Arc::new(RecordingTransport::failing("connection refused"));
    let mailer = dispatcher(transport);

    let result = mailer.send("a@b.com", "hi", "test").await;

    assert!(!result.success);
    assert_eq!(
        result.message.as_deref(),
        Some("send exception: SMTP error: connection refused")
    );
}

#[tokio::test]
async fn send_at_is_passed_through() {
    let (transport, mailer) = setup();
    let at = datetime!(2030-01-02 03:04:05 UTC);

    let request = MailRequest::builder()
        .to("a@b.com")
        .content("later")
        .send_at(at)
        .build();
    assert!(mailer.dispatch(request).await.success);

    assert_eq!(transport.sent()[0].send_at, Some(at));
}

#[tokio::test]
async fn attachments_are_resolved_from_paths() {
    let (transport, mailer) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invoice.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let request = MailRequest::builder()
        .to("a@b.com")
        .content("see attached")
        .attachment(&path)
        .build();
    assert!(mailer.dispatch(request).await.success);

    let sent = transport.sent();
    assert_eq!(sent[0].attachments.len(), 1);
    assert_eq!(sent[0].attachments[0].name, "invoice.pdf");
    assert_eq!(sent[0].attachments[0].content_type, "application/pdf");
    assert_eq!(sent[0].attachments[0].bytes, b"%PDF-1.4");
}

#[tokio::test]
async fn unreadable_attachment_fails_as_send_exception() {
    let (transport, mailer) = setup();
    let dir = tempfile::tempdir().unwrap();

    let request = MailRequest::builder()
        .to("a@b.com")
        .content("see attached")
        .attachment(dir.path().join("gone.pdf"))
        .build();
    let result = mailer.dispatch(request).await;

    assert!(!result.success);
    assert!(result.message.unwrap().starts_with("send exception: attachment"));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn template_send_renders_body() {
    let (transport, mailer) = setup();

    let result = mailer
        .send_template("a@b.com", &json!({"name": "Ada"}), "welcome", "Welcome")
        .await;

    assert!(result.success);
    assert_eq!(transport.sent()[0].content, "<h1>Welcome Ada</h1>");
}

#[tokio::test]
async fn template_send_with_cc_forwards_cc() {
    let (transport, mailer) = setup();

    let result = mailer
        .send_template_with_cc(
            "a@b.com",
            &json!({"name": "Ada"}),
            "welcome",
            "Welcome",
            "c@d.com",
        )
        .await;

    assert!(result.success);
    assert_eq!(transport.sent()[0].cc, Some(vec!["c@d.com".to_string()]));
}

#[tokio::test]
async fn failed_render_leads_to_blank_content_failure() {
    let (transport, mailer) = setup();

    assert_eq!(mailer.render_template(&json!({}), "missing"), "");

    let result = mailer
        .send_template("a@b.com", &json!({}), "welcome", "Welcome")
        .await;

    assert!(!result.success);
    assert_eq!(
        result.message.as_deref(),
        Some("recipients and content must not be blank")
    );
    assert!(transport.sent().is_empty());
}
