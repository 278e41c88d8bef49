use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use courier::mail::{DispatchResult, MailDispatcher, MailRequest};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::JsonResult;
use crate::settings::Settings;

/// All routes. The `/send` family is only mounted when a dispatcher exists.
pub fn api_router(settings: Arc<Settings>, mailer: Option<MailDispatcher>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/config/config", get(config))
        .with_state(settings);

    match mailer {
        Some(mailer) => router.merge(mail_router(mailer)),
        None => router,
    }
}

fn mail_router(mailer: MailDispatcher) -> Router {
    Router::new()
        .route("/send", get(send_query).post(send_json))
        .route("/send/template", post(send_template))
        .with_state(mailer)
}

async fn health() -> Json<Value> {
    Json(json!({"ok": true}))
}

async fn config(State(settings): State<Arc<Settings>>) -> Json<Value> {
    Json(json!({
        "port": settings.port,
        "profile": settings.profile,
        "user": settings.user.name,
    }))
}

#[derive(Deserialize)]
struct SendQuery {
    to: String,
    #[serde(alias = "conetnt")]
    content: String,
    subject: String,
    cc: Option<String>,
}

async fn send_query(
    State(mailer): State<MailDispatcher>,
    query: Result<Query<SendQuery>, QueryRejection>,
) -> JsonResult<DispatchResult> {
    let Query(q) = query?;
    let result = match q.cc {
        Some(cc) => mailer.send_with_cc(&q.to, &q.content, &q.subject, &cc).await,
        None => mailer.send(&q.to, &q.content, &q.subject).await,
    };
    Ok(Json(result))
}

async fn send_json(
    State(mailer): State<MailDispatcher>,
    body: Result<Json<MailRequest>, JsonRejection>,
) -> JsonResult<DispatchResult> {
    let Json(request) = body?;
    Ok(Json(mailer.dispatch(request).await))
}

#[derive(Deserialize)]
struct TemplateSend {
    to: String,
    template: String,
    #[serde(default)]
    model: Value,
    subject: String,
    cc: Option<String>,
}

async fn send_template(
    State(mailer): State<MailDispatcher>,
    body: Result<Json<TemplateSend>, JsonRejection>,
) -> JsonResult<DispatchResult> {
    let Json(req) = body?;
    let result = match req.cc {
        Some(cc) => {
            mailer
                .send_template_with_cc(&req.to, &req.model, &req.template, &req.subject, &cc)
                .await
        }
        None => {
            mailer
                .send_template(&req.to, &req.model, &req.template, &req.subject)
                .await
        }
    };
    Ok(Json(result))
}
