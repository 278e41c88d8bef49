use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::Json;
use courier::error::ErrorBody;

#[derive(Debug, thiserror::Error, courier::HttpError)]
pub enum ApiError {
    #[error("invalid query: {0}")]
    #[http_error(BAD_REQUEST)]
    Query(#[from] QueryRejection),

    #[error("invalid body: {0}")]
    #[http_error(BAD_REQUEST)]
    Json(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.http_code();
        if code.is_server_error() {
            tracing::error!("Error Status {code}: {self}");
        } else {
            tracing::debug!("Error Status {code}: {self}");
        }

        let body = ErrorBody::new(code, self.http_message());
        (code, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
pub type JsonResult<T> = Result<Json<T>>;
