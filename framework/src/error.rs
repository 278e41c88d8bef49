//! JSON error bodies for HTTP handlers.
//!
//! Pair with [`HttpError`](crate::HttpError):
//!
//! ```ignore
//! impl IntoResponse for ApiError {
//!     fn into_response(self) -> Response {
//!         let body = ErrorBody::new(self.http_code(), self.http_message());
//!         (self.http_code(), Json(body)).into_response()
//!     }
//! }
//! ```

use axum::http::StatusCode;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        ErrorBody {
            code: code.as_u16(),
            message: message.into(),
        }
    }
}
