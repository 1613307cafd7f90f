use crate::models::responses::ApiError;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Request,
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::any::Any;
use thiserror::Error;
use tracing::{error, warn};

pub const VALIDATION_MESSAGE: &str = "요청 형식이 올바르지 않습니다.";
pub const INTERNAL_MESSAGE: &str = "서버 오류";

/// Every failure a handler can surface. The variant decides the HTTP status;
/// the request path is attached later by [`normalize_errors`].
#[derive(Error, Debug, Clone)]
pub enum BookError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// A failure that already knows its status. Passed through unchanged.
    #[error("{status}: {reason}")]
    Status { status: StatusCode, reason: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BookError {
    pub fn status(&self) -> StatusCode {
        match self {
            BookError::Validation(_) => StatusCode::BAD_REQUEST,
            BookError::NotFound(_) => StatusCode::NOT_FOUND,
            BookError::Status { status, .. } => *status,
            BookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> String {
        match self {
            BookError::Validation(_) => "VALIDATION_ERROR".to_string(),
            BookError::NotFound(_) => "NOT_FOUND".to_string(),
            BookError::Status { status, .. } => status
                .canonical_reason()
                .unwrap_or("UNKNOWN")
                .to_uppercase()
                .replace(' ', "_"),
            BookError::Internal(_) => "INTERNAL_ERROR".to_string(),
        }
    }

    /// Message safe to show a client. Internal details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            BookError::Validation(_) => VALIDATION_MESSAGE.to_string(),
            BookError::NotFound(message) => message.clone(),
            BookError::Status { reason, .. } => reason.clone(),
            BookError::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }

    pub fn to_api_error(&self, path: &str) -> ApiError {
        ApiError::new(self.code(), self.public_message(), path)
    }
}

impl From<QueryRejection> for BookError {
    fn from(rejection: QueryRejection) -> Self {
        BookError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for BookError {
    fn from(rejection: PathRejection) -> Self {
        BookError::Validation(rejection.body_text())
    }
}

impl IntoResponse for BookError {
    fn into_response(self) -> Response {
        // The body is rendered by `normalize_errors`, which knows the path.
        let mut response = self.status().into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Middleware turning any [`BookError`] carried by a response into an
/// [`ApiError`] body stamped with the originating request path.
pub async fn normalize_errors(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<BookError>() {
        Some(err) => render(err, &path),
        None => response,
    }
}

fn render(err: BookError, path: &str) -> Response {
    match &err {
        BookError::Internal(detail) => error!("Request to {} failed: {}", path, detail),
        BookError::Validation(detail) => warn!("Rejected request to {}: {}", path, detail),
        BookError::NotFound(_) | BookError::Status { .. } => {
            warn!("Request to {} failed: {}", path, err)
        }
    }

    (err.status(), Json(err.to_api_error(path))).into_response()
}

/// Panic hook for `CatchPanicLayer`: a panicking handler is an unclassified failure.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    };

    BookError::Internal(detail).into_response()
}
