//! Mapping of domain errors onto HTTP responses
//!
//! | error                         | status |
//! |-------------------------------|--------|
//! | validation                    | 400    |
//! | rate limited (+ Retry-After)  | 429    |
//! | delivery failure              | 502    |
//! | missing or stale verification | 401    |
//! | not found                     | 404    |
//! | internal                      | 500    |

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::{header, StatusCode},
    HttpRequest, HttpResponse, ResponseError,
};
use chrono::Utc;
use thiserror::Error;
use tracing_actix_web::RequestId;
use validator::ValidationErrors;

use sf_core::errors::{DomainError, DomainResult};
use sf_shared::{error_codes, ApiResponse, ErrorResponse, IntoErrorResponse};

/// A domain error on its way out of a handler
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ApiError {
    error: DomainError,
    request_id: Option<String>,
}

impl ApiError {
    pub fn new(error: DomainError) -> Self {
        Self {
            error,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl ToString) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }

    pub fn domain_error(&self) -> &DomainError {
        &self.error
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self::new(error)
    }
}

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } | DomainError::ValidationErr(_) => StatusCode::BAD_REQUEST,
        DomainError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        DomainError::Delivery { .. } => StatusCode::BAD_GATEWAY,
        DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(&self.error)
    }

    fn error_response(&self) -> HttpResponse {
        if let DomainError::Internal { message } = &self.error {
            tracing::error!(request_id = ?self.request_id, error = %message, "Request failed");
        }

        let mut builder = HttpResponse::build(self.status_code());
        if let Some(seconds) = self.error.retry_after_seconds(Utc::now()) {
            builder.insert_header((header::RETRY_AFTER, seconds.to_string()));
        }

        let mut body = ApiResponse::<()>::error(self.error.to_error_response());
        if let Some(request_id) = &self.request_id {
            body = body.with_request_id(request_id.clone());
        }
        builder.json(body)
    }
}

/// Attach the request id to a failed domain call
pub trait RequestIdExt<T> {
    fn in_request(self, request_id: &RequestId) -> Result<T, ApiError>;
}

impl<T> RequestIdExt<T> for DomainResult<T> {
    fn in_request(self, request_id: &RequestId) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::new(e).with_request_id(request_id))
    }
}

/// 400 for a body that deserialized but failed `validator` rules
pub fn validation_error_response(
    errors: &ValidationErrors,
    request_id: &RequestId,
) -> HttpResponse {
    let mut error = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data");
    for (field, field_errors) in errors.field_errors() {
        let codes: Vec<String> = field_errors.iter().map(|e| e.code.to_string()).collect();
        error = error.add_detail(field, codes);
    }

    HttpResponse::BadRequest()
        .json(ApiResponse::<()>::error(error).with_request_id(request_id.to_string()))
}

/// Malformed JSON bodies get the standard envelope
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ApiResponse::<()>::error(ErrorResponse::new(
        error_codes::BAD_REQUEST,
        format!("Invalid request body: {}", err),
    ));
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}
