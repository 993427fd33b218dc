//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{OtpFailure, ValidationError};

use chrono::{DateTime, Utc};
use sf_shared::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Too many requests for {rule}. Try again after {reset_at}")]
    RateLimited {
        rule: String,
        reset_at: DateTime<Utc>,
    },

    #[error("Failed to deliver verification code: {message}")]
    Delivery { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Whole seconds until a rate limited caller may retry, at least 1
    pub fn retry_after_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        match self {
            DomainError::RateLimited { reset_at, .. } => {
                let millis = (*reset_at - now).num_milliseconds().max(0);
                Some(((millis + 999) / 1000).max(1))
            }
            _ => None,
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            DomainError::ValidationErr(err) => {
                ErrorResponse::new(err.error_code(), err.to_string())
            }
            DomainError::RateLimited { rule, reset_at } => ErrorResponse::new(
                error_codes::RATE_LIMIT_EXCEEDED,
                "Too many requests. Please try again later",
            )
            .add_detail("rule", rule)
            .add_detail("reset_at", reset_at),
            DomainError::Delivery { .. } => ErrorResponse::new(
                error_codes::DELIVERY_FAILED,
                "Failed to send verification code. Please try again later",
            ),
            DomainError::NotFound { resource } => {
                ErrorResponse::new(error_codes::NOT_FOUND, format!("{} not found", resource))
            }
            DomainError::Unauthorized => ErrorResponse::new(
                error_codes::UNAUTHORIZED,
                "Phone verification is missing or has expired",
            ),
            // Internal details stay in the logs
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error")
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
