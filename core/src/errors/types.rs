//! Input validation and verification failure types

use serde::{Deserialize, Serialize};
use sf_shared::error_codes;
use thiserror::Error;

/// Malformed input, reported to the caller immediately and never retried
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid phone number format")]
    InvalidPhone,

    #[error("Verification code must be 6 digits")]
    InvalidCodeFormat,

    #[error("Zipcode must be 5 digits: {zipcode}")]
    InvalidZipcode { zipcode: String },

    #[error("Order amount must be a non-negative number")]
    InvalidAmount,

    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid value for field: {field}")]
    InvalidFormat { field: String },
}

impl ValidationError {
    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidPhone => error_codes::PHONE_INVALID,
            ValidationError::InvalidCodeFormat => error_codes::OTP_FORMAT_INVALID,
            ValidationError::InvalidZipcode { .. } => error_codes::ZIPCODE_INVALID,
            ValidationError::InvalidAmount => error_codes::AMOUNT_INVALID,
            ValidationError::RequiredField { .. } | ValidationError::InvalidFormat { .. } => {
                error_codes::VALIDATION_ERROR
            }
        }
    }
}

/// Why a verification attempt did not succeed.
///
/// These are reported as part of a normal outcome, never as an `Err`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpFailure {
    #[error("Verification code must be 6 digits")]
    InvalidFormat,

    #[error("Maximum attempts exceeded. Please request a new code")]
    AttemptsExceeded,

    #[error("Verification code expired")]
    Expired,

    #[error("Invalid verification code")]
    Mismatch,

    /// Unknown id or a code that was already used; both look the same to callers
    #[error("Verification code is no longer valid. Please request a new code")]
    Unavailable,
}

impl OtpFailure {
    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            OtpFailure::InvalidFormat => error_codes::OTP_FORMAT_INVALID,
            OtpFailure::AttemptsExceeded => error_codes::OTP_ATTEMPTS_EXCEEDED,
            OtpFailure::Expired => error_codes::OTP_EXPIRED,
            OtpFailure::Mismatch => error_codes::OTP_MISMATCH,
            OtpFailure::Unavailable => error_codes::OTP_UNAVAILABLE,
        }
    }
}
