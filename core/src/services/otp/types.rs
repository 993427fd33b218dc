//! Types for OTP service results

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::OtpFailure;

/// Result of requesting a verification code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendCodeOutcome {
    /// Identifier to verify against
    pub otp_id: Uuid,
    /// Seconds until the code expires
    pub expires_in_seconds: i64,
}

/// Result of verifying a code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyCodeOutcome {
    /// Whether the verification was successful
    pub verified: bool,
    /// Why verification failed
    pub failure: Option<OtpFailure>,
    /// Attempts left on this code, when meaningful
    pub remaining_attempts: Option<i32>,
}

impl VerifyCodeOutcome {
    pub fn success() -> Self {
        Self {
            verified: true,
            failure: None,
            remaining_attempts: None,
        }
    }

    pub fn failed(failure: OtpFailure, remaining_attempts: Option<i32>) -> Self {
        Self {
            verified: false,
            failure: Some(failure),
            remaining_attempts,
        }
    }
}
