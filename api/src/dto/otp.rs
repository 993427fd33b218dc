use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sf_core::domain::entities::otp_record::OtpPurpose;
use sf_core::errors::OtpFailure;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// Local Korean mobile ("010-1234-5678") or E.164 ("+821012345678")
    #[validate(length(min = 9, max = 20))]
    pub phone: String,

    #[serde(default)]
    pub purpose: OtpPurpose,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResponse {
    pub otp_id: Uuid,
    /// Seconds until the code expires
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    pub otp_id: Uuid,

    /// Format is checked by the verification flow so it can report `invalid_format`
    #[validate(length(max = 32))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<OtpFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProofRequest {
    pub otp_id: Uuid,

    #[validate(length(min = 9, max = 20))]
    pub phone: String,

    #[serde(default)]
    pub purpose: OtpPurpose,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofResponse {
    pub otp_id: Uuid,
    pub purpose: OtpPurpose,
    pub verified_at: Option<DateTime<Utc>>,
    /// Last moment this verification may be presented
    pub valid_until: DateTime<Utc>,
}
