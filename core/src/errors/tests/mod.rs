use chrono::{Duration, TimeZone, Utc};
use sf_shared::{error_codes, IntoErrorResponse};

use super::{DomainError, OtpFailure, ValidationError};

#[test]
fn test_validation_error_bridges_into_domain_error() {
    let err: DomainError = ValidationError::InvalidZipcode {
        zipcode: "123".to_string(),
    }
    .into();

    let response = err.to_error_response();
    assert_eq!(response.error, error_codes::ZIPCODE_INVALID);
    assert!(response.message.contains("123"));
}

#[test]
fn test_rate_limited_response_carries_reset_time() {
    let reset_at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let err = DomainError::RateLimited {
        rule: "otp_send_per_phone".to_string(),
        reset_at,
    };

    let response = err.to_error_response();
    assert_eq!(response.error, error_codes::RATE_LIMIT_EXCEEDED);
    assert_eq!(
        response.detail("reset_at"),
        Some(&serde_json::to_value(reset_at).unwrap())
    );
    assert_eq!(
        response.detail("rule"),
        Some(&serde_json::json!("otp_send_per_phone"))
    );
}

#[test]
fn test_retry_after_rounds_up() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let err = DomainError::RateLimited {
        rule: "api_per_ip".to_string(),
        reset_at: now + Duration::milliseconds(1500),
    };
    assert_eq!(err.retry_after_seconds(now), Some(2));

    let elapsed = DomainError::RateLimited {
        rule: "api_per_ip".to_string(),
        reset_at: now - Duration::seconds(5),
    };
    assert_eq!(elapsed.retry_after_seconds(now), Some(1));
    assert_eq!(DomainError::Unauthorized.retry_after_seconds(now), None);
}

#[test]
fn test_internal_error_hides_details() {
    let err = DomainError::Internal {
        message: "connection refused at 10.0.0.3".to_string(),
    };
    let response = err.to_error_response();
    assert_eq!(response.error, error_codes::INTERNAL_ERROR);
    assert!(!response.message.contains("10.0.0.3"));
}

#[test]
fn test_otp_failure_codes() {
    assert_eq!(OtpFailure::Mismatch.error_code(), error_codes::OTP_MISMATCH);
    assert_eq!(OtpFailure::Unavailable.error_code(), error_codes::OTP_UNAVAILABLE);
    assert_eq!(
        serde_json::to_string(&OtpFailure::AttemptsExceeded).unwrap(),
        "\"attempts_exceeded\""
    );
}
