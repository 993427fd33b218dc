//! Ordered accept/reject decision for a submitted code

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sf_shared::utils::validation::is_valid_otp_code;
use std::sync::Arc;

use crate::errors::{DomainError, DomainResult, OtpFailure};
use crate::services::clock::Clock;

/// Result of validating a code against a stored hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpValidation {
    pub success: bool,
    pub failure: Option<OtpFailure>,
    pub remaining_attempts: Option<i32>,
}

impl OtpValidation {
    fn accepted() -> Self {
        Self {
            success: true,
            failure: None,
            remaining_attempts: None,
        }
    }

    fn rejected(failure: OtpFailure, remaining_attempts: Option<i32>) -> Self {
        Self {
            success: false,
            failure: Some(failure),
            remaining_attempts,
        }
    }
}

/// Validates submitted codes.
///
/// Checks run in a fixed order and the first failing check decides:
/// 1. format (6 ASCII digits), no attempt consumed
/// 2. attempts exhausted
/// 3. expired (`now >= expires_at`)
/// 4. hash mismatch
pub struct OtpValidator {
    max_attempts: i32,
    clock: Arc<dyn Clock>,
}

impl OtpValidator {
    pub fn new(max_attempts: i32, clock: Arc<dyn Clock>) -> Self {
        Self { max_attempts, clock }
    }

    /// Validate against the current time
    pub fn validate(
        &self,
        input: &str,
        stored_hash: &str,
        expires_at: DateTime<Utc>,
        attempts: i32,
    ) -> DomainResult<OtpValidation> {
        self.validate_at(input, stored_hash, expires_at, attempts, self.clock.now())
    }

    /// Validate against an explicit clock reading
    ///
    /// # Arguments
    ///
    /// * `input` - Code submitted by the user
    /// * `stored_hash` - bcrypt hash from the record
    /// * `expires_at` - Record expiry
    /// * `attempts` - Failed attempts already recorded
    /// * `now` - Current time
    ///
    /// # Returns
    ///
    /// * `Ok(OtpValidation)` - Decision, including remaining attempts where meaningful
    /// * `Err(DomainError::Internal)` - The stored hash could not be checked
    pub fn validate_at(
        &self,
        input: &str,
        stored_hash: &str,
        expires_at: DateTime<Utc>,
        attempts: i32,
        now: DateTime<Utc>,
    ) -> DomainResult<OtpValidation> {
        if !is_valid_otp_code(input) {
            return Ok(OtpValidation::rejected(
                OtpFailure::InvalidFormat,
                Some((self.max_attempts - attempts).max(0)),
            ));
        }

        if let Some(rejection) = self.precheck_at(expires_at, attempts, now) {
            return Ok(rejection);
        }

        self.check_code(input, stored_hash, attempts + 1)
    }

    /// Attempt and expiry checks against the current time
    pub fn precheck(&self, expires_at: DateTime<Utc>, attempts: i32) -> Option<OtpValidation> {
        self.precheck_at(expires_at, attempts, self.clock.now())
    }

    /// Checks that reject without looking at the code. `None` means the
    /// code may be compared.
    pub fn precheck_at(
        &self,
        expires_at: DateTime<Utc>,
        attempts: i32,
        now: DateTime<Utc>,
    ) -> Option<OtpValidation> {
        if attempts >= self.max_attempts {
            return Some(OtpValidation::rejected(OtpFailure::AttemptsExceeded, Some(0)));
        }

        if now >= expires_at {
            return Some(OtpValidation::rejected(OtpFailure::Expired, None));
        }

        None
    }

    /// Compare a well-formed code with the stored hash. `attempts_used`
    /// already counts this check.
    pub fn check_code(
        &self,
        input: &str,
        stored_hash: &str,
        attempts_used: i32,
    ) -> DomainResult<OtpValidation> {
        let matches = bcrypt::verify(input, stored_hash).map_err(|e| DomainError::Internal {
            message: format!("Failed to verify code hash: {}", e),
        })?;

        if !matches {
            return Ok(OtpValidation::rejected(
                OtpFailure::Mismatch,
                Some((self.max_attempts - attempts_used).max(0)),
            ));
        }

        Ok(OtpValidation::accepted())
    }
}
