//! OTP verification record for phone ownership checks.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of failed verification attempts per code
pub const MAX_ATTEMPTS: i32 = 3;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 5;

/// Minutes past expiry a verified record still proves phone ownership
pub const PROOF_GRACE_MINUTES: i64 = 10;

/// Flow a verification code was requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    #[default]
    Signup,
    PasswordReset,
    FindId,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Signup => "signup",
            OtpPurpose::PasswordReset => "password_reset",
            OtpPurpose::FindId => "find_id",
        }
    }

    /// Recovery flows only make sense for phones that already have an account
    pub fn requires_existing_account(&self) -> bool {
        matches!(self, OtpPurpose::PasswordReset | OtpPurpose::FindId)
    }
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OtpPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signup" => Ok(OtpPurpose::Signup),
            "password_reset" => Ok(OtpPurpose::PasswordReset),
            "find_id" => Ok(OtpPurpose::FindId),
            _ => Err(format!("Invalid purpose: {}", s)),
        }
    }
}

/// Stored verification record. Only the bcrypt hash of the code is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Identifier handed to the client and used for verification
    pub id: Uuid,

    /// Phone number in E.164 form
    pub phone: String,

    pub purpose: OtpPurpose,

    /// bcrypt hash of the 6-digit code
    #[serde(skip_serializing)]
    pub otp_hash: String,

    /// Failed verification attempts so far
    pub attempts: i32,

    /// Set once and never reset
    pub verified: bool,

    pub created_at: DateTime<Utc>,

    pub verified_at: Option<DateTime<Utc>>,

    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    /// Creates a fresh, unverified record
    ///
    /// # Arguments
    ///
    /// * `phone` - Normalized phone number
    /// * `purpose` - Flow the code belongs to
    /// * `otp_hash` - bcrypt hash of the code
    /// * `created_at` - Creation time
    /// * `expires_at` - Time at which the code stops being accepted
    pub fn new(
        phone: String,
        purpose: OtpPurpose,
        otp_hash: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone,
            purpose,
            otp_hash,
            attempts: 0,
            verified: false,
            created_at,
            verified_at: None,
            expires_at,
        }
    }

    /// Whether the code is past its expiry at `now` (inclusive)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether all verification attempts have been used
    pub fn is_exhausted(&self, max_attempts: i32) -> bool {
        self.attempts >= max_attempts
    }

    /// Whether the code can still be verified
    ///
    /// A record is live if:
    /// - It hasn't been verified
    /// - It hasn't expired
    /// - The maximum number of attempts hasn't been reached
    pub fn is_live_at(&self, now: DateTime<Utc>, max_attempts: i32) -> bool {
        !self.verified && !self.is_expired_at(now) && !self.is_exhausted(max_attempts)
    }

    /// Claim one verification attempt.
    ///
    /// Returns the attempt count including this one, or `None` when the
    /// record is settled or out of attempts.
    pub fn reserve_attempt(&mut self, max_attempts: i32) -> Option<i32> {
        if self.verified || self.is_exhausted(max_attempts) {
            return None;
        }
        self.attempts += 1;
        Some(self.attempts)
    }

    /// Marks the record verified, giving back the attempt the successful
    /// check reserved. Returns `false` if it was already verified.
    pub fn mark_verified(&mut self, now: DateTime<Utc>) -> bool {
        if self.verified {
            return false;
        }
        self.verified = true;
        self.verified_at = Some(now);
        self.attempts = (self.attempts - 1).max(0);
        true
    }

    /// Last instant the record proves phone ownership
    pub fn proof_valid_until(&self, grace_minutes: i64) -> DateTime<Utc> {
        self.expires_at + Duration::minutes(grace_minutes)
    }

    /// Whether a verified record still counts as proof at `now`
    pub fn is_valid_proof_at(&self, now: DateTime<Utc>, grace_minutes: i64) -> bool {
        self.verified && now < self.proof_valid_until(grace_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_at(created_at: DateTime<Utc>) -> OtpRecord {
        OtpRecord::new(
            "+821012345678".to_string(),
            OtpPurpose::Signup,
            "hash".to_string(),
            created_at,
            created_at + Duration::minutes(DEFAULT_EXPIRATION_MINUTES),
        )
    }

    #[test]
    fn test_new_record_is_live() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let record = record_at(now);

        assert_eq!(record.attempts, 0);
        assert!(!record.verified);
        assert!(record.verified_at.is_none());
        assert!(record.is_live_at(now, MAX_ATTEMPTS));
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let record = record_at(now);

        assert!(!record.is_expired_at(record.expires_at - Duration::seconds(1)));
        assert!(record.is_expired_at(record.expires_at));
        assert!(!record.is_live_at(record.expires_at, MAX_ATTEMPTS));
    }

    #[test]
    fn test_exhausted_after_max_attempts() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut record = record_at(now);

        for expected in 1..=MAX_ATTEMPTS {
            assert!(record.is_live_at(now, MAX_ATTEMPTS));
            assert_eq!(record.reserve_attempt(MAX_ATTEMPTS), Some(expected));
        }
        assert!(record.is_exhausted(MAX_ATTEMPTS));
        assert!(!record.is_live_at(now, MAX_ATTEMPTS));
        assert_eq!(record.reserve_attempt(MAX_ATTEMPTS), None);
        assert_eq!(record.attempts, MAX_ATTEMPTS);
    }

    #[test]
    fn test_verification_releases_reserved_attempt() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut record = record_at(now);

        record.reserve_attempt(MAX_ATTEMPTS);
        record.reserve_attempt(MAX_ATTEMPTS);
        assert!(record.mark_verified(now));
        assert_eq!(record.attempts, 1);

        assert!(!record.mark_verified(now + Duration::minutes(1)));
        assert_eq!(record.verified_at, Some(now));
        assert_eq!(record.reserve_attempt(MAX_ATTEMPTS), None);
    }

    #[test]
    fn test_proof_window() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut record = record_at(now);
        assert!(!record.is_valid_proof_at(now, PROOF_GRACE_MINUTES));

        record.mark_verified(now + Duration::minutes(1));
        assert!(!record.is_live_at(now, MAX_ATTEMPTS));

        let deadline = record.proof_valid_until(PROOF_GRACE_MINUTES);
        assert_eq!(deadline, now + Duration::minutes(15));
        assert!(record.is_valid_proof_at(deadline - Duration::seconds(1), PROOF_GRACE_MINUTES));
        assert!(!record.is_valid_proof_at(deadline, PROOF_GRACE_MINUTES));
    }

    #[test]
    fn test_purpose_parsing() {
        assert_eq!("find_id".parse::<OtpPurpose>().unwrap(), OtpPurpose::FindId);
        assert!("login".parse::<OtpPurpose>().is_err());
        assert!(OtpPurpose::PasswordReset.requires_existing_account());
        assert!(!OtpPurpose::Signup.requires_existing_account());
    }

    #[test]
    fn test_hash_is_not_serialized() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let json = serde_json::to_value(record_at(now)).unwrap();
        assert!(json.get("otp_hash").is_none());
        assert_eq!(json["purpose"], "signup");
    }
}
