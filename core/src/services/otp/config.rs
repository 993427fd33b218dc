//! Configuration for the OTP service

use sf_shared::{EnumerationPolicy, Environment, OtpConfig};

use crate::domain::entities::otp_record::{
    DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS, PROOF_GRACE_MINUTES,
};

/// bcrypt refuses work factors below this
pub const MIN_HASH_COST: u32 = 4;

/// bcrypt refuses work factors above this
pub const MAX_HASH_COST: u32 = 31;

/// Configuration for the OTP service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Number of minutes before a code expires
    pub code_expiration_minutes: i64,
    /// Maximum number of failed verifications per code
    pub max_attempts: i32,
    /// bcrypt work factor
    pub hash_cost: u32,
    /// Minutes past expiry a verified record still proves ownership
    pub proof_grace_minutes: i64,
    /// Recovery sends for phones without an account
    pub enumeration_policy: EnumerationPolicy,
    /// Log plaintext codes at debug level
    pub log_plaintext_codes: bool,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            max_attempts: MAX_ATTEMPTS,
            hash_cost: 10,
            proof_grace_minutes: PROOF_GRACE_MINUTES,
            enumeration_policy: EnumerationPolicy::default(),
            log_plaintext_codes: false,
        }
    }
}

impl OtpServiceConfig {
    /// Build from application configuration. Plaintext logging is never
    /// enabled in production.
    pub fn from_app_config(config: &OtpConfig, environment: Environment) -> Self {
        Self {
            code_expiration_minutes: config.expiration_minutes,
            max_attempts: i32::try_from(config.max_attempts).unwrap_or(MAX_ATTEMPTS),
            hash_cost: config.hash_cost,
            proof_grace_minutes: config.proof_grace_minutes,
            enumeration_policy: config.enumeration_policy,
            log_plaintext_codes: config.log_plaintext_codes && environment.allows_diagnostics(),
        }
    }

    /// Configuration with the cheapest hash, for tests
    pub fn for_tests() -> Self {
        Self {
            hash_cost: MIN_HASH_COST,
            ..Default::default()
        }
    }

    /// Work factor clamped to what bcrypt accepts
    pub fn effective_hash_cost(&self) -> u32 {
        self.hash_cost.clamp(MIN_HASH_COST, MAX_HASH_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_never_logs_codes() {
        let otp = OtpConfig {
            log_plaintext_codes: true,
            ..OtpConfig::default()
        };
        let production = OtpServiceConfig::from_app_config(&otp, Environment::Production);
        let development = OtpServiceConfig::from_app_config(&otp, Environment::Development);
        assert!(!production.log_plaintext_codes);
        assert!(development.log_plaintext_codes);
    }

    #[test]
    fn test_hash_cost_is_clamped() {
        let mut config = OtpServiceConfig::default();
        config.hash_cost = 1;
        assert_eq!(config.effective_hash_cost(), MIN_HASH_COST);
        config.hash_cost = 40;
        assert_eq!(config.effective_hash_cost(), MAX_HASH_COST);
        config.hash_cost = 10;
        assert_eq!(config.effective_hash_cost(), 10);
    }
}
