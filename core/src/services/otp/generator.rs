//! Verification code generation

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};
use std::sync::Arc;

use super::config::OtpServiceConfig;
use crate::errors::{DomainError, DomainResult};
use crate::services::clock::Clock;

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// A freshly generated code with its hash and expiry
#[derive(Clone)]
pub struct GeneratedOtp {
    /// Plaintext code; delivered to the user and never persisted
    pub code: String,
    /// bcrypt hash of `code`
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for GeneratedOtp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedOtp")
            .field("code", &"******")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Generates random 6-digit codes from the OS CSPRNG
pub struct OtpGenerator {
    hash_cost: u32,
    expiration: Duration,
    clock: Arc<dyn Clock>,
}

impl OtpGenerator {
    pub fn new(config: &OtpServiceConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            hash_cost: config.effective_hash_cost(),
            expiration: Duration::minutes(config.code_expiration_minutes),
            clock,
        }
    }

    /// Generate a code, hash it and compute its expiry
    ///
    /// # Returns
    ///
    /// * `Ok(GeneratedOtp)` - Code, hash and expiry
    /// * `Err(DomainError::Internal)` - Hashing failed
    pub fn generate(&self) -> DomainResult<GeneratedOtp> {
        let code = Self::random_code();
        let hash = bcrypt::hash(&code, self.hash_cost).map_err(|e| DomainError::Internal {
            message: format!("Failed to hash verification code: {}", e),
        })?;

        Ok(GeneratedOtp {
            code,
            hash,
            expires_at: self.clock.now() + self.expiration,
        })
    }

    /// Uniformly random code in 100000..=999999
    pub fn random_code() -> String {
        OsRng.gen_range(CODE_MIN..=CODE_MAX).to_string()
    }
}
