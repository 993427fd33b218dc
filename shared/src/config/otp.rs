//! One-time password configuration module

use serde::{Deserialize, Serialize};

/// How recovery flows answer when the phone has no account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationPolicy {
    /// Answer exactly as if a code had been sent
    #[default]
    Uniform,
    /// Report that no account exists
    Disclose,
}

/// OTP issuing and verification settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Minutes a code stays valid
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,

    /// Failed verifications allowed per code
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// bcrypt work factor
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,

    /// Minutes past expiry a verified record still proves phone ownership
    #[serde(default = "default_proof_grace_minutes")]
    pub proof_grace_minutes: i64,

    /// Behaviour of recovery sends for unknown phones
    #[serde(default)]
    pub enumeration_policy: EnumerationPolicy,

    /// Log plaintext codes. Ignored in production.
    #[serde(default)]
    pub log_plaintext_codes: bool,

    /// Brand shown in the SMS body
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            expiration_minutes: default_expiration_minutes(),
            max_attempts: default_max_attempts(),
            hash_cost: default_hash_cost(),
            proof_grace_minutes: default_proof_grace_minutes(),
            enumeration_policy: EnumerationPolicy::default(),
            log_plaintext_codes: false,
            sender_name: default_sender_name(),
        }
    }
}

impl OtpConfig {
    /// Create a development configuration that logs codes for local testing
    pub fn development() -> Self {
        Self {
            log_plaintext_codes: true,
            ..Default::default()
        }
    }
}

fn default_expiration_minutes() -> i64 {
    5
}

fn default_max_attempts() -> u32 {
    3
}

fn default_hash_cost() -> u32 {
    10
}

fn default_proof_grace_minutes() -> i64 {
    10
}

fn default_sender_name() -> String {
    String::from("Storefront")
}
