//! One-time password phone verification
//!
//! This module provides the complete OTP workflow:
//! - Code generation with a slow salted hash
//! - Ordered accept/reject validation with attempt limiting
//! - Per-address and per-phone rate limiting on send
//! - Proof-of-verification lookups for downstream flows

mod config;
mod generator;
mod service;
mod traits;
mod types;
mod validator;

#[cfg(test)]
mod tests;

pub use config::OtpServiceConfig;
pub use generator::{GeneratedOtp, OtpGenerator};
pub use service::OtpService;
pub use traits::SmsServiceTrait;
pub use types::{SendCodeOutcome, VerifyCodeOutcome};
pub use validator::{OtpValidation, OtpValidator};
