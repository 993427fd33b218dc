//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// A single limit: at most `max_requests` within `window_seconds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LimitRule {
    /// Max requests allowed in one window
    pub max_requests: u32,

    /// Window length in seconds
    pub window_seconds: u64,
}

impl LimitRule {
    pub const fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window_seconds,
        }
    }

    /// Window length in milliseconds
    pub fn window_millis(&self) -> i64 {
        (self.window_seconds as i64).saturating_mul(1000)
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// OTP sends per phone number
    #[serde(default = "default_otp_send_per_phone")]
    pub otp_send_per_phone: LimitRule,

    /// OTP sends per client address
    #[serde(default = "default_otp_send_per_ip")]
    pub otp_send_per_ip: LimitRule,

    /// OTP verifications per client address
    #[serde(default = "default_otp_verify_per_ip")]
    pub otp_verify_per_ip: LimitRule,

    /// Any API request per client address
    #[serde(default = "default_api_per_ip")]
    pub api_per_ip: LimitRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            otp_send_per_phone: default_otp_send_per_phone(),
            otp_send_per_ip: default_otp_send_per_ip(),
            otp_verify_per_ip: default_otp_verify_per_ip(),
            api_per_ip: default_api_per_ip(),
        }
    }
}

impl RateLimitConfig {
    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self {
            enabled: true,
            otp_send_per_phone: LimitRule::new(20, 3600),
            otp_send_per_ip: LimitRule::new(100, 3600),
            otp_verify_per_ip: LimitRule::new(100, 600),
            api_per_ip: LimitRule::new(600, 60),
        }
    }

    /// Create a production configuration (stricter limits)
    pub fn production() -> Self {
        Self::default()
    }
}

fn default_enabled() -> bool {
    true
}

fn default_otp_send_per_phone() -> LimitRule {
    LimitRule::new(5, 3600) // 5 per hour
}

fn default_otp_send_per_ip() -> LimitRule {
    LimitRule::new(20, 3600)
}

fn default_otp_verify_per_ip() -> LimitRule {
    LimitRule::new(30, 600)
}

fn default_api_per_ip() -> LimitRule {
    LimitRule::new(120, 60)
}
