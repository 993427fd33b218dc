//! Configuration module with business-specific sub-modules
//!
//! - `cache` - Redis connection for shared rate limit counters
//! - `database` - Hosted PostgreSQL connection and pool
//! - `environment` - Environment detection and logging configuration
//! - `otp` - One-time password issuing and verification
//! - `rate_limit` - Rate limiting rules per subject
//! - `server` - HTTP server and CORS
//! - `shipping` - Shipping fee defaults and zipcode table seed
//! - `sms` - SMS provider credentials

pub mod cache;
pub mod database;
pub mod environment;
pub mod otp;
pub mod rate_limit;
pub mod server;
pub mod shipping;
pub mod sms;

use serde::{Deserialize, Serialize};

pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{EnumerationPolicy, OtpConfig};
pub use rate_limit::{LimitRule, RateLimitConfig};
pub use server::{CorsConfig, ServerConfig};
pub use shipping::{RegionKind, ShippingConfig, SurchargePolicy, ZipcodeRule};
pub use sms::{SmsConfig, SmsProvider};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,

    pub server: ServerConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub otp: OtpConfig,

    #[serde(default)]
    pub shipping: ShippingConfig,

    #[serde(default)]
    pub sms: SmsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::new("127.0.0.1", 8080),
            cors: CorsConfig::development(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::development(),
            otp: OtpConfig::development(),
            shipping: ShippingConfig::default(),
            sms: SmsConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                trust_proxy_headers: true,
                ..ServerConfig::new("0.0.0.0", 8080)
            },
            cors: CorsConfig::default(),
            database: DatabaseConfig::default().with_max_connections(50),
            cache: CacheConfig {
                enabled: true,
                ..CacheConfig::default()
            },
            rate_limit: RateLimitConfig::production(),
            otp: OtpConfig::default(),
            shipping: ShippingConfig::default(),
            sms: SmsConfig {
                provider: SmsProvider::Twilio,
                ..SmsConfig::default()
            },
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Defaults for the given environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::production();
                config.environment = Environment::Staging;
                config.otp.log_plaintext_codes = false;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        }
    }

    /// Enforce cross-section invariants after loading from external sources
    pub fn sanitized(mut self) -> Self {
        if self.environment.is_production() {
            self.otp.log_plaintext_codes = false;
        }
        self
    }
}
