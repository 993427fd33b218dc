//! Shared utilities and common types for the storefront server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error codes and response structures
//! - Utility functions (phone normalization, zipcode and code checks)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CorsConfig, DatabaseConfig, EnumerationPolicy, Environment,
    LimitRule, LogFormat, LoggingConfig, OtpConfig, RateLimitConfig, ServerConfig, ShippingConfig, SmsConfig,
    SmsProvider, SurchargePolicy,
};
pub use errors::{error_codes, ApiResult, ErrorResponse, IntoErrorResponse};
pub use types::{ApiResponse, HealthResponse, HealthStatus, ServiceHealth};
pub use utils::{phone, validation};
