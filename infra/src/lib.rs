//! # Infrastructure Layer
//!
//! Concrete implementations of the contracts defined in `sf_core`:
//!
//! - **Database**: PostgreSQL repositories using SQLx
//! - **Cache**: Redis client and an atomic counter store for rate limiting
//! - **SMS**: mock and Twilio delivery of verification codes

use sf_core::errors::DomainError;

/// Database module - PostgreSQL implementations using SQLx
pub mod database;

/// SMS service module - External SMS providers
pub mod sms;

/// Cache module - Redis client and rate limit counters
pub mod cache;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// Stored data that does not map onto the domain
    #[error("Corrupt data: {0}")]
    Corrupt(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}

pub type InfraResult<T> = Result<T, InfrastructureError>;
