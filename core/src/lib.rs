//! # Storefront Core
//!
//! Core business logic and domain layer for the storefront backend.
//! This crate contains domain entities, business services, repository interfaces,
//! and error types for phone verification, rate limiting and shipping fees.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
