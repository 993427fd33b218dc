//! Database module - PostgreSQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management
//! - OTP record storage (`otp_verifications`)
//! - Account lookups (`profiles`)
//! - Shipping settings snapshot (`shipping_settings`, `shipping_zipcodes`)

pub mod connection;
pub mod otp_repository;
pub mod shipping_settings;
pub mod user_directory;

pub use connection::DatabasePool;
pub use otp_repository::PgOtpRepository;
pub use shipping_settings::PgShippingSettingsRepository;
pub use user_directory::PgUserDirectory;
