//! Repository contracts for externally owned data, with in-memory implementations

pub mod otp;
pub mod shipping;
pub mod user;

pub use otp::{InMemoryOtpRepository, OtpRepository};
pub use shipping::{InMemoryShippingSettings, ShippingSettingsRepository};
pub use user::{InMemoryUserDirectory, UserDirectory};
