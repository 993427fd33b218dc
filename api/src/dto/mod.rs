//! Request and response bodies

pub mod otp;
pub mod shipping;

pub use otp::*;
pub use shipping::*;
