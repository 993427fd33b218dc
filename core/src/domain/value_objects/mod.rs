//! Value objects representing immutable domain concepts.

pub mod shipping;

// Re-export commonly used types
pub use shipping::{ShippingFeeBreakdown, ShippingSettings, ZipcodeEntry, ZipcodeTable};
