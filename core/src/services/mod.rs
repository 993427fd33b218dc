//! Business services containing domain logic and use cases.

pub mod clock;
pub mod otp;
pub mod rate_limit;
pub mod shipping;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use otp::{
    GeneratedOtp, OtpGenerator, OtpService, OtpServiceConfig, OtpValidation, OtpValidator,
    SendCodeOutcome, SmsServiceTrait, VerifyCodeOutcome,
};
pub use rate_limit::{
    CounterState, CounterStore, InMemoryCounterStore, RateLimitDecision, RateLimitRule,
    RateLimiter,
};
pub use shipping::{calculate_shipping_fee, ShippingService};
