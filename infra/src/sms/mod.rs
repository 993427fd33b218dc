//! SMS Service Module
//!
//! Delivery of verification codes. Providers implement [`SmsService`]; the
//! [`VerificationSms`] adapter formats the message and exposes a provider to
//! the core OTP service.

pub mod adapter;
pub mod mock_sms;
pub mod sms_service;
pub mod twilio;

use std::sync::Arc;

use sf_core::services::otp::SmsServiceTrait;
use sf_shared::{Environment, OtpConfig, SmsConfig, SmsProvider};

pub use adapter::VerificationSms;
pub use mock_sms::MockSmsService;
pub use sms_service::{format_verification_message, SmsService};
pub use twilio::TwilioSmsService;

use crate::{InfraResult, InfrastructureError};

/// Create the SMS service selected by configuration.
///
/// The mock provider never leaves the process, so it is refused in production.
pub fn create_sms_service(
    config: &SmsConfig,
    otp: &OtpConfig,
    environment: Environment,
) -> InfraResult<Arc<dyn SmsServiceTrait>> {
    match config.provider {
        SmsProvider::Mock => {
            if environment.is_production() {
                return Err(InfrastructureError::Config(
                    "The mock SMS provider cannot be used in production".to_string(),
                ));
            }
            tracing::warn!("Using mock SMS provider; codes are not delivered");
            Ok(Arc::new(VerificationSms::new(MockSmsService::new(), otp)))
        }
        SmsProvider::Twilio => {
            config.validate().map_err(InfrastructureError::Config)?;
            let service = TwilioSmsService::new(config)?;
            Ok(Arc::new(VerificationSms::new(service, otp)))
        }
    }
}
