//! Bridges provider implementations to the core `SmsServiceTrait`

use async_trait::async_trait;
use sf_core::services::otp::SmsServiceTrait;
use sf_shared::phone::mask_phone_number;
use sf_shared::OtpConfig;
use tracing::{error, info};

use super::sms_service::{format_verification_message, SmsService};

/// Formats verification messages and sends them through `S`
pub struct VerificationSms<S> {
    inner: S,
    sender_name: String,
    expiration_minutes: i64,
}

impl<S: SmsService> VerificationSms<S> {
    pub fn new(inner: S, otp: &OtpConfig) -> Self {
        Self {
            inner,
            sender_name: otp.sender_name.clone(),
            expiration_minutes: otp.expiration_minutes,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: SmsService> SmsServiceTrait for VerificationSms<S> {
    async fn send_verification_code(&self, phone: &str, code: &str) -> Result<String, String> {
        let message = format_verification_message(&self.sender_name, code, self.expiration_minutes);

        match self.inner.send_sms(phone, &message).await {
            Ok(message_id) => {
                info!(
                    provider = self.inner.provider_name(),
                    phone = %mask_phone_number(phone),
                    message_id = %message_id,
                    "Verification SMS sent"
                );
                Ok(message_id)
            }
            Err(e) => {
                error!(
                    provider = self.inner.provider_name(),
                    phone = %mask_phone_number(phone),
                    error = %e,
                    "Verification SMS failed"
                );
                Err(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sms::MockSmsService;

    #[tokio::test]
    async fn test_message_contains_code_and_sender() {
        let otp = OtpConfig {
            sender_name: "Shop".to_string(),
            ..OtpConfig::default()
        };
        let sms = VerificationSms::new(MockSmsService::new(), &otp);

        let id = sms.send_verification_code("+821012345678", "482913").await.unwrap();
        assert!(id.starts_with("mock_"));

        let message = sms.inner().last_message("+821012345678").unwrap();
        assert!(message.starts_with("[Shop]"));
        assert!(message.contains("482913"));
    }

    #[tokio::test]
    async fn test_failure_becomes_string() {
        let sms = VerificationSms::new(MockSmsService::failing(), &OtpConfig::default());
        let err = sms.send_verification_code("+821012345678", "482913").await.unwrap_err();
        assert!(err.contains("Simulated"));
    }
}
