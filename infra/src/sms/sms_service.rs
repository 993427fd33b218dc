//! Provider-level SMS contract

use async_trait::async_trait;

use crate::InfrastructureError;

/// A provider able to deliver a text message
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Send `message` to an E.164 phone number, returning the provider message id
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<String, InfrastructureError>;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}

/// Body of the verification SMS
pub fn format_verification_message(
    sender_name: &str,
    code: &str,
    expiration_minutes: i64,
) -> String {
    format!(
        "[{}] Your verification code is {}. It expires in {} minutes.",
        sender_name, code, expiration_minutes
    )
}
