//! Trait for SMS delivery integration

use async_trait::async_trait;

/// Out-of-band delivery of verification codes
#[async_trait]
pub trait SmsServiceTrait: Send + Sync {
    /// Send a verification code via SMS
    ///
    /// # Returns
    ///
    /// Provider message id, or a description of the delivery failure
    async fn send_verification_code(&self, phone: &str, code: &str) -> Result<String, String>;
}
