//! Mock SMS provider for development and tests.
//! Messages are logged (phone masked) and kept in memory instead of sent.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};
use uuid::Uuid;

use super::sms_service::SmsService;
use crate::InfrastructureError;
use sf_shared::phone::{is_valid_international_phone, mask_phone_number};

#[derive(Clone, Default)]
pub struct MockSmsService {
    message_count: Arc<AtomicU64>,
    last_messages: Arc<Mutex<HashMap<String, String>>>,
    simulate_failure: bool,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every send fails
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Most recent message sent to `phone`
    pub fn last_message(&self, phone: &str) -> Option<String> {
        self.last_messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(phone)
            .cloned()
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(
        &self,
        phone_number: &str,
        message: &str,
    ) -> Result<String, InfrastructureError> {
        if !is_valid_international_phone(phone_number) {
            return Err(InfrastructureError::Sms(format!(
                "Invalid phone number format: {}",
                mask_phone_number(phone_number)
            )));
        }

        if self.simulate_failure {
            warn!(phone = %mask_phone_number(phone_number), "Mock SMS service simulating failure");
            return Err(InfrastructureError::Sms("Simulated SMS sending failure".to_string()));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);
        self.last_messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(phone_number.to_string(), message.to_string());

        info!(
            provider = "mock",
            phone = %mask_phone_number(phone_number),
            message_id = %message_id,
            message_length = message.len(),
            "SMS sent (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_and_records_messages() {
        let sms = MockSmsService::new();
        sms.send_sms("+821012345678", "first").await.unwrap();
        sms.send_sms("+821012345678", "second").await.unwrap();

        assert_eq!(sms.message_count(), 2);
        assert_eq!(sms.last_message("+821012345678").as_deref(), Some("second"));
        assert!(sms.last_message("+821099998888").is_none());
    }

    #[tokio::test]
    async fn test_rejects_non_e164_numbers() {
        let sms = MockSmsService::new();
        let result = sms.send_sms("01012345678", "hello").await;
        assert!(matches!(result, Err(InfrastructureError::Sms(_))));
        assert_eq!(sms.message_count(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let sms = MockSmsService::new();
        let clone = sms.clone();
        clone.send_sms("+821012345678", "hi").await.unwrap();
        assert_eq!(sms.message_count(), 1);
    }
}
