use async_trait::async_trait;

use crate::errors::DomainResult;

/// Read-only view of registered accounts
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Whether an account is registered for the normalized phone number
    async fn phone_exists(&self, phone: &str) -> DomainResult<bool>;
}
