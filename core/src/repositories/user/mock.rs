//! In-memory implementation of UserDirectory

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::DomainResult;

use super::trait_::UserDirectory;

/// Registered phone numbers held in process memory
#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    phones: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory pre-populated with normalized phone numbers
    pub fn with_phones<I, S>(phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phones: Arc::new(RwLock::new(phones.into_iter().map(Into::into).collect())),
        }
    }

    pub async fn register(&self, phone: impl Into<String>) {
        self.phones.write().await.insert(phone.into());
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn phone_exists(&self, phone: &str) -> DomainResult<bool> {
        Ok(self.phones.read().await.contains(phone))
    }
}
