//! In-memory implementation of OtpRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::{DomainError, DomainResult};

use super::trait_::OtpRepository;

/// OTP records held in process memory
#[derive(Clone, Default)]
pub struct InMemoryOtpRepository {
    records: Arc<RwLock<HashMap<Uuid, OtpRecord>>>,
}

impl InMemoryOtpRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records for a phone, oldest first
    pub async fn records_for_phone(&self, phone: &str) -> Vec<OtpRecord> {
        let records = self.records.read().await;
        let mut found: Vec<OtpRecord> = records
            .values()
            .filter(|record| record.phone == phone)
            .cloned()
            .collect();
        found.sort_by_key(|record| record.created_at);
        found
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn insert(&self, record: &OtpRecord) -> DomainResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(DomainError::Internal {
                message: format!("Duplicate OTP record id {}", record.id),
            });
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<OtpRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn supersede_unverified(&self, phone: &str, keep: Uuid) -> DomainResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|id, record| record.verified || record.phone != phone || *id == keep);
        Ok((before - records.len()) as u64)
    }

    async fn reserve_attempt(&self, id: Uuid, max_attempts: i32) -> DomainResult<Option<i32>> {
        let mut records = self.records.write().await;
        Ok(records
            .get_mut(&id)
            .and_then(|record| record.reserve_attempt(max_attempts)))
    }

    async fn mark_verified(&self, id: Uuid, verified_at: DateTime<Utc>) -> DomainResult<bool> {
        let mut records = self.records.write().await;
        Ok(records
            .get_mut(&id)
            .map(|record| record.mark_verified(verified_at))
            .unwrap_or(false))
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.records.write().await.remove(&id);
        Ok(())
    }
}
