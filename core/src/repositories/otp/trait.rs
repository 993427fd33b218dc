use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::DomainResult;

/// Store for OTP verification records
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Persist a new record
    async fn insert(&self, record: &OtpRecord) -> DomainResult<()>;

    /// Find a record by id
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<OtpRecord>>;

    /// Remove every unverified record for `phone` other than `keep`, across purposes
    ///
    /// # Returns
    ///
    /// Number of records removed
    async fn supersede_unverified(&self, phone: &str, keep: Uuid) -> DomainResult<u64>;

    /// Atomically claim one verification attempt on an unverified record
    /// with fewer than `max_attempts` attempts
    ///
    /// # Returns
    ///
    /// * `Some(attempts)` - Attempt count including the claimed one
    /// * `None` - Missing, verified or out of attempts
    async fn reserve_attempt(&self, id: Uuid, max_attempts: i32) -> DomainResult<Option<i32>>;

    /// Mark an unverified record verified and release the attempt reserved
    /// for the successful check
    ///
    /// # Returns
    ///
    /// `false` when the record is missing or was already verified
    async fn mark_verified(&self, id: Uuid, verified_at: DateTime<Utc>) -> DomainResult<bool>;

    /// Delete a record
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}
