//! OTP record storage in the `otp_verifications` table

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use sf_core::domain::entities::otp_record::{OtpPurpose, OtpRecord};
use sf_core::errors::DomainResult;
use sf_core::repositories::otp::OtpRepository;

use crate::{InfraResult, InfrastructureError};

const SELECT_COLUMNS: &str = r#"
    SELECT id, phone, purpose, otp_hash, attempts, verified,
           created_at, verified_at, expires_at
    FROM otp_verifications
"#;

/// PostgreSQL implementation of `OtpRepository`
pub struct PgOtpRepository {
    pool: PgPool,
}

impl PgOtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> InfraResult<OtpRecord> {
        let purpose: String = row.try_get("purpose")?;
        let purpose = purpose
            .parse::<OtpPurpose>()
            .map_err(InfrastructureError::Corrupt)?;

        Ok(OtpRecord {
            id: row.try_get("id")?,
            phone: row.try_get("phone")?,
            purpose,
            otp_hash: row.try_get("otp_hash")?,
            attempts: row.try_get("attempts")?,
            verified: row.try_get("verified")?,
            created_at: row.try_get("created_at")?,
            verified_at: row.try_get("verified_at")?,
            expires_at: row.try_get("expires_at")?,
        })
    }
}

#[async_trait]
impl OtpRepository for PgOtpRepository {
    async fn insert(&self, record: &OtpRecord) -> DomainResult<()> {
        let query = r#"
            INSERT INTO otp_verifications (
                id, phone, purpose, otp_hash, attempts, verified,
                created_at, verified_at, expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        sqlx::query(query)
            .bind(record.id)
            .bind(&record.phone)
            .bind(record.purpose.as_str())
            .bind(&record.otp_hash)
            .bind(record.attempts)
            .bind(record.verified)
            .bind(record.created_at)
            .bind(record.verified_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(otp_id = %record.id, error = %e, "Failed to store OTP record");
                InfrastructureError::Database(e)
            })?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<OtpRecord>> {
        let query = format!("{} WHERE id = $1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        Ok(row.as_ref().map(Self::map_row).transpose()?)
    }

    async fn supersede_unverified(&self, phone: &str, keep: Uuid) -> DomainResult<u64> {
        let query = r#"
            DELETE FROM otp_verifications
            WHERE phone = $1 AND verified = FALSE AND id <> $2
        "#;

        let result = sqlx::query(query)
            .bind(phone)
            .bind(keep)
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        Ok(result.rows_affected())
    }

    async fn reserve_attempt(&self, id: Uuid, max_attempts: i32) -> DomainResult<Option<i32>> {
        // Single statement so concurrent checks cannot share an attempt
        let query = r#"
            UPDATE otp_verifications
            SET attempts = attempts + 1
            WHERE id = $1 AND verified = FALSE AND attempts < $2
            RETURNING attempts
        "#;

        let attempts = sqlx::query_scalar::<_, i32>(query)
            .bind(id)
            .bind(max_attempts)
            .fetch_optional(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        Ok(attempts)
    }

    async fn mark_verified(&self, id: Uuid, verified_at: DateTime<Utc>) -> DomainResult<bool> {
        let query = r#"
            UPDATE otp_verifications
            SET verified = TRUE, verified_at = $2, attempts = GREATEST(attempts - 1, 0)
            WHERE id = $1 AND verified = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(id)
            .bind(verified_at)
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        sqlx::query("DELETE FROM otp_verifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;
        Ok(())
    }
}
