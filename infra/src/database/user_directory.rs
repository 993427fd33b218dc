//! Account lookups against the `profiles` table

use async_trait::async_trait;
use sqlx::PgPool;

use sf_core::errors::DomainResult;
use sf_core::repositories::user::UserDirectory;

use crate::InfrastructureError;

/// PostgreSQL implementation of `UserDirectory`
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn phone_exists(&self, phone: &str) -> DomainResult<bool> {
        let query = "SELECT EXISTS (SELECT 1 FROM profiles WHERE phone = $1)";

        let exists: bool = sqlx::query_scalar(query)
            .bind(phone)
            .fetch_one(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        Ok(exists)
    }
}
