//! Shipping settings snapshot from `shipping_settings` and `shipping_zipcodes`

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use sf_core::domain::value_objects::shipping::{ShippingSettings, ZipcodeEntry, ZipcodeTable};
use sf_core::errors::DomainResult;
use sf_core::repositories::shipping::ShippingSettingsRepository;
use sf_shared::config::{RegionKind, SurchargePolicy};

use crate::{InfraResult, InfrastructureError};

/// PostgreSQL implementation of `ShippingSettingsRepository`.
///
/// `shipping_settings` holds a single active row; the surcharge policy is
/// stored as text (`always_charge` or `waive_with_free_shipping`).
pub struct PgShippingSettingsRepository {
    pool: PgPool,
}

impl PgShippingSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_settings(&self) -> InfraResult<ShippingSettings> {
        let row = sqlx::query(
            r#"
            SELECT base_fee, free_shipping_threshold, surcharge_policy
            FROM shipping_settings
            WHERE is_active = TRUE
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| InfrastructureError::Corrupt("No active shipping settings".to_string()))?;

        let policy: String = row.try_get("surcharge_policy")?;
        let surcharge_policy = match policy.as_str() {
            "always_charge" => SurchargePolicy::AlwaysCharge,
            "waive_with_free_shipping" => SurchargePolicy::WaiveWithFreeShipping,
            other => {
                return Err(InfrastructureError::Corrupt(format!(
                    "Unknown surcharge policy: {}",
                    other
                )))
            }
        };

        Ok(ShippingSettings {
            base_fee: row.try_get("base_fee")?,
            free_shipping_threshold: row.try_get("free_shipping_threshold")?,
            surcharge_policy,
        })
    }

    async fn fetch_zipcodes(&self) -> InfraResult<ZipcodeTable> {
        let rows = sqlx::query("SELECT pattern, region, additional_fee FROM shipping_zipcodes")
            .fetch_all(&self.pool)
            .await?;

        let entries = rows
            .iter()
            .map(|row| {
                let region: String = row.try_get("region")?;
                Ok(ZipcodeEntry {
                    pattern: row.try_get("pattern")?,
                    region: region
                        .parse::<RegionKind>()
                        .map_err(InfrastructureError::Corrupt)?,
                    additional_fee: row.try_get("additional_fee")?,
                })
            })
            .collect::<InfraResult<Vec<_>>>()?;

        Ok(ZipcodeTable::new(entries))
    }
}

#[async_trait]
impl ShippingSettingsRepository for PgShippingSettingsRepository {
    async fn load_settings(&self) -> DomainResult<ShippingSettings> {
        Ok(self.fetch_settings().await?)
    }

    async fn load_zipcode_table(&self) -> DomainResult<ZipcodeTable> {
        Ok(self.fetch_zipcodes().await?)
    }
}
