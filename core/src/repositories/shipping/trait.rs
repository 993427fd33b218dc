use async_trait::async_trait;

use crate::domain::value_objects::shipping::{ShippingSettings, ZipcodeTable};
use crate::errors::DomainResult;

/// Source of the current shipping settings snapshot
#[async_trait]
pub trait ShippingSettingsRepository: Send + Sync {
    /// Base fee, threshold and surcharge policy
    async fn load_settings(&self) -> DomainResult<ShippingSettings>;

    /// Remote-area zipcode table
    async fn load_zipcode_table(&self) -> DomainResult<ZipcodeTable>;
}
