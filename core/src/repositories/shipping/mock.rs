//! In-memory implementation of ShippingSettingsRepository

use async_trait::async_trait;
use sf_shared::ShippingConfig;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::value_objects::shipping::{ShippingSettings, ZipcodeTable};
use crate::errors::DomainResult;

use super::trait_::ShippingSettingsRepository;

/// Shipping settings held in process memory
#[derive(Clone)]
pub struct InMemoryShippingSettings {
    snapshot: Arc<RwLock<(ShippingSettings, ZipcodeTable)>>,
}

impl InMemoryShippingSettings {
    pub fn new(settings: ShippingSettings, table: ZipcodeTable) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new((settings, table))),
        }
    }

    /// Seed from configuration
    pub fn from_config(config: &ShippingConfig) -> Self {
        Self::new(ShippingSettings::from(config), ZipcodeTable::from(config))
    }

    /// Replace the snapshot
    pub async fn replace(&self, settings: ShippingSettings, table: ZipcodeTable) {
        *self.snapshot.write().await = (settings, table);
    }
}

#[async_trait]
impl ShippingSettingsRepository for InMemoryShippingSettings {
    async fn load_settings(&self) -> DomainResult<ShippingSettings> {
        Ok(self.snapshot.read().await.0)
    }

    async fn load_zipcode_table(&self) -> DomainResult<ZipcodeTable> {
        Ok(self.snapshot.read().await.1.clone())
    }
}
