//! Shipping fee service

use std::sync::Arc;

use sf_shared::utils::validation::{is_valid_amount, is_valid_zipcode};

use super::calculator::calculate_shipping_fee;
use crate::domain::value_objects::shipping::ShippingFeeBreakdown;
use crate::errors::{DomainResult, ValidationError};
use crate::repositories::shipping::ShippingSettingsRepository;

/// Validates shipping requests and runs the calculator over current settings
pub struct ShippingService {
    settings: Arc<dyn ShippingSettingsRepository>,
}

impl ShippingService {
    pub fn new(settings: Arc<dyn ShippingSettingsRepository>) -> Self {
        Self { settings }
    }

    /// Calculate the shipping fee for an order
    ///
    /// # Arguments
    ///
    /// * `order_amount` - Order total in won; fractions are floored
    /// * `zipcode` - 5-digit destination zipcode
    ///
    /// # Returns
    ///
    /// * `Ok(ShippingFeeBreakdown)` - Fee breakdown
    /// * `Err(DomainError)` - Invalid input or settings unavailable
    pub async fn calculate(
        &self,
        order_amount: f64,
        zipcode: &str,
    ) -> DomainResult<ShippingFeeBreakdown> {
        if !is_valid_amount(order_amount) || order_amount >= i64::MAX as f64 {
            return Err(ValidationError::InvalidAmount.into());
        }
        if !is_valid_zipcode(zipcode) {
            return Err(ValidationError::InvalidZipcode {
                zipcode: zipcode.to_string(),
            }
            .into());
        }

        let amount = order_amount.floor() as i64;
        let settings = self.settings.load_settings().await?;
        let table = self.settings.load_zipcode_table().await?;

        let breakdown = calculate_shipping_fee(amount, zipcode, &settings, &table);

        tracing::debug!(
            zipcode = %zipcode,
            order_amount = amount,
            total_shipping_fee = breakdown.total_shipping_fee,
            event = "shipping_fee_calculated",
            "Calculated shipping fee"
        );

        Ok(breakdown)
    }
}
