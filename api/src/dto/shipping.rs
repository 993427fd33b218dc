use serde::{Deserialize, Serialize};

/// Amount and zipcode are checked by `ShippingService` so the response can
/// name the offending field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingFeeRequest {
    /// Order amount in won
    pub order_amount: f64,
    pub zipcode: String,
}
