use actix_web::{web, HttpResponse};
use tracing_actix_web::RequestId;

use sf_shared::ApiResponse;

use crate::dto::shipping::ShippingFeeRequest;
use crate::handlers::{ApiError, RequestIdExt};
use crate::state::AppState;

/// Handler for POST /api/v1/shipping/calculate
///
/// # Request Body
///
/// ```json
/// { "order_amount": 42000, "zipcode": "63100" }
/// ```
///
/// Responds with the fee breakdown (`base_shipping_fee`, `additional_fee`,
/// `total_shipping_fee`, `is_free_shipping`, `is_jeju`, `is_mountain`, `message`).
pub async fn calculate(
    request_id: RequestId,
    state: web::Data<AppState>,
    body: web::Json<ShippingFeeRequest>,
) -> Result<HttpResponse, ApiError> {
    let breakdown = state
        .shipping_service
        .calculate(body.order_amount, &body.zipcode)
        .await
        .in_request(&request_id)?;

    Ok(HttpResponse::Ok()
        .json(ApiResponse::success(breakdown).with_request_id(request_id.to_string())))
}
