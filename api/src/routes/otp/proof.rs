use actix_web::{web, HttpResponse};
use tracing_actix_web::RequestId;
use validator::Validate;

use sf_shared::ApiResponse;

use crate::dto::otp::{ProofRequest, ProofResponse};
use crate::handlers::{validation_error_response, ApiError, RequestIdExt};
use crate::state::AppState;

/// Handler for POST /api/v1/otp/proof
///
/// 200 when `otp_id` is a completed verification of `phone` for `purpose`
/// that is still inside its grace period, 401 otherwise.
pub async fn proof(
    request_id: RequestId,
    state: web::Data<AppState>,
    body: web::Json<ProofRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    if let Err(errors) = body.validate() {
        return Ok(validation_error_response(&errors, &request_id));
    }

    let record = state
        .otp_service
        .verified_proof(body.otp_id, &body.phone, body.purpose)
        .await
        .in_request(&request_id)?;

    let grace = state.otp_service.config().proof_grace_minutes;
    let data = ProofResponse {
        otp_id: record.id,
        purpose: record.purpose,
        verified_at: record.verified_at,
        valid_until: record.proof_valid_until(grace),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(data).with_request_id(request_id.to_string())))
}
