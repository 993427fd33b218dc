use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use tracing_actix_web::RequestId;
use validator::Validate;

use sf_shared::{ApiResponse, ErrorResponse};

use crate::dto::otp::{VerifyCodeRequest, VerifyCodeResponse};
use crate::handlers::{validation_error_response, ApiError, RequestIdExt};
use crate::middleware::client_ip;
use crate::state::AppState;

/// Handler for POST /api/v1/otp/verify
///
/// A rejected code is a 400 carrying both the outcome (`verified: false`,
/// `reason`, `remaining_attempts`) and the matching error code.
pub async fn verify_code(
    req: HttpRequest,
    request_id: RequestId,
    state: web::Data<AppState>,
    body: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    if let Err(errors) = body.validate() {
        return Ok(validation_error_response(&errors, &request_id));
    }

    let ip = client_ip(&req.connection_info(), state.trust_proxy_headers);
    let outcome = state
        .otp_service
        .verify_code(body.otp_id, &body.code, &ip)
        .await
        .in_request(&request_id)?;

    let data = VerifyCodeResponse {
        verified: outcome.verified,
        remaining_attempts: outcome.remaining_attempts,
        reason: outcome.failure,
    };

    let Some(failure) = outcome.failure else {
        return Ok(HttpResponse::Ok()
            .json(ApiResponse::success(data).with_request_id(request_id.to_string())));
    };

    let mut error = ErrorResponse::new(failure.error_code(), failure.to_string());
    if let Some(remaining) = outcome.remaining_attempts {
        error = error.add_detail("remaining_attempts", remaining);
    }

    let envelope = ApiResponse {
        success: false,
        data: Some(data),
        error: Some(error),
        timestamp: Utc::now(),
        request_id: Some(request_id.to_string()),
    };
    Ok(HttpResponse::BadRequest().json(envelope))
}
