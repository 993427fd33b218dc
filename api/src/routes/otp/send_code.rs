use actix_web::{web, HttpRequest, HttpResponse};
use tracing_actix_web::RequestId;
use validator::Validate;

use sf_shared::ApiResponse;

use crate::dto::otp::{SendCodeRequest, SendCodeResponse};
use crate::handlers::{validation_error_response, ApiError, RequestIdExt};
use crate::middleware::client_ip;
use crate::state::AppState;

/// Handler for POST /api/v1/otp/send
///
/// # Request Body
///
/// ```json
/// { "phone": "010-1234-5678", "purpose": "signup" }
/// ```
///
/// `purpose` is one of `signup` (default), `password_reset`, `find_id`.
///
/// # Response
///
/// ```json
/// { "success": true, "data": { "otp_id": "…", "expires_in": 300 }, … }
/// ```
///
/// Recovery purposes answer the same way for unknown phones unless the
/// enumeration policy is `disclose`.
pub async fn send_code(
    req: HttpRequest,
    request_id: RequestId,
    state: web::Data<AppState>,
    body: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    if let Err(errors) = body.validate() {
        return Ok(validation_error_response(&errors, &request_id));
    }

    let ip = client_ip(&req.connection_info(), state.trust_proxy_headers);
    let outcome = state
        .otp_service
        .send_code(&body.phone, body.purpose, &ip)
        .await
        .in_request(&request_id)?;

    let data = SendCodeResponse {
        otp_id: outcome.otp_id,
        expires_in: outcome.expires_in_seconds,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(data).with_request_id(request_id.to_string())))
}
