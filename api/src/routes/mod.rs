//! Route handlers

pub mod health;
pub mod otp;
pub mod shipping;

use actix_web::HttpResponse;
use sf_shared::{error_codes, ApiResponse, ErrorResponse};

/// Default 404 handler
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::error(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    )))
}
