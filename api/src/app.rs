//! Route and middleware registration

use actix_web::web;

use crate::handlers::json_error_handler;
use crate::middleware::ApiRateLimit;
use crate::routes;
use crate::state::AppState;

/// Register state, JSON limits and every route.
///
/// ```text
/// GET  /health
/// /api/v1 (api_per_ip limit)
///   GET  /health
///   POST /otp/send | /otp/verify | /otp/proof
///   POST /shipping/calculate
/// ```
pub fn configure(
    state: web::Data<AppState>,
    max_payload_size: usize,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let rate_limit = ApiRateLimit::new(state.rate_limiter.clone(), state.trust_proxy_headers);

        cfg.app_data(state)
            .app_data(
                web::JsonConfig::default()
                    .limit(max_payload_size)
                    .error_handler(json_error_handler),
            )
            .route("/health", web::get().to(routes::health::health))
            .service(
                web::scope("/api/v1")
                    .wrap(rate_limit)
                    .route("/health", web::get().to(routes::health::health))
                    .service(routes::otp::scope())
                    .service(routes::shipping::scope()),
            );
    }
}
