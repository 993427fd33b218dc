use actix_web::{web, HttpResponse};
use futures_util::future::join_all;
use std::collections::HashMap;

use sf_shared::{ApiResponse, HealthResponse, HealthStatus};

use crate::state::AppState;

/// GET /health
///
/// 200 while every backing service answers, 503 once any is unhealthy.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let checks = join_all(state.health_checks.iter().map(|check| async move {
        (check.name().to_string(), check.check().await)
    }))
    .await;

    let report = HealthResponse::from_services(
        checks.into_iter().collect::<HashMap<_, _>>(),
        env!("CARGO_PKG_VERSION"),
    );

    let mut response = match report.status {
        HealthStatus::Unhealthy => HttpResponse::ServiceUnavailable(),
        HealthStatus::Healthy | HealthStatus::Degraded => HttpResponse::Ok(),
    };
    response.json(ApiResponse::success(report))
}
