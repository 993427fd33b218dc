//! Per-address request limit for the whole API scope

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use sf_core::errors::DomainError;
use sf_core::services::rate_limit::{RateLimitRule, RateLimiter};

use super::client_ip::client_ip;
use crate::handlers::ApiError;

/// Applies the `api_per_ip` rule before any handler runs.
///
/// Counter store failures let the request through; the OTP flows enforce
/// their own limits inside the service.
#[derive(Clone)]
pub struct ApiRateLimit {
    limiter: Arc<RateLimiter>,
    trust_proxy_headers: bool,
}

impl ApiRateLimit {
    pub fn new(limiter: Arc<RateLimiter>, trust_proxy_headers: bool) -> Self {
        Self {
            limiter,
            trust_proxy_headers,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiRateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiRateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiRateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            trust_proxy_headers: self.trust_proxy_headers,
        }))
    }
}

pub struct ApiRateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<RateLimiter>,
    trust_proxy_headers: bool,
}

impl<S, B> Service<ServiceRequest> for ApiRateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();
        let ip = client_ip(&req.connection_info(), self.trust_proxy_headers);

        Box::pin(async move {
            match limiter.enforce(RateLimitRule::ApiPerIp, &ip).await {
                Ok(_) => {}
                Err(error @ DomainError::RateLimited { .. }) => {
                    let response = ApiError::new(error).error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
                Err(error) => {
                    tracing::error!(
                        error = %error,
                        "API rate limit check failed; allowing request"
                    );
                }
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}
