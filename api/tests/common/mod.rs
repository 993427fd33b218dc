//! Shared fixtures for HTTP integration tests

#![allow(dead_code)]

use actix_web::web;
use std::sync::Arc;

use sf_api::AppState;
use sf_core::repositories::{InMemoryOtpRepository, InMemoryShippingSettings, InMemoryUserDirectory};
use sf_core::services::otp::{OtpService, OtpServiceConfig};
use sf_core::services::rate_limit::{InMemoryCounterStore, RateLimiter};
use sf_core::services::shipping::ShippingService;
use sf_infra::sms::{MockSmsService, VerificationSms};
use sf_shared::{EnumerationPolicy, OtpConfig, RateLimitConfig, ShippingConfig};

/// Phone with an existing account
pub const REGISTERED_PHONE: &str = "+821099990000";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub sms: MockSmsService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with(RateLimitConfig::default(), EnumerationPolicy::Uniform)
    }

    pub fn with(rate_limit: RateLimitConfig, policy: EnumerationPolicy) -> Self {
        let sms = MockSmsService::new();
        let sender = Arc::new(VerificationSms::new(sms.clone(), &OtpConfig::default()));
        let limiter = Arc::new(RateLimiter::new(
            Arc::new(InMemoryCounterStore::new()),
            rate_limit,
        ));

        let mut otp_config = OtpServiceConfig::for_tests();
        otp_config.enumeration_policy = policy;

        let otp_service = OtpService::new(
            Arc::new(InMemoryOtpRepository::new()),
            Arc::new(InMemoryUserDirectory::with_phones([REGISTERED_PHONE])),
            sender,
            limiter.clone(),
            otp_config,
        );
        let shipping_service = ShippingService::new(Arc::new(InMemoryShippingSettings::from_config(
            &ShippingConfig::default(),
        )));

        let state = web::Data::new(AppState {
            otp_service: Arc::new(otp_service),
            shipping_service: Arc::new(shipping_service),
            rate_limiter: limiter,
            health_checks: Vec::new(),
            trust_proxy_headers: false,
        });

        Self { state, sms }
    }

    /// Code from the most recent SMS sent to `phone`
    pub fn last_code(&self, phone: &str) -> Option<String> {
        self.sms.last_message(phone).and_then(|message| {
            message.split_whitespace().find_map(|word| {
                let word = word.trim_end_matches('.');
                let is_code = word.len() == 6 && word.chars().all(|c| c.is_ascii_digit());
                is_code.then(|| word.to_string())
            })
        })
    }
}

/// Initialise a test service with the production route table
#[macro_export]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(tracing_actix_web::TracingLogger::default())
                .configure(sf_api::configure($state.clone(), 64 * 1024))
                .default_service(actix_web::web::route().to(sf_api::routes::not_found)),
        )
        .await
    };
}
