//! Rate limit rules and decisions

use chrono::{DateTime, Utc};
use sf_shared::{LimitRule, RateLimitConfig};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::store::CounterStore;
use crate::errors::{DomainError, DomainResult};
use crate::services::clock::{Clock, SystemClock};

/// Named limits enforced by the services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitRule {
    OtpSendPerPhone,
    OtpSendPerIp,
    OtpVerifyPerIp,
    ApiPerIp,
}

impl RateLimitRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitRule::OtpSendPerPhone => "otp_send_per_phone",
            RateLimitRule::OtpSendPerIp => "otp_send_per_ip",
            RateLimitRule::OtpVerifyPerIp => "otp_verify_per_ip",
            RateLimitRule::ApiPerIp => "api_per_ip",
        }
    }

    /// Counter key for `subject`. Phone numbers are hashed first.
    pub fn key(&self, subject: &str) -> String {
        match self {
            RateLimitRule::OtpSendPerPhone => format!("otp_send:phone:{}", hash_phone(subject)),
            RateLimitRule::OtpSendPerIp => format!("otp_send:ip:{}", subject),
            RateLimitRule::OtpVerifyPerIp => format!("otp_verify:ip:{}", subject),
            RateLimitRule::ApiPerIp => format!("api:ip:{}", subject),
        }
    }

    /// Limit configured for this rule
    pub fn limit(&self, config: &RateLimitConfig) -> LimitRule {
        match self {
            RateLimitRule::OtpSendPerPhone => config.otp_send_per_phone,
            RateLimitRule::OtpSendPerIp => config.otp_send_per_ip,
            RateLimitRule::OtpVerifyPerIp => config.otp_verify_per_ip,
            RateLimitRule::ApiPerIp => config.api_per_ip,
        }
    }
}

impl std::fmt::Display for RateLimitRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hex SHA-256 of a phone number, used wherever a phone becomes a key
pub fn hash_phone(phone: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(phone.as_bytes());
    hex::encode(hasher.finalize())
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Message for rejected requests
    pub error: Option<String>,
    /// When the current window ends
    pub reset_at: DateTime<Utc>,
    /// Requests left in the current window
    pub remaining: u32,
}

/// Checks subjects against limits using an injected counter store
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>, config: RateLimitConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn CounterStore>,
        config: RateLimitConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count one request for `subject_key` against `rule`
    pub async fn check(
        &self,
        subject_key: &str,
        rule: &LimitRule,
    ) -> DomainResult<RateLimitDecision> {
        let state = self.store.increment(subject_key, rule).await?;

        Ok(RateLimitDecision {
            allowed: state.allowed,
            error: (!state.allowed).then(|| {
                format!(
                    "Rate limit of {} requests per {} seconds exceeded",
                    rule.max_requests, rule.window_seconds
                )
            }),
            reset_at: state.reset_at,
            remaining: rule.max_requests.saturating_sub(state.count),
        })
    }

    /// Check a named rule for a subject. Always allows when limiting is disabled.
    pub async fn check_rule(
        &self,
        rule: RateLimitRule,
        subject: &str,
    ) -> DomainResult<RateLimitDecision> {
        let limit = rule.limit(&self.config);

        if !self.config.enabled {
            return Ok(RateLimitDecision {
                allowed: true,
                error: None,
                reset_at: self.clock.now(),
                remaining: limit.max_requests,
            });
        }

        self.check(&rule.key(subject), &limit).await
    }

    /// Like `check_rule`, but a rejection becomes `DomainError::RateLimited`
    pub async fn enforce(
        &self,
        rule: RateLimitRule,
        subject: &str,
    ) -> DomainResult<RateLimitDecision> {
        let decision = self.check_rule(rule, subject).await?;

        if !decision.allowed {
            tracing::warn!(
                rule = rule.as_str(),
                reset_at = %decision.reset_at,
                event = "rate_limit_exceeded",
                "Rate limit exceeded"
            );
            return Err(DomainError::RateLimited {
                rule: rule.as_str().to_string(),
                reset_at: decision.reset_at,
            });
        }

        Ok(decision)
    }

    /// Clear a subject's counter for a named rule
    pub async fn reset(&self, rule: RateLimitRule, subject: &str) -> DomainResult<()> {
        self.store.reset(&rule.key(subject)).await
    }
}
