//! Counter store contract for rate limiting

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sf_shared::LimitRule;

use crate::errors::DomainResult;

/// Counter state after an increment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterState {
    /// Requests counted in the current window, including this one when allowed
    pub count: u32,
    /// Whether the request fit under the ceiling
    pub allowed: bool,
    /// When the current window ends
    pub reset_at: DateTime<Utc>,
}

/// Storage for per-subject request counters.
///
/// `increment` must be a single atomic read-modify-write: open a new window
/// when none exists or the old one elapsed, refuse without counting when the
/// window is full, otherwise count the request.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Count one request for `key` under `rule`
    async fn increment(&self, key: &str, rule: &LimitRule) -> DomainResult<CounterState>;

    /// Drop the counter for `key`
    async fn reset(&self, key: &str) -> DomainResult<()>;
}
