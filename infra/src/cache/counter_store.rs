//! Redis-backed fixed-window counters

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sf_core::errors::DomainResult;
use sf_core::services::rate_limit::{CounterState, CounterStore};
use sf_shared::LimitRule;
use tracing::debug;

use super::redis_client::RedisClient;

/// Check-and-increment in one round trip.
///
/// KEYS[1] counter key, ARGV[1] ceiling, ARGV[2] window in milliseconds.
/// Returns `{allowed, count, pttl}`. A refused request is not counted and the
/// window only starts on the first counted request.
const INCREMENT_SCRIPT: &str = r#"
local current = tonumber(redis.call('GET', KEYS[1]) or '0')
if current >= tonumber(ARGV[1]) then
    return {0, current, redis.call('PTTL', KEYS[1])}
end
local count = redis.call('INCR', KEYS[1])
if count == 1 then
    redis.call('PEXPIRE', KEYS[1], ARGV[2])
end
local ttl = redis.call('PTTL', KEYS[1])
if ttl < 0 then
    redis.call('PEXPIRE', KEYS[1], ARGV[2])
    ttl = tonumber(ARGV[2])
end
return {1, count, ttl}
"#;

/// `CounterStore` shared between API processes through Redis
pub struct RedisCounterStore {
    client: RedisClient,
}

impl RedisCounterStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

/// Translate a script reply into counter state.
/// A missing TTL (no key, or no expiry) means a full window from now.
fn to_counter_state(reply: (i64, i64, i64), rule: &LimitRule) -> CounterState {
    let (allowed, count, ttl_ms) = reply;
    let ttl_ms = if ttl_ms < 0 { rule.window_millis() } else { ttl_ms };

    CounterState {
        count: u32::try_from(count.max(0)).unwrap_or(u32::MAX),
        allowed: allowed == 1,
        reset_at: Utc::now() + Duration::milliseconds(ttl_ms),
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment(&self, key: &str, rule: &LimitRule) -> DomainResult<CounterState> {
        let key = self.client.make_key(key);
        let reply: (i64, i64, i64) = self
            .client
            .run_script(
                INCREMENT_SCRIPT,
                &key,
                &[i64::from(rule.max_requests), rule.window_millis()],
            )
            .await?;

        debug!(allowed = reply.0 == 1, count = reply.1, "Rate limit counter updated");
        Ok(to_counter_state(reply, rule))
    }

    async fn reset(&self, key: &str) -> DomainResult<()> {
        self.client.delete(&self.client.make_key(key)).await?;
        Ok(())
    }
}
