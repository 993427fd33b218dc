//! In-memory counter store for single-process deployments

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sf_shared::LimitRule;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::store::{CounterState, CounterStore};
use crate::errors::DomainResult;
use crate::services::clock::{Clock, SystemClock};

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Counters in a `HashMap` behind a mutex
pub struct InMemoryCounterStore {
    windows: Mutex<HashMap<String, Window>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Drop windows that have already elapsed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        let before = windows.len();
        windows.retain(|_, window| window.reset_at > now);
        before - windows.len()
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, key: &str, rule: &LimitRule) -> DomainResult<CounterState> {
        let now = self.clock.now();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        let window = windows
            .entry(key.to_string())
            .and_modify(|window| {
                if now >= window.reset_at {
                    window.count = 0;
                    window.reset_at = now + Duration::milliseconds(rule.window_millis());
                }
            })
            .or_insert_with(|| Window {
                count: 0,
                reset_at: now + Duration::milliseconds(rule.window_millis()),
            });

        if window.count >= rule.max_requests {
            return Ok(CounterState {
                count: window.count,
                allowed: false,
                reset_at: window.reset_at,
            });
        }

        window.count += 1;
        Ok(CounterState {
            count: window.count,
            allowed: true,
            reset_at: window.reset_at,
        })
    }

    async fn reset(&self, key: &str) -> DomainResult<()> {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
