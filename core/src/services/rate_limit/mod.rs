//! Fixed-window rate limiting over an injected counter store
//!
//! - `store` - counter store contract
//! - `memory` - single-process store guarded by a mutex
//! - `limiter` - rules, subject keys and allow/deny decisions

mod limiter;
mod memory;
mod store;


pub use limiter::{hash_phone, RateLimitDecision, RateLimitRule, RateLimiter};
pub use memory::InMemoryCounterStore;
pub use store::{CounterState, CounterStore};
