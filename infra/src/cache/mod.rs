//! Cache module for Redis-backed rate limit counters
//!
//! Shared counters let several API processes enforce one limit per subject.

pub mod counter_store;
pub mod redis_client;

pub use counter_store::RedisCounterStore;
pub use redis_client::RedisClient;
