//! HTTP surface for the storefront backend
//!
//! Exposes phone verification and shipping fee endpoints over actix-web.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::configure;
pub use state::AppState;
