//! Shipping fee calculation
//!
//! The calculator is a pure function over a settings snapshot. The service
//! validates boundary input and loads the snapshot from a repository.

mod calculator;
mod service;


pub use calculator::{calculate_shipping_fee, format_won};
pub use service::ShippingService;
