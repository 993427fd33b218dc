#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::InMemoryShippingSettings;
pub use trait_::ShippingSettingsRepository;
