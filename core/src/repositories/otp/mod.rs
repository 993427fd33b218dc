#[path = "trait.rs"]
mod trait_;
pub mod mock;


pub use mock::InMemoryOtpRepository;
pub use trait_::OtpRepository;
