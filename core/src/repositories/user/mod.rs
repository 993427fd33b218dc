#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::InMemoryUserDirectory;
pub use trait_::UserDirectory;
