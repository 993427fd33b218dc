pub mod error;

pub use error::{json_error_handler, validation_error_response, ApiError, RequestIdExt};
