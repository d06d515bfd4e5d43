mod category;
mod error;
mod errors;
mod result;

/// Error categories and their HTTP status mapping.
pub use category::ErrorCategory;
/// Single error record.
pub use error::Error;
/// Non-empty error collection.
pub use errors::Errors;
/// Success-or-failure outcome.
pub use result::Outcome;
