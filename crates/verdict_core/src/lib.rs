//! Outcome values with structured metadata, carried over RFC 9457 problem details and CloudEvents v1.0.

mod error;

/// CloudEvents v1.0 structured-mode codec with zero-copy `data` parsing.
pub mod cloudevents;
/// HTTP problem-details (RFC 9457) codec and header routing.
pub mod http;
/// Transport-agnostic JSON helpers shared by both codecs.
pub mod json;
/// Metadata value model: values, annotations, arrays, objects, builders and merging.
pub mod metadata;
/// Success-or-failure outcome types.
pub mod outcome;

/// Error taxonomy and result alias.
pub use error::{ErrorKind, Result, VerdictError};
/// Metadata values and collections.
pub use metadata::{Annotation, Array, MergeStrategy, Object, Value};
/// Outcome and error types.
pub use outcome::{Error, ErrorCategory, Errors, Outcome};
