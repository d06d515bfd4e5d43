mod headers;
mod options;
mod problem;
mod read;
mod write;

/// Metadata key to header name conversions.
pub use headers::{HeaderNameConversion, MappedHeaderNames, VerbatimHeaderNames};
/// Read and write configuration.
pub use options::{HttpReadOptions, HttpWriteOptions, ProblemFormat, SuccessShape};
/// Response readers.
pub use read::{read_response, read_unit_response};
/// Response writers.
pub use write::{ResponseHead, to_response, to_unit_response, write_response, write_unit_response};

/// Media type of RFC 9457 problem documents.
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";
