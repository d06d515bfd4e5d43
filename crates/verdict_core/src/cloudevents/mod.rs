mod attributes;
mod envelope;
mod options;
mod read;
mod write;

/// Zero-copy envelope parsing.
pub use envelope::{DataSpan, EventEnvelope, parse_envelope};
/// Read and write configuration.
pub use options::{CloudEventsReadOptions, CloudEventsWriteOptions, OutcomeClassifier};
/// Event readers.
pub use read::{read_event, read_unit_event};
/// Event writers.
pub use write::{to_event, to_unit_event, write_event, write_unit_event};

/// The only `specversion` written and accepted.
pub const SPEC_VERSION: &str = "1.0";

/// Extension attribute marking an event as `success` or `failure`.
pub const OUTCOME_ATTRIBUTE: &str = "outcome";
