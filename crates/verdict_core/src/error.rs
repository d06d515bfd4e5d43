use thiserror::Error;

use crate::metadata::{Annotation, ValueKind};

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, VerdictError>;

/// Broad class of a [`VerdictError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Invalid arguments passed to a constructor or builder.
	Construction,
	/// Caller misuse of a codec: missing required attribute, no classifier, reserved names.
	Configuration,
	/// Wire bytes that do not conform to the expected shape.
	MalformedInput,
}

/// Errors produced while building metadata and outcomes or reading and writing them on the wire.
#[derive(Debug, Error)]
pub enum VerdictError {
	/// Sink write failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// JSON syntax error or value that does not fit the expected shape.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Header or extension-attribute annotation placed on a non-primitive value.
	#[error("annotation {annotation:?} requires a primitive value or an array of primitives, got {kind}")]
	IncompatibleAnnotation {
		/// Kind of the rejected value.
		kind: ValueKind,
		/// Requested annotation.
		annotation: Annotation,
	},
	/// NaN or infinite floating point value.
	#[error("numeric value {value} is not finite")]
	NonFiniteNumber {
		/// Rejected number.
		value: f64,
	},
	/// Object builder saw the same key twice.
	#[error("duplicate object key {key:?}")]
	DuplicateKey {
		/// Repeated key.
		key: String,
	},
	/// Metadata merge under `FailOnConflict` met a key present on both sides.
	#[error("metadata merge conflict on key {key:?}")]
	MergeConflict {
		/// Conflicting key.
		key: String,
	},
	/// The reserved absent error value was passed where a real error is required.
	#[error("absent error value at index {index} cannot be stored")]
	AbsentError {
		/// Position of the offending error.
		index: usize,
	},
	/// An error without a message was passed to an errors collection.
	#[error("error at index {index} has an empty message")]
	EmptyErrorMessage {
		/// Position of the offending error.
		index: usize,
	},
	/// An errors collection must hold at least one error.
	#[error("errors collection must contain at least one error")]
	EmptyErrors,
	/// Errors index outside `0..len`.
	#[error("error index {index} out of range for collection of {len}")]
	IndexOutOfRange {
		/// Requested index.
		index: isize,
		/// Collection length.
		len: usize,
	},
	/// Value or errors accessed on an outcome in the other state.
	#[error("outcome is a {actual}, cannot access its {requested}")]
	WrongOutcomeState {
		/// State the outcome is actually in.
		actual: &'static str,
		/// Part that was requested.
		requested: &'static str,
	},
	/// A required event attribute was neither passed explicitly nor found in metadata.
	#[error("required attribute {name:?} could not be resolved from options or metadata")]
	UnresolvedAttribute {
		/// Attribute name.
		name: &'static str,
	},
	/// Metadata tried to supply an attribute name the codec owns.
	#[error("attribute {name:?} is reserved and cannot come from metadata")]
	ReservedAttribute {
		/// Reserved attribute name.
		name: String,
	},
	/// Extension attribute names must be lowercase ASCII letters and digits.
	#[error("invalid extension attribute name {name:?}")]
	InvalidExtensionAttributeName {
		/// Rejected name.
		name: String,
	},
	/// Extension attributes only carry primitive values.
	#[error("extension attribute {name:?} must be a primitive value, got {kind}")]
	NonPrimitiveExtensionAttribute {
		/// Attribute name.
		name: String,
		/// Kind of the rejected value.
		kind: ValueKind,
	},
	/// Metadata supplied a standard attribute with a non-string value.
	#[error("attribute {name:?} must be a string, got {kind}")]
	AttributeNotString {
		/// Attribute name.
		name: String,
		/// Kind of the rejected value.
		kind: ValueKind,
	},
	/// Converted header name is not an RFC 9110 token.
	#[error("invalid header name {name:?}")]
	InvalidHeaderName {
		/// Rejected header name.
		name: String,
	},
	/// Rendered header value contains CR, LF or NUL.
	#[error("header {name:?} has a value containing CR, LF or NUL")]
	InvalidHeaderValue {
		/// Header the value was destined for.
		name: String,
	},
	/// Event carried no outcome marker and no classifier was configured.
	#[error("cannot classify event type {event_type:?}: no outcome attribute and no classifier configured")]
	NoOutcomeClassifier {
		/// Event `type` attribute.
		event_type: String,
	},
	/// A required event attribute is missing from the envelope.
	#[error("event is missing required attribute {name:?}")]
	MissingAttribute {
		/// Attribute name.
		name: &'static str,
	},
	/// An event attribute appeared twice.
	#[error("event attribute {name:?} appears more than once")]
	DuplicateAttribute {
		/// Attribute name.
		name: String,
	},
	/// Unsupported `specversion`.
	#[error("unsupported specversion {found:?} (expected \"1.0\")")]
	SpecVersionMismatch {
		/// Version found in the envelope.
		found: String,
	},
	/// `datacontenttype` is not JSON-compatible.
	#[error("unsupported datacontenttype {content_type:?} (expected JSON)")]
	UnsupportedContentType {
		/// Content type found in the envelope.
		content_type: String,
	},
	/// `data_base64` payloads are not accepted.
	#[error("data_base64 is not supported, data must be JSON")]
	Base64DataUnsupported,
	/// Outcome marker attribute had a value other than `success` or `failure`.
	#[error("outcome attribute must be \"success\" or \"failure\", got {found}")]
	InvalidOutcomeAttribute {
		/// Raw value found.
		found: String,
	},
	/// Received extension attribute held an object or array.
	#[error("extension attribute {name:?} must be primitive on the wire, got {kind}")]
	NonPrimitiveExtensionValue {
		/// Attribute name.
		name: String,
		/// Kind of the received value.
		kind: ValueKind,
	},
	/// Extension attribute name on the wire is not lowercase ASCII letters and digits.
	#[error("malformed extension attribute name {name:?}")]
	MalformedExtensionName {
		/// Received attribute name.
		name: String,
	},
	/// Parsed `data` member does not lie inside the input buffer.
	#[error("event data does not borrow from the input buffer")]
	DetachedEventData,
	/// Outcome payload required but absent.
	#[error("{outcome} event carries no data")]
	MissingEventData {
		/// Classified outcome.
		outcome: &'static str,
	},
	/// Problem document has neither `errors` nor `detail`/`title`.
	#[error("problem details document carries no errors, detail or title")]
	MissingProblemErrors,
	/// `errors` member is neither an array nor an object.
	#[error("problem details errors must be an array or an object")]
	InvalidProblemErrors,
	/// An `errorDetails` entry points at no message.
	#[error("errorDetails entry for target {target:?} index {index} matches no message")]
	UnmatchedErrorDetail {
		/// Target of the entry.
		target: String,
		/// Message index of the entry.
		index: usize,
	},
	/// Failure response without a body.
	#[error("failure response with status {status} has an empty body")]
	EmptyProblemBody {
		/// HTTP status code.
		status: u16,
	},
}

impl VerdictError {
	/// Classify this error into construction, configuration or malformed-input failures.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::IncompatibleAnnotation { .. }
			| Self::NonFiniteNumber { .. }
			| Self::DuplicateKey { .. }
			| Self::MergeConflict { .. }
			| Self::AbsentError { .. }
			| Self::EmptyErrorMessage { .. }
			| Self::EmptyErrors
			| Self::IndexOutOfRange { .. }
			| Self::WrongOutcomeState { .. } => ErrorKind::Construction,
			Self::Io(_)
			| Self::UnresolvedAttribute { .. }
			| Self::ReservedAttribute { .. }
			| Self::InvalidExtensionAttributeName { .. }
			| Self::NonPrimitiveExtensionAttribute { .. }
			| Self::AttributeNotString { .. }
			| Self::InvalidHeaderName { .. }
			| Self::InvalidHeaderValue { .. }
			| Self::NoOutcomeClassifier { .. } => ErrorKind::Configuration,
			Self::Json(_)
			| Self::MissingAttribute { .. }
			| Self::DuplicateAttribute { .. }
			| Self::SpecVersionMismatch { .. }
			| Self::UnsupportedContentType { .. }
			| Self::Base64DataUnsupported
			| Self::InvalidOutcomeAttribute { .. }
			| Self::NonPrimitiveExtensionValue { .. }
			| Self::MalformedExtensionName { .. }
			| Self::DetachedEventData
			| Self::MissingEventData { .. }
			| Self::MissingProblemErrors
			| Self::InvalidProblemErrors
			| Self::UnmatchedErrorDetail { .. }
			| Self::EmptyProblemBody { .. } => ErrorKind::MalformedInput,
		}
	}
}
