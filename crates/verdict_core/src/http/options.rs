use std::sync::Arc;

use crate::http::{HeaderNameConversion, VerbatimHeaderNames};
use crate::json::MetadataSerializationMode;

/// Shape of the `errors` member in a problem document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProblemFormat {
	/// `errors` is an array of rich error objects.
	#[default]
	Rich,
	/// `errors` maps each target to its messages; the remaining fields go to `errorDetails`.
	Grouped,
}

/// Configuration for writing HTTP responses.
#[derive(Debug, Clone)]
pub struct HttpWriteOptions {
	/// Layout of the `errors` member.
	pub problem_format: ProblemFormat,
	/// Take the response status from the first error instead of the shared category.
	pub first_category_is_leading: bool,
	/// Whether successful responses carry body metadata.
	pub metadata_mode: MetadataSerializationMode,
	/// Status code written for successes.
	pub success_status: u16,
	/// Metadata key to header name mapping.
	pub header_names: Arc<dyn HeaderNameConversion>,
}

impl Default for HttpWriteOptions {
	fn default() -> Self {
		Self {
			problem_format: ProblemFormat::Rich,
			first_category_is_leading: false,
			metadata_mode: MetadataSerializationMode::ErrorsOnly,
			success_status: 200,
			header_names: Arc::new(VerbatimHeaderNames),
		}
	}
}

impl HttpWriteOptions {
	/// Grouped `target -> [message]` errors with first-error status, the layout most
	/// validation-problem consumers expect.
	pub fn validation_compatible() -> Self {
		Self {
			problem_format: ProblemFormat::Grouped,
			first_category_is_leading: true,
			..Self::default()
		}
	}

	/// Replace the header name conversion.
	pub fn with_header_names(mut self, header_names: impl HeaderNameConversion + 'static) -> Self {
		self.header_names = Arc::new(header_names);
		self
	}
}

/// How a successful body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SuccessShape {
	/// Wrapped when the root is a non-empty object whose only properties are `value` and `metadata`.
	#[default]
	Auto,
	/// The body is the value itself.
	Bare,
	/// The body is `{ "value": ..., "metadata": ... }`.
	Wrapped,
}

/// Configuration for reading HTTP responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpReadOptions {
	/// Interpretation of successful bodies.
	pub success_shape: SuccessShape,
}
