use std::hash::{Hash, Hasher};

use crate::metadata::Object;
use crate::outcome::ErrorCategory;

/// One error: a message plus optional code, target, category and metadata.
///
/// `Error::default()` is the reserved "absent" value and is never stored in
/// [`Errors`](crate::Errors).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Error {
	/// Human-readable message; must be non-empty once stored.
	pub message: String,
	/// Machine-readable error code.
	pub code: Option<String>,
	/// Field, parameter or resource the error refers to.
	pub target: Option<String>,
	/// Category driving the HTTP status code.
	pub category: ErrorCategory,
	/// Error-specific metadata.
	pub metadata: Option<Object>,
}

impl Error {
	/// Unclassified error with `message`.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			..Self::default()
		}
	}

	/// Validation error attached to `target`.
	pub fn validation(target: impl Into<String>, message: impl Into<String>) -> Self {
		Self::new(message).with_target(target).with_category(ErrorCategory::Validation)
	}

	/// Not-found error.
	pub fn not_found(message: impl Into<String>) -> Self {
		Self::new(message).with_category(ErrorCategory::NotFound)
	}

	/// Set the error code.
	pub fn with_code(mut self, code: impl Into<String>) -> Self {
		self.code = Some(code.into());
		self
	}

	/// Set the target.
	pub fn with_target(mut self, target: impl Into<String>) -> Self {
		self.target = Some(target.into());
		self
	}

	/// Set the category.
	pub fn with_category(mut self, category: ErrorCategory) -> Self {
		self.category = category;
		self
	}

	/// Set metadata; an empty object clears it.
	pub fn with_metadata(mut self, metadata: Object) -> Self {
		self.metadata = (!metadata.is_empty()).then_some(metadata);
		self
	}

	/// Whether this is the reserved absent value.
	pub fn is_absent(&self) -> bool {
		*self == Self::default()
	}

	/// Compare everything except metadata.
	pub fn eq_ignoring_metadata(&self, other: &Self) -> bool {
		self.message == other.message && self.code == other.code && self.target == other.target && self.category == other.category
	}

	/// Hash everything except metadata, consistent with [`Error::eq_ignoring_metadata`].
	pub fn hash_ignoring_metadata<H: Hasher>(&self, state: &mut H) {
		self.message.hash(state);
		self.code.hash(state);
		self.target.hash(state);
		self.category.hash(state);
	}
}
