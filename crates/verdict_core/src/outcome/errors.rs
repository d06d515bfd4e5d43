use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::outcome::{Error, ErrorCategory};
use crate::{Result, VerdictError};

/// Ordered collection of one or more [`Error`]s.
///
/// A single error is stored inline; two or more share one backing slice. The storage
/// shape is invisible to equality, hashing and enumeration.
#[derive(Clone)]
pub struct Errors {
	repr: Repr,
}

#[derive(Clone)]
enum Repr {
	One(Error),
	Many(Arc<[Error]>),
}

impl Errors {
	/// Collection holding exactly `error`.
	pub fn one(error: Error) -> Result<Self> {
		check_error(&error, 0)?;
		Ok(Self { repr: Repr::One(error) })
	}

	/// Collection holding `errors` in order; empty input and absent entries are rejected.
	pub fn from_vec(mut errors: Vec<Error>) -> Result<Self> {
		for (index, error) in errors.iter().enumerate() {
			check_error(error, index)?;
		}
		match errors.len() {
			0 => Err(VerdictError::EmptyErrors),
			1 => Ok(Self {
				repr: Repr::One(errors.remove(0)),
			}),
			_ => Ok(Self {
				repr: Repr::Many(Arc::from(errors)),
			}),
		}
	}

	/// Number of errors; never zero.
	pub fn len(&self) -> usize {
		self.as_slice().len()
	}

	/// Always `false`; kept for API symmetry with other collections.
	pub fn is_empty(&self) -> bool {
		false
	}

	/// Borrow all errors.
	pub fn as_slice(&self) -> &[Error] {
		match &self.repr {
			Repr::One(error) => std::slice::from_ref(error),
			Repr::Many(errors) => errors,
		}
	}

	/// Iterate errors in order without allocating.
	pub fn iter(&self) -> std::slice::Iter<'_, Error> {
		self.as_slice().iter()
	}

	/// First error.
	pub fn first(&self) -> &Error {
		match &self.repr {
			Repr::One(error) => error,
			Repr::Many(errors) => &errors[0],
		}
	}

	/// Error at `index`.
	pub fn get(&self, index: usize) -> Option<&Error> {
		self.as_slice().get(index)
	}

	/// Error at a signed `index`; negative or too-large indices fail with `IndexOutOfRange`.
	pub fn element_at(&self, index: isize) -> Result<&Error> {
		usize::try_from(index)
			.ok()
			.and_then(|idx| self.get(idx))
			.ok_or(VerdictError::IndexOutOfRange { index, len: self.len() })
	}

	/// Category representing the whole collection.
	///
	/// With `first_wins` the first error decides. Otherwise a category shared by every
	/// error wins and mixed categories collapse to [`ErrorCategory::Unclassified`].
	pub fn leading_category(&self, first_wins: bool) -> ErrorCategory {
		let first = self.first().category;
		if first_wins || self.iter().all(|error| error.category == first) {
			first
		} else {
			ErrorCategory::Unclassified
		}
	}

	/// Element-wise comparison that skips error metadata.
	pub fn eq_ignoring_metadata(&self, other: &Self) -> bool {
		slices_eq(self.as_slice(), other.as_slice(), Error::eq_ignoring_metadata)
	}

	/// Hash consistent with [`Errors::eq_ignoring_metadata`].
	pub fn hash_ignoring_metadata<H: Hasher>(&self, state: &mut H) {
		self.len().hash(state);
		for error in self {
			error.hash_ignoring_metadata(state);
		}
	}
}

fn check_error(error: &Error, index: usize) -> Result<()> {
	if error.is_absent() {
		return Err(VerdictError::AbsentError { index });
	}
	if error.message.is_empty() {
		return Err(VerdictError::EmptyErrorMessage { index });
	}
	Ok(())
}

fn slices_eq(left: &[Error], right: &[Error], eq: impl Fn(&Error, &Error) -> bool) -> bool {
	if left.len() != right.len() {
		return false;
	}
	let mut left_chunks = left.chunks_exact(4);
	let mut right_chunks = right.chunks_exact(4);
	for (a, b) in left_chunks.by_ref().zip(right_chunks.by_ref()) {
		if !(eq(&a[0], &b[0]) && eq(&a[1], &b[1]) && eq(&a[2], &b[2]) && eq(&a[3], &b[3])) {
			return false;
		}
	}
	left_chunks.remainder().iter().zip(right_chunks.remainder()).all(|(a, b)| eq(a, b))
}

impl PartialEq for Errors {
	fn eq(&self, other: &Self) -> bool {
		if let (Repr::Many(a), Repr::Many(b)) = (&self.repr, &other.repr) {
			if Arc::ptr_eq(a, b) {
				return true;
			}
		}
		slices_eq(self.as_slice(), other.as_slice(), Error::eq)
	}
}

impl Eq for Errors {}

impl Hash for Errors {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.as_slice().hash(state);
	}
}

impl fmt::Debug for Errors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

impl<'a> IntoIterator for &'a Errors {
	type Item = &'a Error;
	type IntoIter = std::slice::Iter<'a, Error>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl TryFrom<Error> for Errors {
	type Error = VerdictError;

	fn try_from(error: Error) -> Result<Self> {
		Self::one(error)
	}
}

impl TryFrom<Vec<Error>> for Errors {
	type Error = VerdictError;

	fn try_from(errors: Vec<Error>) -> Result<Self> {
		Self::from_vec(errors)
	}
}
