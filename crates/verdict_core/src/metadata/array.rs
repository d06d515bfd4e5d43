use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::metadata::Value;

const INLINE_ITEMS: usize = 8;

/// Immutable ordered list of [`Value`]s.
///
/// Clones share the sealed backing store. The empty array allocates nothing.
#[derive(Clone, Default)]
pub struct Array {
	items: Option<Arc<[Value]>>,
}

impl Array {
	/// Empty array.
	pub const fn empty() -> Self {
		Self { items: None }
	}

	/// Seal values into an array.
	pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
		let mut builder = ArrayBuilder::new();
		builder.add_range(values);
		builder.build()
	}

	/// Number of items.
	pub fn len(&self) -> usize {
		self.as_slice().len()
	}

	/// Whether the array has no items.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Item at `index`.
	pub fn get(&self, index: usize) -> Option<&Value> {
		self.as_slice().get(index)
	}

	/// Borrow all items.
	pub fn as_slice(&self) -> &[Value] {
		self.items.as_deref().unwrap_or(&[])
	}

	/// Iterate over items in order.
	pub fn iter(&self) -> std::slice::Iter<'_, Value> {
		self.as_slice().iter()
	}
}

impl PartialEq for Array {
	fn eq(&self, other: &Self) -> bool {
		match (&self.items, &other.items) {
			(Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
			_ => self.as_slice() == other.as_slice(),
		}
	}
}

impl Eq for Array {}

impl Hash for Array {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.as_slice().hash(state);
	}
}

impl fmt::Debug for Array {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

impl<'a> IntoIterator for &'a Array {
	type Item = &'a Value;
	type IntoIter = std::slice::Iter<'a, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl FromIterator<Value> for Array {
	fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
		Self::from_values(iter)
	}
}

impl From<Vec<Value>> for Array {
	fn from(values: Vec<Value>) -> Self {
		if values.is_empty() {
			return Self::empty();
		}
		Self {
			items: Some(Arc::from(values)),
		}
	}
}

/// Single-use accumulator producing an [`Array`].
///
/// Small arrays accumulate inline; `build` copies into an exactly sized backing store.
#[derive(Debug, Default)]
pub struct ArrayBuilder {
	items: SmallVec<[Value; INLINE_ITEMS]>,
}

impl ArrayBuilder {
	/// Create an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a builder expecting roughly `capacity` items.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			items: SmallVec::with_capacity(capacity),
		}
	}

	/// Append one item.
	pub fn add(&mut self, value: impl Into<Value>) -> &mut Self {
		self.items.push(value.into());
		self
	}

	/// Append every item of `values`.
	pub fn add_range(&mut self, values: impl IntoIterator<Item = Value>) -> &mut Self {
		self.items.extend(values);
		self
	}

	/// Number of accumulated items.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether nothing has been added yet.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Seal accumulated items into an immutable array.
	pub fn build(self) -> Array {
		if self.items.is_empty() {
			return Array::empty();
		}
		Array {
			items: Some(self.items.into_iter().collect()),
		}
	}
}
