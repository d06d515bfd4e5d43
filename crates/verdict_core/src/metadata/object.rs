use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use smallvec::SmallVec;

use crate::metadata::{Array, Value};
use crate::{Result, VerdictError};

const INLINE_ENTRIES: usize = 8;
/// Objects up to this size are searched linearly; larger ones build a hash index on first lookup.
const LINEAR_SCAN_LIMIT: usize = 8;

pub(crate) type Entry = (Arc<str>, Value);

struct ObjectStore {
	entries: Box<[Entry]>,
	index: OnceLock<HashMap<Arc<str>, usize>>,
}

impl ObjectStore {
	fn position(&self, key: &str) -> Option<usize> {
		if self.entries.len() <= LINEAR_SCAN_LIMIT {
			return self.entries.iter().position(|(name, _)| name.as_ref() == key);
		}
		let index = self.index.get_or_init(|| {
			self.entries
				.iter()
				.enumerate()
				.map(|(idx, (name, _))| (Arc::clone(name), idx))
				.collect()
		});
		index.get(key).copied()
	}
}

/// Immutable string-keyed map of [`Value`]s with keys in ordinal (byte) order.
///
/// Clones share the sealed backing store. The empty object allocates nothing.
#[derive(Clone, Default)]
pub struct Object {
	store: Option<Arc<ObjectStore>>,
}

impl Object {
	/// Empty object.
	pub const fn empty() -> Self {
		Self { store: None }
	}

	/// Object holding exactly one entry.
	pub fn single(key: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
		Self::from_sorted_unique(vec![(key.into(), value.into())])
	}

	/// Seal key/value pairs into an object, rejecting duplicate keys.
	pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Result<Self>
	where
		K: Into<Arc<str>>,
		V: Into<Value>,
	{
		let mut builder = ObjectBuilder::new();
		for (key, value) in entries {
			builder.add(key, value);
		}
		builder.build()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries().len()
	}

	/// Whether the object has no entries.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&Value> {
		let store = self.store.as_deref()?;
		let idx = store.position(key)?;
		store.entries.get(idx).map(|(_, value)| value)
	}

	/// Whether `key` is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	/// Boolean stored under `key`.
	pub fn get_bool(&self, key: &str) -> Option<bool> {
		self.get(key)?.as_bool()
	}

	/// Integer stored under `key`.
	pub fn get_i64(&self, key: &str) -> Option<i64> {
		self.get(key)?.as_i64()
	}

	/// Double stored under `key`.
	pub fn get_f64(&self, key: &str) -> Option<f64> {
		self.get(key)?.as_f64()
	}

	/// String stored under `key`.
	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.get(key)?.as_str()
	}

	/// Array stored under `key`.
	pub fn get_array(&self, key: &str) -> Option<&Array> {
		self.get(key)?.as_array()
	}

	/// Object stored under `key`.
	pub fn get_object(&self, key: &str) -> Option<&Object> {
		self.get(key)?.as_object()
	}

	/// Iterate entries in key order.
	pub fn iter(&self) -> ObjectIter<'_> {
		ObjectIter {
			inner: self.entries().iter(),
		}
	}

	/// Iterate keys in order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries().iter().map(|(key, _)| key.as_ref())
	}

	pub(crate) fn entries(&self) -> &[Entry] {
		self.store.as_deref().map(|store| &store.entries[..]).unwrap_or(&[])
	}

	/// Caller guarantees ordinal order and unique keys.
	pub(crate) fn from_sorted_unique(entries: Vec<Entry>) -> Self {
		debug_assert!(entries.windows(2).all(|pair| pair[0].0 < pair[1].0));
		if entries.is_empty() {
			return Self::empty();
		}
		Self {
			store: Some(Arc::new(ObjectStore {
				entries: entries.into_boxed_slice(),
				index: OnceLock::new(),
			})),
		}
	}
}

impl PartialEq for Object {
	fn eq(&self, other: &Self) -> bool {
		match (&self.store, &other.store) {
			(Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
			_ => self.entries() == other.entries(),
		}
	}
}

impl Eq for Object {}

impl Hash for Object {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.entries().hash(state);
	}
}

impl fmt::Debug for Object {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<'a> IntoIterator for &'a Object {
	type Item = (&'a str, &'a Value);
	type IntoIter = ObjectIter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Borrowing iterator over object entries in key order.
#[derive(Debug, Clone)]
pub struct ObjectIter<'a> {
	inner: std::slice::Iter<'a, Entry>,
}

impl<'a> Iterator for ObjectIter<'a> {
	type Item = (&'a str, &'a Value);

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|(key, value)| (key.as_ref(), value))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl ExactSizeIterator for ObjectIter<'_> {}

/// Single-use accumulator producing an [`Object`].
///
/// Entries are kept in insertion order until `build`, which sorts keys ordinally and
/// rejects duplicates.
#[derive(Debug, Default)]
pub struct ObjectBuilder {
	entries: SmallVec<[Entry; INLINE_ENTRIES]>,
}

impl ObjectBuilder {
	/// Create an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a builder expecting roughly `capacity` entries.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: SmallVec::with_capacity(capacity),
		}
	}

	/// Append one entry.
	pub fn add(&mut self, key: impl Into<Arc<str>>, value: impl Into<Value>) -> &mut Self {
		self.entries.push((key.into(), value.into()));
		self
	}

	/// Append every entry of `entries`.
	pub fn add_range<K: Into<Arc<str>>>(&mut self, entries: impl IntoIterator<Item = (K, Value)>) -> &mut Self {
		self.entries.extend(entries.into_iter().map(|(key, value)| (key.into(), value)));
		self
	}

	/// Number of accumulated entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether nothing has been added yet.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Sort keys, reject duplicates, and seal entries into an immutable object.
	pub fn build(mut self) -> Result<Object> {
		self.entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
		if let Some(pair) = self.entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
			return Err(VerdictError::DuplicateKey { key: pair[0].0.to_string() });
		}
		Ok(Object::from_sorted_unique(self.entries.into_vec()))
	}
}
