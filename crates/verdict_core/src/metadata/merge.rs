use std::cmp::Ordering;
use std::convert::Infallible;

use crate::metadata::object::Entry;
use crate::metadata::{Object, Value};
use crate::{Result, VerdictError};

/// How keys present in both objects are resolved when merging metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MergeStrategy {
	/// Incoming values win; object pairs are merged recursively.
	#[default]
	AddOrReplace,
	/// Original values win; object pairs are merged recursively.
	PreserveExisting,
	/// Any key present on both sides is an error.
	FailOnConflict,
}

enum Resolution {
	Incoming,
	Original,
	Recurse,
}

impl Object {
	/// Merge `incoming` into a new object according to `strategy`.
	///
	/// Scalars and arrays are never merged element-wise; only object pairs recurse.
	pub fn merge(&self, incoming: &Object, strategy: MergeStrategy) -> Result<Object> {
		match strategy {
			MergeStrategy::AddOrReplace => Ok(self.merge_replacing(incoming)),
			MergeStrategy::PreserveExisting => {
				let Ok(merged) = merge_with::<Infallible>(self, incoming, &|_, original, incoming| {
					Ok(if both_objects(original, incoming) {
						Resolution::Recurse
					} else {
						Resolution::Original
					})
				});
				Ok(merged)
			}
			MergeStrategy::FailOnConflict => merge_with(self, incoming, &|key, _, _| Err(VerdictError::MergeConflict { key: key.to_owned() })),
		}
	}

	/// Infallible [`MergeStrategy::AddOrReplace`] merge.
	pub fn merge_replacing(&self, incoming: &Object) -> Object {
		let Ok(merged) = merge_with::<Infallible>(self, incoming, &|_, original, incoming| {
			Ok(if both_objects(original, incoming) {
				Resolution::Recurse
			} else {
				Resolution::Incoming
			})
		});
		merged
	}
}

fn both_objects(original: &Value, incoming: &Value) -> bool {
	original.as_object().is_some() && incoming.as_object().is_some()
}

/// Merge two ordinally sorted entry lists in one pass; the output stays sorted.
fn merge_with<E>(original: &Object, incoming: &Object, resolve: &impl Fn(&str, &Value, &Value) -> std::result::Result<Resolution, E>) -> std::result::Result<Object, E> {
	if incoming.is_empty() {
		return Ok(original.clone());
	}
	if original.is_empty() {
		return Ok(incoming.clone());
	}

	let left = original.entries();
	let right = incoming.entries();
	let mut out: Vec<Entry> = Vec::with_capacity(left.len() + right.len());
	let (mut i, mut j) = (0, 0);
	while i < left.len() && j < right.len() {
		let (left_key, left_value) = &left[i];
		let (right_key, right_value) = &right[j];
		match left_key.cmp(right_key) {
			Ordering::Less => {
				out.push(left[i].clone());
				i += 1;
			}
			Ordering::Greater => {
				out.push(right[j].clone());
				j += 1;
			}
			Ordering::Equal => {
				let value = match resolve(left_key, left_value, right_value)? {
					Resolution::Incoming => right_value.clone(),
					Resolution::Original => left_value.clone(),
					Resolution::Recurse => match (left_value.as_object(), right_value.as_object()) {
						(Some(a), Some(b)) => Value::object(merge_with(a, b, resolve)?).with_annotation_unchecked(right_value.annotation()),
						_ => right_value.clone(),
					},
				};
				out.push((left_key.clone(), value));
				i += 1;
				j += 1;
			}
		}
	}
	out.extend_from_slice(&left[i..]);
	out.extend_from_slice(&right[j..]);
	Ok(Object::from_sorted_unique(out))
}
