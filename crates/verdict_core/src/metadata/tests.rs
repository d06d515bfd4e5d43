use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::metadata::{Annotation, Array, ArrayBuilder, MergeStrategy, Object, ObjectBuilder, Value, ValueKind};
use crate::{ErrorKind, VerdictError};

fn hash_of(value: &impl Hash) -> u64 {
	let mut hasher = DefaultHasher::new();
	value.hash(&mut hasher);
	hasher.finish()
}

fn object(entries: &[(&str, Value)]) -> Object {
	Object::from_entries(entries.iter().map(|(key, value)| (*key, value.clone()))).expect("object builds")
}

mod values {
	use super::*;

	#[test]
	fn conversions_default_to_body_placements() {
		let value = Value::from(42);
		assert_eq!(value.kind(), ValueKind::Int64);
		assert_eq!(value.as_i64(), Some(42));
		assert_eq!(value.annotation(), Annotation::BODIES);
		assert!(value.annotation().contains(Annotation::HTTP_BODY));
		assert!(value.annotation().contains(Annotation::EVENT_DATA));
	}

	#[test]
	fn typed_accessors_never_assume_kind() {
		let value = Value::from("text");
		assert_eq!(value.as_str(), Some("text"));
		assert_eq!(value.as_i64(), None);
		assert_eq!(value.as_bool(), None);
		assert!(value.as_object().is_none());
		assert!(!value.is_null());
	}

	#[test]
	fn non_finite_doubles_are_rejected() {
		for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
			let err = Value::double(bad).expect_err("non-finite double should fail");
			assert!(matches!(err, VerdictError::NonFiniteNumber { .. }));
			assert_eq!(err.kind(), ErrorKind::Construction);
		}
		assert!(Value::try_from(1.5).is_ok());
	}

	#[test]
	fn negative_zero_normalizes() {
		let neg = Value::double(-0.0).expect("finite");
		let pos = Value::double(0.0).expect("finite");
		assert_eq!(neg, pos);
		assert_eq!(hash_of(&neg), hash_of(&pos));
	}

	#[test]
	fn decimals_become_canonical_strings() {
		let value = Value::decimal(Decimal::from_str("12.3400").expect("decimal parses"));
		assert_eq!(value.kind(), ValueKind::String);
		assert_eq!(value.as_str(), Some("12.34"));
		assert_eq!(value.as_decimal(), Some(Decimal::from_str("12.34").expect("decimal parses")));
	}

	#[test]
	fn large_unsigned_values_fall_back_to_double() {
		assert_eq!(Value::from(7_u64).kind(), ValueKind::Int64);
		assert_eq!(Value::from(u64::MAX).kind(), ValueKind::Double);
	}

	#[test]
	fn equality_ignores_annotation() {
		let plain = Value::from("v");
		let header = Value::from("v").with_annotation(Annotation::HTTP_HEADER).expect("primitive header");
		assert_eq!(plain, header);
		assert_eq!(hash_of(&plain), hash_of(&header));
	}
}

mod annotations {
	use super::*;

	#[test]
	fn header_and_extension_accept_primitives() {
		for annotation in [Annotation::HTTP_HEADER, Annotation::EVENT_EXTENSION, Annotation::HTTP_HEADER | Annotation::HTTP_BODY] {
			for value in [Value::null(), Value::from(true), Value::from(3), Value::from("x")] {
				let annotated = value.with_annotation(annotation).expect("primitive accepts annotation");
				assert_eq!(annotated.annotation(), annotation);
			}
		}
	}

	#[test]
	fn header_accepts_array_of_primitives() {
		let array = Array::from_values([Value::from(1), Value::from("two"), Value::null()]);
		Value::from(array).with_annotation(Annotation::HTTP_HEADER).expect("all-primitive array accepted");
	}

	#[test]
	fn header_rejects_objects_and_nested_arrays() {
		let obj = Value::from(object(&[("a", Value::from(1))]));
		let err = obj.with_annotation(Annotation::HTTP_HEADER).expect_err("object rejected");
		assert!(matches!(err, VerdictError::IncompatibleAnnotation { kind: ValueKind::Object, .. }));

		let nested = Array::from_values([Value::from(1), Value::from(Array::from_values([Value::from(2)]))]);
		let err = Value::from(nested).with_annotation(Annotation::EVENT_EXTENSION).expect_err("nested array rejected");
		assert!(matches!(err, VerdictError::IncompatibleAnnotation { kind: ValueKind::Array, .. }));
	}

	#[test]
	fn body_annotations_accept_anything() {
		let obj = Value::from(object(&[("a", Value::from(1))]));
		obj.with_annotation(Annotation::HTTP_BODY).expect("body accepts objects");
		Value::from(1).with_annotation(Annotation::empty()).expect("empty placement accepted");
	}
}

mod builders {
	use super::*;

	#[test]
	fn object_keys_are_sorted_ordinally() {
		let mut builder = ObjectBuilder::new();
		builder.add("b", 2).add("a", 1).add("B", 3).add("aa", 4);
		let obj = builder.build().expect("object builds");
		assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["B", "a", "aa", "b"]);
	}

	#[test]
	fn duplicate_keys_fail_at_build() {
		let mut builder = ObjectBuilder::with_capacity(2);
		builder.add("k", 1).add("k", 2);
		let err = builder.build().expect_err("duplicate rejected");
		assert!(matches!(err, VerdictError::DuplicateKey { ref key } if key == "k"));
	}

	#[test]
	fn empty_collections_allocate_nothing_and_compare_equal() {
		assert_eq!(ArrayBuilder::new().build(), Array::empty());
		assert_eq!(ObjectBuilder::new().build().expect("empty builds"), Object::empty());
		assert!(Object::default().is_empty());
		assert_eq!(Array::default().len(), 0);
	}

	#[test]
	fn array_builder_keeps_order() {
		let mut builder = ArrayBuilder::with_capacity(3);
		builder.add(1).add("two");
		builder.add_range([Value::from(false)]);
		let array = builder.build();
		assert_eq!(array.len(), 3);
		assert_eq!(array.get(0).and_then(Value::as_i64), Some(1));
		assert_eq!(array.get(1).and_then(Value::as_str), Some("two"));
		assert_eq!(array.get(2).and_then(Value::as_bool), Some(false));
		assert!(array.get(3).is_none());
	}

	#[test]
	fn large_objects_use_lookup_index() {
		let mut builder = ObjectBuilder::new();
		builder.add_range((0..40).map(|idx| (format!("key{idx:02}"), Value::from(idx))));
		let obj = builder.build().expect("object builds");
		assert_eq!(obj.len(), 40);
		for idx in 0..40 {
			assert_eq!(obj.get_i64(&format!("key{idx:02}")), Some(i64::from(idx)));
		}
		assert!(obj.get("missing").is_none());
		assert!(!obj.contains_key("key40"));
	}

	#[test]
	fn typed_object_getters() {
		let inner = object(&[("x", Value::from(1))]);
		let obj = object(&[
			("flag", Value::from(true)),
			("count", Value::from(3)),
			("ratio", Value::double(0.5).expect("finite")),
			("name", Value::from("n")),
			("list", Value::from(Array::from_values([Value::from(1)]))),
			("inner", Value::from(inner.clone())),
		]);
		assert_eq!(obj.get_bool("flag"), Some(true));
		assert_eq!(obj.get_i64("count"), Some(3));
		assert_eq!(obj.get_f64("ratio"), Some(0.5));
		assert_eq!(obj.get_str("name"), Some("n"));
		assert_eq!(obj.get_array("list").map(Array::len), Some(1));
		assert_eq!(obj.get_object("inner"), Some(&inner));
		assert_eq!(obj.get_str("count"), None);
	}
}

mod merging {
	use super::*;

	#[test]
	fn add_or_replace_inserts_and_replaces() {
		let original = object(&[("a", Value::from(1)), ("b", Value::from(2))]);
		let incoming = object(&[("b", Value::from(20)), ("c", Value::from(30))]);
		let merged = original.merge(&incoming, MergeStrategy::AddOrReplace).expect("merge succeeds");
		assert_eq!(merged.get_i64("a"), Some(1));
		assert_eq!(merged.get_i64("b"), Some(20));
		assert_eq!(merged.get_i64("c"), Some(30));
		assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
	}

	#[test]
	fn nested_objects_merge_recursively() {
		let original = object(&[("nested", Value::from(object(&[("x", Value::from(1)), ("y", Value::from(2))])))]);
		let incoming = object(&[("nested", Value::from(object(&[("y", Value::from(3)), ("z", Value::from(4))])))]);
		let merged = original.merge_replacing(&incoming);
		let nested = merged.get_object("nested").expect("nested object");
		assert_eq!(nested.get_i64("x"), Some(1));
		assert_eq!(nested.get_i64("y"), Some(3));
		assert_eq!(nested.get_i64("z"), Some(4));
	}

	#[test]
	fn arrays_and_kind_changes_replace_wholesale() {
		let original = object(&[
			("list", Value::from(Array::from_values([Value::from(1), Value::from(2)]))),
			("shape", Value::from(object(&[("x", Value::from(1))]))),
		]);
		let incoming = object(&[("list", Value::from(Array::from_values([Value::from(9)]))), ("shape", Value::from("flat"))]);
		let merged = original.merge_replacing(&incoming);
		assert_eq!(merged.get_array("list").map(Array::len), Some(1));
		assert_eq!(merged.get_str("shape"), Some("flat"));
	}

	#[test]
	fn preserve_existing_keeps_original() {
		let original = object(&[("a", Value::from(1)), ("n", Value::from(object(&[("x", Value::from(1))])))]);
		let incoming = object(&[("a", Value::from(2)), ("n", Value::from(object(&[("x", Value::from(2)), ("y", Value::from(3))])))]);
		let merged = original.merge(&incoming, MergeStrategy::PreserveExisting).expect("merge succeeds");
		assert_eq!(merged.get_i64("a"), Some(1));
		let nested = merged.get_object("n").expect("nested object");
		assert_eq!(nested.get_i64("x"), Some(1));
		assert_eq!(nested.get_i64("y"), Some(3));
	}

	#[test]
	fn fail_on_conflict_names_the_key() {
		let original = object(&[("a", Value::from(1))]);
		let incoming = object(&[("a", Value::from(1))]);
		let err = original.merge(&incoming, MergeStrategy::FailOnConflict).expect_err("conflict");
		assert!(matches!(err, VerdictError::MergeConflict { ref key } if key == "a"));

		let disjoint = object(&[("b", Value::from(2))]);
		let merged = original.merge(&disjoint, MergeStrategy::FailOnConflict).expect("no conflict");
		assert_eq!(merged.len(), 2);
	}

	#[test]
	fn merging_with_empty_is_identity() {
		let original = object(&[("a", Value::from(1))]);
		assert_eq!(original.merge_replacing(&Object::empty()), original);
		assert_eq!(Object::empty().merge_replacing(&original), original);
	}
}
