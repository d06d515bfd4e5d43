use std::io::Write;
use std::sync::Arc;
use std::thread;

use crate::json::{self, AnnotatedEntries, BufferPool, MetadataSerializationMode, PooledBuffer, SlabBufferPool};
use crate::metadata::{Annotation, Object, Value, ValueKind};
use crate::outcome::{Error, ErrorCategory, Errors};
use crate::VerdictError;

fn to_string<T: serde::Serialize + ?Sized>(value: &T) -> String {
	let mut out = Vec::new();
	json::to_writer(&mut out, value).expect("serialize");
	String::from_utf8(out).expect("utf-8")
}

mod values {
	use super::*;

	#[test]
	fn objects_serialize_in_ordinal_key_order() {
		let object = Object::from_entries([("zeta", Value::from(1)), ("Alpha", Value::from(true)), ("alpha", Value::null())]).expect("object");
		assert_eq!(to_string(&object), r#"{"Alpha":true,"alpha":null,"zeta":1}"#);
	}

	#[test]
	fn numbers_keep_integral_and_floating_kinds() {
		let value: Value = json::from_slice(br#"[1, -7, 1.5, 1e3, 18446744073709551615]"#).expect("parse");
		let array = value.as_array().expect("array");
		assert_eq!(array.get(0).map(Value::kind), Some(ValueKind::Int64));
		assert_eq!(array.get(1).and_then(Value::as_i64), Some(-7));
		assert_eq!(array.get(2).map(Value::kind), Some(ValueKind::Double));
		assert_eq!(array.get(3).and_then(Value::as_f64), Some(1000.0));
		assert_eq!(array.get(4).map(Value::kind), Some(ValueKind::Double));
	}

	#[test]
	fn nested_documents_read_back_equal() {
		let text = r#"{"a":{"b":[1,"two",null,{"c":false}]},"d":2.25}"#;
		let value: Value = json::from_slice(text.as_bytes()).expect("parse");
		assert_eq!(to_string(&value), text);
		let again: Value = json::from_slice(to_string(&value).as_bytes()).expect("reparse");
		assert_eq!(value, again);
	}

	#[test]
	fn duplicate_keys_are_malformed() {
		let err = json::from_slice::<Object>(br#"{"a":1,"a":2}"#).expect_err("duplicate key");
		assert!(matches!(err, VerdictError::Json(_)));
	}

	#[test]
	fn escaped_keys_are_decoded() {
		let object: Object = json::from_slice(br#"{"a\"b":1}"#).expect("parse");
		assert_eq!(object.get_i64("a\"b"), Some(1));
	}

	#[test]
	fn object_rejects_non_object_input() {
		assert!(json::from_slice::<Object>(b"[1]").is_err());
	}

	#[test]
	fn annotated_entries_filter_top_level_placements() {
		let header = Value::from("abc").with_annotation(Annotation::HTTP_HEADER).expect("primitive");
		let object = Object::from_entries([("body", Value::from(1)), ("traceId", header)]).expect("object");
		assert_eq!(to_string(&AnnotatedEntries::new(&object, Annotation::HTTP_BODY)), r#"{"body":1}"#);
		assert_eq!(to_string(&AnnotatedEntries::new(&object, Annotation::HTTP_HEADER)), r#"{"traceId":"abc"}"#);
		assert!(AnnotatedEntries::new(&object, Annotation::EVENT_EXTENSION).is_empty());
	}
}

mod errors {
	use super::*;

	#[test]
	fn rich_shape_omits_unset_members() {
		let error = Error::new("boom");
		assert_eq!(to_string(&error), r#"{"message":"boom"}"#);

		let error = Error::validation("name", "required").with_code("Required").with_metadata(Object::single("max", 10));
		assert_eq!(to_string(&error), r#"{"message":"required","code":"Required","target":"name","category":"Validation","metadata":{"max":10}}"#);
	}

	#[test]
	fn rich_shape_reads_back() {
		let errors = Errors::from_vec(vec![Error::not_found("missing").with_target("id"), Error::new("other").with_code("X")]).expect("errors");
		let text = to_string(&errors);
		let back: Errors = json::from_slice(text.as_bytes()).expect("parse");
		assert_eq!(back, errors);
		assert_eq!(back.get(0).map(|e| e.category), Some(ErrorCategory::NotFound));
	}

	#[test]
	fn empty_message_and_empty_array_are_malformed() {
		assert!(json::from_slice::<Error>(br#"{"message":""}"#).is_err());
		assert!(json::from_slice::<Errors>(b"[]").is_err());
		assert!(json::from_slice::<Error>(br#"{"code":"X"}"#).is_err());
	}
}

mod modes {
	use super::*;

	#[test]
	fn errors_only_includes_failures() {
		assert!(MetadataSerializationMode::ErrorsOnly.includes(false));
		assert!(!MetadataSerializationMode::ErrorsOnly.includes(true));
		assert!(MetadataSerializationMode::Always.includes(true));
		assert_eq!(MetadataSerializationMode::default(), MetadataSerializationMode::ErrorsOnly);
	}
}

mod pool {
	use super::*;

	#[test]
	fn dropped_buffers_return_to_the_pool() {
		let pool = SlabBufferPool::default();
		{
			let mut buffer = PooledBuffer::rent(Some(&pool), 64);
			buffer.write_all(b"hello").expect("write");
			assert_eq!(&*buffer, b"hello");
		}
		assert_eq!(pool.retained(), 1);

		let reused = PooledBuffer::rent(Some(&pool), 16);
		assert!(reused.is_empty());
		assert_eq!(pool.retained(), 0);
	}

	#[test]
	fn detached_bytes_leave_the_pool() {
		let pool = SlabBufferPool::default();
		let mut buffer = PooledBuffer::rent(Some(&pool), 8);
		buffer.write_all(b"data").expect("write");
		let bytes = buffer.into_bytes();
		assert_eq!(&bytes[..], b"data");
		assert_eq!(pool.retained(), 0);
	}

	#[test]
	fn retention_is_bounded() {
		let pool = SlabBufferPool::new(1, 4096);
		let first = PooledBuffer::rent(Some(&pool), 8);
		let second = PooledBuffer::rent(Some(&pool), 8);
		drop(first);
		drop(second);
		assert_eq!(pool.retained(), 1);

		let huge = pool.rent(8192);
		pool.give_back(huge);
		assert_eq!(pool.retained(), 1);
	}

	#[test]
	fn unpooled_buffers_allocate_directly() {
		let mut buffer = PooledBuffer::unpooled(4);
		buffer.write_all(b"abcdef").expect("write");
		assert_eq!(buffer.len(), 6);
	}

	#[test]
	fn concurrent_rent_and_return() {
		let pool = Arc::new(SlabBufferPool::new(8, 1 << 16));
		let handles: Vec<_> = (0..4)
			.map(|n| {
				let pool = Arc::clone(&pool);
				thread::spawn(move || {
					for i in 0..100 {
						let mut buffer = PooledBuffer::rent(Some(&*pool), 32);
						write!(buffer, "{n}:{i}").expect("write");
						assert!(buffer.starts_with(format!("{n}:").as_bytes()));
					}
				})
			})
			.collect();
		for handle in handles {
			handle.join().expect("worker");
		}
		assert!(pool.retained() <= 8);
	}
}
