#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::json;
use verdict::http::{HttpReadOptions, HttpWriteOptions, MappedHeaderNames, read_response, read_unit_response, to_response, to_unit_response, write_response};
use verdict::json::{MetadataSerializationMode, SlabBufferPool};
use verdict::metadata::ObjectBuilder;
use verdict::{Annotation, Error, ErrorCategory, Errors, Object, Outcome, Value};
use verdict_testkit::assert_json_eq;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Invoice {
	number: String,
	total_cents: i64,
	paid: bool,
}

fn invoice() -> Invoice {
	Invoice {
		number: "INV-1".to_owned(),
		total_cents: 12_500,
		paid: false,
	}
}

fn request_metadata() -> Object {
	let mut builder = ObjectBuilder::new();
	builder
		.add("requestId", Value::from("req-1"))
		.add("correlation", Value::from("c-7").with_annotation(Annotation::HTTP_HEADER).expect("primitive"));
	builder.build().expect("unique keys")
}

#[test]
fn validation_failure_through_grouped_format() {
	let errors = Errors::from_vec(vec![
		Error::validation("number", "required"),
		Error::validation("total", "must be positive").with_code("Positive"),
		Error::validation("number", "wrong prefix").with_code("Prefix"),
	])
	.expect("errors");
	let outcome: Outcome<Invoice> = Outcome::fail_with_metadata(errors, request_metadata());
	let options = HttpWriteOptions::validation_compatible().with_header_names(MappedHeaderNames::new([("correlation", "X-Correlation-Id")]));

	let mut body = Vec::new();
	let head = write_response(&outcome, &options, &mut body).expect("write");
	assert_eq!(head.status, 400);
	assert_eq!(head.header("x-correlation-id"), Some("c-7"));
	assert_json_eq(
		&body,
		&json!({
			"type": ErrorCategory::Validation.problem_type(),
			"title": "Bad Request",
			"status": 400,
			"errors": {"number": ["required", "wrong prefix"], "total": ["must be positive"]},
			"errorDetails": [
				{"target": "number", "index": 1, "code": "Prefix"},
				{"target": "total", "index": 0, "code": "Positive"},
			],
			"metadata": {"requestId": "req-1"},
		}),
	);

	let back: Outcome<Invoice> = read_response(head.status, head.content_type, &body, &HttpReadOptions::default()).expect("read");
	let messages: Vec<&str> = back.errors().expect("failure").iter().map(|e| e.message.as_str()).collect();
	assert_eq!(messages, ["required", "wrong prefix", "must be positive"]);
	assert_eq!(back.metadata().and_then(|m| m.get_str("requestId")), Some("req-1"));
	assert!(back.metadata().is_some_and(|m| !m.contains_key("correlation")));
}

#[test]
fn success_and_failure_round_trip_through_pool() {
	let pool = SlabBufferPool::default();
	let options = HttpWriteOptions {
		metadata_mode: MetadataSerializationMode::Always,
		..HttpWriteOptions::default()
	};

	let success = Outcome::ok_with_metadata(invoice(), Object::single("etag", "v3"));
	let (head, body) = to_response(&success, &options, Some(&pool)).expect("write");
	let back: Outcome<Invoice> = read_response(head.status, head.content_type, &body, &HttpReadOptions::default()).expect("read");
	assert_eq!(back, success);
	drop(body);

	let failure: Outcome<Invoice> = Outcome::from_error(Error::not_found("invoice INV-9 not found").with_code("InvoiceMissing")).expect("real error");
	let (head, body) = to_response(&failure, &options, Some(&pool)).expect("write");
	assert_eq!(head.status, 404);
	let back: Outcome<Invoice> = read_response(head.status, head.content_type, &body, &HttpReadOptions::default()).expect("read");
	assert_eq!(back, failure);
	drop(body);

	assert_eq!(pool.retained(), 1);
}

#[test]
fn unit_outcomes_round_trip() {
	let options = HttpWriteOptions {
		metadata_mode: MetadataSerializationMode::Always,
		..HttpWriteOptions::default()
	};
	for outcome in [
		Outcome::success(),
		Outcome::success().with_metadata(Object::single("deleted", 3)),
		Outcome::from_error(Error::new("forbidden").with_category(ErrorCategory::Forbidden)).expect("real error"),
	] {
		let (head, body) = to_unit_response(&outcome, &options, None).expect("write");
		let back = read_unit_response(head.status, head.content_type, &body, &HttpReadOptions::default()).expect("read");
		assert_eq!(back, outcome);
	}
}
