#![allow(missing_docs)]

use serde::Deserialize;
use verdict::cloudevents::{CloudEventsReadOptions, parse_envelope, read_event};
use verdict::http::{HttpReadOptions, PROBLEM_CONTENT_TYPE, read_response};
use verdict::{ErrorCategory, ErrorKind, Outcome, VerdictError};
use verdict_testkit::fixture_bytes;

#[derive(Debug, Deserialize, PartialEq)]
struct Order {
	id: u32,
	lines: Vec<String>,
}

#[test]
fn grouped_problem_expands_error_details() {
	let outcome: Outcome<Order> = read_response(400, Some(PROBLEM_CONTENT_TYPE), &fixture_bytes("problem_grouped.json"), &HttpReadOptions::default()).expect("problem parses");
	let errors = outcome.errors().expect("failure");

	assert_eq!(errors.len(), 2);
	let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
	assert_eq!(messages, ["required", "too short"]);
	assert_eq!(errors.get(1).and_then(|e| e.code.as_deref()), Some("MinLength"));
	assert_eq!(errors.get(0).and_then(|e| e.code.as_deref()), None);
	assert!(errors.iter().all(|e| e.category == ErrorCategory::Validation));
}

#[test]
fn rich_problem_materializes_everything() {
	let outcome: Outcome<Order> = read_response(409, Some(PROBLEM_CONTENT_TYPE), &fixture_bytes("problem_rich.json"), &HttpReadOptions::default()).expect("problem parses");
	let errors = outcome.errors().expect("failure");

	let first = errors.first();
	assert_eq!(first.code.as_deref(), Some("AlreadyShipped"));
	assert_eq!(first.target.as_deref(), Some("orderId"));
	assert_eq!(first.metadata.as_ref().and_then(|m| m.get_str("shippedAt")), Some("2024-05-01T10:00:00Z"));
	assert_eq!(errors.get(1).map(|e| e.category), Some(ErrorCategory::Locked));
	assert_eq!(errors.leading_category(false), ErrorCategory::Unclassified);

	let metadata = outcome.metadata().expect("document metadata");
	assert_eq!(metadata.get_str("requestId"), Some("req-42"));
	assert_eq!(metadata.get_bool("retryable"), Some(false));
}

#[test]
fn detail_only_problem_becomes_single_error() {
	let outcome = verdict::http::read_unit_response(503, Some("application/problem+json"), &fixture_bytes("problem_detail_only.json"), &HttpReadOptions::default()).expect("problem parses");
	let error = outcome.first_error().expect("failure");
	assert_eq!(error.message, "maintenance window in progress");
	assert_eq!(error.category, ErrorCategory::ServiceUnavailable);
}

#[test]
fn event_without_source_is_rejected() {
	let err = parse_envelope(&fixture_bytes("event_missing_source.json")).expect_err("source missing");
	assert!(matches!(err, VerdictError::MissingAttribute { name: "source" }));
	assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn event_with_xml_content_is_rejected() {
	let err = parse_envelope(&fixture_bytes("event_xml_content.json")).expect_err("xml content");
	assert!(matches!(err, VerdictError::UnsupportedContentType { ref content_type } if content_type == "application/xml"));
}

#[test]
fn marked_failure_event_carries_extensions_and_data_metadata() {
	let outcome: Outcome<Order> = read_event(&fixture_bytes("event_failure.json"), &CloudEventsReadOptions::default()).expect("event parses");
	let error = outcome.first_error().expect("failure");
	assert_eq!(error.category, ErrorCategory::PaymentRequired);
	assert_eq!(error.code.as_deref(), Some("CreditLimit"));

	let metadata = outcome.metadata().expect("metadata");
	assert_eq!(metadata.get_str("tenant"), Some("acme"));
	assert_eq!(metadata.get_i64("attempt"), Some(2));
	assert_eq!(metadata.get_f64("limit"), Some(500.5));
	assert!(!metadata.contains_key("time"));
}

#[test]
fn unmarked_event_uses_classifier() {
	let bytes = fixture_bytes("event_unmarked_success.json");
	let err = read_event::<Order>(&bytes, &CloudEventsReadOptions::default()).expect_err("no classifier");
	assert_eq!(err.kind(), ErrorKind::Configuration);

	let options = CloudEventsReadOptions::with_classifier(|event_type| event_type.ends_with(".rejected"));
	let outcome: Outcome<Order> = read_event(&bytes, &options).expect("classified");
	assert_eq!(
		outcome.into_value().expect("success"),
		Order {
			id: 17,
			lines: vec!["book".to_owned(), "pen".to_owned()],
		}
	);
}

#[test]
fn envelope_data_span_points_into_fixture() {
	let bytes = fixture_bytes("event_unmarked_success.json");
	let envelope = parse_envelope(&bytes).expect("parses");
	let span = envelope.data_span.expect("data present");
	let data: serde_json::Value = serde_json::from_slice(&bytes[span.start..span.end()]).expect("span holds JSON");
	assert_eq!(data["value"]["id"], 17);
	assert_eq!(envelope.source, "/orders");
}
