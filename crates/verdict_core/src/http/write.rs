use std::io;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::Result;
use crate::http::headers::collect_headers;
use crate::http::problem::ProblemDocument;
use crate::http::{HttpWriteOptions, PROBLEM_CONTENT_TYPE};
use crate::json::{AnnotatedEntries, BufferPool, JSON_CONTENT_TYPE, PooledBuffer};
use crate::metadata::{Annotation, Object};
use crate::outcome::{Errors, Outcome};

/// Status line and headers that accompany a written body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
	/// HTTP status code.
	pub status: u16,
	/// Body media type; `None` when no body was written.
	pub content_type: Option<&'static str>,
	/// Headers produced from header-annotated metadata, in key order.
	pub headers: Vec<(String, String)>,
}

impl ResponseHead {
	/// Whether a body was written.
	pub fn has_body(&self) -> bool {
		self.content_type.is_some()
	}

	/// First header named `name`, compared case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
	}
}

/// Write `outcome` as an HTTP response body into `sink`.
///
/// Failures become an `application/problem+json` document whose status comes from the
/// leading error category. Successes write the value, wrapped with body metadata when
/// [`HttpWriteOptions::metadata_mode`] includes it.
pub fn write_response<T, W>(outcome: &Outcome<T>, options: &HttpWriteOptions, sink: W) -> Result<ResponseHead>
where
	T: Serialize,
	W: io::Write,
{
	write_parts(outcome.as_result().map(Some), outcome.metadata(), options, sink)
}

/// Write a value-less outcome; successes without body metadata write no body.
pub fn write_unit_response<W: io::Write>(outcome: &Outcome, options: &HttpWriteOptions, sink: W) -> Result<ResponseHead> {
	write_parts(outcome.as_result().map(|_| None::<&()>), outcome.metadata(), options, sink)
}

/// [`write_response`] into a buffer rented from `pool`.
///
/// Dropping the returned buffer hands its storage back to the pool.
pub fn to_response<'p, T: Serialize>(outcome: &Outcome<T>, options: &HttpWriteOptions, pool: Option<&'p dyn BufferPool>) -> Result<(ResponseHead, PooledBuffer<'p>)> {
	let mut buffer = PooledBuffer::rent(pool, 0);
	let head = write_response(outcome, options, &mut buffer)?;
	Ok((head, buffer))
}

/// [`write_unit_response`] into a buffer rented from `pool`.
pub fn to_unit_response<'p>(outcome: &Outcome, options: &HttpWriteOptions, pool: Option<&'p dyn BufferPool>) -> Result<(ResponseHead, PooledBuffer<'p>)> {
	let mut buffer = PooledBuffer::rent(pool, 0);
	let head = write_unit_response(outcome, options, &mut buffer)?;
	Ok((head, buffer))
}

fn write_parts<T, W>(state: std::result::Result<Option<&T>, &Errors>, metadata: Option<&Object>, options: &HttpWriteOptions, mut sink: W) -> Result<ResponseHead>
where
	T: Serialize,
	W: io::Write,
{
	let headers = collect_headers(metadata, options.header_names.as_ref())?;
	let body_metadata = metadata.map(|object| AnnotatedEntries::new(object, Annotation::HTTP_BODY)).filter(|entries| !entries.is_empty());

	match state {
		Err(errors) => {
			let category = errors.leading_category(options.first_category_is_leading);
			let status = category.status_code();
			tracing::debug!(status, category = category.as_str(), format = ?options.problem_format, errors = errors.len(), "writing problem details");
			let document = ProblemDocument {
				category,
				status,
				errors,
				format: options.problem_format,
				metadata: body_metadata.filter(|_| options.metadata_mode.includes(false)),
			};
			serde_json::to_writer(&mut sink, &document)?;
			Ok(ResponseHead {
				status,
				content_type: Some(PROBLEM_CONTENT_TYPE),
				headers,
			})
		}
		Ok(value) => {
			let status = options.success_status;
			let body_metadata = body_metadata.filter(|_| options.metadata_mode.includes(true));
			let content_type = match (value, body_metadata) {
				(Some(value), Some(entries)) => {
					tracing::debug!(status, "writing wrapped success body");
					serde_json::to_writer(&mut sink, &Wrapped { value: Some(value), metadata: entries })?;
					Some(JSON_CONTENT_TYPE)
				}
				(Some(value), None) => {
					tracing::debug!(status, "writing bare success body");
					serde_json::to_writer(&mut sink, value)?;
					Some(JSON_CONTENT_TYPE)
				}
				(None, Some(entries)) => {
					serde_json::to_writer(&mut sink, &Wrapped::<()> { value: None, metadata: entries })?;
					Some(JSON_CONTENT_TYPE)
				}
				(None, None) => None,
			};
			Ok(ResponseHead { status, content_type, headers })
		}
	}
}

/// `{ "value": ..., "metadata": {...} }`; `value` is left out for unit outcomes.
struct Wrapped<'a, T> {
	value: Option<&'a T>,
	metadata: AnnotatedEntries<'a>,
}

impl<T: Serialize> Serialize for Wrapped<'_, T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(1 + usize::from(self.value.is_some())))?;
		if let Some(value) = self.value {
			map.serialize_entry("value", value)?;
		}
		map.serialize_entry("metadata", &self.metadata)?;
		map.end()
	}
}
