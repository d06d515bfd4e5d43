use std::fmt;

use serde::Deserialize;
use serde::de::{self, DeserializeOwned, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

use crate::http::problem::ProblemRecord;
use crate::http::{HttpReadOptions, PROBLEM_CONTENT_TYPE, SuccessShape};
use crate::json::{BorrowedStr, media_type};
use crate::metadata::Object;
use crate::outcome::Outcome;
use crate::{Result, VerdictError};

/// Read an HTTP response into an outcome.
///
/// The response is a failure when `status` is outside 2xx or the content type is
/// `application/problem+json`. Headers are not consulted.
pub fn read_response<T: DeserializeOwned>(status: u16, content_type: Option<&str>, body: &[u8], options: &HttpReadOptions) -> Result<Outcome<T>> {
	if is_failure(status, content_type) {
		return read_problem(status, body);
	}
	let body = if body.iter().all(u8::is_ascii_whitespace) { &b"null"[..] } else { body };
	if !is_wrapped(body, options.success_shape)? {
		tracing::debug!(status, "reading bare success body");
		return Ok(Outcome::ok(serde_json::from_slice(body)?));
	}
	tracing::debug!(status, "reading wrapped success body");
	let wrapped: WrappedRecord<T> = serde_json::from_slice(body)?;
	Ok(Outcome::from_parts(Ok(wrapped.value), wrapped.metadata))
}

/// Read a value-less HTTP response; a success body, when present, may only carry metadata.
pub fn read_unit_response(status: u16, content_type: Option<&str>, body: &[u8], options: &HttpReadOptions) -> Result<Outcome> {
	if is_failure(status, content_type) {
		return read_problem(status, body);
	}
	if body.iter().all(u8::is_ascii_whitespace) || !is_wrapped(body, options.success_shape)? {
		return Ok(Outcome::success());
	}
	let wrapped: UnitRecord = serde_json::from_slice(body)?;
	Ok(Outcome::from_parts(Ok(()), wrapped.metadata))
}

fn is_failure(status: u16, content_type: Option<&str>) -> bool {
	!(200..300).contains(&status) || content_type.is_some_and(|value| media_type(value).eq_ignore_ascii_case(PROBLEM_CONTENT_TYPE))
}

fn read_problem<T>(status: u16, body: &[u8]) -> Result<Outcome<T>> {
	if body.iter().all(u8::is_ascii_whitespace) {
		return Err(VerdictError::EmptyProblemBody { status });
	}
	let record: ProblemRecord<'_> = serde_json::from_slice(body)?;
	let (errors, metadata) = record.into_parts(status)?;
	Ok(Outcome::from_parts(Err(errors), metadata))
}

fn is_wrapped(body: &[u8], shape: SuccessShape) -> Result<bool> {
	match shape {
		SuccessShape::Bare => Ok(false),
		SuccessShape::Wrapped => Ok(true),
		SuccessShape::Auto => {
			let probe: ShapeProbe = serde_json::from_slice(body)?;
			tracing::trace!(wrapped = probe.0, "detected success body shape");
			Ok(probe.0)
		}
	}
}

#[derive(Deserialize)]
struct WrappedRecord<T> {
	value: T,
	#[serde(default)]
	metadata: Option<Object>,
}

#[derive(Deserialize)]
struct UnitRecord {
	#[serde(default)]
	metadata: Option<Object>,
}

/// True when the root is a non-empty object whose keys are only `value` and `metadata`.
struct ShapeProbe(bool);

impl<'de> Deserialize<'de> for ShapeProbe {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct ProbeVisitor;

		impl<'de> Visitor<'de> for ProbeVisitor {
			type Value = ShapeProbe;

			fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str("any JSON value")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
				let mut seen = false;
				let mut wrapped = true;
				while let Some(BorrowedStr(key)) = map.next_key::<BorrowedStr<'de>>()? {
					seen = true;
					wrapped &= key == "value" || key == "metadata";
					map.next_value::<IgnoredAny>()?;
				}
				Ok(ShapeProbe(seen && wrapped))
			}

			fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
				while seq.next_element::<IgnoredAny>()?.is_some() {}
				Ok(ShapeProbe(false))
			}

			fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<Self::Value, E> {
				Ok(ShapeProbe(false))
			}

			fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<Self::Value, E> {
				Ok(ShapeProbe(false))
			}

			fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<Self::Value, E> {
				Ok(ShapeProbe(false))
			}

			fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<Self::Value, E> {
				Ok(ShapeProbe(false))
			}

			fn visit_str<E: de::Error>(self, _: &str) -> std::result::Result<Self::Value, E> {
				Ok(ShapeProbe(false))
			}

			fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
				Ok(ShapeProbe(false))
			}
		}

		deserializer.deserialize_any(ProbeVisitor)
	}
}
